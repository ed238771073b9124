//! Reference evaluator and corpus generator

use crate::models::{Document, DocumentId};
use crate::tokenizer::Tokenizer;

/// Word pool for synthetic documents
pub const VOCABULARY: &[&str] = &[
    "river", "stone", "wild", "cat", "dog", "small", "large", "domestic", "city", "mountain",
    "forest", "king", "queen", "war", "peace", "album", "band", "film", "novel", "island",
    "bridge", "church", "station", "football", "club", "village", "county", "district",
    "species", "genus", "plant", "bird", "ship", "railway", "school", "university", "painter",
    "poet", "empire", "1945", "2001",
];

/// Answer `query` by scanning every document; no index involved.
///
/// Applies AND semantics with the given tokenizer, so it agrees with the
/// evaluator on any index built with the same tokenizer.
pub fn reference_search(documents: &[Document], tokenizer: &Tokenizer, query: &str) -> Vec<DocumentId> {
    let terms = tokenizer.unique_terms(query);
    if terms.is_empty() {
        return Vec::new();
    }

    let mut ids: Vec<DocumentId> = documents
        .iter()
        .filter(|doc| {
            let doc_terms = tokenizer.unique_terms(&doc.text);
            terms.iter().all(|term| doc_terms.contains(term))
        })
        .map(|doc| doc.id)
        .collect();
    ids.sort_unstable();
    ids
}

/// Deterministic corpus of `count` documents with ids `0..count`.
///
/// Words are drawn from `VOCABULARY` with mixed case and punctuation so the
/// tokenizer's normalization is exercised. Same seed, same corpus.
pub fn synthetic_corpus(count: usize, seed: u64) -> Vec<Document> {
    let mut rng = XorShift::new(seed);
    (0..count)
        .map(|id| {
            let words = 3 + rng.below(10);
            let mut text = String::new();
            for n in 0..words {
                if n > 0 {
                    text.push_str(match rng.below(6) {
                        0 => ", ",
                        1 => " - ",
                        _ => " ",
                    });
                }
                let word = VOCABULARY[rng.below(VOCABULARY.len())];
                if rng.below(4) == 0 {
                    text.push_str(&word.to_uppercase());
                } else {
                    text.push_str(word);
                }
            }
            text.push('.');
            Document::new(id as u64, text)
        })
        .collect()
}

struct XorShift(u64);

impl XorShift {
    fn new(seed: u64) -> Self {
        // Zero is a fixed point of xorshift
        Self(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1)
    }

    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn below(&mut self, bound: usize) -> usize {
        (self.next() % bound as u64) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_corpus_is_deterministic() {
        assert_eq!(synthetic_corpus(50, 3), synthetic_corpus(50, 3));
        assert_ne!(synthetic_corpus(50, 3), synthetic_corpus(50, 4));
    }

    #[test]
    fn test_synthetic_corpus_ids() {
        let docs = synthetic_corpus(10, 1);
        let ids: Vec<u64> = docs.iter().map(|d| d.id).collect();
        assert_eq!(ids, (0..10).collect::<Vec<u64>>());
        assert!(docs.iter().all(|d| !d.text.is_empty()));
    }

    #[test]
    fn test_reference_search() {
        let tokenizer = Tokenizer::default();
        let docs = vec![
            Document::new(0, "Small wild cat"),
            Document::new(1, "Large wild dog"),
            Document::new(2, "Small domestic dog"),
        ];
        assert_eq!(reference_search(&docs, &tokenizer, "wild"), vec![0, 1]);
        assert_eq!(reference_search(&docs, &tokenizer, "dog SMALL"), vec![2]);
        assert!(reference_search(&docs, &tokenizer, "").is_empty());
    }
}
