//! Set operations over ascending, duplicate-free id lists

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::models::DocumentId;

/// Above this length ratio the intersection gallops through the longer list
/// instead of merging linearly.
const GALLOP_RATIO: usize = 8;

/// Intersect two ascending lists. Output is ascending.
pub fn intersect_sorted(a: &[DocumentId], b: &[DocumentId]) -> Vec<DocumentId> {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let mut out = Vec::with_capacity(short.len());

    if short.len().saturating_mul(GALLOP_RATIO) < long.len() {
        let mut base = 0;
        for &id in short {
            base += gallop(&long[base..], id);
            if base >= long.len() {
                break;
            }
            if long[base] == id {
                out.push(id);
                base += 1;
            }
        }
    } else {
        let (mut i, mut j) = (0, 0);
        while i < short.len() && j < long.len() {
            match short[i].cmp(&long[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    out.push(short[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
    }

    out
}

/// Position of the first element `>= target`, probing at doubling offsets
/// before a binary search over the last bracket.
fn gallop(slice: &[DocumentId], target: DocumentId) -> usize {
    let mut bound = 1;
    while bound < slice.len() && slice[bound] < target {
        bound *= 2;
    }
    let lo = bound / 2;
    let hi = bound.min(slice.len());
    lo + slice[lo..hi].partition_point(|&id| id < target)
}

/// Union of any number of ascending lists, ascending and deduplicated
pub fn union_sorted(lists: &[&[DocumentId]]) -> Vec<DocumentId> {
    let mut heap = BinaryHeap::with_capacity(lists.len());
    for (list_idx, list) in lists.iter().enumerate() {
        if let Some(&first) = list.first() {
            heap.push(Reverse((first, list_idx, 0usize)));
        }
    }

    let mut out: Vec<DocumentId> = Vec::new();
    while let Some(Reverse((id, list_idx, pos))) = heap.pop() {
        if out.last() != Some(&id) {
            out.push(id);
        }
        if let Some(&next) = lists[list_idx].get(pos + 1) {
            heap.push(Reverse((next, list_idx, pos + 1)));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_intersect(a: &[u64], b: &[u64]) -> Vec<u64> {
        a.iter().copied().filter(|x| b.contains(x)).collect()
    }

    #[test]
    fn test_linear_intersection() {
        assert_eq!(intersect_sorted(&[1, 3, 5, 7], &[2, 3, 4, 7, 9]), vec![3, 7]);
        assert_eq!(intersect_sorted(&[1, 2], &[3, 4]), Vec::<u64>::new());
        assert_eq!(intersect_sorted(&[], &[1, 2]), Vec::<u64>::new());
    }

    #[test]
    fn test_galloping_intersection() {
        let long: Vec<u64> = (0..1000).collect();
        assert_eq!(intersect_sorted(&[0, 499, 999, 1500], &long), vec![0, 499, 999]);

        let evens: Vec<u64> = (0..2000).step_by(2).collect();
        let probe = [1, 2, 3, 100, 101, 1998, 1999];
        assert_eq!(intersect_sorted(&probe, &evens), naive_intersect(&probe, &evens));
    }

    #[test]
    fn test_intersection_is_symmetric() {
        let a: Vec<u64> = (0..500).filter(|x| x % 3 == 0).collect();
        let b: Vec<u64> = vec![3, 4, 300, 498];
        assert_eq!(intersect_sorted(&a, &b), intersect_sorted(&b, &a));
        assert_eq!(intersect_sorted(&a, &b), vec![3, 300, 498]);
    }

    #[test]
    fn test_gallop_positions() {
        let slice = [1, 2, 3, 4, 5, 6, 7, 8];
        assert_eq!(gallop(&slice, 0), 0);
        assert_eq!(gallop(&slice, 6), 5);
        assert_eq!(gallop(&slice, 9), 8);
        assert_eq!(gallop(&[], 3), 0);
        assert_eq!(gallop(&[5, 6], 3), 0);
    }

    #[test]
    fn test_union() {
        let a: &[u64] = &[1, 4, 9];
        let b: &[u64] = &[2, 4, 10];
        let c: &[u64] = &[];
        assert_eq!(union_sorted(&[a, b, c]), vec![1, 2, 4, 9, 10]);
        assert!(union_sorted(&[]).is_empty());
    }
}
