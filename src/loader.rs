//! Corpus loader for encyclopedia abstract dumps
//!
//! Two layouts are understood, chosen by file extension (after an optional `.gz`):
//! - `*.xml`: the Wikipedia abstract dump, a `<feed>` of
//!   `<doc><title/><url/><abstract/>..</doc>` records
//! - anything else: JSON lines, one `{"title": .., "url": .., "abstract": ..}` per line
//!
//! Ids are assigned in load order starting at 0. Bytes that are not valid UTF-8
//! are replaced, never rejected. A malformed record is skipped and counted; it
//! never aborts the load.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::{Duration, Instant};

use flate2::read::GzDecoder;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{Result, WikidexError};
use crate::models::{Document, DocumentMetadata};

/// Outcome of a corpus load
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
    pub elapsed: Duration,
}

/// On-disk corpus layout
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CorpusFormat {
    /// Wikipedia abstract dump (`enwiki-latest-abstract.xml`)
    AbstractXml,
    JsonLines,
}

impl CorpusFormat {
    /// Pick the layout from the path, looking through a trailing `.gz`
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let name = name.strip_suffix(".gz").unwrap_or(&name);
        if name.ends_with(".xml") {
            CorpusFormat::AbstractXml
        } else {
            CorpusFormat::JsonLines
        }
    }
}

#[derive(Deserialize)]
struct JsonRecord {
    #[serde(alias = "abstract")]
    text: Option<String>,
    title: Option<String>,
    url: Option<String>,
}

/// One `<doc>` of the abstract dump; `<links>` and other children are ignored
#[derive(Deserialize)]
#[serde(rename = "doc")]
struct XmlRecord {
    title: Option<String>,
    url: Option<String>,
    #[serde(rename = "abstract")]
    text: Option<String>,
}

const DOC_OPEN: &str = "<doc>";
const DOC_CLOSE: &str = "</doc>";

/// Load a corpus file, decompressing `.gz` files on the fly
pub fn load_documents(path: &Path) -> Result<(Vec<Document>, LoadReport)> {
    let file = File::open(path)
        .map_err(|e| WikidexError::Corpus(format!("cannot open {}: {}", path.display(), e)))?;

    let gzipped = path.extension().is_some_and(|ext| ext == "gz");
    let reader: Box<dyn BufRead> = if gzipped {
        Box::new(BufReader::new(GzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    let format = CorpusFormat::from_path(path);
    let (documents, report) = load_from_reader(reader, format)?;
    info!(
        path = %path.display(),
        format = ?format,
        documents = report.loaded,
        skipped = report.skipped,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "loaded corpus"
    );
    Ok((documents, report))
}

/// Load a corpus of the given layout from any buffered reader
pub fn load_from_reader<R: BufRead>(
    reader: R,
    format: CorpusFormat,
) -> Result<(Vec<Document>, LoadReport)> {
    let start = Instant::now();
    let mut sink = Sink::default();
    match format {
        CorpusFormat::AbstractXml => read_xml(reader, &mut sink)?,
        CorpusFormat::JsonLines => read_json_lines(reader, &mut sink)?,
    }

    let report = LoadReport {
        loaded: sink.documents.len(),
        skipped: sink.skipped,
        elapsed: start.elapsed(),
    };
    Ok((sink.documents, report))
}

#[derive(Default)]
struct Sink {
    documents: Vec<Document>,
    skipped: usize,
}

impl Sink {
    fn push(&mut self, text: String, title: Option<String>, url: Option<String>) {
        let id = self.documents.len() as u64;
        self.documents
            .push(Document::new(id, text).with_metadata(DocumentMetadata { title, url }));
    }
}

fn read_json_lines<R: BufRead>(reader: R, sink: &mut Sink) -> Result<()> {
    for (line_no, line) in reader.split(b'\n').enumerate() {
        let line = line?;
        let line = String::from_utf8_lossy(&line);
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let record = match serde_json::from_str::<JsonRecord>(line) {
            Ok(record) => record,
            Err(e) => {
                warn!(line = line_no + 1, error = %e, "skipping malformed record");
                sink.skipped += 1;
                continue;
            }
        };

        let Some(text) = record.text else {
            warn!(line = line_no + 1, "skipping record without text");
            sink.skipped += 1;
            continue;
        };
        sink.push(text, record.title, record.url);
    }
    Ok(())
}

/// Stream `<doc>` elements out of the dump. Each element is cut from the
/// line stream and deserialized on its own, so a broken record costs only
/// itself. A doc without `<abstract>` keeps its id with empty text.
fn read_xml<R: BufRead>(reader: R, sink: &mut Sink) -> Result<()> {
    let mut element = String::new();
    let mut first_line = 0usize;

    for (line_no, line) in reader.split(b'\n').enumerate() {
        let line = line?;
        let decoded = String::from_utf8_lossy(&line);
        let mut rest: &str = &decoded;

        loop {
            if element.is_empty() {
                let Some(open) = rest.find(DOC_OPEN) else {
                    break;
                };
                rest = &rest[open..];
                first_line = line_no + 1;
            }

            match rest.find(DOC_CLOSE) {
                Some(close) => {
                    let end = close + DOC_CLOSE.len();
                    element.push_str(&rest[..end]);
                    rest = &rest[end..];
                    parse_xml_record(&element, first_line, sink);
                    element.clear();
                }
                None => {
                    element.push_str(rest);
                    element.push('\n');
                    break;
                }
            }
        }
    }

    if !element.is_empty() {
        warn!(line = first_line, "skipping unterminated <doc> at end of input");
        sink.skipped += 1;
    }
    Ok(())
}

fn parse_xml_record(element: &str, line: usize, sink: &mut Sink) {
    match quick_xml::de::from_str::<XmlRecord>(element) {
        Ok(record) => sink.push(record.text.unwrap_or_default(), record.title, record.url),
        Err(e) => {
            warn!(line, error = %e, "skipping malformed record");
            sink.skipped += 1;
        }
    }
}
