//! Multi-document YAML reading.
//!
//! The auction file is cut into documents at `---` and `...` markers before
//! any YAML is parsed, so a syntax error in one document does not hide the
//! documents that follow it.

use serde_yaml::Value;

use crate::record::{is_truthy, Auction, RecordError};

/// One non-blank document cut out of an auction file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawDocument<'a> {
    /// 1-based position among the non-blank documents
    pub index: usize,
    /// 1-based line on which the document starts
    pub line: usize,
    /// Document text, without its `---` marker
    pub source: &'a str,
}

/// The outcome of reading one document.
#[derive(Debug)]
pub struct ParsedDocument {
    pub index: usize,
    pub line: usize,
    pub auction: Result<Auction, RecordError>,
}

/// Split a YAML stream into its non-blank documents.
///
/// A line starting with `---` at column 0 opens a new document (text after
/// the marker on the same line belongs to it) and a `...` line closes the
/// current one. Documents holding only whitespace and comments are dropped.
pub fn split_documents(source: &str) -> Vec<RawDocument<'_>> {
    let mut documents = Vec::new();
    let mut start = 0;
    let mut start_line = 1;
    let mut offset = 0;

    for (i, line) in source.split_inclusive('\n').enumerate() {
        let bare = line.trim_end_matches(|c| c == '\n' || c == '\r');

        if is_marker(bare, "---") {
            push_document(&mut documents, &source[start..offset], start_line);
            start = offset + 3;
            start_line = i + 1;
        } else if is_marker(bare, "...") {
            push_document(&mut documents, &source[start..offset], start_line);
            start = offset + line.len();
            start_line = i + 2;
        }

        offset += line.len();
    }
    push_document(&mut documents, &source[start..], start_line);

    documents
}

/// Parse every document of an auction file into an [`Auction`].
///
/// Documents that are blank or hold a falsy value (`null`, `{}`, `[]`, `''`,
/// `false`, `0`) are skipped silently. Every other document yields a [`ParsedDocument`], successful or not, in input
/// order.
pub fn parse_auctions(source: &str) -> Vec<ParsedDocument> {
    split_documents(source)
        .into_iter()
        .filter_map(|doc| {
            let auction = match serde_yaml::from_str::<Value>(doc.source) {
                Ok(value) if !is_truthy(&value) => return None,
                Ok(value) => Auction::from_yaml(&value),
                Err(e) => Err(RecordError::from(e)),
            };
            Some(ParsedDocument {
                index: doc.index,
                line: doc.line,
                auction,
            })
        })
        .collect()
}

fn is_marker(line: &str, marker: &str) -> bool {
    match line.strip_prefix(marker) {
        Some(rest) => rest.is_empty() || rest.starts_with(' ') || rest.starts_with('\t'),
        None => false,
    }
}

fn push_document<'a>(documents: &mut Vec<RawDocument<'a>>, text: &'a str, line: usize) {
    let blank = text.lines().all(|l| {
        let l = l.trim();
        l.is_empty() || l.starts_with('#')
    });
    if blank {
        return;
    }

    documents.push(RawDocument {
        index: documents.len() + 1,
        line,
        source: text,
    });
}
