//! Batch listing builder.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;

use auctioneer_record::{parse_auctions, Auction, DescriptionSource};

use crate::assembler::{Assembler, RenderError};
use crate::images::ImageHost;

/// Configuration for a batch build.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Multi-document YAML file of auctions
    pub input: PathBuf,

    /// Directory that `out_file` paths are resolved against
    pub output_dir: PathBuf,

    /// Where listing photos are hosted
    pub images: ImageHost,

    /// HTML-escape titles and descriptions
    pub escape: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("auctions.yaml"),
            output_dir: PathBuf::from("."),
            images: ImageHost::default(),
            escape: false,
        }
    }
}

/// Errors that end a build before any listing is written.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to create output directory {}: {source}", .path.display())]
    CreateOutputDir { path: PathBuf, source: io::Error },

    #[error("Failed to read auctions file {}: {source}", .path.display())]
    ReadInput { path: PathBuf, source: io::Error },
}

/// Why one listing was not written.
#[derive(Debug, thiserror::Error)]
pub enum RecordFailure {
    #[error("no out_file given")]
    MissingOutFile,

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// What happened to one document of the input file.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecordStatus {
    /// The listing was written
    Written { description: DescriptionSource },
    /// The document could not be read as an auction
    Skipped { error: String },
    /// The auction was read but its listing could not be produced
    Failed { error: String },
}

/// Per-document entry of a [`BuildReport`].
#[derive(Debug, Clone, Serialize)]
pub struct RecordOutcome {
    /// 1-based document number in the input file
    pub document: usize,

    /// Line the document starts on
    pub line: usize,

    /// Auction title, when the document parsed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Output path, when the document parsed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    #[serde(flatten)]
    pub status: RecordStatus,
}

/// Result of a build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub input: PathBuf,
    pub output_dir: PathBuf,

    /// One entry per non-empty document, in input order
    pub records: Vec<RecordOutcome>,

    /// Total build time in milliseconds
    pub duration_ms: u64,
}

impl BuildReport {
    /// Number of listings written.
    pub fn written(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r.status, RecordStatus::Written { .. }))
            .count()
    }

    /// Number of documents skipped or failed.
    pub fn problems(&self) -> usize {
        self.records.len() - self.written()
    }
}

/// Builds one HTML listing per auction in an input file.
pub struct ListingBuilder {
    config: BuildConfig,
    assembler: Assembler,
}

impl ListingBuilder {
    /// Create a new listing builder.
    pub fn new(config: BuildConfig) -> Self {
        let assembler = Assembler::new(config.images.clone(), config.escape);
        Self { config, assembler }
    }

    /// Run the build.
    ///
    /// Only an unusable output directory or an unreadable input file fails
    /// the build. Bad documents and listings that fail to render or write
    /// are logged, recorded in the report and skipped.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        let start = Instant::now();

        fs::create_dir_all(&self.config.output_dir).map_err(|source| {
            BuildError::CreateOutputDir {
                path: self.config.output_dir.clone(),
                source,
            }
        })?;

        let source =
            fs::read_to_string(&self.config.input).map_err(|source| BuildError::ReadInput {
                path: self.config.input.clone(),
                source,
            })?;

        let mut records = Vec::new();
        let mut auctions = Vec::new();

        for doc in parse_auctions(&source) {
            match doc.auction {
                Ok(auction) => auctions.push((doc.index, doc.line, auction)),
                Err(e) => {
                    tracing::error!(
                        "Error parsing auction entry {} (line {}): {}",
                        doc.index,
                        doc.line,
                        e
                    );
                    records.push(RecordOutcome {
                        document: doc.index,
                        line: doc.line,
                        title: None,
                        output: None,
                        status: RecordStatus::Skipped {
                            error: e.to_string(),
                        },
                    });
                }
            }
        }

        tracing::debug!(
            "Read {} auctions from {}",
            auctions.len(),
            self.config.input.display()
        );

        for (document, line, auction) in &auctions {
            let output_path = self.config.output_dir.join(auction.out_file());

            let status = match self.write_listing(auction, &output_path) {
                Ok(()) => {
                    tracing::info!("Generated auction HTML: {}", output_path.display());
                    RecordStatus::Written {
                        description: auction.description_source().clone(),
                    }
                }
                Err(e) => {
                    tracing::error!(
                        "Error writing output file {}: {}",
                        output_path.display(),
                        e
                    );
                    RecordStatus::Failed {
                        error: e.to_string(),
                    }
                }
            };

            records.push(RecordOutcome {
                document: *document,
                line: *line,
                title: Some(auction.title().to_string()),
                output: Some(output_path),
                status,
            });
        }

        records.sort_by_key(|r| r.document);

        Ok(BuildReport {
            input: self.config.input.clone(),
            output_dir: self.config.output_dir.clone(),
            records,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Render one auction and write it to `path`.
    fn write_listing(&self, auction: &Auction, path: &Path) -> Result<(), RecordFailure> {
        if auction.out_file().is_empty() {
            return Err(RecordFailure::MissingOutFile);
        }

        let html = self.assembler.render(auction)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| RecordFailure::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }

        fs::write(path, html).map_err(|source| RecordFailure::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::{EXPRESS_SHIPPING, HANDLING_FEE, PICKUP_ONLY};
    use auctioneer_record::placeholder_description;
    use tempfile::tempdir;

    fn builder(input: PathBuf, output_dir: PathBuf) -> ListingBuilder {
        ListingBuilder::new(BuildConfig {
            input,
            output_dir,
            ..Default::default()
        })
    }

    fn html_files(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".html"))
            .collect();
        names.sort();
        names
    }

    #[test]
    fn builds_one_file_per_auction() {
        let temp = tempdir().unwrap();
        let input = temp.path().join("auctions.yaml");
        let out = temp.path().join("out");
        fs::write(
            &input,
            r#"---
title: Lego Set
photo_1: lego1.jpg
out_file: lego.html
---
title: Book
description: A great read.
override: true
out_file: book.html
"#,
        )
        .unwrap();

        let report = builder(input, out.clone()).build().unwrap();

        assert_eq!(report.written(), 2);
        assert_eq!(report.problems(), 0);
        assert_eq!(html_files(&out), vec!["book.html", "lego.html"]);

        let lego = fs::read_to_string(out.join("lego.html")).unwrap();
        let url = ImageHost::default().resolve("lego1.jpg");
        assert!(lego.contains(&format!("<img src=\"{}\"", url)));
        assert!(lego.contains(PICKUP_ONLY));
        assert!(!lego.contains(EXPRESS_SHIPPING));

        let book = fs::read_to_string(out.join("book.html")).unwrap();
        assert!(book.contains("A great read."));
        assert!(book.contains(EXPRESS_SHIPPING));
        assert!(book.contains(HANDLING_FEE));
        assert!(!book.contains(PICKUP_ONLY));
    }

    #[test]
    fn skips_malformed_document() {
        let temp = tempdir().unwrap();
        let input = temp.path().join("auctions.yaml");
        let out = temp.path().join("out");
        fs::write(
            &input,
            "---\n- not\n- an auction\n---\ntitle: Kite\nout_file: kite.html\n",
        )
        .unwrap();

        let report = builder(input, out.clone()).build().unwrap();

        assert_eq!(html_files(&out), vec!["kite.html"]);
        assert_eq!(report.records.len(), 2);
        assert!(matches!(
            report.records[0].status,
            RecordStatus::Skipped { .. }
        ));
        assert!(matches!(
            report.records[1].status,
            RecordStatus::Written { .. }
        ));
    }

    #[test]
    fn skips_document_with_bad_yaml() {
        let temp = tempdir().unwrap();
        let input = temp.path().join("auctions.yaml");
        let out = temp.path().join("out");
        fs::write(
            &input,
            "---\ntitle: [broken\n---\ntitle: Kite\nout_file: kite.html\n",
        )
        .unwrap();

        let report = builder(input, out.clone()).build().unwrap();

        assert_eq!(html_files(&out), vec!["kite.html"]);
        assert_eq!(report.problems(), 1);
    }

    #[test]
    fn missing_description_file_still_writes() {
        let temp = tempdir().unwrap();
        let input = temp.path().join("auctions.yaml");
        let out = temp.path().join("out");
        let missing = temp.path().join("nope.md");
        fs::write(
            &input,
            format!(
                "title: Robot\ndescription_file: {}\nout_file: robot.html\n",
                missing.display()
            ),
        )
        .unwrap();

        let report = builder(input, out.clone()).build().unwrap();

        assert_eq!(report.written(), 1);
        assert!(matches!(
            report.records[0].status,
            RecordStatus::Written {
                description: DescriptionSource::Placeholder
            }
        ));
        let html = fs::read_to_string(out.join("robot.html")).unwrap();
        let first_line = placeholder_description("Robot");
        assert!(html.contains(first_line.lines().next().unwrap()));
    }

    #[test]
    fn missing_input_fails_without_output() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("out");

        let result = builder(temp.path().join("missing.yaml"), out.clone()).build();

        assert!(matches!(result, Err(BuildError::ReadInput { .. })));
        assert!(html_files(&out).is_empty());
    }

    #[test]
    fn empty_out_file_fails_only_that_record() {
        let temp = tempdir().unwrap();
        let input = temp.path().join("auctions.yaml");
        let out = temp.path().join("out");
        fs::write(
            &input,
            "---\ntitle: Nameless\n---\ntitle: Kite\nout_file: kite.html\n",
        )
        .unwrap();

        let report = builder(input, out.clone()).build().unwrap();

        assert_eq!(report.written(), 1);
        match &report.records[0].status {
            RecordStatus::Failed { error } => assert_eq!(error, "no out_file given"),
            other => panic!("unexpected status: {:?}", other),
        }
        assert_eq!(html_files(&out), vec!["kite.html"]);
    }

    #[test]
    fn creates_nested_output_directories() {
        let temp = tempdir().unwrap();
        let input = temp.path().join("auctions.yaml");
        let out = temp.path().join("out");
        fs::write(&input, "title: Kite\nout_file: toys/kite.html\n").unwrap();

        let report = builder(input, out.clone()).build().unwrap();

        assert_eq!(report.written(), 1);
        assert!(out.join("toys").join("kite.html").exists());
    }

    #[test]
    fn skips_empty_documents_silently() {
        let temp = tempdir().unwrap();
        let input = temp.path().join("auctions.yaml");
        let out = temp.path().join("out");
        fs::write(
            &input,
            "---\n---\n# nothing\n--- {}\n---\ntitle: Kite\nout_file: kite.html\n",
        )
        .unwrap();

        let report = builder(input, out).build().unwrap();

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.problems(), 0);
    }
}
