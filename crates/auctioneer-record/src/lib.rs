//! Auction records for listing generation.
//!
//! This crate reads multi-document YAML auction files and resolves each
//! document into an [`Auction`] with every field defaulted.

pub mod document;
pub mod record;

pub use document::{parse_auctions, split_documents, ParsedDocument, RawDocument};
pub use record::{placeholder_description, Auction, DescriptionSource, RecordError};
