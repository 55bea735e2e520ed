//! HTML listing generator for auction records.
//!
//! Renders each [`auctioneer_record::Auction`] through a fixed markdown
//! template, wraps the result in a styled HTML shell, normalizes it and
//! writes one file per record.

pub mod assembler;
pub mod assets;
pub mod builder;
pub mod images;
pub mod templates;
pub mod tidy;

pub use assembler::{Assembler, RenderError};
pub use builder::{
    BuildConfig, BuildError, BuildReport, ListingBuilder, RecordFailure, RecordOutcome,
    RecordStatus,
};
pub use images::ImageHost;
pub use tidy::{tidy, Tidied, TidyOptions};
