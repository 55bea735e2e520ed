//! The auction record and its default-resolution rules.

use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use serde_yaml::{Mapping, Value};

/// Keys understood in an auction document.
const KNOWN_KEYS: &[&str] = &[
    "title",
    "description",
    "description_file",
    "override",
    "photo_1",
    "photo_2",
    "out_file",
];

/// Strings that read as false, matching YAML 1.1 boolean words. Quoted and
/// plain scalars look the same once parsed, so `'no'` is false as well.
const FALSE_WORDS: &[&str] = &["false", "no", "off"];

/// Where a record's description came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "path")]
pub enum DescriptionSource {
    /// The inline `description` key
    Inline,
    /// Contents of the file named by `description_file`
    File(PathBuf),
    /// Generated from the title
    Placeholder,
}

/// One auction listing with every field resolved to a value.
#[derive(Debug, Clone, PartialEq)]
pub struct Auction {
    title: String,
    description: String,
    description_source: DescriptionSource,
    shipping_override: bool,
    primary_image: String,
    secondary_image: Option<String>,
    out_file: String,
}

/// Errors that make a document unusable as an auction.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Invalid YAML: {0}")]
    Syntax(#[from] serde_yaml::Error),

    #[error("Expected a mapping of auction fields, found {0}")]
    NotAMapping(&'static str),

    #[error("Field '{field}' must be a string, number or boolean, found {found}")]
    InvalidField {
        field: &'static str,
        found: &'static str,
    },
}

impl Auction {
    /// Build an auction from one parsed YAML document.
    ///
    /// Missing `title`, `photo_1` and `out_file` become empty strings, a
    /// missing `photo_2` stays `None`, and `override` is true for any truthy
    /// value. The description is taken from `description`, then from the
    /// file named by `description_file`, and finally falls back to
    /// [`placeholder_description`]. An unreadable description file is
    /// logged as a warning and never fails the record.
    pub fn from_yaml(value: &Value) -> Result<Self, RecordError> {
        let map = match value {
            Value::Mapping(map) => map,
            Value::Tagged(tagged) => return Self::from_yaml(&tagged.value),
            other => return Err(RecordError::NotAMapping(kind_of(other))),
        };

        for key in map.keys() {
            match key.as_str() {
                Some(name) if KNOWN_KEYS.contains(&name) => {}
                _ => tracing::debug!("Ignoring unknown auction key {:?}", key),
            }
        }

        let title = string_field(map, "title")?.unwrap_or_default();
        let inline = string_field(map, "description")?;
        let description_file = string_field(map, "description_file")?;
        let (description, description_source) =
            resolve_description(&title, inline, description_file);

        Ok(Self {
            shipping_override: map.get("override").is_some_and(is_truthy),
            primary_image: string_field(map, "photo_1")?.unwrap_or_default(),
            secondary_image: string_field(map, "photo_2")?,
            out_file: string_field(map, "out_file")?.unwrap_or_default(),
            title,
            description,
            description_source,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn description_source(&self) -> &DescriptionSource {
        &self.description_source
    }

    /// True when the listing offers express delivery instead of pickup only.
    pub fn shipping_override(&self) -> bool {
        self.shipping_override
    }

    pub fn primary_image(&self) -> &str {
        &self.primary_image
    }

    /// The second photo, if the document named one. `Some("")` is kept
    /// distinct from `None`.
    pub fn secondary_image(&self) -> Option<&str> {
        self.secondary_image.as_deref()
    }

    /// Output path relative to the build's output directory.
    pub fn out_file(&self) -> &str {
        &self.out_file
    }
}

/// The description used when a record has none of its own.
pub fn placeholder_description(title: &str) -> String {
    format!(
        "You are bidding on: {}\n\nHappy bidding and thanks for looking!",
        title
    )
}

fn resolve_description(
    title: &str,
    inline: Option<String>,
    description_file: Option<String>,
) -> (String, DescriptionSource) {
    if let Some(text) = inline.filter(|text| !text.is_empty()) {
        return (text, DescriptionSource::Inline);
    }

    let Some(path) = description_file else {
        tracing::debug!("No description for '{}', using placeholder", title);
        return (placeholder_description(title), DescriptionSource::Placeholder);
    };

    match fs::read_to_string(&path) {
        Ok(text) => (text, DescriptionSource::File(PathBuf::from(path))),
        Err(e) => {
            tracing::warn!("Could not read description file {}: {}", path, e);
            (placeholder_description(title), DescriptionSource::Placeholder)
        }
    }
}

/// Read a scalar field as text. Null counts as absent.
fn string_field(map: &Mapping, field: &'static str) -> Result<Option<String>, RecordError> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(RecordError::InvalidField {
            field,
            found: kind_of(other),
        }),
    }
}

pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => {
            let s = s.trim();
            !s.is_empty() && !FALSE_WORDS.iter().any(|word| s.eq_ignore_ascii_case(word))
        }
        Value::Sequence(seq) => !seq.is_empty(),
        Value::Mapping(map) => !map.is_empty(),
        Value::Tagged(tagged) => is_truthy(&tagged.value),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
