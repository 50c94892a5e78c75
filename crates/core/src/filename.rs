use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

/// Between the file name and the (optional) list of tags.
pub const FILENAME_TAG_SEPARATOR: &str = " -- ";
/// Between the old file name and the inserted text.
pub const DEFAULT_TEXT_SEPARATOR: &str = " ";

// The stem is lazy so the suffix starts at the earliest position where
// "tag block + extension" still reaches the end of the name.
static RE_FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^(?P<stem>.*?)(?P<suffix>(?P<tags>{}.*?)?(?P<ext>\.\w*)?)$",
        regex::escape(FILENAME_TAG_SEPARATOR)
    ))
    .expect("Failed to create regex pattern for file name components")
});

#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseError {
    #[error("could not extract file name components of '{0}'")]
    NoMatch(String),
}

/// A file name split into everything before the tags/extension and the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedName {
    stem: String,
    suffix: String,
    tags_len: usize,
}

impl ParsedName {
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// Tag block plus extension, possibly empty.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// The " -- tag1 tag2" part without the extension.
    pub fn tag_block(&self) -> Option<&str> {
        (self.tags_len > 0).then(|| &self.suffix[..self.tags_len])
    }
}

/// Split a raw file name into stem and tag/extension suffix.
///
/// Concatenating `stem` and `suffix` always gives back `name`.
pub fn parse_filename(name: &str) -> Result<ParsedName, ParseError> {
    let captures = RE_FILENAME
        .captures(name)
        .ok_or_else(|| ParseError::NoMatch(name.to_string()))?;

    let stem = captures.name("stem").map_or("", |m| m.as_str());
    let suffix = captures.name("suffix").map_or("", |m| m.as_str());
    let tags_len = captures.name("tags").map_or(0, |m| m.len());

    log::debug!("parsed '{name}' into stem '{stem}' and suffix '{suffix}'");

    Ok(ParsedName {
        stem: stem.to_string(),
        suffix: suffix.to_string(),
        tags_len,
    })
}
