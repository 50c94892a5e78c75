use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpecError {
    #[error("no text given")]
    EmptyText,
    #[error("text contains a character that is not allowed in file names: {0:?}")]
    InvalidText(char),
    #[error("separator contains a character that is not allowed in file names: {0:?}")]
    InvalidSeparator(char),
}

/// Trim the user text and check that it can live inside a single file name.
pub fn validate_text(text: &str) -> Result<String, SpecError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(SpecError::EmptyText);
    }
    if let Some(ch) = find_disallowed_char(text) {
        return Err(SpecError::InvalidText(ch));
    }
    Ok(text.to_string())
}

/// The separator is used verbatim; only characters that would break the
/// file name apart are rejected. An empty separator is fine.
pub fn validate_separator(separator: &str) -> Result<(), SpecError> {
    match find_disallowed_char(separator) {
        Some(ch) => Err(SpecError::InvalidSeparator(ch)),
        None => Ok(()),
    }
}

fn find_disallowed_char(value: &str) -> Option<char> {
    value.chars().find(|&ch| is_disallowed_char(ch))
}

fn is_disallowed_char(ch: char) -> bool {
    ch == '/' || ch == '\0' || ch.is_control() || (cfg!(windows) && ch == '\\')
}
