use crate::filename::{parse_filename, ParseError, ParsedName};
use crate::sanitize::{validate_separator, validate_text, SpecError};
use crate::timestamp::{detect_timestamp, TimestampMatch};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Mode {
    /// Between the stem and the tags/extension.
    #[default]
    Append,
    /// In front of the whole name.
    Prepend,
    /// Right after a leading date/time-stamp, or like `Prepend` without one.
    SmartPrepend,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModeError {
    #[error("options \"--prepend\" and \"--smart-prepend\" found. Only one can be given, not both")]
    Ambiguous,
}

impl Mode {
    pub fn from_flags(prepend: bool, smart_prepend: bool) -> Result<Self, ModeError> {
        match (prepend, smart_prepend) {
            (true, true) => Err(ModeError::Ambiguous),
            (true, false) => Ok(Self::Prepend),
            (false, true) => Ok(Self::SmartPrepend),
            (false, false) => Ok(Self::Append),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertionSpec {
    text: String,
    separator: String,
    mode: Mode,
}

impl InsertionSpec {
    pub fn new(text: &str, separator: &str, mode: Mode) -> Result<Self, SpecError> {
        let text = validate_text(text)?;
        validate_separator(separator)?;
        Ok(Self {
            text,
            separator: separator.to_string(),
            mode,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }
}

/// Join the parsed name and the inserted text according to the mode.
///
/// The timestamp is only consulted in `SmartPrepend`; its original separator
/// is replaced by the insertion separator.
pub fn compose(
    parsed: &ParsedName,
    timestamp: Option<&TimestampMatch>,
    spec: &InsertionSpec,
) -> String {
    let InsertionSpec {
        text,
        separator: sep,
        mode,
    } = spec;
    let (stem, suffix) = (parsed.stem(), parsed.suffix());

    match (mode, timestamp) {
        (Mode::Append, _) => format!("{stem}{sep}{text}{suffix}"),
        (Mode::SmartPrepend, Some(found)) => {
            format!("{}{sep}{text}{sep}{}", found.timestamp, found.rest)
        }
        (Mode::Prepend | Mode::SmartPrepend, _) => format!("{text}{sep}{stem}{suffix}"),
    }
}

/// Parse, detect and compose in one go. Holds no state between calls.
pub fn propose_name(raw: &str, spec: &InsertionSpec) -> Result<String, ParseError> {
    let parsed = parse_filename(raw)?;
    let timestamp = match spec.mode {
        Mode::SmartPrepend => detect_timestamp(raw),
        Mode::Append | Mode::Prepend => None,
    };
    if spec.mode == Mode::SmartPrepend && timestamp.is_none() {
        log::debug!("no date/time-stamp in '{raw}', falling back to prepend");
    }
    Ok(compose(&parsed, timestamp.as_ref(), spec))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(text: &str, sep: &str, mode: Mode) -> InsertionSpec {
        InsertionSpec::new(text, sep, mode).expect("valid spec")
    }

    fn propose(raw: &str, text: &str, sep: &str, mode: Mode) -> String {
        propose_name(raw, &spec(text, sep, mode)).expect("must compose")
    }

    #[test]
    fn append_before_extension() {
        assert_eq!(
            propose("2021-12-31T18.48.22 test.txt", "book", " ", Mode::Append),
            "2021-12-31T18.48.22 test book.txt"
        );
        assert_eq!(
            propose("the presentation.pptx", "of projectA", " ", Mode::Append),
            "the presentation of projectA.pptx"
        );
    }

    #[test]
    fn append_before_tag_block() {
        assert_eq!(
            propose("report -- draft final.pdf", "new", " ", Mode::Append),
            "report new -- draft final.pdf"
        );
        assert_eq!(
            propose("2013-05-09T16.17_img_00042 -- fun.jpeg", "Peter", " ", Mode::Append),
            "2013-05-09T16.17_img_00042 Peter -- fun.jpeg"
        );
    }

    #[test]
    fn append_without_extension() {
        assert_eq!(propose("README", "v2", "-", Mode::Append), "README-v2");
    }

    #[test]
    fn append_with_trailing_dot() {
        assert_eq!(propose("test.", "book", "_", Mode::Append), "test_book.");
    }

    #[test]
    fn prepend_in_front_of_everything() {
        assert_eq!(propose("test.txt", "book", "_", Mode::Prepend), "book_test.txt");
        assert_eq!(
            propose("2021-12-31_test.txt", "book shelf", "asd", Mode::Prepend),
            "book shelfasd2021-12-31_test.txt"
        );
    }

    #[test]
    fn smart_prepend_keeps_timestamp_first() {
        assert_eq!(
            propose("20211231_test.txt", "book", " ", Mode::SmartPrepend),
            "20211231 book test.txt"
        );
        assert_eq!(
            propose("2021-12-31T18.48.22 test.txt", "book_shelf", "-", Mode::SmartPrepend),
            "2021-12-31T18.48.22-book_shelf-test.txt"
        );
        assert_eq!(
            propose("2021-12_test -- tag.txt", "book", "#", Mode::SmartPrepend),
            "2021-12#book#test -- tag.txt"
        );
    }

    #[test]
    fn smart_prepend_without_timestamp_equals_prepend() {
        for raw in ["test.txt", "README", "notes -- work.md", "12345_x.txt"] {
            for sep in [" ", "_", "%"] {
                assert_eq!(
                    propose(raw, "book", sep, Mode::SmartPrepend),
                    propose(raw, "book", sep, Mode::Prepend)
                );
            }
        }
    }

    #[test]
    fn prepend_ignores_detected_timestamp() {
        let parsed = parse_filename("20211231_test.txt").expect("must parse");
        let found = detect_timestamp("20211231_test.txt");
        let composed = compose(&parsed, found.as_ref(), &spec("book", " ", Mode::Prepend));
        assert_eq!(composed, "book 20211231_test.txt");
    }

    #[test]
    fn append_can_be_undone_by_removing_the_insertion() {
        for raw in ["test.txt", "report -- draft final.pdf", "README", "a.b.c"] {
            let parsed = parse_filename(raw).expect("must parse");
            let composed = compose(&parsed, None, &spec("book", "_", Mode::Append));
            let insertion = "_book";
            let cut = composed.len() - parsed.suffix().len() - insertion.len();
            assert_eq!(&composed[..cut], parsed.stem());
            assert_eq!(&composed[cut..cut + insertion.len()], insertion);
        }
    }

    #[test]
    fn mode_flags() {
        assert_eq!(Mode::from_flags(false, false), Ok(Mode::Append));
        assert_eq!(Mode::from_flags(true, false), Ok(Mode::Prepend));
        assert_eq!(Mode::from_flags(false, true), Ok(Mode::SmartPrepend));
        assert_eq!(Mode::from_flags(true, true), Err(ModeError::Ambiguous));
    }

    #[test]
    fn spec_rejects_empty_text() {
        let err = InsertionSpec::new(" ", "_", Mode::Append).expect_err("must fail");
        assert_eq!(err, SpecError::EmptyText);
    }
}
