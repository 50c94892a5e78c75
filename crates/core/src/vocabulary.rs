use crate::config::VocabularyConfig;
use crate::filename::parse_filename;
use anyhow::{Context, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

/// What counts as a word in a file name for tab completion.
static RE_FILENAME_COMPONENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z]+").expect("Failed to create regex pattern for file name components")
});

/// Supplies the words offered while typing the text to insert.
pub trait WordListProvider {
    fn words(&self) -> Result<Vec<String>>;
}

/// Words taken from the names of the files in one directory.
#[derive(Debug, Clone)]
pub struct DirectoryVocabulary {
    dir: PathBuf,
    config: VocabularyConfig,
}

impl DirectoryVocabulary {
    pub fn new(dir: impl Into<PathBuf>, config: VocabularyConfig) -> Self {
        Self {
            dir: dir.into(),
            config,
        }
    }
}

impl WordListProvider for DirectoryVocabulary {
    fn words(&self) -> Result<Vec<String>> {
        let mut words = Vec::new();
        for word in &self.config.initial_words {
            if !words.contains(word) {
                words.push(word.clone());
            }
        }

        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry =
                entry.with_context(|| format!("Failed to list directory: {}", self.dir.display()))?;
            if !entry.path().is_file() {
                continue;
            }
            for word in words_in_filename(entry.path(), &self.config) {
                if !words.contains(&word) {
                    words.push(word);
                }
            }
        }

        log::debug!(
            "collected {} vocabulary words from {}",
            words.len(),
            self.dir.display()
        );
        Ok(words)
    }
}

/// Words of the stem and the tags, the extension is left out.
fn words_in_filename(path: &Path, config: &VocabularyConfig) -> Vec<String> {
    let Some(parsed) = path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| parse_filename(name).ok())
    else {
        return Vec::new();
    };
    let text = format!("{}{}", parsed.stem(), parsed.tag_block().unwrap_or_default());

    RE_FILENAME_COMPONENT
        .find_iter(&text)
        .map(|m| m.as_str())
        .filter(|word| word.chars().count() >= config.min_word_len)
        .filter(|word| {
            let lower = word.to_lowercase();
            !config.blacklist.iter().any(|b| b.to_lowercase() == lower)
        })
        .map(str::to_string)
        .collect()
}

/// Prefix completion over a sorted word list.
#[derive(Debug, Clone, Default)]
pub struct Completer {
    words: Vec<String>,
}

impl Completer {
    pub fn new(mut words: Vec<String>) -> Self {
        words.sort();
        words.dedup();
        Self { words }
    }

    pub fn from_provider(provider: &dyn WordListProvider) -> Result<Self> {
        Ok(Self::new(provider.words()?))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Every word starting with `prefix`, all words for an empty prefix.
    pub fn complete(&self, prefix: &str) -> Vec<&str> {
        self.words
            .iter()
            .filter(|word| word.starts_with(prefix))
            .map(String::as_str)
            .collect()
    }
}
