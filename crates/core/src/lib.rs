mod apply;
mod composer;
mod config;
mod filename;
mod planner;
mod sanitize;
mod timestamp;
mod vocabulary;

pub use apply::{apply_plan, ApplyFailure, ApplyResult};
pub use composer::{compose, propose_name, InsertionSpec, Mode, ModeError};
pub use config::{
    app_paths, load_config, save_config, AppConfig, AppPaths, VocabularyConfig, CONFIG_PATH_ENV,
};
pub use filename::{
    parse_filename, ParseError, ParsedName, DEFAULT_TEXT_SEPARATOR, FILENAME_TAG_SEPARATOR,
};
pub use planner::{
    generate_plan, IssueKind, LinkSourceRename, PlanIssue, PlanOptions, RenameCandidate,
    RenamePlan, RenameStats,
};
pub use sanitize::SpecError;
pub use timestamp::{detect_timestamp, TimestampMatch, TimestampShape, TIMESTAMP_SEPARATORS};
pub use vocabulary::{Completer, DirectoryVocabulary, WordListProvider};
