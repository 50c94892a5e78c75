mod prompt;

use anyhow::Result;
use appendfilename_core::{
    apply_plan, app_paths, generate_plan, load_config, save_config, AppConfig, ApplyResult,
    DirectoryVocabulary, InsertionSpec, Mode, PlanOptions, RenamePlan,
};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;
use std::process::ExitCode;

const EXIT_VERBOSE_AND_QUIET: u8 = 1;
const EXIT_NO_FILES: u8 = 2;
const EXIT_AMBIGUOUS_MODE: u8 = 3;
const EXIT_FILES_FAILED: u8 = 4;

#[derive(Debug, Parser)]
#[command(name = "appendfilename", version)]
#[command(
    about = "Insert text into file names, between the old name and optional tags or the extension",
    after_help = "When renaming a symbolic link whose source file has a matching file name, \
                  the source file gets renamed as well."
)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// The text to add to the file name; asked for interactively if missing or empty
    #[arg(short, long)]
    text: Option<String>,
    /// Do the opposite: prepend the text instead of appending it
    #[arg(short, long)]
    prepend: bool,
    /// Like --prepend, but keep a leading date/time-stamp in front of the text
    #[arg(long)]
    smart_prepend: bool,
    /// Override the separator between the old file name and the text
    #[arg(short, long, allow_hyphen_values = true)]
    sep: Option<String>,
    /// Only show what would happen, do not rename any file
    #[arg(short, long)]
    dryrun: bool,
    #[arg(short, long)]
    verbose: bool,
    #[arg(short, long)]
    quiet: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    /// Print the config file location and its effective values
    #[arg(long)]
    show_config: bool,
    /// Write the current settings to the config file
    #[arg(long)]
    init_config: bool,
    /// Files to rename
    #[arg(value_hint = clap::ValueHint::FilePath)]
    files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    if cli.verbose && cli.quiet {
        log::error!("Options \"--verbose\" and \"--quiet\" found. Only one can be given, not both.");
        return Ok(ExitCode::from(EXIT_VERBOSE_AND_QUIET));
    }

    let mode = match Mode::from_flags(cli.prepend, cli.smart_prepend) {
        Ok(mode) => mode,
        Err(err) => {
            log::error!("{err}");
            return Ok(ExitCode::from(EXIT_AMBIGUOUS_MODE));
        }
    };

    let config = load_config()?;
    if cli.show_config {
        return cmd_config_show(&config);
    }
    if cli.init_config {
        return cmd_config_init(&config);
    }

    if cli.files.is_empty() {
        log::error!("Please add at least one file name as argument");
        return Ok(ExitCode::from(EXIT_NO_FILES));
    }
    log::debug!("{} file name(s) given", cli.files.len());

    // an empty --text asks interactively, like a missing one
    let text = match cli.text.filter(|text| !text.trim().is_empty()) {
        Some(text) => text,
        None => {
            log::info!("Add text to file name ...");
            let vocabulary = DirectoryVocabulary::new(".", config.vocabulary.clone());
            match prompt::ask_for_text(&vocabulary)? {
                Some(text) => {
                    log::info!("adding text \"{text}\" ...");
                    text
                }
                None => {
                    log::info!("no text given, exiting.");
                    return Ok(ExitCode::SUCCESS);
                }
            }
        }
    };

    let separator = cli.sep.unwrap_or(config.separator);
    let spec = InsertionSpec::new(&text, &separator, mode)?;
    log::debug!("text found: [{}], separator: [{}]", spec.text(), spec.separator());

    let options = PlanOptions {
        files: cli.files,
        spec,
        rename_symlink_sources: config.rename_symlink_sources,
    };
    let plan = generate_plan(&options);

    match cli.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
        OutputFormat::Table if !cli.quiet => print_table(&plan),
        OutputFormat::Table => {}
    }

    let mut errors = plan.stats.issues();
    if cli.dryrun {
        log::info!("dryrun mode: no file was renamed.");
    } else {
        let result = apply_plan(&plan);
        print_apply_summary(&result);
        errors += result.failures.len();
    }

    if errors > 0 {
        log::error!("{errors} error(s) occurred. Please check output above.");
        return Ok(ExitCode::from(EXIT_FILES_FAILED));
    }

    log::debug!("successfully finished.");
    Ok(ExitCode::SUCCESS)
}

/// `-v` shows debug output with timestamps, `-q` only errors.
fn setup_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).format_target(false);
    if verbose {
        builder.format_timestamp_secs();
    } else {
        builder.format_timestamp(None);
    }
    builder.init();
}

fn cmd_config_show(config: &AppConfig) -> Result<ExitCode> {
    let paths = app_paths()?;
    println!("config file: {}", paths.config_path.display());
    println!("{}", toml::to_string_pretty(config)?);
    Ok(ExitCode::SUCCESS)
}

fn cmd_config_init(config: &AppConfig) -> Result<ExitCode> {
    let path = save_config(config)?;
    println!("wrote config file: {}", path.display());
    Ok(ExitCode::SUCCESS)
}

fn print_table(plan: &RenamePlan) {
    for candidate in &plan.candidates {
        if let Some(source) = &candidate.link_source {
            println!(
                "{} -> {} (symlink source)",
                source.original_path.display(),
                source.target_path.display()
            );
        }
        println!(
            "{} -> {}",
            candidate.original_path.display(),
            candidate.target_path.display()
        );
    }

    eprintln!(
        "\nsummary: requested={} planned={} symlink_sources={} directories_skip={} not_file_skip={} broken_link_skip={} failed={}",
        plan.stats.requested,
        plan.stats.planned,
        plan.stats.linked_sources,
        plan.stats.skipped_directories,
        plan.stats.skipped_not_file,
        plan.stats.skipped_broken_links,
        plan.stats.failed
    );
}

fn print_apply_summary(result: &ApplyResult) {
    log::info!(
        "renamed {} file(s) (re-linked {}, failed {})",
        result.applied,
        result.relinked,
        result.failures.len()
    );
}
