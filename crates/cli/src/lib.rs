//! Command-line RIPD report generation.
//!
//! `ripd-cli <project.json> [output.pdf]` reads a project in its stored
//! shape, normalizes it, optionally fills an empty risk matrix and action
//! plan from the templates, sorts it in report order and writes the PDF.

pub mod config;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::Parser;
use thiserror::Error;

use ripd_assistant::GenerationService;
use ripd_core::error::CoreError;
use ripd_core::normalize::project_from_json;
use ripd_core::project::Project;
use ripd_report::{render_report, ReportError, ReportOptions};

use crate::config::CliConfig;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid project file {path}: {source}")]
    Project { path: PathBuf, source: CoreError },

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Generate a RIPD/DPIA PDF report from a stored project file.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "ripd-cli", version)]
pub struct Args {
    /// Project file in its stored JSON shape
    pub input: PathBuf,

    /// Output PDF path (default: RIPD_<name>_<yyyymmdd>.pdf in RIPD_OUTPUT_DIR)
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Output PDF path, as a flag
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        conflicts_with = "output"
    )]
    pub output_flag: Option<PathBuf>,
}

impl Args {
    pub fn new(input: impl Into<PathBuf>, output: Option<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output,
            output_flag: None,
        }
    }

    /// The requested output path, positional or flag.
    pub fn output_path(&self) -> Option<&Path> {
        self.output.as_deref().or(self.output_flag.as_deref())
    }
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub output: PathBuf,
    pub bytes: usize,
    pub risks: usize,
    pub actions: usize,
    pub maturity: f64,
}

/// Default report file name: `RIPD_<name>_<yyyymmdd>.pdf`, with every
/// character outside `[A-Za-z0-9]` in the name replaced by `_`.
pub fn report_file_name(project_name: &str, date: NaiveDate) -> String {
    let name: String = project_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("RIPD_{name}_{}.pdf", date.format("%Y%m%d"))
}

/// Load a project from a stored-shape JSON file.
pub fn load_project(path: &Path) -> Result<Project, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    project_from_json(&text).map_err(|source| CliError::Project {
        path: path.to_path_buf(),
        source,
    })
}

/// Append template risks and actions where the project has none.
pub async fn fill_defaults(project: &mut Project, config: &CliConfig, today: NaiveDate) {
    let service = GenerationService::offline().with_deadline_days(config.action_deadline_days);

    if project.risks().is_empty() {
        let generated = service.generate_risks(project).await;
        let added = project.add_risks(generated.items);
        tracing::info!(
            project_id = %project.id,
            added,
            source = generated.source.as_str(),
            "Filled empty risk matrix"
        );
    }
    if project.actions().is_empty() {
        let generated = service.generate_actions(project, today).await;
        let added = project.add_actions(generated.items);
        tracing::info!(
            project_id = %project.id,
            added,
            source = generated.source.as_str(),
            "Filled empty action plan"
        );
    }
}

/// Run the whole pipeline for `args`, using `today` as the generation date.
pub async fn run(
    args: &Args,
    config: &CliConfig,
    today: NaiveDate,
) -> Result<RunSummary, CliError> {
    let mut project = load_project(&args.input)?;
    tracing::debug!(project_id = %project.id, input = %args.input.display(), "Loaded project");

    if config.generate_defaults {
        fill_defaults(&mut project, config, today).await;
    }
    project.sort_for_report();

    let bytes = render_report(&project, &ReportOptions::new(today))?;

    let output = match args.output_path() {
        Some(path) => path.to_path_buf(),
        None => config
            .output_dir
            .join(report_file_name(&project.details.name, today)),
    };
    std::fs::write(&output, &bytes).map_err(|source| CliError::Write {
        path: output.clone(),
        source,
    })?;

    tracing::info!(output = %output.display(), bytes = bytes.len(), "Wrote report");
    Ok(RunSummary {
        output,
        bytes: bytes.len(),
        risks: project.risks().len(),
        actions: project.actions().len(),
        maturity: project.maturity_score(),
    })
}
