//! Annotate command implementation

use crate::{
    config::CliConfig,
    gazetteer::GazetteerSpec,
    input::{resolve_patterns, FileReader},
    output::{self, OutputFormat},
    progress::ProgressReporter,
};
use anyhow::{Context, Result};
use chunkspan_engine::{EngineConfig, ExecutionMode, Reconciler};
use clap::Args;
use log::{debug, info, warn};
use std::path::PathBuf;

/// Arguments for the annotate command
#[derive(Debug, Args)]
pub struct AnnotateArgs {
    /// Input files or patterns (supports glob)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Gazetteer used as the annotator
    #[arg(short, long, value_name = "FILE", required = true)]
    pub gazetteer: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format [default: text]
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Maximum fragment length in chars sent per request
    #[arg(short, long, value_name = "CHARS")]
    pub max_len: Option<usize>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Execution mode
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Force parallel requests even for short texts
    #[arg(short, long, conflicts_with = "mode")]
    pub parallel: bool,

    /// Number of worker threads
    #[arg(short, long, value_name = "N")]
    pub threads: Option<usize>,

    /// Print the annotation report for each document to stderr
    #[arg(long)]
    pub report: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Execution modes selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ModeArg {
    /// One request at a time, in order
    Sequential,
    /// Concurrent requests on a worker pool
    Parallel,
    /// Parallel only when there are several fragments
    Adaptive,
}

impl From<ModeArg> for ExecutionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Sequential => ExecutionMode::Sequential,
            ModeArg::Parallel => ExecutionMode::Parallel,
            ModeArg::Adaptive => ExecutionMode::Adaptive,
        }
    }
}

impl AnnotateArgs {
    /// Execute the annotate command
    pub fn execute(&self) -> Result<()> {
        self.init_logging()?;

        info!("Starting annotation");
        debug!("Arguments: {:?}", self);

        let config = match &self.config {
            Some(path) => CliConfig::from_file(path)?,
            None => CliConfig::default(),
        };
        let engine_config = self.engine_config(&config)?;
        let format = match self.format {
            Some(format) => format,
            None => config.default_format()?,
        };
        let include_report = self.report || config.output.include_report;

        let files = resolve_patterns(&self.input)?;
        let (gazetteer, resolver) = GazetteerSpec::from_file(&self.gazetteer)?.build()?;
        info!(
            "Loaded gazetteer with {} surface(s); {} file(s) to annotate",
            gazetteer.len(),
            files.len()
        );

        let reconciler = Reconciler::new(gazetteer, resolver, engine_config)
            .context("Invalid engine configuration")?;

        let writer = output::open_writer(self.output.as_deref())?;
        let mut formatter = output::formatter(format, writer, config.output.pretty_json);

        let mut progress = ProgressReporter::new(self.quiet);
        progress.init_files(files.len() as u64);

        for path in &files {
            let document = path.display().to_string();
            let text = FileReader::read_text(path)?;
            debug!("{document}: {} chars", FileReader::char_len(&text));

            let annotated = reconciler
                .annotate_with_report(&text)
                .with_context(|| format!("Failed to annotate {document}"))?;

            if !annotated.report.failed_chunks.is_empty() {
                warn!(
                    "{document}: chunk(s) {:?} failed and were left unannotated",
                    annotated.report.failed_chunks
                );
            }
            if include_report {
                progress.println(&format!("{document}: {}", annotated.report));
            }

            formatter.format_document(&document, &text, &annotated.spans)?;
            progress.file_completed(&document, annotated.spans.len());
        }

        progress.finish();
        formatter.finish()?;

        info!("Annotation complete");
        Ok(())
    }

    /// Config file values overridden by command-line flags
    pub fn engine_config(&self, config: &CliConfig) -> Result<EngineConfig> {
        let mut engine = config.engine_config()?;

        if let Some(max_len) = self.max_len {
            engine.max_fragment_length = max_len;
        }
        if let Some(mode) = self.mode {
            engine.execution_mode = mode.into();
        }
        if self.parallel {
            engine.execution_mode = ExecutionMode::Parallel;
        }
        if let Some(threads) = self.threads {
            engine.threads = Some(threads);
        }

        engine.validate()?;
        Ok(engine)
    }

    /// Initialize logging based on verbosity level
    fn init_logging(&self) -> Result<()> {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        if !self.quiet {
            // A logger may already be installed when run in-process
            let _ = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(log_level),
            )
            .try_init();
        }

        Ok(())
    }
}
