//! Command-line front end for pagecue.
//!
//! Exposes the prompt table lookups directly and can run the whole
//! coordinator / content script / side panel flow against an in-memory
//! browser.

pub mod sim;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pagecue_config::Config;
use pagecue_core::{badge_title, display_text_from_prompt, match_pattern, PromptRegistry};
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::sim::SimulationReport;

#[derive(Parser, Debug)]
#[command(name = "pagecue")]
#[command(about = "Contextual prompt suggestions for web pages", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to ~/.config/pagecue/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Test a URL against a glob pattern
    Match { url: String, pattern: String },

    /// List the prompts suggested for a URL
    Suggest { url: String },

    /// Resolve prompt text to its predefined task
    Lookup { text: String },

    /// Show the button label and badge tooltip for a prompt
    Label { text: Option<String> },

    /// Run the full injection flow against an in-memory browser
    Simulate {
        /// Pages to open; the first one is the active tab
        #[arg(required = true)]
        urls: Vec<String>,

        /// Click the first button on the active tab
        #[arg(long)]
        click: bool,
    },
}

pub async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    init_logging(cli.verbose, &config);

    let registry = Arc::new(load_registry(&config)?);
    let mut stdout = std::io::stdout().lock();
    let found = execute(&cli.command, registry, config, &mut stdout).await?;
    Ok(if found { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn init_logging(verbose: bool, config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("pagecue=debug")
        } else {
            EnvFilter::new(&config.logging.filter)
        }
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// The configured prompt table, or the built-in one.
pub fn load_registry(config: &Config) -> Result<PromptRegistry> {
    match config.prompts_path() {
        Some(path) => PromptRegistry::from_json_file(&path)
            .with_context(|| format!("Failed to load prompt table {}", path.display())),
        None => {
            debug!("Using built-in prompt table");
            Ok(PromptRegistry::builtin())
        }
    }
}

/// Run one command, writing its output to `out`.
///
/// Returns `false` when a lookup found nothing.
pub async fn execute(
    command: &Command,
    registry: Arc<PromptRegistry>,
    config: Config,
    out: &mut dyn Write,
) -> Result<bool> {
    match command {
        Command::Match { url, pattern } => {
            writeln!(out, "{}", match_pattern(url, pattern))?;
        }
        Command::Suggest { url } => {
            let prompts = registry.suggestive_prompts(Some(url));
            if prompts.is_empty() {
                debug!(url = %url, "No prompts for URL");
            }
            for prompt in prompts {
                writeln!(out, "{}\t{}", display_text_from_prompt(Some(prompt)), prompt)?;
            }
        }
        Command::Lookup { text } => match registry.predefined_task_metadata(text) {
            Some(found) => {
                writeln!(out, "{}", found.task)?;
                writeln!(out, "{}", serde_json::to_string_pretty(found.metadata)?)?;
            }
            None => {
                info!(text = %text, "No predefined task");
                return Ok(false);
            }
        },
        Command::Label { text } => {
            let label = display_text_from_prompt(text.as_deref());
            writeln!(out, "{}", label)?;
            writeln!(out, "{}", badge_title(&label))?;
        }
        Command::Simulate { urls, click } => {
            let report = sim::simulate(urls, *click, registry, config).await?;
            print_report(&report, out)?;
        }
    }
    Ok(true)
}

fn print_report(report: &SimulationReport, out: &mut dyn Write) -> Result<()> {
    for tab in &report.tabs {
        let buttons = if tab.labels.is_empty() {
            "-".to_string()
        } else {
            tab.labels.join(" ")
        };
        let script = if tab.script_loaded { "injected" } else { "skipped" };
        writeln!(out, "tab {} [{}] {}  {}", tab.id, script, tab.url, buttons)?;
    }

    if let Some(clicked) = &report.clicked {
        writeln!(out, "clicked: {}", clicked)?;
    }
    writeln!(out, "panel mode: {}", report.panel_mode)?;
    writeln!(out, "panel input: {}", report.panel_input.as_deref().unwrap_or("-"))?;
    if let Some(task) = &report.task {
        writeln!(out, "task: {}", task)?;
    }
    Ok(())
}
