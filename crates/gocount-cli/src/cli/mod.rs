//! CLI for gocount: locators on stdin, one per line.

mod commands;
mod input;

use anyhow::Result;
use clap::Parser;
use gocount_core::config::{self, GocountConfig};
use gocount_core::locator::SourceKind;
use gocount_core::scheduler::{ConsoleSink, PipelineSettings};
use std::io::IsTerminal;

use commands::run_count;

pub const USAGE: &str = "gocount --type url|file [--jobs N] [--token T] < locators.txt";

/// Count a token in every file or URL listed on stdin.
#[derive(Debug, Parser)]
#[command(name = "gocount")]
#[command(about = "Count occurrences of a token in files or URLs read from stdin", long_about = None)]
pub struct Cli {
    /// Type of incoming locators: file or url.
    #[arg(long = "type", short = 't', value_name = "TYPE")]
    pub kind: Option<String>,

    /// Run up to N jobs concurrently (overrides config, default 5).
    #[arg(long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Token to count (overrides config, default "Go").
    #[arg(long, value_name = "T")]
    pub token: Option<String>,
}

impl Cli {
    pub async fn run_from_args() -> Result<()> {
        Cli::parse().run().await
    }

    /// `None` when `--type` is missing or not file/url.
    pub fn source_kind(&self) -> Option<SourceKind> {
        self.kind.as_deref().and_then(|k| k.parse().ok())
    }

    /// Config values with this invocation's overrides applied.
    pub fn settings(&self, cfg: &GocountConfig) -> PipelineSettings {
        let jobs = self.jobs.unwrap_or(cfg.max_concurrent_jobs);
        let token = self.token.as_deref().unwrap_or(&cfg.token);
        PipelineSettings::new(jobs, token.as_bytes())
    }

    async fn run(self) -> Result<()> {
        ensure_piped_input(std::io::stdin().is_terminal())?;

        let Some(kind) = self.source_kind() else {
            if let Some(k) = &self.kind {
                tracing::debug!("unsupported --type {:?}", k);
            }
            println!("{}", USAGE);
            return Ok(());
        };

        let cfg = match config::load_or_init() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!("config unavailable, using defaults: {:#}", e);
                GocountConfig::default()
            }
        };
        tracing::debug!("loaded config: {:?}", cfg);

        let settings = self.settings(&cfg);
        let (summary, _) = run_count(
            &cfg,
            &settings,
            kind,
            tokio::io::stdin(),
            ConsoleSink::stdio(),
        )
        .await?;
        tracing::info!(
            total = summary.total,
            failed = summary.failed,
            "gocount finished"
        );
        Ok(())
    }
}

/// An interactive terminal on stdin means no locator list was supplied.
fn ensure_piped_input(stdin_is_terminal: bool) -> Result<()> {
    if stdin_is_terminal {
        anyhow::bail!("gocount accepts data only from stdin\nusage: {}", USAGE);
    }
    Ok(())
}

#[cfg(test)]
mod tests;
