//! CLI for MDL, the single-page media downloader.

mod prompt;
mod report;

use anyhow::Result;
use clap::Parser;
use mdl_core::config::{self, MdlConfig};
use mdl_core::fetch::{CurlFetcher, Fetcher};
use mdl_core::retry::RetryingFetcher;
use mdl_core::scheduler::ProgressStats;
use mdl_core::session::{self, SessionOptions};
use mdl_core::url_model::parse_target;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level CLI: download every image, video and audio file a page references.
#[derive(Debug, Parser)]
#[command(name = "mdl")]
#[command(about = "MDL: download the media referenced by a web page", long_about = None)]
pub struct Cli {
    /// Page to scan (http or https). Prompted for when omitted.
    pub url: Option<String>,

    /// Directory in which the session directory is created (default: Downloads).
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Number of concurrent downloads (1-16).
    #[arg(long, short = 'c', value_name = "N")]
    pub concurrency: Option<usize>,

    /// Per-request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// User-Agent header sent with every request.
    #[arg(long, value_name = "UA")]
    pub user_agent: Option<String>,

    /// Prefix of the session directory name.
    #[arg(long, value_name = "P")]
    pub prefix: Option<String>,

    /// TOML config file; flags given on the command line take precedence.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub async fn run_from_args() -> Result<()> {
        Cli::parse().run().await
    }

    /// Layers command-line flags over the loaded config.
    pub fn apply_overrides(&self, cfg: &mut MdlConfig) {
        if let Some(dir) = &self.output_dir {
            cfg.output_parent = Some(dir.clone());
        }
        if let Some(n) = self.concurrency {
            cfg.concurrency = n;
        }
        if let Some(secs) = self.timeout {
            cfg.timeout_secs = secs;
        }
        if let Some(ua) = &self.user_agent {
            cfg.user_agent = ua.clone();
        }
        if let Some(prefix) = &self.prefix {
            cfg.output_prefix = prefix.clone();
        }
    }

    async fn run(self) -> Result<()> {
        let mut cfg = config::load(self.config.as_deref())?;
        self.apply_overrides(&mut cfg);
        tracing::debug!("effective config: {:?}", cfg);

        let raw_url = match &self.url {
            Some(url) => url.clone(),
            None => {
                let stdin = std::io::stdin();
                prompt::prompt_for_url(&mut stdin.lock(), &mut std::io::stdout())?
            }
        };
        let target = parse_target(&raw_url)?;

        let curl: Arc<dyn Fetcher> = Arc::new(CurlFetcher::new(cfg.fetch_options()));
        let fetcher: Arc<dyn Fetcher> = Arc::new(RetryingFetcher::new(curl, cfg.retry_policy()));
        let opts = SessionOptions {
            output_parent: cfg
                .output_parent
                .clone()
                .unwrap_or_else(session::default_output_parent),
            prefix: cfg.output_prefix.clone(),
            concurrency: cfg.effective_concurrency(),
        };

        println!("Scanning {} ...", target);
        let (progress_tx, mut progress_rx) = tokio::sync::mpsc::channel::<ProgressStats>(16);
        let progress_handle = tokio::spawn(async move {
            let mut printed = false;
            while let Some(stats) = progress_rx.recv().await {
                print!("\r{}", report::render_progress_line(&stats, report::BAR_WIDTH));
                let _ = std::io::stdout().flush();
                printed = true;
            }
            if printed {
                println!();
            }
        });

        let result = session::run_session(&target, fetcher, &opts, Some(progress_tx)).await;
        let _ = progress_handle.await;
        let session_report = result?;

        report::print_summary(&session_report);
        Ok(())
    }
}
