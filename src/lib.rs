pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod http_client;
pub mod models;
pub mod preview;
pub mod reporter;
pub mod scorer;
pub mod server;
pub mod validator;

use analyzer::{SeoAnalyzer, Timeouts};
use anyhow::Result;
use cli::{Cli, Command};
use colored::*;
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use reporter::Reporter;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_DIRECTIVE: &str = "seolens=info";
const VERBOSE_LOG_DIRECTIVE: &str = "seolens=debug";

/// Installs the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` wins over everything; otherwise `--verbose` selects debug
/// and the config's `log_level` replaces the info default.
pub fn init_logging(verbose: bool, log_level: Option<&str>) {
    let fallback = if verbose {
        VERBOSE_LOG_DIRECTIVE
    } else {
        log_level.unwrap_or(DEFAULT_LOG_DIRECTIVE)
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE));

    // A subscriber may already be installed when embedded or under test
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("[{elapsed_precise}] {spinner:.cyan} {msg}")
            .expect("Progress bar template should be valid"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub async fn run(args: Cli) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;
    let args = config.merge_with_cli(&args);

    init_logging(args.verbose, config.log_level.as_deref());

    let mut timeouts = config.timeouts();
    match &args.command {
        Command::Analyze(a) => {
            if let Some(secs) = a.timeout {
                timeouts.analyze = Duration::from_secs(secs);
            }
        }
        Command::Meta(m) => {
            if let Some(secs) = m.timeout {
                timeouts.meta = Duration::from_secs(secs);
            }
        }
        Command::Serve(_) => {}
    }

    let client = http_client::build_http_client(config.user_agent(), backstop_secs(timeouts))?;
    let analyzer = SeoAnalyzer::new(client, timeouts);

    match args.command {
        Command::Serve(serve) => server::serve(&serve.host, serve.port, analyzer).await,
        Command::Analyze(analyze) => {
            let pb = spinner(format!("Analyzing {}", analyze.url));
            let result = analyzer.analyze_seo(&analyze.url).await;
            pb.finish_and_clear();
            let report = result?;

            match analyze.output.as_str() {
                "json" => {
                    let json = serde_json::to_string_pretty(&report)?;
                    println!("{}", json);
                }
                _ => Reporter::print_text_report(&report),
            }

            if let Some(filename) = analyze.save {
                Reporter::save_json_report(&report, &filename)?;
            }

            if args.verbose {
                println!(
                    "{} overall score {}",
                    "Done:".bright_green().bold(),
                    report.seo_score.overall
                );
            }

            Ok(())
        }
        Command::Meta(meta) => {
            let pb = spinner(format!("Fetching meta tags for {}", meta.url));
            let result = analyzer.fetch_meta(&meta.url).await;
            pb.finish_and_clear();
            let summary = Reporter::generate_meta_summary(result?);

            match meta.output.as_str() {
                "json" => {
                    let json = serde_json::to_string_pretty(&summary)?;
                    println!("{}", json);
                }
                _ => Reporter::print_meta_report(&summary),
            }

            Ok(())
        }
    }
}

/// Client-level timeout, a little past the longest fetch budget.
fn backstop_secs(timeouts: Timeouts) -> u64 {
    timeouts.analyze.max(timeouts.meta).as_secs().saturating_add(5)
}
