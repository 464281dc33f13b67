use clap::{Args, Parser, Subcommand};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_OUTPUT: &str = "text";

#[derive(Parser, Debug, Clone)]
#[command(name = "seolens")]
#[command(about = "SEO meta-tag analyzer: scoring, validation and social previews", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to configuration file (JSON, TOML, or YAML)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP API (POST /analyze-seo, POST /fetch-meta, POST /preview)
    Serve(ServeArgs),
    /// Analyze a single page and print the full SEO report
    Analyze(AnalyzeArgs),
    /// Fetch a page's meta tags, validate them and show platform previews
    Meta(MetaArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// The page to analyze
    #[arg(value_name = "URL")]
    pub url: String,

    /// Output format: text or json
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: String,

    /// Save the JSON report to a file
    #[arg(short, long)]
    pub save: Option<String>,

    /// Fetch timeout in seconds (default: 15)
    #[arg(short, long)]
    pub timeout: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct MetaArgs {
    /// The page whose meta tags to fetch
    #[arg(value_name = "URL")]
    pub url: String,

    /// Output format: text or json
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    pub output: String,

    /// Fetch timeout in seconds (default: 10)
    #[arg(short, long)]
    pub timeout: Option<u64>,
}
