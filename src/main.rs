use clap::Parser;
use colored::*;
use seolens::cli::Cli;
use seolens::run;

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    if let Err(e) = run(args).await {
        eprintln!("{} {:#}", "Error:".bright_red().bold(), e);
        std::process::exit(1);
    }
}
