use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Header template, raw or hex encoded
    pub template: PathBuf,
    #[arg(short, long, default_value_t = 4)]
    /// Number of worker threads, each searching its own nonce partition
    pub threads: u32,
    #[arg(short, long, default_value_t = 100_000)]
    /// Nonces tried by a worker before it checks the stop flag
    pub steps: usize,
    #[arg(short, long, value_name = "N")]
    /// Instead of mining, try N random nonces per worker and keep the lowest id
    pub lowest: Option<usize>,
}

pub fn parse() -> Cli {
    Cli::parse()
}
