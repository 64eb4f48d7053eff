mod cli;
mod worker;

use std::path::Path;

use anyhow::{Context, Result};
use coinlib::blockchain::Header;
use coinlib::HEADER_SIZE;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = cli::parse();
    let template = load_template(&cli.template)
        .with_context(|| format!("load header template '{}'", cli.template.display()))?;
    info!(
        block_num = template.block_num(),
        difficulty = template.difficulty(),
        threads = cli.threads,
        "template loaded"
    );

    let header = match cli.lowest {
        Some(n) => worker::lowest(template, cli.threads, n),
        None => worker::mine(template, cli.threads, cli.steps)
            .context("all workers stopped without a result")?,
    };

    info!(id = %header.id(), valid = header.is_id_valid(), "done");
    println!("{header}");
    Ok(())
}

/// Accepts the raw 217 byte encoding or its hex form
fn load_template(path: &Path) -> Result<Header> {
    let bytes = std::fs::read(path)?;
    let header = if bytes.len() == HEADER_SIZE {
        Header::from_bytes(&bytes)?
    } else {
        std::str::from_utf8(&bytes)
            .context("template is neither raw nor hex")?
            .parse()?
    };
    Ok(header)
}
