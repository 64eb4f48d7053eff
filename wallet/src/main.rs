mod core;
mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use coinlib::crypto::{Pkh, PrivateKey};
use coinlib::script::Script;
use coinlib::{units_to_coins, Saveable};
use core::{Core, Payment};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Path to config file
    #[arg(short, long, value_name = "FILE", default_value = "wallet_config.toml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate config template
    GenerateConfig {
        /// Path to the produced file
        #[arg(value_name = "FILE")]
        output: PathBuf,
    },
    /// Generate a private key and print its pkh
    GenerateKey {
        #[arg(value_name = "FILE")]
        output: PathBuf,
    },
    /// Total value of the outputs spendable by my keys
    Balance,
    /// Pay an amount, in units, to a pkh
    Send {
        /// Recipient pkh, hex
        recipient: Pkh,
        amount: u64,
        /// Write the signed transaction here instead of printing it
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Print the output script locking coins to a pkh
    PkhOutput {
        /// Pkh, hex
        pkh: Pkh,
    },
}

fn main() -> Result<()> {
    logging::setup_tracing().context("set up tracing")?;
    logging::setup_panic_hook();

    let cli = Cli::parse();

    match cli.command {
        Commands::GenerateConfig { output } => {
            core::config::generate_config_template(&output).context("generate config template")
        }
        Commands::GenerateKey { output } => {
            let key = PrivateKey::new_key();
            key.save_to_file(&output)
                .with_context(|| format!("save key to '{}'", output.display()))?;
            println!("{}", key.public_key().pkh());
            Ok(())
        }
        Commands::PkhOutput { pkh } => {
            let script = Script::pkh_output(&pkh);
            println!("{script}");
            println!("{}", hex::encode(script.to_bytes()));
            Ok(())
        }
        Commands::Balance => {
            let core = Core::load(&cli.config).context("load Core object")?;
            let balance = core.balance()?;
            println!(
                "Current balance: {balance} units ({} coins)",
                units_to_coins(balance)
            );
            Ok(())
        }
        Commands::Send {
            recipient,
            amount,
            output,
        } => {
            let core = Core::load(&cli.config).context("load Core object")?;
            match core
                .create_transaction(&recipient, amount)
                .context("create transaction")?
            {
                Payment::Signed(tx) => match output {
                    Some(path) => {
                        tx.save_to_file(&path)
                            .with_context(|| format!("save transaction to '{}'", path.display()))?;
                        println!("Transaction {} written to {}", tx.id(), path.display());
                    }
                    None => println!("{tx}"),
                },
                Payment::Underfunded { shortfall } => {
                    println!("Insufficient funds: {shortfall} units short");
                    std::process::exit(1);
                }
            }
            Ok(())
        }
    }
}
