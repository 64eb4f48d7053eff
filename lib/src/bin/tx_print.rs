use std::io::Error;

use coinlib::blockchain::Tx;
use coinlib::Saveable;

fn main() -> Result<(), Error> {
    let path = if let Some(arg) = std::env::args().nth(1) {
        arg
    } else {
        eprintln!("Usage: tx_print <tx_file>");
        std::process::exit(1);
    };

    let tx = Tx::load_from_file(path)?;
    println!("id: {}", tx.id());
    println!("mint: {}", tx.is_mint_tx());
    for (i, input) in tx.inputs().iter().enumerate() {
        println!("input {i}: {} [{}]", input.outpoint(), input.script());
    }
    for (i, output) in tx.outputs().iter().enumerate() {
        println!(
            "output {i}: {} coins [{}]",
            coinlib::units_to_coins(output.value()),
            output.script()
        );
    }
    println!("lock_abs: {}", tx.lock_abs());

    Ok(())
}
