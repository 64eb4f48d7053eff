use std::io::Error;

use coinlib::blockchain::Header;
use coinlib::Saveable;

fn main() -> Result<(), Error> {
    let path = if let Some(arg) = std::env::args().nth(1) {
        arg
    } else {
        eprintln!("Usage: header_print <header_file>");
        std::process::exit(1);
    };

    let header = Header::load_from_file(path)?;
    println!("{:#?}", header);
    println!("id:         {}", header.id());
    println!("difficulty: {}", header.difficulty());
    println!("id valid:   {}", header.is_id_valid());
    println!("hex:        {header}");

    Ok(())
}
