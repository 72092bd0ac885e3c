use std::env;

use rill::Rill;

fn main() -> Result<(), anyhow::Error> {
    let mut args = env::args().skip(1).collect::<Vec<_>>();

    let mut rill = Rill::new();
    match args.len() {
        0 => rill.run_prompt()?,
        1 => {
            let filename = args.pop().unwrap();
            rill.run_file(filename.as_ref())?;
        }
        _ => {
            let bin_name = env!("CARGO_BIN_NAME");
            println!("Usage: {} [script]", bin_name);
            std::process::exit(64);
        }
    }

    // Indicate the failure kind in the exit code
    if rill.had_error() {
        std::process::exit(65);
    }
    if rill.had_runtime_error() {
        std::process::exit(70);
    }

    Ok(())
}
