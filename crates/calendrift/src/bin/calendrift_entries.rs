//! `calendrift-entries`: list entries from stdin in chronological order.
//!
//! Usage:
//!   calendrift-entries < entries.json
//!
//! Output columns (tab-separated): day key, rating, categories, description.

use calendrift::cli::{entries_command, init_logging};
use calendrift_core::date::today;
use std::io::{self, Read, Write};

fn main() {
    init_logging();
    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match entries_command(&buf, today()) {
        Ok(out) => {
            if let Err(e) = io::stdout().write_all(out.as_bytes()) {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
