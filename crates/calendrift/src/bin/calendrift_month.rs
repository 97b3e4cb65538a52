//! `calendrift-month`: print the month grid `offset` months from today.
//!
//! Usage:
//!   calendrift-month [offset] [--monday] [--config <path>] < entries.json
//!
//! Entries are read from stdin as a JSON array. Set `CALENDRIFT_LOG` to see
//! skipped entries.

use calendrift::cli::{init_logging, month_command, parse_month_args};
use calendrift_core::date::today;
use std::io::{self, Read, Write};

fn main() {
    init_logging();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_month_args(&args) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("usage: calendrift-month [offset] [--monday] [--config <path>]");
            std::process::exit(2);
        }
    };

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match month_command(&args, &buf, today()) {
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
