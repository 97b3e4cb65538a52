//! Command-line front end for the calendrift engine.
//!
//! The binaries read a JSON entry list on stdin and print either a month grid
//! with per-day entry markers or the entries in chronological order.

pub mod cli;
