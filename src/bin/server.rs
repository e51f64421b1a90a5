//! AnBuddy server binary.
//! Run with: cargo run --bin anbuddy-server

use std::process::ExitCode;

use anbuddy_agent::start_anbuddy;

fn main() -> ExitCode {
    start_anbuddy::run()
}
