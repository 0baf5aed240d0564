// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use clap::Parser;
use cmd::{Cli, build_command};
use std::process::ExitCode;

#[allow(clippy::print_stderr)]
fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.log_level() {
        Some(level) => diagnostics::init_with_level(level),
        None => diagnostics::init_diagnostics(),
    }

    match build_command(&cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            diagnostics::log_error!("build failed: {reason}", reason: format!("{e:#}"));
            // Full chain, with a backtrace when RUST_BACKTRACE is set.
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}
