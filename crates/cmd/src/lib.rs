// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Command-line boundary of the site builder. Library errors become
//! `anyhow` errors here; the binary only parses arguments, sets up logging
//! and maps the outcome to an exit code.

pub mod cli;
pub mod commands;

pub use cli::Cli;
pub use commands::build_command;
