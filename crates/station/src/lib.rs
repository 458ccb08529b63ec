// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! hallpass - an offline-first hall pass station.
//!
//! Badge scans are decoded from keyboard-wedge input, resolved against the
//! roster, and toggled into pass starts and ends under per-destination
//! capacity limits. State lives in JSON slots under the state directory and
//! is optionally mirrored to an `hp-remote` store.
//!
//! # Main Components
//!
//! - [`ScanDecoder`](scan::ScanDecoder) - frames keystrokes into scan codes
//! - [`AdminSession`](admin::AdminSession) - badge enrollment and timed unlock
//! - [`RosterResolver`](roster::RosterResolver) - code to identity, onboarding, CSV import
//! - [`AdmissionController`](admission::AdmissionController) - pass lifecycle and capacity
//! - [`SyncReconciler`](sync::SyncReconciler) - optimistic writes and full-refresh sync
//! - [`Station`](station::Station) - the composite the terminal and CLI drive

mod cli;
mod commands;
mod display;
mod logging;
mod terminal;

pub mod admin;
pub mod admission;
pub mod config;
pub mod env;
pub mod error;
pub mod notify;
pub mod prompt;
pub mod report;
pub mod roster;
pub mod scan;
pub mod slots;
pub mod station;
pub mod sync;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use cli::{Cli, Command, RosterCommand, SettingKey};
pub use config::Config;
pub use error::{Error, Result};
pub use station::{ManualStart, Station};

use clap::CommandFactory;
use clap_complete::generate;

/// Execute a parsed command line. This is the main entry point for library
/// users and provides a testable way to run commands without process
/// execution.
pub fn run(cli: Cli) -> Result<()> {
    let state_dir = cli.state_dir;
    match cli.command {
        Command::Completion { shell } => {
            generate(shell, &mut Cli::command(), "hallpass", &mut std::io::stdout());
            Ok(())
        }
        Command::Init { tenant, remote } => commands::init::run(state_dir, tenant, remote),
        Command::Station => commands::station::run(state_dir),
        command => {
            logging::init_cli();
            let rt = commands::runtime()?;
            rt.block_on(dispatch(state_dir, command))
        }
    }
}

async fn dispatch(state_dir: Option<std::path::PathBuf>, command: Command) -> Result<()> {
    match command {
        Command::Start {
            name,
            destination,
            period,
            max_minutes,
            id,
        } => {
            let start = ManualStart {
                name,
                subject_id: id,
                destination,
                period,
                max_minutes,
            };
            commands::pass::start(state_dir, start).await
        }
        Command::End { id } => commands::pass::end(state_dir, &id).await,
        Command::List { period } => commands::pass::list(state_dir, period).await,
        Command::Live => commands::pass::live(state_dir).await,
        Command::History { period } => commands::history::history(state_dir, period).await,
        Command::Export { file, period } => commands::history::export(state_dir, file, period).await,
        Command::Flyers { period, csv } => commands::history::flyers(state_dir, period, csv).await,
        Command::Summary => commands::history::summary(state_dir).await,
        Command::Roster(RosterCommand::Import { file }) => {
            commands::roster::import(state_dir, &file).await
        }
        Command::Roster(RosterCommand::List { period }) => {
            commands::roster::list(state_dir, period).await
        }
        Command::Set { key, value } => commands::set::run(state_dir, key, &value).await,
        Command::Sync => commands::sync::run(state_dir).await,
        // Handled before the runtime starts
        Command::Init { .. } | Command::Station | Command::Completion { .. } => Ok(()),
    }
}
