// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use hp_core::{Period, PeriodFilter};

// Custom help template that groups commands into sections
const HELP_TEMPLATE: &str = "{about-with-newline}
{usage-heading} {usage}

{before-help}Options:
{options}{after-help}";

const COMMANDS_HELP: &str = "\
Station:
  station     Run the interactive scan station
  start       Start a pass by name
  end         End a pass
  list        List open passes
  live        Show who is out, per destination

Reports:
  history     Show ended passes
  export      Export history to CSV
  flyers      Rank students by passes taken
  summary     Today's and this week's totals

Setup & Configuration:
  init        Write a config file
  roster      Import or list the roster
  set         Change a station setting
  sync        Pull the roster and open passes from the remote store
  completion  Generate shell completions";

const QUICKSTART_HELP: &str = "\
Get started:
  hallpass init                      Write a config file
  hallpass roster import roster.csv  Load students
  hallpass station                   Start scanning";

#[derive(Parser)]
#[command(name = "hallpass")]
#[command(about = "Offline-first hall pass station with badge scanning")]
#[command(help_template = HELP_TEMPLATE)]
#[command(before_help = COMMANDS_HELP)]
#[command(after_help = QUICKSTART_HELP)]
pub struct Cli {
    /// State directory (default: $HALLPASS_STATE_DIR, then the platform state dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Write a config file in the state directory
    Init {
        /// Tenant id scoping every remote row
        #[arg(long)]
        tenant: Option<String>,

        /// Remote store URL (ws:// or wss://)
        #[arg(long)]
        remote: Option<String>,
    },

    /// Run the interactive scan station
    #[command(after_help = "Keys:\n  \
        Ctrl-S  Toggle scan mode        Ctrl-P  Cycle period filter\n  \
        Ctrl-E  Enroll admin badge      Ctrl-U  Unlock admin\n  \
        Ctrl-L  Lock admin              Ctrl-B  Type a badge code\n  \
        Ctrl-R  Start from roster       Esc     Quit")]
    Station,

    /// Start a pass by name
    #[command(after_help = "Examples:\n  \
        hallpass start \"Ana Diaz\"                  Use the station destination\n  \
        hallpass start \"Ana Diaz\" -d Nurse -p 3    Explicit destination and period")]
    Start {
        /// Student name
        name: String,

        /// Destination (default: the station destination)
        #[arg(long, short)]
        destination: Option<String>,

        /// Period 1-6 (default: the selected period)
        #[arg(long, short)]
        period: Option<Period>,

        /// Time limit in minutes, 0 for none (default: the station limit)
        #[arg(long, short)]
        max_minutes: Option<u32>,

        /// Student id, if known
        #[arg(long)]
        id: Option<String>,
    },

    /// End a pass
    #[command(arg_required_else_help = true)]
    End {
        /// Pass ID
        id: String,
    },

    /// List open passes
    List {
        /// Period 1-6 or "all" (default: the selected period)
        #[arg(long, short)]
        period: Option<PeriodFilter>,
    },

    /// Show who is out, per destination
    Live,

    /// Show ended passes, newest first
    History {
        /// Period 1-6 or "all" (default: the selected period)
        #[arg(long, short)]
        period: Option<PeriodFilter>,
    },

    /// Export history to CSV
    Export {
        /// Output file (default: Pass_History_<period>.csv)
        file: Option<PathBuf>,

        /// Period 1-6 or "all" (default: the selected period)
        #[arg(long, short)]
        period: Option<PeriodFilter>,
    },

    /// Rank students by passes taken
    Flyers {
        /// Period 1-6 or "all" (default: the selected period)
        #[arg(long, short)]
        period: Option<PeriodFilter>,

        /// Also write the ranking to a CSV file
        #[arg(long, value_name = "FILE")]
        csv: Option<PathBuf>,
    },

    /// Today's and this week's totals
    Summary,

    /// Import or list the roster
    #[command(subcommand)]
    Roster(RosterCommand),

    /// Change a station setting
    #[command(after_help = "Examples:\n  \
        hallpass set destination Nurse\n  \
        hallpass set max-minutes 10\n  \
        hallpass set period all\n  \
        hallpass set scan-mode on")]
    Set {
        /// Setting to change
        #[arg(value_enum)]
        key: SettingKey,

        /// New value
        value: String,
    },

    /// Pull the roster and open passes from the remote store
    Sync,

    /// Generate shell completions
    #[command(after_help = "Examples:\n  \
        hallpass completion bash > ~/.local/share/bash-completion/completions/hallpass\n  \
        hallpass completion zsh > ~/.zfunc/_hallpass")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum RosterCommand {
    /// Import a roster CSV (studentId, firstName, lastName, period)
    Import {
        /// CSV file
        file: PathBuf,
    },

    /// List roster entries
    List {
        /// Period 1-6 or "all" (default: the selected period)
        #[arg(long, short)]
        period: Option<PeriodFilter>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SettingKey {
    ScanMode,
    Destination,
    MaxMinutes,
    Period,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
