//! CLI argument definitions using clap

use std::str::FromStr;

use clap::{Parser, Subcommand, ValueHint};
use clap_complete::Shell;

use crate::domain::SelectionState;

/// Tree hierarchy index, tri-state cascading selection and ancestor-preserving filters
#[derive(Parser, Debug)]
#[command(name = "treesel")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Print shell completions for the given shell
    #[arg(long = "generator", value_enum)]
    pub generator: Option<Shell>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the forest built from a records file
    Tree {
        /// Records file (.toml or .json)
        #[arg(value_hint = ValueHint::FilePath)]
        records: String,
    },

    /// Print the path from a root down to ID
    Path {
        #[arg(value_hint = ValueHint::FilePath)]
        records: String,
        id: String,
        /// Print the path as a single-branch tree
        #[arg(long)]
        branch: bool,
    },

    /// Keep nodes whose label matches, together with their ancestors
    Filter {
        #[arg(value_hint = ValueHint::FilePath)]
        records: String,
        /// Substring (or regular expression with --regex) matched against labels
        pattern: String,
        /// Interpret PATTERN as a regular expression
        #[arg(long)]
        regex: bool,
        /// Keep the whole subtree below each match
        #[arg(long)]
        lineage: bool,
        /// Match case-sensitively
        #[arg(long)]
        case_sensitive: bool,
    },

    /// Apply selection events in order and print the resulting states
    ///
    /// Events: click:ID, toggle:ID=STATE, all, clear
    Select {
        #[arg(value_hint = ValueHint::FilePath)]
        records: String,
        /// Events applied left to right
        #[arg(value_name = "EVENT")]
        events: Vec<EventSpec>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report duplicate ids and orphan records
    Check {
        #[arg(value_hint = ValueHint::FilePath)]
        records: String,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective settings
    Show {
        /// Records file whose directory provides the local config
        #[arg(value_hint = ValueHint::FilePath)]
        records: Option<String>,
    },
    /// Show config file locations
    Path,
    /// Print a commented template config
    Template,
}

/// Selection event as written on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventSpec {
    Click(String),
    Toggle(String, SelectionState),
    All,
    Clear,
}

impl FromStr for EventSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => return Ok(EventSpec::All),
            "clear" => return Ok(EventSpec::Clear),
            _ => {}
        }
        if let Some(id) = s.strip_prefix("click:") {
            if id.is_empty() {
                return Err("click needs an id: click:ID".to_string());
            }
            return Ok(EventSpec::Click(id.to_string()));
        }
        if let Some(rest) = s.strip_prefix("toggle:") {
            let (id, state) = rest
                .rsplit_once('=')
                .ok_or_else(|| format!("toggle needs a state: toggle:ID=STATE, got {s}"))?;
            let state = state.parse::<SelectionState>().map_err(|e| e.to_string())?;
            return Ok(EventSpec::Toggle(id.to_string(), state));
        }
        Err(format!(
            "unknown event '{s}' (expected click:ID, toggle:ID=STATE, all or clear)"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rstest::rstest;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[rstest]
    #[case("all", EventSpec::All)]
    #[case("clear", EventSpec::Clear)]
    #[case("click:eng", EventSpec::Click("eng".into()))]
    #[case("toggle:a=b=selected", EventSpec::Toggle("a=b".into(), SelectionState::Selected))]
    fn test_parse_event(#[case] input: &str, #[case] expected: EventSpec) {
        assert_eq!(input.parse::<EventSpec>().unwrap(), expected);
    }

    #[rstest]
    #[case("click:")]
    #[case("toggle:eng")]
    #[case("toggle:eng=sometimes")]
    #[case("shake")]
    fn test_parse_event_rejects(#[case] input: &str) {
        assert!(input.parse::<EventSpec>().is_err());
    }

    #[test]
    fn test_select_parses_events_in_order() {
        let cli = Cli::try_parse_from(["treesel", "select", "org.toml", "all", "click:2"]).unwrap();
        match cli.command {
            Some(Commands::Select { events, .. }) => {
                assert_eq!(events, vec![EventSpec::All, EventSpec::Click("2".into())]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
