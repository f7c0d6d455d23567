//! Command-Line Interface

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// QTC Motif Miner - Qualitative trajectory analysis of motion captures
#[derive(Parser, Debug)]
#[command(name = "qtc-mine")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a capture and write the JSON export
    Analyze {
        /// Captury CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Output JSON path (defaults to the input name with .json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Override the distance-noise threshold (mm)
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Override the minimum motif duration (seconds)
        #[arg(long)]
        min_duration: Option<f64>,

        /// Override the motif cap per pair
        #[arg(long)]
        max_motifs: Option<usize>,
    },

    /// Print distributions and motifs without writing an export
    Inspect {
        /// Captury CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Only this pair (e.g. "l_hand-head")
        #[arg(short, long)]
        pair: Option<String>,
    },

    /// List configured joint pairs
    Pairs,

    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// View or modify configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "analysis.threshold_mm", "export.frame_stride")
        key: String,

        /// Value to set
        value: String,
    },

    /// Get a specific configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Reset configuration to defaults
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Export path next to the input when none is given
    pub fn default_output(input: &std::path::Path) -> PathBuf {
        input.with_extension("json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_default_output() {
        let out = Cli::default_output(std::path::Path::new("/data/ekombi.csv"));
        assert_eq!(out, PathBuf::from("/data/ekombi.json"));
    }

    #[test]
    fn test_cli_parse_analyze_command_with_defaults() {
        let args = vec!["qtc-mine", "analyze", "--input", "session.csv"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Analyze { input, output, threshold, min_duration, max_motifs } => {
                assert_eq!(input, PathBuf::from("session.csv"));
                assert!(output.is_none());
                assert!(threshold.is_none());
                assert!(min_duration.is_none());
                assert!(max_motifs.is_none());
            }
            _ => panic!("Expected Analyze command"),
        }
    }

    #[test]
    fn test_cli_parse_analyze_command_with_all_options() {
        let args = vec![
            "qtc-mine",
            "analyze",
            "--input", "/path/to/session.csv",
            "--output", "/path/to/out.json",
            "--threshold", "5.0",
            "--min-duration", "0.75",
            "--max-motifs", "4",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Analyze { input, output, threshold, min_duration, max_motifs } => {
                assert_eq!(input, PathBuf::from("/path/to/session.csv"));
                assert_eq!(output, Some(PathBuf::from("/path/to/out.json")));
                assert_eq!(threshold, Some(5.0));
                assert_eq!(min_duration, Some(0.75));
                assert_eq!(max_motifs, Some(4));
            }
            _ => panic!("Expected Analyze command"),
        }
    }

    #[test]
    fn test_cli_analyze_shorthands() {
        let args = vec!["qtc-mine", "analyze", "-i", "a.csv", "-o", "b.json", "-t", "1.5"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Analyze { input, output, threshold, .. } => {
                assert_eq!(input, PathBuf::from("a.csv"));
                assert_eq!(output, Some(PathBuf::from("b.json")));
                assert_eq!(threshold, Some(1.5));
            }
            _ => panic!("Expected Analyze command"),
        }
    }

    #[test]
    fn test_cli_analyze_rejects_non_numeric_threshold() {
        let args = vec!["qtc-mine", "analyze", "-i", "a.csv", "--threshold", "loose"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_cli_parse_inspect_command() {
        let args = vec!["qtc-mine", "inspect", "--input", "a.csv", "--pair", "l_hand-head"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Inspect { input, pair } => {
                assert_eq!(input, PathBuf::from("a.csv"));
                assert_eq!(pair.as_deref(), Some("l_hand-head"));
            }
            _ => panic!("Expected Inspect command"),
        }
    }

    #[test]
    fn test_cli_parse_pairs_command() {
        let cli = Cli::try_parse_from(vec!["qtc-mine", "pairs"]).unwrap();
        assert!(matches!(cli.command, Commands::Pairs));
    }

    #[test]
    fn test_cli_parse_init_command() {
        let cli = Cli::try_parse_from(vec!["qtc-mine", "init", "--force"]).unwrap();

        match cli.command {
            Commands::Init { force } => assert!(force),
            _ => panic!("Expected Init command"),
        }
    }

    #[test]
    fn test_cli_parse_init_command_defaults() {
        let cli = Cli::try_parse_from(vec!["qtc-mine", "init"]).unwrap();

        match cli.command {
            Commands::Init { force } => assert!(!force),
            _ => panic!("Expected Init command"),
        }
    }

    #[test]
    fn test_cli_global_verbose_flag() {
        let cli = Cli::try_parse_from(vec!["qtc-mine", "--verbose", "pairs"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let args = vec!["qtc-mine", "pairs", "-v", "-c", "/custom/config.toml"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_cli_global_config_flag() {
        let args = vec!["qtc-mine", "--config", "/path/to/config.toml", "pairs"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/config.toml")));
    }

    #[test]
    fn test_cli_invalid_command_fails() {
        assert!(Cli::try_parse_from(vec!["qtc-mine", "invalid-command"]).is_err());
    }

    #[test]
    fn test_cli_missing_required_argument_fails() {
        assert!(Cli::try_parse_from(vec!["qtc-mine", "analyze"]).is_err());
        assert!(Cli::try_parse_from(vec!["qtc-mine", "inspect"]).is_err());
    }

    #[test]
    fn test_cli_verify_command_structure() {
        let cmd = Cli::command();

        let subcommands: Vec<_> = cmd.get_subcommands().map(|s| s.get_name()).collect();
        assert!(subcommands.contains(&"analyze"));
        assert!(subcommands.contains(&"inspect"));
        assert!(subcommands.contains(&"pairs"));
        assert!(subcommands.contains(&"init"));
        assert!(subcommands.contains(&"config"));
    }

    #[test]
    fn test_cli_parse_config_show() {
        let cli = Cli::try_parse_from(vec!["qtc-mine", "config", "show"]).unwrap();

        match cli.command {
            Commands::Config { action: ConfigAction::Show } => {}
            _ => panic!("Expected Config Show"),
        }
    }

    #[test]
    fn test_cli_parse_config_set() {
        let args = vec!["qtc-mine", "config", "set", "analysis.threshold_mm", "4.0"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Config { action: ConfigAction::Set { key, value } } => {
                assert_eq!(key, "analysis.threshold_mm");
                assert_eq!(value, "4.0");
            }
            _ => panic!("Expected Config Set"),
        }
    }

    #[test]
    fn test_cli_parse_config_get() {
        let args = vec!["qtc-mine", "config", "get", "export.frame_stride"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Config { action: ConfigAction::Get { key } } => {
                assert_eq!(key, "export.frame_stride");
            }
            _ => panic!("Expected Config Get"),
        }
    }

    #[test]
    fn test_cli_parse_config_reset() {
        let cli = Cli::try_parse_from(vec!["qtc-mine", "config", "reset", "--force"]).unwrap();

        match cli.command {
            Commands::Config { action: ConfigAction::Reset { force } } => assert!(force),
            _ => panic!("Expected Config Reset"),
        }
    }

    #[test]
    fn test_cli_parse_config_reset_defaults() {
        let cli = Cli::try_parse_from(vec!["qtc-mine", "config", "reset"]).unwrap();

        match cli.command {
            Commands::Config { action: ConfigAction::Reset { force } } => assert!(!force),
            _ => panic!("Expected Config Reset"),
        }
    }
}
