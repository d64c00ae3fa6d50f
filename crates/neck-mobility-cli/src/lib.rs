//! Neck Mobility CLI
//!
//! Command-line driver for the lateral neck-flexion assessment. Pose
//! estimation happens elsewhere; this tool reads the resolved landmarks of
//! each capture from JSON files (see [`input`]).
//!
//! # Usage
//!
//! ```bash
//! # Full assessment from three captures
//! neck-mobility diagnose --neutral neutral.json --right right.json --left left.json
//!
//! # Same, as JSON
//! neck-mobility diagnose --neutral n.json --right r.json --left l.json --format json
//!
//! # Angles of a single capture
//! neck-mobility analyze right.json --capture right-tilt
//!
//! # Write the default configuration for editing
//! neck-mobility init-config mobility.json
//! ```

use clap::{Parser, Subcommand};

pub mod assess;
pub mod input;

/// Neck Mobility Command Line Interface
#[derive(Parser, Debug)]
#[command(name = "neck-mobility")]
#[command(author, version, about = "Lateral neck-flexion assessment from pose landmarks")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Diagnose flexibility from neutral, right-tilt and left-tilt captures
    Diagnose(assess::DiagnoseArgs),

    /// Measure the angles of a single capture
    Analyze(assess::AnalyzeArgs),

    /// Write the default configuration file
    InitConfig(assess::InitConfigArgs),

    /// Display version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_diagnose() {
        let cli = Cli::try_parse_from([
            "neck-mobility",
            "diagnose",
            "--neutral",
            "n.json",
            "--right",
            "r.json",
            "--left",
            "l.json",
            "--format",
            "json",
        ])
        .unwrap();
        match cli.command {
            Commands::Diagnose(args) => {
                assert_eq!(args.left, std::path::PathBuf::from("l.json"));
                assert!(matches!(args.format, assess::OutputFormat::Json));
                assert!(args.config.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_analyze_capture_type() {
        let cli = Cli::try_parse_from(["neck-mobility", "analyze", "x.json", "-t", "left-tilt"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Analyze(assess::AnalyzeArgs {
                capture_type: assess::CaptureArg::LeftTilt,
                ..
            })
        ));
    }
}
