//! Assessment subcommands
//!
//! - `diagnose`: three capture files to a full flexibility report
//! - `analyze`: one capture file to its measured angles
//! - `init-config`: write the default configuration

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, ValueEnum};
use colored::{ColoredString, Colorize};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use neck_mobility_core::{
    AsymmetryLevel, CaptureType, DiagnosisResult, DiagnosisSession, FlexibilityLevel,
    MeasurementAnalyzer, Measurement, MobilityConfig, MobilityError,
};

use crate::input::{CaptureFile, CaptureFileSource};

/// Arguments for the diagnose command
#[derive(Args, Debug)]
pub struct DiagnoseArgs {
    /// Capture file for the neutral (upright) pose
    #[arg(long)]
    pub neutral: PathBuf,

    /// Capture file for the head bent toward the right shoulder
    #[arg(long)]
    pub right: PathBuf,

    /// Capture file for the head bent toward the left shoulder
    #[arg(long)]
    pub left: PathBuf,

    /// Configuration file (defaults are used if not specified)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the analyze command
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Capture file to analyze
    pub input: PathBuf,

    /// Which capture the file holds
    #[arg(short = 't', long = "capture", value_enum, default_value = "neutral")]
    pub capture_type: CaptureArg,

    /// Configuration file (defaults are used if not specified)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the init-config command
#[derive(Args, Debug)]
pub struct InitConfigArgs {
    /// Where to write the configuration
    #[arg(default_value = "neck-mobility.json")]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Capture type argument enum for CLI
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum CaptureArg {
    Neutral,
    RightTilt,
    LeftTilt,
}

impl From<CaptureArg> for CaptureType {
    fn from(val: CaptureArg) -> Self {
        match val {
            CaptureArg::Neutral => CaptureType::Neutral,
            CaptureArg::RightTilt => CaptureType::RightTilt,
            CaptureArg::LeftTilt => CaptureType::LeftTilt,
        }
    }
}

/// Output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    /// Human-readable tables
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

// ============================================================================
// Display Structs
// ============================================================================

/// Measurement display row for tables
#[derive(Tabled)]
struct MeasurementRow {
    #[tabled(rename = "Capture")]
    capture: String,
    #[tabled(rename = "Neck tilt")]
    neck_tilt: String,
    #[tabled(rename = "Shoulder tilt")]
    shoulder_tilt: String,
    #[tabled(rename = "Visible landmarks")]
    visible: usize,
}

/// Per-side display row for tables
#[derive(Tabled)]
struct SideRow {
    #[tabled(rename = "Side")]
    side: &'static str,
    #[tabled(rename = "Flexion")]
    flexion: String,
    #[tabled(rename = "Level")]
    level: &'static str,
    #[tabled(rename = "Assessment")]
    description: &'static str,
}

/// Measurement without its landmark payload
#[derive(Serialize)]
struct MeasurementSummary {
    capture_type: CaptureType,
    neck_tilt_angle: f64,
    shoulder_tilt_angle: f64,
    captured_at: DateTime<Utc>,
}

impl From<&Measurement> for MeasurementSummary {
    fn from(m: &Measurement) -> Self {
        Self {
            capture_type: m.capture_type,
            neck_tilt_angle: m.neck_tilt_angle,
            shoulder_tilt_angle: m.shoulder_tilt_angle,
            captured_at: m.captured_at,
        }
    }
}

/// JSON document printed by `diagnose --format json`
#[derive(Serialize)]
struct Report<'a> {
    measurements: Vec<MeasurementSummary>,
    diagnosis: &'a DiagnosisResult,
}

// ============================================================================
// Command Execution
// ============================================================================

/// Execute the diagnose command
pub fn execute_diagnose(args: DiagnoseArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mut session = DiagnosisSession::with_config(config)?;

    let mut source = CaptureFileSource::new();
    source.load(CaptureType::Neutral, &args.neutral)?;
    source.load(CaptureType::RightTilt, &args.right)?;
    source.load(CaptureType::LeftTilt, &args.left)?;

    for capture in CaptureType::all() {
        session
            .capture_from(*capture, &mut source)
            .map_err(|e| capture_error(*capture, e))?;
    }

    let diagnosis = session
        .compute_diagnosis()
        .context("Failed to compute diagnosis")?;
    let measurements: Vec<&Measurement> = CaptureType::all()
        .iter()
        .filter_map(|c| session.measurement(*c))
        .collect();

    match args.format {
        OutputFormat::Json => {
            let report = Report {
                measurements: measurements.iter().copied().map(MeasurementSummary::from).collect(),
                diagnosis: &diagnosis,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Table => {
            print_measurements(&measurements);
            println!();
            print_diagnosis(&diagnosis);
        }
    }

    Ok(())
}

/// Execute the analyze command
pub fn execute_analyze(args: AnalyzeArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let analyzer = MeasurementAnalyzer::new(config)?;
    let capture: CaptureType = args.capture_type.into();

    let detections = CaptureFile::load(&args.input)?.into_detections();
    let measurement = analyzer
        .analyze_samples(capture, &detections)
        .map_err(|e| capture_error(capture, e))?;

    match args.format {
        OutputFormat::Json => {
            let summary = MeasurementSummary::from(&measurement);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Table => print_measurements(&[&measurement]),
    }

    Ok(())
}

/// Execute the init-config command
pub fn execute_init_config(args: InitConfigArgs) -> Result<()> {
    if args.path.exists() && !args.force {
        bail!(
            "{} already exists. Use --force to overwrite.",
            args.path.display()
        );
    }

    MobilityConfig::default()
        .to_json(&args.path)
        .with_context(|| format!("Failed to write {}", args.path.display()))?;

    println!(
        "{} Wrote default configuration to {}",
        "[OK]".green().bold(),
        args.path.display()
    );
    Ok(())
}

/// Loads and validates a configuration file, or returns the defaults.
pub fn load_config(path: Option<&Path>) -> Result<MobilityConfig> {
    match path {
        Some(path) => MobilityConfig::from_json(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(MobilityConfig::default()),
    }
}

fn capture_error(capture: CaptureType, err: MobilityError) -> anyhow::Error {
    let context = if err.is_recoverable() {
        format!("The {capture} capture was rejected; retake it")
    } else {
        format!("The {capture} capture could not be analyzed")
    };
    anyhow::Error::new(err).context(context)
}

// ============================================================================
// Output
// ============================================================================

fn print_measurements(measurements: &[&Measurement]) {
    let rows: Vec<MeasurementRow> = measurements
        .iter()
        .map(|m| MeasurementRow {
            capture: m.capture_type.to_string(),
            neck_tilt: format!("{:+.1}°", m.neck_tilt_angle),
            shoulder_tilt: format!("{:+.1}°", m.shoulder_tilt_angle),
            visible: m.landmarks.visible_count(neck_mobility_core::DEFAULT_VISIBILITY_THRESHOLD),
        })
        .collect();

    println!("{}", "Measurements".bold().cyan());
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");
}

fn print_diagnosis(diagnosis: &DiagnosisResult) {
    println!("{}", "Lateral Flexion".bold().cyan());
    let rows = [
        SideRow {
            side: "Right",
            flexion: format!("{:.1}°", diagnosis.right_flexion_angle),
            level: diagnosis.right_flexibility_level.label(),
            description: diagnosis.right_flexibility_level.description(),
        },
        SideRow {
            side: "Left",
            flexion: format!("{:.1}°", diagnosis.left_flexion_angle),
            level: diagnosis.left_flexibility_level.label(),
            description: diagnosis.left_flexibility_level.description(),
        },
    ];
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    println!(
        "  {} {} ({:.1}° difference{})",
        "Asymmetry:".dimmed(),
        format_asymmetry(diagnosis.asymmetry_level),
        diagnosis.asymmetry_diff,
        diagnosis
            .stiffer_side
            .map(|side| format!(", {side} side stiffer"))
            .unwrap_or_default()
    );
    println!(
        "  {} right {}, left {}",
        "Flexibility:".dimmed(),
        format_level(diagnosis.right_flexibility_level),
        format_level(diagnosis.left_flexibility_level)
    );
    println!();

    println!("{}", "Recommendations".bold().cyan());
    for (i, rec) in diagnosis.recommendations.iter().enumerate() {
        println!("  {}. {}", i + 1, rec);
    }
}

fn format_level(level: FlexibilityLevel) -> ColoredString {
    match level {
        FlexibilityLevel::Stiff => level.label().red().bold(),
        FlexibilityLevel::SomewhatStiff => level.label().yellow().bold(),
        FlexibilityLevel::Normal => level.label().green().bold(),
        FlexibilityLevel::Flexible => level.label().cyan().bold(),
    }
}

fn format_asymmetry(level: AsymmetryLevel) -> ColoredString {
    match level {
        AsymmetryLevel::Normal => level.label().green().bold(),
        AsymmetryLevel::Mild => level.label().yellow(),
        AsymmetryLevel::Moderate => level.label().yellow().bold(),
        AsymmetryLevel::Significant => level.label().red().bold(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_capture_arg_conversion() {
        let ct: CaptureType = CaptureArg::RightTilt.into();
        assert_eq!(ct, CaptureType::RightTilt);
    }

    #[test]
    fn test_default_config_without_path() {
        assert_eq!(load_config(None).unwrap(), MobilityConfig::default());
    }

    #[test]
    fn test_init_config_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cfg.json");

        execute_init_config(InitConfigArgs {
            path: path.clone(),
            force: false,
        })
        .unwrap();
        assert_eq!(load_config(Some(&path)).unwrap(), MobilityConfig::default());

        assert!(execute_init_config(InitConfigArgs {
            path: path.clone(),
            force: false,
        })
        .is_err());
        assert!(execute_init_config(InitConfigArgs { path, force: true }).is_ok());
    }

    fn capture_file(head_shift: f64) -> CaptureFile {
        use crate::input::DetectionRecord;
        use neck_mobility_core::{Keypoint, LandmarkIndex, LandmarkSet};

        let mut set = LandmarkSet::empty();
        for (index, x, y) in [
            (LandmarkIndex::Nose, 0.50, 0.29),
            (LandmarkIndex::LeftEye, 0.53, 0.27),
            (LandmarkIndex::RightEye, 0.47, 0.27),
            (LandmarkIndex::LeftEar, 0.56, 0.30),
            (LandmarkIndex::RightEar, 0.44, 0.30),
        ] {
            set.set(index, Some(Keypoint::with_visibility(x + head_shift, y, 0.0, 0.9)));
        }
        for (index, x, y) in [
            (LandmarkIndex::LeftShoulder, 0.65, 0.50),
            (LandmarkIndex::RightShoulder, 0.35, 0.50),
            (LandmarkIndex::LeftElbow, 0.72, 0.70),
            (LandmarkIndex::RightElbow, 0.28, 0.70),
        ] {
            set.set(index, Some(Keypoint::with_visibility(x, y, 0.0, 0.9)));
        }
        CaptureFile {
            detections: vec![DetectionRecord {
                landmarks: Some(set),
                face_mesh: None,
            }],
        }
    }

    #[test]
    fn test_diagnose_from_files() {
        let dir = tempdir().unwrap();
        let write = |name: &str, shift: f64| {
            let path = dir.path().join(name);
            std::fs::write(&path, serde_json::to_string(&capture_file(shift)).unwrap()).unwrap();
            path
        };

        let args = DiagnoseArgs {
            neutral: write("neutral.json", 0.0),
            right: write("right.json", -0.08),
            left: write("left.json", 0.05),
            config: None,
            format: OutputFormat::Json,
        };
        execute_diagnose(args).unwrap();
    }

    #[test]
    fn test_analyze_reports_missing_file() {
        let dir = tempdir().unwrap();
        let err = execute_analyze(AnalyzeArgs {
            input: dir.path().join("absent.json"),
            capture_type: CaptureArg::Neutral,
            config: None,
            format: OutputFormat::Table,
        })
        .unwrap_err();
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn test_recoverable_errors_ask_for_retake() {
        let err = capture_error(
            CaptureType::LeftTilt,
            MobilityError::NoPoseDetected {
                capture: CaptureType::LeftTilt,
            },
        );
        assert!(err.to_string().contains("retake"));
        assert!(err.downcast_ref::<MobilityError>().is_some());
    }
}
