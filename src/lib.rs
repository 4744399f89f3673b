//! auxgcp: ground control points from raster sidecar files.
//!
//! GIS tools record how a raster was georeferenced in an auxiliary
//! `*.aux.xml` file next to the image. auxgcp reads that file, finds the
//! polynomial transform entry, and returns its control points as ordered
//! (image position, world position) pairs tagged with the target spatial
//! reference, ready for whatever does the actual warping or display.
//!
//! # Modules
//!
//! - [`ir`]: Data model and sidecar document adapters
//! - [`builder`]: Pairing raw arrays into control points
//! - [`retrieve`]: Fetching sidecar text from URLs or paths
//! - [`sidecar`]: The end-to-end retrieve, parse, build pipeline
//! - [`validation`]: Quality checks on control point sets
//! - [`error`]: Error types for auxgcp operations
//!
//! # Example
//!
//! ```no_run
//! use auxgcp::retrieve::Retriever;
//! use auxgcp::sidecar::auxiliary_xml_to_control_points;
//!
//! let retriever = Retriever::default();
//! let set = auxiliary_xml_to_control_points(&retriever, "maps/4403.tiff.aux.xml")?;
//! for point in &set {
//!     println!("{} -> {}", point.source_point, point.target_point);
//! }
//! # Ok::<(), auxgcp::AuxGcpError>(())
//! ```

pub mod builder;
pub mod error;
pub mod ir;
pub mod retrieve;
pub mod sidecar;
pub mod validation;

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::{Parser, Subcommand};

pub use builder::build_control_points;
pub use error::AuxGcpError;
pub use sidecar::{auxiliary_xml_to_control_points, SidecarFormat};

use ir::ControlPointSet;
use retrieve::{RetrieveOptions, Retriever};

/// The auxgcp CLI application.
#[derive(Parser)]
#[command(name = "auxgcp")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Extract ground control points from a sidecar.
    Extract(ExtractArgs),
    /// Check a sidecar's control points for quality problems.
    Validate(ValidateArgs),
}

/// Where to read the sidecar from and how.
#[derive(clap::Args)]
struct InputArgs {
    /// Sidecar URL or path (or the image's, with --image).
    location: String,

    /// Sidecar format ('aux-xml' or 'aux-json').
    #[arg(long, default_value = "aux-xml")]
    format: String,

    /// Treat LOCATION as the image and read the '.aux.xml' next to it.
    #[arg(long)]
    image: bool,

    /// Timeout for remote retrieval, in seconds.
    #[arg(long, env = "AUXGCP_TIMEOUT_SECS", default_value_t = 30)]
    timeout: u64,
}

/// Arguments for the extract subcommand.
#[derive(clap::Args)]
struct ExtractArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output format ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,

    /// Write JSON to this file instead of printing.
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,
}

/// Arguments for the validate subcommand.
#[derive(clap::Args)]
struct ValidateArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// How a subcommand prints its result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = AuxGcpError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(AuxGcpError::UnsupportedFormat(format!(
                "'{other}' (supported output: text, json)"
            ))),
        }
    }
}

/// Run the auxgcp CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), AuxGcpError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Extract(args)) => run_extract(args),
        Some(Commands::Validate(args)) => run_validate(args),
        None => {
            println!("auxgcp {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Ground control points from raster .aux.xml sidecar files.");
            println!();
            println!("Run 'auxgcp --help' for usage information.");
            Ok(())
        }
    }
}

/// Retrieve, parse and build according to the shared input arguments.
fn load(input: &InputArgs) -> Result<ControlPointSet, AuxGcpError> {
    let format: SidecarFormat = input.format.parse()?;
    let location = if input.image {
        retrieve::sidecar_location(&input.location)
    } else {
        input.location.clone()
    };

    let retriever = Retriever::new(&RetrieveOptions {
        timeout: Duration::from_secs(input.timeout),
    });
    sidecar::load_control_points(&retriever, &location, format)
}

/// Execute the extract subcommand.
fn run_extract(args: ExtractArgs) -> Result<(), AuxGcpError> {
    let output: OutputFormat = args.output.parse()?;
    let set = load(&args.input)?;

    if let Some(path) = &args.out {
        ir::io_json::write_control_points_json(path, &set)?;
        println!("Wrote {} control point(s) to {}", set.len(), path.display());
        return Ok(());
    }

    match output {
        OutputFormat::Json => {
            let json = ir::io_json::to_json_string(&set).map_err(|source| {
                AuxGcpError::JsonWrite {
                    path: PathBuf::from("<stdout>"),
                    source,
                }
            })?;
            println!("{json}");
        }
        OutputFormat::Text => print!("{set}"),
    }

    Ok(())
}

/// Execute the validate subcommand.
fn run_validate(args: ValidateArgs) -> Result<(), AuxGcpError> {
    let output: OutputFormat = args.output.parse()?;
    let set = load(&args.input)?;

    let opts = validation::ValidateOptions {
        strict: args.strict,
    };
    let report = validation::validate_control_points(&set, &opts);

    match output {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "control_point_count": set.len(),
                "error_count": report.error_count(),
                "warning_count": report.warning_count(),
                "issues": &report.issues,
            });
            let json = serde_json::to_string_pretty(&json).map_err(|source| {
                AuxGcpError::JsonWrite {
                    path: PathBuf::from("<stdout>"),
                    source,
                }
            })?;
            println!("{json}");
        }
        OutputFormat::Text => {
            print!("{}", report);
        }
    }

    let has_errors = report.error_count() > 0;
    let has_warnings = report.warning_count() > 0;

    if has_errors || (args.strict && has_warnings) {
        Err(AuxGcpError::ValidationFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn public_types_are_send_and_sync() {
        assert_send_sync::<Retriever>();
        assert_send_sync::<ControlPointSet>();
        assert_send_sync::<ir::RawGeoreferenceBlock>();
        assert_send_sync::<validation::ValidationReport>();
        assert_send_sync::<AuxGcpError>();
    }

    #[test]
    fn output_format_rejects_unknown_values() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        let err = "yaml".parse::<OutputFormat>().unwrap_err();
        assert!(matches!(err, AuxGcpError::UnsupportedFormat(_)), "{err}");
    }
}
