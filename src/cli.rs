use clap::{Args, Parser, Subcommand, ValueEnum};
use orchardops::error::{OrchardError, Result};
use orchardops::models::ParameterSnapshot;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "orchardops",
    version,
    about = "Orchard decision engine: phenology, scab risk, spray windows"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override SQLite data directory
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate one set of orchard readings
    Evaluate(EvaluateArgs),
    /// Print the active phenology stage table
    Stages {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Load a YAML or JSON stage list into the local database
    ImportStages {
        /// File with a list of stages (bbchCode, stageName, gddThreshold, description)
        path: PathBuf,
    },
    /// List recommendation rules in evaluation order
    Rules,
    /// Validate config and the stage table
    Check,
}

#[derive(Args)]
pub struct EvaluateArgs {
    /// JSON file with the readings ("-" for stdin)
    #[arg(
        short,
        long,
        conflicts_with_all = ["gdd", "temperature", "leaf_wetness", "wind_speed", "traps", "soil_moisture"]
    )]
    pub input: Option<PathBuf>,

    /// Growing degree days accumulated since season start (base 5°C)
    #[arg(long, default_value_t = 0.0)]
    pub gdd: f64,

    /// Air temperature, °C
    #[arg(long, required_unless_present = "input", allow_negative_numbers = true)]
    pub temperature: Option<f64>,

    /// Hours of continuous leaf wetness
    #[arg(long, default_value_t = 0.0)]
    pub leaf_wetness: f64,

    /// Wind speed, m/s
    #[arg(long, default_value_t = 0.0)]
    pub wind_speed: f64,

    /// Codling moth catches per trap this week
    #[arg(long, default_value_t = 0)]
    pub traps: u32,

    /// Soil moisture, percent
    #[arg(long)]
    pub soil_moisture: Option<f64>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

impl EvaluateArgs {
    /// Build and validate the readings, from `--input` or the individual
    /// flags. `stdin` is only read when the input path is "-".
    pub fn read_snapshot(&self, stdin: impl Read) -> Result<ParameterSnapshot> {
        let snapshot = match &self.input {
            Some(path) => ParameterSnapshot::from_json(&read_input(path, stdin)?)?,
            None => {
                let temperature = self.temperature.ok_or_else(|| {
                    OrchardError::InvalidData("--temperature is required without --input".into())
                })?;
                let snapshot = ParameterSnapshot::new(
                    self.gdd,
                    temperature,
                    self.leaf_wetness,
                    self.wind_speed,
                    self.traps,
                );
                match self.soil_moisture {
                    Some(moisture) => snapshot.with_soil_moisture(moisture),
                    None => snapshot,
                }
            }
        };

        snapshot.validate()?;
        Ok(snapshot)
    }
}

fn read_input(path: &Path, mut stdin: impl Read) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        stdin.read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path)
        .map_err(|e| std::io::Error::new(e.kind(), format!("{}: {}", path.display(), e)).into())
}

/// Process exit code for a failed `evaluate`: 2 for bad readings, 1 otherwise.
pub fn exit_code(err: &OrchardError) -> i32 {
    match err {
        OrchardError::InvalidData(_) | OrchardError::Json(_) => 2,
        _ => 1,
    }
}
