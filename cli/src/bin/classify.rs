use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use cli::{classify_request, ClassificationRequest, ClassifierConfig};
use color_eyre::eyre::Result;
use conformation::{generate_baseline, AggregateScore, ClassificationResult, GradingScheme, RUBRIC};
use schemars::schema_for;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a .toml or .json configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify an animal from a request file of per-view keypoints
    Classify {
        /// Path to the JSON request
        #[arg(short, long)]
        request: PathBuf,
        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Skip marker detection on request images
        #[arg(long)]
        no_calibration: bool,
    },
    /// Print a baseline record with its aggregate scores
    Baseline {
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the 20-trait rubric
    Rubric,
    /// Print a JSON schema
    Schema {
        #[arg(value_enum, default_value = "result")]
        target: SchemaTarget,
    },
    /// Write a configuration file with every default filled in
    InitConfig {
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemaTarget {
    Result,
    Request,
    Config,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BaselineOutput {
    sections: conformation::OfficialRecord,
    #[serde(flatten)]
    aggregate: AggregateScore,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ClassifierConfig::from_file(path)?,
        None => ClassifierConfig::default(),
    };

    match &cli.command {
        Commands::Classify {
            request,
            output,
            no_calibration,
        } => {
            let result = classify(request, &config, !*no_calibration)?;
            emit(&result, output.as_deref())?;
        }
        Commands::Baseline { seed } => {
            let config = ClassifierConfig {
                seed: seed.or(config.seed),
                ..config
            };
            let record = generate_baseline(&mut config.rng());
            let aggregate = AggregateScore::compute(&record, GradingScheme::TwoTier);
            emit(&BaselineOutput { sections: record, aggregate }, None)?;
        }
        Commands::Rubric => emit(&RUBRIC, None)?,
        Commands::Schema { target } => {
            let schema = match target {
                SchemaTarget::Result => schema_for!(ClassificationResult),
                SchemaTarget::Request => schema_for!(ClassificationRequest),
                SchemaTarget::Config => schema_for!(ClassifierConfig),
            };
            emit(&schema, None)?;
        }
        Commands::InitConfig { output } => {
            config.to_file(output)?;
            info!("Configuration saved to: {:?}", output);
        }
    }

    Ok(())
}

fn classify(request_path: &Path, config: &ClassifierConfig, calibrate: bool) -> Result<ClassificationResult> {
    let request = ClassificationRequest::from_file(request_path)?;
    info!(
        "Classifying {} with {} view(s)",
        request.animal_info.tag_number.as_deref().unwrap_or("untagged animal"),
        request.views.len()
    );

    let result = classify_request(&request, config, calibrate)?;
    info!(
        "Overall {:.1} ({}), {} unmatched trait update(s)",
        result.overall_score,
        result.grade,
        result.metadata.unmatched_traits.len()
    );
    Ok(result)
}

fn emit<T: Serialize + ?Sized>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            info!("Result saved to: {:?}", path);
        }
        None => println!("{json}"),
    }
    Ok(())
}
