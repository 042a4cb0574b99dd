//! Sibyl CLI - Main entry point.

use sibyl::cli::{Cli, Commands};
use sibyl::config::SibylConfig;
use sibyl::model::ModelArtifact;
use sibyl::server::PredictResponse;
use sibyl::{FeatureMatrix, Predictor};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Serve {
            config: config_file,
            log_level,
            bind,
            model,
            debug,
        } => {
            // Load or create configuration
            let mut config = if let Some(config_path) = &config_file {
                SibylConfig::from_file(config_path)?
            } else {
                SibylConfig::default()
            };

            // Override with CLI args
            if let Some(bind) = bind {
                config.server.bind_addr = bind.parse()?;
            }
            if let Some(model) = model {
                config.model.path = model;
            }
            if debug {
                config.server.debug = true;
            }
            if let Some(level) = log_level {
                config.observability.log_level = level;
            }

            sibyl::run(config).await?;
        }

        Commands::Inspect { model } => {
            let artifact = ModelArtifact::load(&model)?;
            println!("{}", serde_json::to_string_pretty(&artifact.describe())?);
        }

        Commands::Predict { model, features } => {
            let artifact = ModelArtifact::load(&model)?;
            let matrix = FeatureMatrix::from_row(features)?;
            let prediction = artifact.predict(&matrix)?;
            println!("{}", serde_json::to_string(&PredictResponse { prediction })?);
        }

        Commands::Convert { input, output } => {
            let artifact = ModelArtifact::load(&input)?;
            artifact.save(&output)?;
            println!("Converted {} -> {}", input.display(), output.display());
        }

        Commands::Version => {
            println!("Sibyl v{}", env!("CARGO_PKG_VERSION"));
            println!("HTTP prediction service for a single pre-trained model");
        }
    }

    Ok(())
}
