//! `classifier` subcommands.

use clap::Subcommand;
use competeaware_classifier::ClassifierService;
use competeaware_core::AppConfig;

#[derive(Debug, Subcommand)]
pub enum ClassifierCommands {
    /// Rebuild the bootstrap model and overwrite the artifact on disk
    Train,
    /// Classify a piece of text and print the label and confidence
    Predict {
        /// Text to classify
        text: String,
    },
}

pub(crate) async fn run(config: &AppConfig, command: ClassifierCommands) -> anyhow::Result<()> {
    let service = ClassifierService::new(config.classifier_model_path.clone());

    match command {
        ClassifierCommands::Train => {
            service.retrain().await?;
            println!("model written to {}", service.model_path().display());
        }
        ClassifierCommands::Predict { text } => {
            let prediction = service.classify(&text).await?;
            println!("{}", serde_json::to_string_pretty(&prediction)?);
        }
    }

    Ok(())
}
