use clap::{Args, Subcommand};
use qa_client::{
    types::{ClassificationRequest, GenerationRequest, DEFAULT_TEMPERATURE},
    Client,
};

use crate::report::Outcome;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a response to a prompt.
    Generate(GenerateArgs),
    /// Classify text into one of the given categories.
    Classify(ClassifyArgs),
    /// Check that the API is up.
    Health,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    pub prompt: String,
    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    pub temperature: f64,
}

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    pub text: String,
    /// Candidate category, repeat for more.
    #[arg(short, long = "category", required = true)]
    pub categories: Vec<String>,
}

impl From<GenerateArgs> for GenerationRequest {
    fn from(value: GenerateArgs) -> Self {
        GenerationRequest::new(value.prompt).with_temperature(value.temperature)
    }
}

impl From<ClassifyArgs> for ClassificationRequest {
    fn from(value: ClassifyArgs) -> Self {
        ClassificationRequest::new(value.text, value.categories)
    }
}

pub async fn run(client: &Client, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Generate(args) => {
            let response = client.generate(&args.into()).await?;
            println!("{}", Outcome::Generation(response));
        }
        Command::Classify(args) => {
            let request: ClassificationRequest = args.into();
            anyhow::ensure!(!request.categories.is_empty(), "no non-empty categories given");
            let response = client.classify(&request).await?;
            println!("{}", Outcome::Classification(response));
        }
        Command::Health => {
            let health = client.health().await?;
            match health.timestamp {
                Some(timestamp) => println!("{} ({timestamp})", health.status),
                None => println!("{}", health.status),
            }
            anyhow::ensure!(health.is_healthy(), "API reported {}", health.status);
        }
    }

    Ok(())
}
