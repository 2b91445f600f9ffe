//! Tubeinfo CLI - Command-line interface
//!
//! Usage:
//!   tubeinfo classify <title> [--description <text>]
//!   tubeinfo parse-url <url>

use std::sync::Arc;

use clap::{Parser, Subcommand};

use tubeinfo_core::{AppConfig, VideoDescriptor};
use tubeinfo_extractor::create_llm_client;
use tubeinfo_pipeline::ClassificationPipeline;
use tubeinfo_youtube::{parse_video_url, YouTubeDataClient};

#[derive(Parser)]
#[command(name = "tubeinfo")]
#[command(about = "Video classification and attribute extraction CLI")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a video and print the merged record
    Classify {
        /// Video title
        title: String,
        /// Video description
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Parse a video reference URL and print the identifier
    ParseUrl {
        /// URL to parse
        url: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Classify { title, description } => {
            let config = AppConfig::from_env()?;
            let llm = create_llm_client(&config.llm)?;
            let metadata = Arc::new(YouTubeDataClient::from_config(&config.youtube)?);
            let pipeline = ClassificationPipeline::new(llm, metadata, &config.extraction);

            let record = pipeline
                .run(&VideoDescriptor::new(title, description))
                .await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Commands::ParseUrl { url } => match parse_video_url(&url) {
            Some(id) => println!("{id}"),
            None => {
                eprintln!("no match");
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
