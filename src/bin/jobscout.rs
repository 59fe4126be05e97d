use chrono::Utc;
use clap::{Parser, Subcommand};
use jobscout::{CoverLetterWriter, JobListing, JobScoutConfig, LlmProviderFactory, SearchOrchestrator};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "jobscout", version, about = "Recent job listings, ranked for a role")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search, rank and print listings posted in the last day
    Search {
        #[arg(long)]
        role: String,
        #[arg(long, default_value_t = 0)]
        experience: u32,
    },
    /// Drop cached jobs and tips for a role
    ClearCache {
        #[arg(long)]
        role: String,
        #[arg(long, default_value_t = 0)]
        experience: u32,
    },
    Health,
    /// Draft a cover letter for a listing
    CoverLetter {
        #[arg(long)]
        title: String,
        #[arg(long)]
        company: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        name: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("jobscout=info".parse()?))
        .init();

    let cli = Cli::parse();
    let config = JobScoutConfig::from_env()?;

    match cli.command {
        Command::Search { role, experience } => {
            let orchestrator = SearchOrchestrator::from_config(&config)?;
            match orchestrator.search(&role, experience).await {
                Ok(outcome) => println!("{}", serde_json::to_string_pretty(&outcome)?),
                Err(e) => {
                    tracing::error!("Search failed: {}", e);
                    anyhow::bail!(e.public_message());
                }
            }
        }
        Command::ClearCache { role, experience } => {
            let orchestrator = SearchOrchestrator::from_config(&config)?;
            orchestrator.clear_cache(&role, experience).await;
            println!("{}", serde_json::json!({ "message": "Cache cleared successfully" }));
        }
        Command::Health => {
            let orchestrator = SearchOrchestrator::from_config(&config)?;
            let report = orchestrator.health().await;
            println!(
                "{}",
                serde_json::json!({
                    "status": report.status(),
                    "cache": report.cache,
                    "store": report.store,
                })
            );
        }
        Command::CoverLetter {
            title,
            company,
            description,
            name,
        } => {
            let writer = CoverLetterWriter::new(LlmProviderFactory::from_config(&config)?);
            let listing = JobListing {
                id: None,
                external_id: String::new(),
                title,
                company,
                location: String::new(),
                description,
                source: String::new(),
                apply_url: String::new(),
                salary_range: String::new(),
                posted_at: Utc::now(),
                ai_score: None,
                ai_reason: None,
            };
            println!("{}", writer.write(&listing, &name).await);
        }
    }

    Ok(())
}
