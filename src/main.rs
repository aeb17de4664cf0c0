mod skill;

use clap::{Parser, Subcommand};
use skill::TimeSkill;
use std::sync::Arc;
use tempo_channels::ConsoleTransport;
use tempo_core::{config, message::SkillRequest, traits::Transport};
use tempo_memory::Store;
use tempo_nlu::WordScanner;

#[derive(Parser)]
#[command(
    name = "tempo",
    version,
    about = "Tempo — voice-assistant timer & alarm skill"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the skill service.
    Start,
    /// Check configuration and persistence health.
    Status,
    /// Run a single utterance through the skill and print the response.
    Ask {
        /// The utterance to classify and execute.
        #[arg(trailing_var_arg = true)]
        utterance: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Start => {
            let cfg = config::load(&cli.config)?;
            let transport = build_transport(&cfg)?;
            let store = build_store(&cfg).await?;

            println!("Tempo — starting skill...");
            let skill = TimeSkill::new(transport, Arc::new(WordScanner), store);
            skill.run().await?;
        }
        Commands::Status => {
            let cfg = config::load(&cli.config)?;
            println!("Tempo — Status Check\n");
            println!("Config: {}", cli.config);
            println!("Skill name: {}", cfg.skill.name);

            match cfg.channel.console {
                Some(ref console) if console.enabled => {
                    println!("  console: enabled (replies to {})", console.output_topic);
                }
                Some(_) => println!("  console: disabled"),
                None => println!("  console: not configured"),
            }

            if cfg.memory.enabled {
                let store = Store::new(&cfg.memory).await?;
                let pending = store.future_entries(chrono::Utc::now()).await?;
                println!("  memory: enabled ({})", cfg.memory.db_path);
                println!("  pending entries: {}", pending.len());
            } else {
                println!("  memory: disabled (in-memory only)");
            }
        }
        Commands::Ask { utterance } => {
            if utterance.is_empty() {
                anyhow::bail!("no utterance provided. Usage: tempo ask <utterance>");
            }

            let cfg = config::load(&cli.config)?;
            let transport = build_transport(&cfg)?;
            let skill = TimeSkill::new(transport, Arc::new(WordScanner), None);

            let text = utterance.join(" ");
            skill
                .handle_request(SkillRequest::new(&text, "console"))
                .await;
        }
    }

    Ok(())
}

/// Build the configured transport.
fn build_transport(cfg: &config::Config) -> anyhow::Result<Arc<dyn Transport>> {
    if let Some(ref console) = cfg.channel.console {
        if console.enabled {
            return Ok(Arc::new(ConsoleTransport::new(console.clone())));
        }
    }
    anyhow::bail!("No transport enabled. Enable at least one channel in config.toml.")
}

/// Build the optional persistence store.
async fn build_store(cfg: &config::Config) -> anyhow::Result<Option<Store>> {
    if cfg.memory.enabled {
        Ok(Some(Store::new(&cfg.memory).await?))
    } else {
        Ok(None)
    }
}
