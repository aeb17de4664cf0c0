//! Console transport — utterances from stdin, responses to stdout.
//!
//! One line of input is one utterance. Useful for local runs and demos;
//! production deployments wire in a broker-backed transport instead.

use async_trait::async_trait;
use tempo_core::{
    config::ConsoleConfig, error::TempoError, message::SkillRequest, traits::Transport,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Console transport reading utterances line-by-line from stdin.
pub struct ConsoleTransport {
    config: ConsoleConfig,
}

impl ConsoleTransport {
    pub fn new(config: ConsoleConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Transport for ConsoleTransport {
    fn name(&self) -> &str {
        "console"
    }

    async fn start(&self) -> Result<mpsc::Receiver<SkillRequest>, TempoError> {
        let (tx, rx) = mpsc::channel(64);
        let output_topic = self.config.output_topic.clone();

        info!("Console transport reading utterances from stdin...");

        tokio::spawn(async move {
            let stdin = BufReader::new(tokio::io::stdin());
            let mut lines = stdin.lines();

            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let text = line.trim();
                        if text.is_empty() {
                            continue;
                        }
                        let request = SkillRequest::new(text, &output_topic);
                        if tx.send(request).await.is_err() {
                            debug!("skill receiver dropped, stopping console reader");
                            break;
                        }
                    }
                    Ok(None) => {
                        info!("stdin closed, console transport stopping");
                        break;
                    }
                    Err(e) => {
                        error!("console read error: {e}");
                        break;
                    }
                }
            }
        });

        Ok(rx)
    }

    async fn publish(
        &self,
        text: &str,
        destination: &str,
        broadcast: bool,
    ) -> Result<(), TempoError> {
        if broadcast {
            println!("[broadcast] {text}");
        } else {
            println!("[{destination}] {text}");
        }
        Ok(())
    }
}
