//! The Tempo skill — classify, extract, mutate the registry, respond.

mod registry;
mod respond;


pub use registry::Registry;

use chrono::{Local, Utc};
use std::sync::Arc;
use tempo_core::{
    error::TempoError,
    message::SkillRequest,
    traits::{Analyzer, Transport},
};
use tempo_memory::{EntryKind, Store};
use tempo_nlu::{find_parameters, Action};
use tracing::{debug, error, info, warn};

/// The skill service: one registry shared between the request path and
/// the armed tasks' fire path.
pub struct TimeSkill {
    transport: Arc<dyn Transport>,
    analyzer: Arc<dyn Analyzer>,
    registry: Arc<Registry>,
    store: Option<Store>,
}

impl TimeSkill {
    pub fn new(
        transport: Arc<dyn Transport>,
        analyzer: Arc<dyn Analyzer>,
        store: Option<Store>,
    ) -> Self {
        let registry = Registry::new(transport.clone(), store.clone());
        Self {
            transport,
            analyzer,
            registry,
            store,
        }
    }

    /// Run the request loop until the transport closes.
    pub async fn run(&self) -> Result<(), TempoError> {
        let mut rx = self.transport.start().await?;
        info!("Tempo skill running | transport: {}", self.transport.name());

        self.recover().await;

        while let Some(request) = rx.recv().await {
            self.handle_request(request).await;
        }

        info!("transport closed, skill stopping");
        Ok(())
    }

    /// Re-arm entries persisted by a previous run that are still due in
    /// the future. Best-effort: a failed query is logged and skipped.
    pub async fn recover(&self) {
        let Some(store) = &self.store else { return };

        match store.future_entries(Utc::now()).await {
            Ok(entries) => {
                let count = entries.len();
                for entry in entries {
                    match entry.kind {
                        EntryKind::Timer => {
                            let remaining = entry.scheduled_time - Utc::now();
                            self.registry.register_timer(
                                &entry.name,
                                remaining,
                                &entry.output_topic,
                            );
                        }
                        EntryKind::Alarm => {
                            self.registry.register_alarm(
                                &entry.name,
                                entry.scheduled_time.with_timezone(&Local),
                                &entry.output_topic,
                            );
                        }
                    }
                }
                if count > 0 {
                    info!("re-armed {count} persisted entries");
                }
            }
            Err(e) => warn!("recovery query failed: {e}"),
        }
    }

    /// Handle one inbound utterance end to end: classify, extract, mutate
    /// or query the registry, render, publish.
    pub async fn handle_request(&self, request: SkillRequest) {
        let Some(action) = Action::find_matching(&request.text) else {
            // Not ours — another skill will claim it.
            debug!("no recognized action in: {}", request.text);
            return;
        };

        let mut parameters =
            find_parameters(action, self.analyzer.as_ref(), &request.text, Local::now());

        let answer = match action {
            Action::Set => {
                let key = parameters.duration_name();
                if key.is_empty() {
                    warn!("no valid timer duration in: {}", request.text);
                    respond::nothing_to_schedule()
                } else {
                    self.registry.register_timer(
                        &key,
                        parameters.total_duration(),
                        &request.output_topic,
                    );
                    respond::render(action, &parameters)
                }
            }
            Action::SetAlarm => match parameters.alarm_time {
                Some(fire_at) => {
                    let key = tempo_core::duration::format_clock_time(&fire_at);
                    self.registry
                        .register_alarm(&key, fire_at, &request.output_topic);
                    respond::render(action, &parameters)
                }
                None => {
                    warn!("no resolvable alarm time in: {}", request.text);
                    respond::nothing_to_schedule()
                }
            },
            Action::List => {
                parameters.timers = self.registry.list_active();
                respond::render(action, &parameters)
            }
            Action::DeleteLast => {
                parameters.deleted = self.registry.delete_last();
                respond::render(action, &parameters)
            }
            Action::Help => respond::render(action, &parameters),
            // Only ever entered from the registry's fire path.
            Action::Triggered => return,
        };

        if let Err(e) = self
            .transport
            .publish(&answer, &request.output_topic, false)
            .await
        {
            error!("failed to publish response: {e}");
        }
    }

    /// The shared registry.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}
