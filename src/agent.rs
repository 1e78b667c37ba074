//! Host integration – GiftHuntAgent serializes host callbacks onto one task.
//!
//! Game engines deliver level-load, hotkey and collision callbacks from
//! wherever they like. The core is not safe under interleaving (a decode
//! racing the cooldown check, a pickup racing a respawn), so a
//! multi-threaded host sends [`HostEvent`]s to this agent instead of
//! calling the service directly.
//!
//! ## Event contract
//!
//! | Event                  | Reply                               |
//! |------------------------|-------------------------------------|
//! | `initialized`          | `Ack`                               |
//! | `seed_entry_changed`   | `Ack` / `Failed`                    |
//! | `load_from_clipboard`  | `Ack` / `Failed`                    |
//! | `capture_seed`         | `SeedCaptured` / `Failed`           |
//! | `update_last_seed_aux` | `SeedCaptured` / `Failed`           |
//! | `clear_gift`           | `Ack`                               |
//! | `set_enabled`          | `Ack`                               |
//! | `level_load_complete`  | `Spawned`                           |
//! | `pickup_attempt`       | `Pickup { ours }`                   |
//!
//! Captured seeds are also forwarded to the clipboard channel, if one was
//! configured.

use crate::host::{LevelLoader, Notifier, WorldActuator};
use crate::protocol::HostEvent;
use crate::service::GiftHuntService;
use crate::settings::GiftHuntSettings;
use crate::types::{GiftStats, MarkerHandle};
use anyhow::{Context, Result};
use log::{info, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, oneshot};

// ---------------------------------------------------------------------------
// Replies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventReply {
    Ack,
    Failed(String),
    SeedCaptured(String),
    Spawned(Option<MarkerHandle>),
    Pickup { ours: bool },
}

struct Envelope {
    event: HostEvent,
    reply: Option<oneshot::Sender<EventReply>>,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Enabled flag applied on `initialized`.
    pub enabled: bool,
    /// Seed entry armed on `initialized`.
    pub stored_seed: String,
    /// Inbox capacity.
    pub queue_depth: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            stored_seed: String::new(),
            queue_depth: 64,
        }
    }
}

impl From<&GiftHuntSettings> for AgentConfig {
    fn from(settings: &GiftHuntSettings) -> Self {
        Self {
            enabled: settings.enabled,
            stored_seed: settings.gift_seed.clone(),
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Handle
// ---------------------------------------------------------------------------

/// Cloneable sender side, handed to whatever threads the host runs.
#[derive(Clone)]
pub struct AgentHandle {
    tx: mpsc::Sender<Envelope>,
}

impl AgentHandle {
    /// Fire-and-forget.
    pub async fn send(&self, event: HostEvent) -> Result<()> {
        self.tx
            .send(Envelope { event, reply: None })
            .await
            .map_err(|_| anyhow::anyhow!("gift hunt agent has stopped"))
    }

    /// Send and wait for the agent's reply.
    pub async fn request(&self, event: HostEvent) -> Result<EventReply> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Envelope {
                event,
                reply: Some(reply_tx),
            })
            .await
            .map_err(|_| anyhow::anyhow!("gift hunt agent has stopped"))?;
        reply_rx.await.context("gift hunt agent dropped the reply")
    }
}

// ---------------------------------------------------------------------------
// GiftHuntAgent
// ---------------------------------------------------------------------------

/// Wraps a [`GiftHuntService`] and drives it from host events.
pub struct GiftHuntAgent<H, N> {
    config: AgentConfig,
    service: Arc<Mutex<GiftHuntService<H, N>>>,
    inbox: mpsc::Receiver<Envelope>,
    clipboard: Option<mpsc::UnboundedSender<String>>,
}

impl<H, N> GiftHuntAgent<H, N>
where
    H: WorldActuator + LevelLoader,
    N: Notifier,
{
    pub fn new(
        config: AgentConfig,
        service: Arc<Mutex<GiftHuntService<H, N>>>,
    ) -> (Self, AgentHandle) {
        let (tx, inbox) = mpsc::channel(config.queue_depth.max(1));
        let agent = Self {
            config,
            service,
            inbox,
            clipboard: None,
        };
        (agent, AgentHandle { tx })
    }

    /// Forward every captured seed to `clipboard`.
    pub fn with_clipboard(mut self, clipboard: mpsc::UnboundedSender<String>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    pub fn stats(&self) -> GiftStats {
        self.service.lock().stats()
    }

    /// Process events until every handle is dropped or SIGINT arrives.
    pub async fn run(self) -> Result<()> {
        info!("GiftHuntAgent running");
        tokio::select! {
            _ = self.serve() => {
                info!("GiftHuntAgent inbox closed");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("GiftHuntAgent shutting down (SIGINT)");
            }
        }
        Ok(())
    }

    /// Process events until every handle is dropped.
    pub async fn serve(mut self) {
        while let Some(envelope) = self.inbox.recv().await {
            let reply = self.handle(envelope.event, Instant::now());
            if let Some(tx) = envelope.reply {
                // The requester may have given up; nothing to do then.
                let _ = tx.send(reply);
            }
        }
    }

    /// Apply one event to the service.
    pub fn handle(&self, event: HostEvent, now: Instant) -> EventReply {
        let span = tracing::debug_span!("host_event", kind = event.kind());
        let _enter = span.enter();

        // Hold the lock only for the service call, then release before
        // forwarding anything.
        let reply = {
            let mut svc = self.service.lock();
            match event {
                HostEvent::Initialized => {
                    svc.initialize(self.config.enabled, &self.config.stored_seed, now);
                    EventReply::Ack
                }
                HostEvent::SeedEntryChanged { seed } | HostEvent::LoadFromClipboard { seed } => {
                    match svc.apply_seed(&seed, now) {
                        Ok(_) => EventReply::Ack,
                        Err(e) => EventReply::Failed(e.to_string()),
                    }
                }
                HostEvent::CaptureSeed => match svc.capture_seed() {
                    Ok(captured) => EventReply::SeedCaptured(captured.seed),
                    Err(e) => EventReply::Failed(e.to_string()),
                },
                HostEvent::UpdateLastSeedAux { aux_ms } => match svc.update_last_seed_aux(aux_ms) {
                    Ok(seed) => EventReply::SeedCaptured(seed),
                    Err(e) => EventReply::Failed(e.to_string()),
                },
                HostEvent::ClearGift => {
                    svc.clear_gift();
                    EventReply::Ack
                }
                HostEvent::SetEnabled { enabled } => {
                    svc.set_enabled(enabled);
                    EventReply::Ack
                }
                HostEvent::LevelLoadComplete => EventReply::Spawned(svc.on_level_load_complete()),
                HostEvent::PickupAttempt { marker } => EventReply::Pickup {
                    ours: svc.on_pickup_attempt(marker),
                },
            }
        };

        if let (EventReply::SeedCaptured(seed), Some(clipboard)) = (&reply, &self.clipboard) {
            if clipboard.send(seed.clone()).is_err() {
                warn!("Clipboard receiver dropped; seed not forwarded");
            }
        }
        reply
    }
}
