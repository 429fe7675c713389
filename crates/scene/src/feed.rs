//! Caller-side handling of a stream of scene updates.
//!
//! Whatever transport delivers the payloads, each one is either the stop
//! sentinel or a complete scene document. Documents that fail to decode are
//! skipped and the previous scene stays current.

use log::{info, warn};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{DecodeError, Scene, decode};

/// Reserved payload that ends a session.
pub const STOP_SENTINEL: &[u8] = b"STOP";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message<'a> {
    Stop,
    Data(&'a [u8]),
}

impl<'a> Message<'a> {
    pub fn classify(payload: &'a [u8]) -> Self {
        if payload == STOP_SENTINEL {
            Message::Stop
        } else {
            Message::Data(payload)
        }
    }
}

#[derive(Debug, Default)]
struct Slot {
    scene: Option<Arc<Scene>>,
    fresh: bool,
}

/// Single-slot handoff between a producer and a consumer that may run at a
/// different rate. Publishing overwrites; the consumer only ever sees the most
/// recent scene.
#[derive(Debug, Clone, Default)]
pub struct LatestScene {
    slot: Arc<Mutex<Slot>>,
}

impl LatestScene {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        // Slot is replaced wholesale, so a poisoned lock still holds a valid value.
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn publish(&self, scene: Scene) {
        let mut slot = self.lock();
        slot.scene = Some(Arc::new(scene));
        slot.fresh = true;
    }

    /// Returns the latest scene if it arrived since the previous `take`.
    pub fn take(&self) -> Option<Arc<Scene>> {
        let mut slot = self.lock();
        if !slot.fresh {
            return None;
        }
        slot.fresh = false;
        slot.scene.clone()
    }

    /// Returns the latest scene whether or not it has been taken.
    pub fn current(&self) -> Option<Arc<Scene>> {
        self.lock().scene.clone()
    }
}

#[derive(Debug)]
pub enum FeedEvent {
    Updated { shapes: usize },
    Skipped(DecodeError),
    Stopped,
    /// Input after the stop sentinel.
    Ignored,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FeedStats {
    pub accepted: u64,
    pub skipped: u64,
}

#[derive(Debug, Default)]
pub struct SceneFeed {
    latest: LatestScene,
    stopped: bool,
    stats: FeedStats,
}

impl SceneFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds into an existing slot, typically one already shared with a consumer.
    pub fn with_slot(latest: LatestScene) -> Self {
        Self {
            latest,
            ..Self::default()
        }
    }

    pub fn latest(&self) -> &LatestScene {
        &self.latest
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn stats(&self) -> FeedStats {
        self.stats
    }

    pub fn accept(&mut self, payload: &[u8]) -> FeedEvent {
        if self.stopped {
            return FeedEvent::Ignored;
        }
        match Message::classify(payload) {
            Message::Stop => {
                info!(
                    "stop received after {} updates ({} skipped)",
                    self.stats.accepted, self.stats.skipped
                );
                self.stopped = true;
                FeedEvent::Stopped
            }
            Message::Data(bytes) => match decode(bytes) {
                Ok(scene) => {
                    let shapes = scene.len();
                    self.latest.publish(scene);
                    self.stats.accepted += 1;
                    FeedEvent::Updated { shapes }
                }
                Err(err) => {
                    match &err {
                        DecodeError::UnknownShapeKind { kind, .. } => {
                            warn!("skipping update with unknown shape kind {kind:?}: {err}")
                        }
                        _ => warn!("skipping update: {err}"),
                    }
                    self.stats.skipped += 1;
                    FeedEvent::Skipped(err)
                }
            },
        }
    }
}
