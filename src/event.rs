//! Per-viewer personalized events (spec §3.5, §9 "Visibility").
//!
//! The server is the only source of truth for who sees what: every event
//! carries its own `public` flag and `visible_to` list at emission time,
//! rather than clients filtering by substring matching.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::PlayerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Damage,
    Heal,
    Death,
    Resurrection,
    Corruption,
    LevelUp,
    StatusApplied,
    StatusExpired,
    Cooldown,
    MonsterAttack,
    MonsterDefeated,
    Immunity,
    Armor,
    GameEnded,
    Info,
    Error,
}

/// A single round/lifecycle event, rendered differently per viewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    pub public: bool,
    #[serde(default)]
    pub visible_to: Vec<PlayerId>,
    pub attacker_id: Option<PlayerId>,
    pub target_id: Option<PlayerId>,
    pub public_text: String,
    pub attacker_text: Option<String>,
    pub target_text: Option<String>,
    #[serde(default)]
    pub payload: Value,
}

impl Event {
    pub fn public(text: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Info,
            public: true,
            visible_to: Vec::new(),
            attacker_id: None,
            target_id: None,
            public_text: text.into(),
            attacker_text: None,
            target_text: None,
            payload: Value::Null,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Error,
            ..Event::public(text)
        }
    }

    /// Builds an event personalized for attacker/target but otherwise public.
    pub fn public_pair(
        attacker: PlayerId,
        target: PlayerId,
        public_text: impl Into<String>,
        attacker_text: impl Into<String>,
        target_text: impl Into<String>,
    ) -> Self {
        Self {
            kind: EventKind::Damage,
            public: true,
            visible_to: Vec::new(),
            attacker_id: Some(attacker),
            target_id: Some(target),
            public_text: public_text.into(),
            attacker_text: Some(attacker_text.into()),
            target_text: Some(target_text.into()),
            payload: Value::Null,
        }
    }

    /// Builds a non-public event visible only to attacker/target.
    pub fn private_pair(
        attacker: PlayerId,
        target: PlayerId,
        public_text: impl Into<String>,
        attacker_text: impl Into<String>,
        target_text: impl Into<String>,
    ) -> Self {
        Self {
            public: false,
            ..Event::public_pair(attacker, target, public_text, attacker_text, target_text)
        }
    }

    pub fn with_kind(mut self, kind: EventKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    pub fn visible_to(mut self, players: Vec<PlayerId>) -> Self {
        self.visible_to = players;
        self
    }

    /// Visibility rule (spec §3.5 / testable property 6).
    pub fn should_show(&self, viewer: PlayerId) -> bool {
        self.public
            || self.visible_to.contains(&viewer)
            || self.attacker_id == Some(viewer)
            || self.target_id == Some(viewer)
    }

    /// Text selection rule (spec §3.5).
    pub fn text_for(&self, viewer: PlayerId) -> &str {
        if self.attacker_id == Some(viewer) {
            if let Some(t) = &self.attacker_text {
                return t;
            }
        }
        if self.target_id == Some(viewer) {
            if let Some(t) = &self.target_text {
                return t;
            }
        }
        &self.public_text
    }
}

/// Ordered log of events emitted during a single round pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    pub events: Vec<Event>,
}

impl EventLog {
    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Personalizes the full log for a single viewer, preserving emit order
    /// (spec §5 ordering guarantee: "event fan-out to a single subscriber
    /// preserves emit order").
    pub fn render_for(&self, viewer: PlayerId) -> Vec<String> {
        self.events
            .iter()
            .filter(|e| e.should_show(viewer))
            .map(|e| e.text_for(viewer).to_string())
            .collect()
    }
}
