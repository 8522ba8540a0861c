//! Read-only, injected configuration (spec §3.6).
//!
//! Loaded once at process start and shared via `Arc<Catalog>` across every
//! room for the room's entire lifetime; nothing here is mutated afterward.

pub mod loader;
pub mod types;

pub use types::*;

#[derive(Debug, Clone)]
pub struct Catalog {
    pub races: Vec<RaceDef>,
    pub classes: Vec<ClassDef>,
    /// Pairs that are explicitly *incompatible*; everything else compatible.
    pub incompatible_pairs: Vec<(String, String)>,
    pub balance: Balance,
    pub templates: MessageTemplates,
    pub status_defaults: StatusEffectDefaults,
}

impl Catalog {
    /// Built-in catalog used when no external configuration source is wired
    /// up (spec §1 treats catalog loading as an injected collaborator; no
    /// Non-goal excludes shipping a usable default).
    pub fn default_catalog() -> Self {
        loader::build_default()
    }

    pub fn race(&self, id: &str) -> Option<&RaceDef> {
        self.races.iter().find(|r| r.id == id)
    }

    pub fn class(&self, id: &str) -> Option<&ClassDef> {
        self.classes.iter().find(|c| c.id == id)
    }

    pub fn compatible(&self, race: &str, class: &str) -> bool {
        !self
            .incompatible_pairs
            .iter()
            .any(|(r, c)| r == race && c == class)
    }

    pub fn template(&self, kind: &str) -> Option<&EventTemplate> {
        self.templates.get(kind)
    }

    pub fn status_default(&self, kind: crate::status_effect::StatusKind) -> StatusEffectDefault {
        self.status_defaults
            .get(&kind)
            .copied()
            .unwrap_or(StatusEffectDefault {
                magnitude: 0.0,
                turns: 1,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_has_races_and_classes() {
        let cat = Catalog::default_catalog();
        assert!(!cat.races.is_empty());
        assert!(!cat.classes.is_empty());
    }

    #[test]
    fn incompatible_pair_is_rejected() {
        let cat = Catalog::default_catalog();
        assert!(!cat.incompatible_pairs.is_empty());
        let (r, c) = cat.incompatible_pairs[0].clone();
        assert!(!cat.compatible(&r, &c));
    }
}
