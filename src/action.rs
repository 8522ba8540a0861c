//! Submitted player actions, buffered during the Action phase and consumed
//! by `ProcessRound` (spec §3.4, §4.1.1).

use crate::ids::PlayerId;

/// What an action is aimed at. Split from `catalog::TargetKind` (which
/// describes an ability's *shape*) because a concrete action always names a
/// concrete target, not a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetRef {
    Player(PlayerId),
    Monster,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Class,
    Racial,
}

/// A single submitted action (spec §3.4).
#[derive(Debug, Clone)]
pub struct Action {
    pub actor_id: PlayerId,
    pub ability_id: String,
    pub target: TargetRef,
    /// Monotonic submission order within the round; used as the final
    /// tiebreaker alongside `ability.order` (spec §4.1.1 step 3, §5).
    pub submitted_at: u64,
    pub kind: ActionKind,
}

/// Per-round action buffer: at most one class action and one racial action
/// per actor (spec §3.4 invariant).
#[derive(Debug, Default)]
pub struct ActionBuffer {
    class_actions: Vec<Action>,
    racial_actions: Vec<Action>,
}

impl ActionBuffer {
    pub fn has_class_action(&self, actor: PlayerId) -> bool {
        self.class_actions.iter().any(|a| a.actor_id == actor)
    }

    pub fn has_racial_action(&self, actor: PlayerId) -> bool {
        self.racial_actions.iter().any(|a| a.actor_id == actor)
    }

    /// Returns `false` if an action of this kind was already submitted by
    /// this actor this round (spec error `DuplicateAction`).
    pub fn submit(&mut self, action: Action) -> bool {
        let duplicate = match action.kind {
            ActionKind::Class => self.has_class_action(action.actor_id),
            ActionKind::Racial => self.has_racial_action(action.actor_id),
        };
        if duplicate {
            return false;
        }
        match action.kind {
            ActionKind::Class => self.class_actions.push(action),
            ActionKind::Racial => self.racial_actions.push(action),
        }
        true
    }

    pub fn class_actions(&self) -> &[Action] {
        &self.class_actions
    }

    pub fn racial_actions(&self) -> &[Action] {
        &self.racial_actions
    }

    pub fn clear(&mut self) {
        self.class_actions.clear();
        self.racial_actions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(actor: PlayerId, kind: ActionKind, at: u64) -> Action {
        Action {
            actor_id: actor,
            ability_id: "slash".into(),
            target: TargetRef::Monster,
            submitted_at: at,
            kind,
        }
    }

    #[test]
    fn rejects_duplicate_class_action_but_allows_racial_alongside() {
        let actor = PlayerId::new();
        let mut buf = ActionBuffer::default();
        assert!(buf.submit(action(actor, ActionKind::Class, 1)));
        assert!(!buf.submit(action(actor, ActionKind::Class, 2)));
        assert!(buf.submit(action(actor, ActionKind::Racial, 3)));
    }
}
