//! Player actions and action outcomes.
//!
//! Actions are a tagged enum: the discriminant names the capability being
//! used, the fields carry the actor, the round it was issued in, and the
//! type-specific payload (a target id or free text).
//!
//! Outcomes distinguish rule violations (`success: false` plus a message
//! suitable for direct display) from accepted actions. Rule violations
//! are expected and leave state untouched; they are never `Err`.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// A single player action submitted to the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// One werewolf-aligned player's kill vote for tonight.
    WerewolfKill {
        actor: PlayerId,
        round: u32,
        target: PlayerId,
    },
    /// The seer inspects one player's alignment.
    SeerCheck {
        actor: PlayerId,
        round: u32,
        target: PlayerId,
    },
    /// The guard protects one player for tonight.
    GuardProtect {
        actor: PlayerId,
        round: u32,
        target: PlayerId,
    },
    /// The witch spends the antidote on tonight's werewolf victim.
    WitchSave { actor: PlayerId, round: u32 },
    /// The witch spends the poison on a living player.
    WitchPoison {
        actor: PlayerId,
        round: u32,
        target: PlayerId,
    },
    /// A dead Hunter or Wolf King fires the death-triggered shot.
    DeathShot {
        actor: PlayerId,
        round: u32,
        target: PlayerId,
    },
    /// A day-phase vote. `None` is an abstention.
    Vote {
        actor: PlayerId,
        round: u32,
        target: Option<PlayerId>,
    },
    /// A line of discussion dialogue, opaque to the engine.
    Speech {
        actor: PlayerId,
        round: u32,
        content: String,
    },
}

impl Action {
    /// The acting player.
    #[must_use]
    pub fn actor(&self) -> PlayerId {
        match self {
            Action::WerewolfKill { actor, .. }
            | Action::SeerCheck { actor, .. }
            | Action::GuardProtect { actor, .. }
            | Action::WitchSave { actor, .. }
            | Action::WitchPoison { actor, .. }
            | Action::DeathShot { actor, .. }
            | Action::Vote { actor, .. }
            | Action::Speech { actor, .. } => *actor,
        }
    }

    /// The round the action was issued in.
    #[must_use]
    pub fn round(&self) -> u32 {
        match self {
            Action::WerewolfKill { round, .. }
            | Action::SeerCheck { round, .. }
            | Action::GuardProtect { round, .. }
            | Action::WitchSave { round, .. }
            | Action::WitchPoison { round, .. }
            | Action::DeathShot { round, .. }
            | Action::Vote { round, .. }
            | Action::Speech { round, .. } => *round,
        }
    }

    /// The targeted player, when the action has one.
    #[must_use]
    pub fn target(&self) -> Option<PlayerId> {
        match self {
            Action::WerewolfKill { target, .. }
            | Action::SeerCheck { target, .. }
            | Action::GuardProtect { target, .. }
            | Action::WitchPoison { target, .. }
            | Action::DeathShot { target, .. } => Some(*target),
            Action::Vote { target, .. } => *target,
            Action::WitchSave { .. } | Action::Speech { .. } => None,
        }
    }
}

/// Structured payload attached to a successful outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionData {
    /// A night target was recorded. `committed` carries the finalized
    /// pack target once every living werewolf-aligned actor has voted.
    TargetChosen {
        target: PlayerId,
        committed: Option<PlayerId>,
    },
    /// A seer investigation result.
    Investigation {
        target: PlayerId,
        is_werewolf: bool,
    },
}

/// Result of submitting an action.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub success: bool,
    /// Suitable for direct display to the acting player.
    pub message: String,
    pub data: Option<ActionData>,
}

impl ActionOutcome {
    /// A successful outcome with no payload.
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    /// A successful outcome carrying data.
    #[must_use]
    pub fn ok_with(message: impl Into<String>, data: ActionData) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    /// A rule violation. State is unchanged.
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_and_round() {
        let action = Action::SeerCheck {
            actor: PlayerId::new(2),
            round: 3,
            target: PlayerId::new(5),
        };
        assert_eq!(action.actor(), PlayerId::new(2));
        assert_eq!(action.round(), 3);
        assert_eq!(action.target(), Some(PlayerId::new(5)));
    }

    #[test]
    fn test_abstention_has_no_target() {
        let action = Action::Vote {
            actor: PlayerId::new(1),
            round: 1,
            target: None,
        };
        assert_eq!(action.target(), None);
    }

    #[test]
    fn test_speech_has_no_target() {
        let action = Action::Speech {
            actor: PlayerId::new(4),
            round: 2,
            content: "I trust seat 3".to_string(),
        };
        assert_eq!(action.target(), None);
    }

    #[test]
    fn test_outcome_constructors() {
        let ok = ActionOutcome::ok("done");
        assert!(ok.success);
        assert!(ok.data.is_none());

        let fail = ActionOutcome::fail("target is dead");
        assert!(!fail.success);
        assert_eq!(fail.message, "target is dead");
    }

    #[test]
    fn test_action_serialization() {
        let action = Action::WerewolfKill {
            actor: PlayerId::new(0),
            round: 1,
            target: PlayerId::new(3),
        };
        let json = serde_json::to_string(&action).unwrap();
        let back: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(action, back);
    }
}
