//! The append-only event log.
//!
//! One log per game, shared by every viewer. Events are appended with a
//! monotonic sequence number and read back through per-viewer filters;
//! nothing is ever rewritten or deleted. The log is the source of truth
//! for narration: `format_event` renders any entry to an English line
//! without needing the game state.

use std::time::{SystemTime, UNIX_EPOCH};

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::Player;
use crate::engine::Phase;

use super::event::{EventKind, GameEvent, VisibilityRule};

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Append-only, visibility-filtered event log.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vector<GameEvent>,
    /// Once set, `reveal_on_game_end` rules open to every viewer.
    game_ended: bool,
    next_seq: u64,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event. Returns its sequence number.
    pub fn record(
        &mut self,
        kind: EventKind,
        phase: Phase,
        round: u32,
        visibility: VisibilityRule,
    ) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push_back(GameEvent {
            seq,
            kind,
            phase,
            round,
            timestamp_ms: now_ms(),
            visibility,
        });
        seq
    }

    pub fn set_game_ended(&mut self) {
        self.game_ended = true;
    }

    #[must_use]
    pub fn game_ended(&self) -> bool {
        self.game_ended
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Every event, unfiltered. For the engine and for post-game review.
    pub fn all_events(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    /// Events `viewer` is allowed to read, in sequence order.
    pub fn events_for_player<'a>(
        &'a self,
        viewer: &'a Player,
    ) -> impl Iterator<Item = &'a GameEvent> {
        let game_ended = self.game_ended;
        self.events
            .iter()
            .filter(move |e| e.visibility.visible_to(viewer, game_ended))
    }

    /// Every event from one round, unfiltered.
    pub fn events_by_round(&self, round: u32) -> impl Iterator<Item = &GameEvent> {
        self.events.iter().filter(move |e| e.round == round)
    }

    /// Events `viewer` may read from one round.
    pub fn events_for_player_by_round<'a>(
        &'a self,
        viewer: &'a Player,
        round: u32,
    ) -> impl Iterator<Item = &'a GameEvent> {
        self.events_for_player(viewer).filter(move |e| e.round == round)
    }

    /// The most recent `count` events visible to `viewer`, oldest first.
    #[must_use]
    pub fn last_events_for_player<'a>(
        &'a self,
        viewer: &'a Player,
        count: usize,
    ) -> Vec<&'a GameEvent> {
        let visible: Vec<&GameEvent> = self.events_for_player(viewer).collect();
        let start = visible.len().saturating_sub(count);
        visible[start..].to_vec()
    }

    /// Discussion lines visible to `viewer`, formatted "Name: content".
    ///
    /// Feeds an external dialogue generator with what this player has
    /// actually heard.
    #[must_use]
    pub fn discussion_context(&self, viewer: &Player) -> Vec<String> {
        self.events_for_player(viewer)
            .filter_map(|e| match &e.kind {
                EventKind::Speech {
                    speaker_name,
                    content,
                    ..
                } => Some(format!("{speaker_name}: {content}")),
                _ => None,
            })
            .collect()
    }

    /// The first `speaker_index` discussion lines of one round.
    ///
    /// Builds context for a participant who has not spoken yet; later
    /// speeches in the round are excluded.
    #[must_use]
    pub fn discussion_up_to(&self, round: u32, speaker_index: usize) -> Vec<String> {
        self.events
            .iter()
            .filter(|e| e.round == round)
            .filter_map(|e| match &e.kind {
                EventKind::Speech {
                    speaker_name,
                    content,
                    ..
                } => Some(format!("{speaker_name}: {content}")),
                _ => None,
            })
            .take(speaker_index)
            .collect()
    }

    /// Deaths and eliminations from one round, formatted, for dawn and
    /// dusk narration.
    #[must_use]
    pub fn round_key_events(&self, round: u32) -> Vec<String> {
        self.events
            .iter()
            .filter(|e| e.round == round)
            .filter(|e| {
                matches!(
                    e.kind,
                    EventKind::NightResult { .. }
                        | EventKind::PlayerDeath { .. }
                        | EventKind::VoteResult { .. }
                        | EventKind::DeathShot { .. }
                )
            })
            .map(format_event)
            .collect()
    }

    /// Every speech line in the game, one per row. Speech is always
    /// public, so no viewer argument is needed.
    #[must_use]
    pub fn full_discussion(&self) -> String {
        self.events
            .iter()
            .filter_map(|e| match &e.kind {
                EventKind::Speech {
                    speaker_name,
                    content,
                    ..
                } => Some(format!("{speaker_name}: {content}")),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Formatted lines for everything `viewer` saw in one round.
    #[must_use]
    pub fn round_summary(&self, viewer: &Player, round: u32) -> String {
        self.events_for_player_by_round(viewer, round)
            .map(format_event)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Formatted lines for everything `viewer` has seen.
    #[must_use]
    pub fn summary_for_player(&self, viewer: &Player) -> String {
        self.events_for_player(viewer)
            .map(format_event)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Render one event to an English line.
#[must_use]
pub fn format_event(event: &GameEvent) -> String {
    match &event.kind {
        EventKind::GameStart { player_count } => {
            format!("The game begins with {player_count} players.")
        }
        EventKind::TeamReveal { team, names, .. } => match team {
            crate::roles::Team::Werewolf => {
                format!("The werewolves are {}.", names.join(" and "))
            }
            _ => format!("Your teammates are {}.", names.join(" and ")),
        },
        EventKind::PhaseChange { message, .. } => message.clone(),
        EventKind::WerewolfKill {
            target_name,
            committed,
            ..
        } => match committed {
            Some(_) => format!("The pack settles on {target_name}."),
            None => format!("A werewolf marks {target_name} for the kill."),
        },
        EventKind::SeerCheck {
            target_name,
            is_werewolf,
            ..
        } => {
            if *is_werewolf {
                format!("The seer learns: {target_name} is a werewolf.")
            } else {
                format!("The seer learns: {target_name} is not a werewolf.")
            }
        }
        EventKind::GuardProtect { target_name, .. } => {
            format!("The guard protects {target_name} tonight.")
        }
        EventKind::WitchSave { saved_name, .. } => {
            format!("The witch spends the antidote on {saved_name}.")
        }
        EventKind::WitchPoison { target_name, .. } => {
            format!("The witch poisons {target_name}.")
        }
        EventKind::DeathShot {
            shooter_name,
            target_name,
            ..
        } => format!("{shooter_name} fires a final shot at {target_name}."),
        EventKind::Speech {
            speaker_name,
            content,
            ..
        } => format!("{speaker_name}: {content}"),
        EventKind::VoteCast {
            voter_name,
            target_name,
            ..
        } => match target_name {
            Some(target) => format!("{voter_name} votes for {target}."),
            None => format!("{voter_name} abstains."),
        },
        EventKind::VoteResult { message, .. } => message.clone(),
        EventKind::PlayerDeath {
            player_name,
            status,
            ..
        } => format!("{player_name} is dead, {status}."),
        EventKind::NightResult { message, .. } => message.clone(),
        EventKind::GameEnd {
            winner,
            total_rounds,
            summary,
        } => format!("The {winner} win after {total_rounds} rounds. {summary}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;
    use crate::roles::RoleKind;

    fn player(id: u32, role: RoleKind) -> Player {
        Player::new(PlayerId::new(id), id + 1, role, false, None)
    }

    fn speech(log: &mut EventLog, id: u32, name: &str, content: &str, round: u32) {
        log.record(
            EventKind::Speech {
                speaker: PlayerId::new(id),
                speaker_name: name.to_string(),
                content: content.to_string(),
            },
            Phase::Discussion,
            round,
            VisibilityRule::public(),
        );
    }

    #[test]
    fn test_sequence_numbers_are_monotonic() {
        let mut log = EventLog::new();
        let a = log.record(
            EventKind::GameStart { player_count: 6 },
            Phase::Init,
            0,
            VisibilityRule::public(),
        );
        let b = log.record(
            EventKind::NightResult {
                deaths: vec![],
                message: "It was a peaceful night. No one died.".to_string(),
            },
            Phase::DayStart,
            1,
            VisibilityRule::public(),
        );
        assert_eq!((a, b), (0, 1));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_private_events_filtered_per_viewer() {
        let mut log = EventLog::new();
        log.record(
            EventKind::SeerCheck {
                seer: PlayerId::new(2),
                target: PlayerId::new(0),
                target_name: "Mara".to_string(),
                is_werewolf: true,
            },
            Phase::SeerTurn,
            1,
            VisibilityRule::private_to([PlayerId::new(2)]),
        );

        let seer = player(2, RoleKind::Seer);
        let villager = player(3, RoleKind::Villager);
        assert_eq!(log.events_for_player(&seer).count(), 1);
        assert_eq!(log.events_for_player(&villager).count(), 0);

        // Revealed once the game ends.
        log.set_game_ended();
        assert_eq!(log.events_for_player(&villager).count(), 1);
    }

    #[test]
    fn test_round_filtering() {
        let mut log = EventLog::new();
        speech(&mut log, 0, "Mara", "round one talk", 1);
        speech(&mut log, 1, "Tobias", "round two talk", 2);

        let viewer = player(4, RoleKind::Villager);
        let round_two: Vec<_> = log.events_for_player_by_round(&viewer, 2).collect();
        assert_eq!(round_two.len(), 1);
        assert_eq!(round_two[0].round, 2);
    }

    #[test]
    fn test_last_events_window() {
        let mut log = EventLog::new();
        for i in 0..5 {
            speech(&mut log, 0, "Mara", &format!("line {i}"), 1);
        }
        let viewer = player(4, RoleKind::Villager);
        let last = log.last_events_for_player(&viewer, 2);
        assert_eq!(last.len(), 2);
        assert_eq!(last[0].seq, 3);
        assert_eq!(last[1].seq, 4);
    }

    #[test]
    fn test_discussion_up_to_excludes_later_speeches() {
        let mut log = EventLog::new();
        speech(&mut log, 0, "Mara", "first", 1);
        speech(&mut log, 1, "Tobias", "second", 1);
        speech(&mut log, 2, "Iris", "third", 1);

        assert_eq!(
            log.discussion_up_to(1, 2),
            vec!["Mara: first", "Tobias: second"]
        );
        assert!(log.discussion_up_to(1, 0).is_empty());
        assert!(log.discussion_up_to(2, 3).is_empty());
    }

    #[test]
    fn test_round_key_events_filters_chatter() {
        let mut log = EventLog::new();
        speech(&mut log, 0, "Mara", "noise", 1);
        log.record(
            EventKind::VoteResult {
                eliminated: Some(PlayerId::new(1)),
                message: "Tobias is eliminated with 3 votes.".to_string(),
            },
            Phase::Execution,
            1,
            VisibilityRule::public(),
        );

        let key = log.round_key_events(1);
        assert_eq!(key, vec!["Tobias is eliminated with 3 votes."]);
    }

    #[test]
    fn test_discussion_context_and_full_discussion() {
        let mut log = EventLog::new();
        speech(&mut log, 0, "Mara", "I suspect seat 4", 1);
        speech(&mut log, 1, "Tobias", "Nonsense", 1);

        let viewer = player(4, RoleKind::Villager);
        assert_eq!(
            log.discussion_context(&viewer),
            vec!["Mara: I suspect seat 4", "Tobias: Nonsense"]
        );
        assert_eq!(
            log.full_discussion(),
            "Mara: I suspect seat 4\nTobias: Nonsense"
        );
    }

    #[test]
    fn test_format_event_lines() {
        let mut log = EventLog::new();
        log.record(
            EventKind::VoteCast {
                voter: PlayerId::new(1),
                voter_name: "Tobias".to_string(),
                target: None,
                target_name: None,
            },
            Phase::Vote,
            1,
            VisibilityRule::public(),
        );
        log.record(
            EventKind::PlayerDeath {
                player: PlayerId::new(0),
                player_name: "Mara".to_string(),
                status: crate::core::PlayerStatus::KilledByWerewolf,
            },
            Phase::DayStart,
            1,
            VisibilityRule::public(),
        );

        let lines: Vec<String> = log.all_events().map(format_event).collect();
        assert_eq!(lines[0], "Tobias abstains.");
        assert_eq!(lines[1], "Mara is dead, killed by werewolves.");
    }

    #[test]
    fn test_log_serialization_round_trip() {
        let mut log = EventLog::new();
        speech(&mut log, 0, "Mara", "hello", 1);
        log.set_game_ended();

        let json = serde_json::to_string(&log).unwrap();
        let back: EventLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 1);
        assert!(back.game_ended());
    }
}
