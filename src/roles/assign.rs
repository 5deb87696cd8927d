//! Role assignment and the fallback NPC roster.
//!
//! Dealing is a shuffle of the config's role multiset over seats 1..=N,
//! driven by the game RNG so a seed reproduces the whole deal. The human
//! player sits at a uniformly random seat; every other seat gets an NPC
//! id and a character profile.

use tracing::debug;

use crate::core::{ConfigError, GameConfig, GameRng, NpcProfile, Player, PlayerId};

use super::kind::RoleKind;

/// Deal roles to a full table.
///
/// Validates `config`, shuffles its role multiset over seats 1..=N, and
/// seats the human player (`human_id`) at a random seat. When
/// `forced_human_role` is set, the human's card is swapped with a seat
/// holding that role; the role must exist in the config, which is the
/// caller's responsibility to arrange.
///
/// NPC ids are allocated sequentially from 0, skipping `human_id`.
/// `profiles` are attached to NPC seats in seat order; seats beyond the
/// supplied profiles fall back to a seat-number display name.
pub fn distribute_roles(
    config: &GameConfig,
    human_id: PlayerId,
    profiles: Vec<NpcProfile>,
    forced_human_role: Option<RoleKind>,
    rng: &mut GameRng,
) -> Result<Vec<Player>, ConfigError> {
    config.validate()?;

    let mut roles = config.role_multiset();
    rng.shuffle(&mut roles);

    let human_index = rng.gen_range(0..roles.len());
    if let Some(forced) = forced_human_role {
        assert!(
            config.count_of(forced) > 0,
            "forced role {forced} is not in the config"
        );
        if roles[human_index] != forced {
            // The config guarantees at least one seat holds the role.
            let swap = roles
                .iter()
                .position(|&r| r == forced)
                .unwrap_or(human_index);
            roles.swap(human_index, swap);
        }
    }

    let mut profiles = profiles.into_iter();
    let mut next_npc_id = 0u32;
    let mut players = Vec::with_capacity(roles.len());
    for (index, role) in roles.into_iter().enumerate() {
        let seat = index as u32 + 1;
        if index == human_index {
            players.push(Player::new(human_id, seat, role, true, None));
            continue;
        }
        if next_npc_id == human_id.raw() {
            next_npc_id += 1;
        }
        let id = PlayerId::new(next_npc_id);
        next_npc_id += 1;
        players.push(Player::new(id, seat, role, false, profiles.next()));
    }

    debug!(
        players = players.len(),
        human_seat = human_index + 1,
        "roles dealt"
    );
    Ok(players)
}

/// Built-in character profiles for tables without a profile generator.
///
/// Cycles through a fixed roster when `count` exceeds it.
#[must_use]
pub fn default_npc_profiles(count: usize) -> Vec<NpcProfile> {
    const ROSTER: [(&str, u32, &str, &str, &str); 8] = [
        (
            "Mara",
            34,
            "baker",
            "warm but watchful",
            "short, plain sentences",
        ),
        (
            "Tobias",
            51,
            "blacksmith",
            "blunt and impatient",
            "loud declarations",
        ),
        (
            "Iris",
            27,
            "herbalist",
            "soft-spoken and precise",
            "careful qualifiers",
        ),
        (
            "Edwin",
            43,
            "miller",
            "jovial, deflects with humor",
            "jokes and asides",
        ),
        (
            "Sable",
            30,
            "hunter's apprentice",
            "quiet and suspicious of everyone",
            "terse questions",
        ),
        (
            "Greta",
            62,
            "innkeeper",
            "motherly but shrewd",
            "proverbs and anecdotes",
        ),
        (
            "Col",
            19,
            "stablehand",
            "eager and easily swayed",
            "rushed, trailing sentences",
        ),
        (
            "Odette",
            38,
            "seamstress",
            "calm, keeps mental notes",
            "lists her observations",
        ),
    ];

    (0..count)
        .map(|i| {
            let (name, age, profession, personality, speech_style) = ROSTER[i % ROSTER.len()];
            NpcProfile {
                name: name.to_string(),
                age,
                profession: profession.to_string(),
                personality: personality.to_string(),
                speech_style: speech_style.to_string(),
                catchphrase: None,
            }
        })
        .collect()
}
