//! Role assignment verification tests.
//!
//! The deal must reproduce the configured role multiset exactly, seat
//! players 1..=N with exactly one human, and stay reproducible per seed.

use proptest::prelude::*;
use werewolf_engine::{
    default_npc_profiles, distribute_roles, GameConfig, GameRng, PlayerId, RoleKind,
};

fn nine_player_config() -> GameConfig {
    GameConfig {
        player_count: 9,
        werewolves: 2,
        wolf_kings: 1,
        villagers: 2,
        seers: 1,
        witches: 1,
        hunters: 1,
        guards: 1,
    }
}

#[test]
fn test_deal_covers_every_configured_role() {
    let config = nine_player_config();
    let mut rng = GameRng::new(7);
    let players = distribute_roles(
        &config,
        PlayerId::new(3),
        default_npc_profiles(8),
        None,
        &mut rng,
    )
    .unwrap();

    assert_eq!(players.len(), 9);
    for kind in RoleKind::ALL {
        let dealt = players.iter().filter(|p| p.role == kind).count();
        assert_eq!(dealt, config.count_of(kind), "{kind}");
    }
}

#[test]
fn test_human_id_is_preserved_and_npc_ids_avoid_it() {
    let config = GameConfig::classic_six();
    let mut rng = GameRng::new(19);
    let players = distribute_roles(
        &config,
        PlayerId::new(2),
        default_npc_profiles(5),
        None,
        &mut rng,
    )
    .unwrap();

    let humans: Vec<_> = players.iter().filter(|p| p.is_human).collect();
    assert_eq!(humans.len(), 1);
    assert_eq!(humans[0].id, PlayerId::new(2));

    let mut ids: Vec<u32> = players.iter().map(|p| p.id.raw()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), players.len());
}

#[test]
fn test_forced_role_lands_on_the_human() {
    let config = nine_player_config();
    for seed in 0..30 {
        let mut rng = GameRng::new(seed);
        let players = distribute_roles(
            &config,
            PlayerId::new(0),
            default_npc_profiles(8),
            Some(RoleKind::Witch),
            &mut rng,
        )
        .unwrap();

        let human = players.iter().find(|p| p.is_human).unwrap();
        assert_eq!(human.role, RoleKind::Witch);
        assert_eq!(
            players.iter().filter(|p| p.role == RoleKind::Witch).count(),
            1
        );
    }
}

#[test]
fn test_human_seat_varies_across_seeds() {
    let config = GameConfig::classic_six();
    let mut seats = std::collections::HashSet::new();
    for seed in 0..50 {
        let mut rng = GameRng::new(seed);
        let players =
            distribute_roles(&config, PlayerId::new(0), Vec::new(), None, &mut rng).unwrap();
        let human = players.iter().find(|p| p.is_human).unwrap();
        seats.insert(human.seat);
    }
    assert!(seats.len() > 1, "human seat never moved across 50 seeds");
}

proptest! {
    #[test]
    fn prop_deal_is_a_valid_permutation(seed in any::<u64>(), human_id in 0u32..20) {
        let config = nine_player_config();
        let mut rng = GameRng::new(seed);
        let players = distribute_roles(
            &config,
            PlayerId::new(human_id),
            default_npc_profiles(8),
            None,
            &mut rng,
        )
        .unwrap();

        let seats: Vec<u32> = players.iter().map(|p| p.seat).collect();
        prop_assert_eq!(seats, (1..=9).collect::<Vec<u32>>());
        prop_assert_eq!(players.iter().filter(|p| p.is_human).count(), 1);
        prop_assert!(players.iter().all(|p| p.is_alive()));

        let mut roles: Vec<RoleKind> = players.iter().map(|p| p.role).collect();
        let mut expected = config.role_multiset();
        roles.sort_unstable_by_key(|r| format!("{r:?}"));
        expected.sort_unstable_by_key(|r| format!("{r:?}"));
        prop_assert_eq!(roles, expected);
    }

    #[test]
    fn prop_same_seed_same_deal(seed in any::<u64>()) {
        let config = GameConfig::classic_six();
        let deal = |s| {
            let mut rng = GameRng::new(s);
            distribute_roles(&config, PlayerId::new(0), Vec::new(), None, &mut rng).unwrap()
        };
        prop_assert_eq!(deal(seed), deal(seed));
    }
}
