use std::sync::Arc;

use crate::battle::rng::ScriptedRng;
use crate::battle::session::{Battle, TurnAction};
use crate::dex::Dex;
use crate::errors::{ActionError, BattleError};
use crate::pokemon::{Pokemon, StatSpec};
use crate::trainer::Trainer;
use schema::{BindingKind, NvStatusKind, Stat};

fn dex() -> Arc<Dex> {
    Arc::new(Dex::bundled().unwrap())
}

fn mon(dex: &Dex, species: &str, moves: &[&str], stats: [u16; 6]) -> Pokemon {
    Pokemon::new(dex, species, 22, moves, "male", StatSpec::Actual(stats)).unwrap()
}

fn duel(dex: &Arc<Dex>, p1: Pokemon, p2: Pokemon) -> Battle {
    let t1 = Trainer::new("Ash", vec![p1]).unwrap();
    let t2 = Trainer::new("Misty", vec![p2]).unwrap();
    Battle::new(dex.clone(), t1, t2).unwrap()
}

fn exact() -> ScriptedRng {
    ScriptedRng::new(1).force_hit(true).crit(false).variance(1.0)
}

#[test]
fn streak_move_doubles_per_use_then_resets() {
    let dex = dex();
    let p1 = mon(&dex, "bulbasaur", &["rollout"], [500, 100, 100, 100, 100, 100]);
    let p2 = mon(&dex, "charmander", &["tackle"], [500, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();

    // 30 power, 2x effectiveness, level 22: the streak cycles
    // 1 -> 2 -> 3 -> 4 -> 5 and resets on the sixth use.
    let expected = [16u16, 29, 55, 107, 211, 16];
    let mut hp = 500u16;
    for damage in expected {
        battle
            .turn(
                TurnAction::use_move("rollout"),
                TurnAction::use_move("tackle"),
            )
            .unwrap();
        hp -= damage;
        assert_eq!(battle.trainer(1).roster[0].cur_hp, hp);
    }
}

#[test]
fn streak_resets_on_a_miss() {
    let dex = dex();
    let p1 = mon(&dex, "bulbasaur", &["rollout"], [500, 100, 100, 100, 100, 100]);
    let p2 = mon(&dex, "charmander", &["tackle"], [500, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle
        .turn(
            TurnAction::use_move("rollout"),
            TurnAction::use_move("tackle"),
        )
        .unwrap();
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 500 - 16);

    battle.set_rng(ScriptedRng::new(2).force_hit(false).crit(false).variance(1.0));
    battle
        .turn(
            TurnAction::use_move("rollout"),
            TurnAction::use_move("tackle"),
        )
        .unwrap();

    battle.set_rng(exact());
    battle
        .turn(
            TurnAction::use_move("rollout"),
            TurnAction::use_move("tackle"),
        )
        .unwrap();
    // Back to the base 30 power after the miss.
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 500 - 16 - 16);
}

#[test]
fn defense_curl_primes_the_streak() {
    let dex = dex();
    let p1 = mon(
        &dex,
        "bulbasaur",
        &["rollout", "defense-curl"],
        [500, 100, 100, 100, 100, 100],
    );
    let p2 = mon(&dex, "charmander", &["tackle"], [500, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle
        .turn(
            TurnAction::use_move("defense-curl"),
            TurnAction::use_move("tackle"),
        )
        .unwrap();
    assert!(battle.sides[0].roster[0].v.curled);
    battle
        .turn(
            TurnAction::use_move("rollout"),
            TurnAction::use_move("tackle"),
        )
        .unwrap();
    // Primed rollout opens at 60 power: the second step of the series.
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 500 - 29);
}

#[test]
fn seeding_drains_into_the_attacker_each_tick() {
    let dex = dex();
    let p1 = mon(&dex, "bulbasaur", &["leech-seed"], [100; 6])
        .with_cur_hp(50)
        .unwrap();
    let p2 = mon(&dex, "squirtle", &["growl"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle
        .turn(
            TurnAction::use_move("leech-seed"),
            TurnAction::use_move("growl"),
        )
        .unwrap();

    assert!(battle.get_all_text().iter().any(|l| l == "SQUIRTLE was seeded!"));
    assert!(battle.trainer(1).roster[0].v.leech_seed);
    // 1/8 of 100 flows from the seeded target to the seeder.
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 100 - 12);
    assert_eq!(battle.trainer(0).roster[0].cur_hp, 50 + 12);
}

#[test]
fn heal_blocked_seeder_gains_nothing_while_the_target_still_bleeds() {
    let dex = dex();
    let p1 = mon(&dex, "bulbasaur", &["leech-seed"], [100; 6])
        .with_cur_hp(50)
        .unwrap();
    let p2 = mon(&dex, "squirtle", &["growl"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle.sides[0].roster[0].v.heal_block = 3;
    battle
        .turn(
            TurnAction::use_move("leech-seed"),
            TurnAction::use_move("growl"),
        )
        .unwrap();
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 100 - 12);
    assert_eq!(battle.trainer(0).roster[0].cur_hp, 50);
}

#[test]
fn binding_traps_ticks_and_releases() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["wrap", "growl"], [100; 6]);
    let roster = vec![
        mon(&dex, "meowth", &["growl"], [100, 100, 100, 100, 100, 1]),
        mon(&dex, "abra", &["growl"], [100; 6]),
    ];
    let t1 = Trainer::new("Ash", vec![p1]).unwrap();
    let t2 = Trainer::new("Misty", roster).unwrap();
    let mut battle = Battle::new(dex.clone(), t1, t2)
        .unwrap()
        .with_rng(exact().trap_turns_fixed(2));
    battle.start().unwrap();

    battle
        .turn(TurnAction::use_move("wrap"), TurnAction::use_move("growl"))
        .unwrap();
    // Wrap's 5 on contact plus the 1/16 residual; the counter set to 2
    // has already ticked down once.
    let bound = battle.trainer(1).roster[0].v.binding.unwrap();
    assert_eq!(bound.turns, 1);
    assert_eq!(bound.source, 0);
    assert_eq!(bound.kind, BindingKind::Wrap);
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 100 - 5 - 6);
    assert!(battle
        .get_all_text()
        .iter()
        .any(|l| l == "MEOWTH was wrapped by PIKACHU!"));

    // Switching out is barred while bound.
    let err = battle
        .turn(TurnAction::use_move("growl"), TurnAction::switch())
        .unwrap_err();
    assert!(matches!(err, BattleError::Action(ActionError::CannotSwitch(_))));

    battle
        .turn(TurnAction::use_move("growl"), TurnAction::use_move("growl"))
        .unwrap();
    assert_eq!(battle.trainer(1).roster[0].v.binding, None);
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 100 - 5 - 6 - 6);
    assert!(battle
        .get_all_text()
        .iter()
        .any(|l| l == "MEOWTH was freed from Wrap!"));
}

#[test]
fn two_turn_flight_charges_then_strikes() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["fly"], [100; 6]);
    let p2 = mon(&dex, "meowth", &["tackle"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();

    battle
        .turn(TurnAction::use_move("fly"), TurnAction::use_move("tackle"))
        .unwrap();
    let text = battle.get_all_text();
    assert!(text.iter().any(|l| l == "PIKACHU flew up high!"));
    assert!(!text.iter().any(|l| l == "PIKACHU used Fly!"));
    assert!(text.iter().any(|l| l == "PIKACHU avoided the attack!"));
    {
        let flier = &battle.trainer(0).roster[0];
        assert!(flier.v.in_air && flier.v.invulnerable);
        assert_eq!(flier.moves[0].cur_pp, flier.moves[0].data.max_pp - 1);
        assert_eq!(flier.cur_hp, 100);
        assert_eq!(flier.next_actions.len(), 1);
    }

    let mark = battle.get_all_text().len();
    battle
        .turn(TurnAction::use_move("fly"), TurnAction::use_move("tackle"))
        .unwrap();
    let text = battle.text_since(mark);
    assert!(text.iter().any(|l| l == "PIKACHU used Fly!"));
    // 90 power neutral: floor(10.8 * 90 / 50 + 2) = 21.
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 100 - 21);
    let flier = &battle.trainer(0).roster[0];
    assert!(!flier.v.in_air && !flier.v.invulnerable);
    assert_eq!(flier.moves[0].cur_pp, flier.moves[0].data.max_pp - 1);
    assert!(flier.next_actions.is_empty());
}

#[test]
fn charge_herb_collapses_both_phases_into_one_turn() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["fly"], [100; 6])
        .with_item(&dex, "power-herb")
        .unwrap();
    let p2 = mon(&dex, "meowth", &["growl"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle
        .turn(TurnAction::use_move("fly"), TurnAction::use_move("growl"))
        .unwrap();

    let text = battle.get_all_text();
    assert!(text.iter().any(|l| l == "PIKACHU used Fly!"));
    assert!(text
        .iter()
        .any(|l| l == "PIKACHU became fully charged due to its Power Herb!"));
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 100 - 21);
    let flier = &battle.trainer(0).roster[0];
    assert!(flier.next_actions.is_empty());
    assert!(!flier.v.in_air);
    // Reported consumed, never removed.
    assert_eq!(flier.item.as_deref(), Some("power-herb"));
}

#[test]
fn multi_hit_lands_the_rolled_count() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["fury-attack"], [100; 6]);
    let p2 = mon(&dex, "meowth", &["growl"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact().multi_hits(4));
    battle.start().unwrap();
    battle
        .turn(
            TurnAction::use_move("fury-attack"),
            TurnAction::use_move("growl"),
        )
        .unwrap();
    // 15 power: 5 a hit, four hits.
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 100 - 20);
    assert!(battle.get_all_text().iter().any(|l| l == "Hit 4 time(s)!"));
}

#[test]
fn double_hit_strikes_twice() {
    let dex = dex();
    let p1 = mon(&dex, "cubone", &["double-kick"], [100; 6]);
    let p2 = mon(&dex, "pikachu", &["growl"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle
        .turn(
            TurnAction::use_move("double-kick"),
            TurnAction::use_move("growl"),
        )
        .unwrap();
    // 30 power neutral: 8 a hit.
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 100 - 16);
    assert!(battle.get_all_text().iter().any(|l| l == "Hit 2 time(s)!"));
}

#[test]
fn drain_heals_half_unless_blocked() {
    let dex = dex();
    let p1 = mon(&dex, "bulbasaur", &["giga-drain"], [100; 6])
        .with_cur_hp(50)
        .unwrap();
    let p2 = mon(&dex, "squirtle", &["growl"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle
        .turn(
            TurnAction::use_move("giga-drain"),
            TurnAction::use_move("growl"),
        )
        .unwrap();
    // (10.8 * 60 / 50 + 2) * 1.5 * 2 = 44.88 -> 44 dealt, 22 drained.
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 100 - 44);
    assert_eq!(battle.trainer(0).roster[0].cur_hp, 50 + 22);
    assert!(battle
        .get_all_text()
        .iter()
        .any(|l| l == "SQUIRTLE had it's energy drained!"));

    let dex2 = dex.clone();
    let p1 = mon(&dex2, "bulbasaur", &["giga-drain"], [100; 6])
        .with_cur_hp(50)
        .unwrap();
    let p2 = mon(&dex2, "squirtle", &["growl"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex2, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle.sides[0].roster[0].v.heal_block = 3;
    battle
        .turn(
            TurnAction::use_move("giga-drain"),
            TurnAction::use_move("growl"),
        )
        .unwrap();
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 100 - 44);
    assert_eq!(battle.trainer(0).roster[0].cur_hp, 50);
}

#[test]
fn recoil_returns_a_fraction_to_the_attacker() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["take-down"], [100; 6]);
    let p2 = mon(&dex, "meowth", &["growl"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle
        .turn(
            TurnAction::use_move("take-down"),
            TurnAction::use_move("growl"),
        )
        .unwrap();
    // 90 power: 21 dealt, a quarter back.
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 100 - 21);
    assert_eq!(battle.trainer(0).roster[0].cur_hp, 100 - 5);
    assert!(battle
        .get_all_text()
        .iter()
        .any(|l| l == "PIKACHU is hit with recoil!"));
}

#[test]
fn stat_stage_moves_narrate_and_respect_mist() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["growl", "swords-dance"], [100; 6]);
    let p2 = mon(&dex, "meowth", &["growl"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle
        .turn(
            TurnAction::use_move("swords-dance"),
            TurnAction::use_move("growl"),
        )
        .unwrap();
    let text = battle.get_all_text();
    assert!(text.iter().any(|l| l == "PIKACHU's Attack rose sharply!"));
    assert!(text.iter().any(|l| l == "PIKACHU's Attack fell!"));
    assert_eq!(battle.trainer(0).roster[0].stage(Stat::Attack), 1);

    battle.sides[1].roster[0].v.mist = 3;
    let mark = battle.get_all_text().len();
    battle
        .turn(TurnAction::use_move("growl"), TurnAction::use_move("growl"))
        .unwrap();
    assert!(battle
        .text_since(mark)
        .iter()
        .any(|l| l == "MEOWTH's protected by mist."));
    assert_eq!(battle.trainer(1).roster[0].stage(Stat::Attack), 0);
}

#[test]
fn maxed_stages_narrate_the_ceiling() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["swords-dance"], [100; 6]);
    let p2 = mon(&dex, "meowth", &["splash"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle.sides[0].roster[0].apply_stage(Stat::Attack, 6);
    battle
        .turn(
            TurnAction::use_move("swords-dance"),
            TurnAction::use_move("splash"),
        )
        .unwrap();
    assert!(battle
        .get_all_text()
        .iter()
        .any(|l| l == "PIKACHU's Attack won't go any higher!"));
    assert_eq!(battle.trainer(0).roster[0].stage(Stat::Attack), 6);
}

#[test]
fn protection_blocks_single_target_moves() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["tackle"], [100, 100, 100, 100, 100, 1]);
    let p2 = mon(&dex, "meowth", &["protect"], [100; 6]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact().protect_success(true));
    battle.start().unwrap();
    battle
        .turn(
            TurnAction::use_move("tackle"),
            TurnAction::use_move("protect"),
        )
        .unwrap();
    let text = battle.get_all_text();
    assert!(text.iter().any(|l| l == "MEOWTH protected itself!"));
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 100);
    // The flag is gone after the end-of-turn tick; the streak persists.
    assert!(!battle.trainer(1).roster[0].v.protect);
    assert_eq!(battle.trainer(1).roster[0].v.protect_streak, 1);
}

#[test]
fn substitute_soaks_hits_and_blocks_status() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["substitute"], [100; 6]);
    let p2 = mon(
        &dex,
        "meowth",
        &["tackle", "thunder-wave"],
        [100, 100, 100, 100, 100, 1],
    );
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle
        .turn(
            TurnAction::use_move("substitute"),
            TurnAction::use_move("tackle"),
        )
        .unwrap();
    let text = battle.get_all_text();
    assert!(text.iter().any(|l| l == "PIKACHU made a substitute!"));
    assert!(text
        .iter()
        .any(|l| l == "The substitute took damage for PIKACHU!"));
    // A quarter of max HP went into the substitute; the hit drained the
    // substitute, not the combatant.
    assert_eq!(battle.trainer(0).roster[0].cur_hp, 75);
    assert_eq!(battle.trainer(0).roster[0].v.substitute, 26 - 10);

    let mark = battle.get_all_text().len();
    battle
        .turn(
            TurnAction::use_move("substitute"),
            TurnAction::use_move("thunder-wave"),
        )
        .unwrap();
    // A second substitute fails, and status cannot cross the first.
    assert!(battle
        .text_since(mark)
        .iter()
        .filter(|l| *l == "But, it failed!")
        .count()
        >= 2);
    assert_eq!(battle.trainer(0).roster[0].nv_status, None);
}

#[test]
fn disable_locks_the_last_move() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["disable", "growl"], [100; 6]);
    let p2 = mon(&dex, "meowth", &["tackle"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact().disable_turns_fixed(3));
    battle.start().unwrap();
    battle
        .turn(TurnAction::use_move("growl"), TurnAction::use_move("tackle"))
        .unwrap();
    battle
        .turn(
            TurnAction::use_move("disable"),
            TurnAction::use_move("tackle"),
        )
        .unwrap();
    assert!(battle
        .get_all_text()
        .iter()
        .any(|l| l == "Misty's MEOWTH's Tackle was disabled!"));
    // Set to 3 when disabled, one end-of-turn tick already consumed.
    assert_eq!(battle.trainer(1).roster[0].moves[0].disabled, 2);

    let pp_before = battle.trainer(1).roster[0].moves[0].cur_pp;
    let mark = battle.get_all_text().len();
    battle
        .turn(TurnAction::use_move("growl"), TurnAction::use_move("tackle"))
        .unwrap();
    assert!(battle
        .text_since(mark)
        .iter()
        .any(|l| l == "Tackle is disabled!"));
    assert_eq!(battle.trainer(1).roster[0].moves[0].cur_pp, pp_before);
}

#[test]
fn hyper_beam_forces_a_recharge_turn() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["hyper-beam"], [100; 6]);
    let p2 = mon(&dex, "snorlax", &["splash"], [200, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle
        .turn(
            TurnAction::use_move("hyper-beam"),
            TurnAction::use_move("splash"),
        )
        .unwrap();
    // 150 power: floor(10.8 * 150 / 50 + 2) = 34.
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 200 - 34);
    assert!(battle.trainer(0).roster[0].v.recharging);

    let mark = battle.get_all_text().len();
    battle
        .turn(
            TurnAction::use_move("hyper-beam"),
            TurnAction::use_move("splash"),
        )
        .unwrap();
    assert!(battle
        .text_since(mark)
        .iter()
        .any(|l| l == "PIKACHU must recharge!"));
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 200 - 34);

    battle
        .turn(
            TurnAction::use_move("hyper-beam"),
            TurnAction::use_move("splash"),
        )
        .unwrap();
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 200 - 68);
}

#[test]
fn mirror_move_replays_the_foes_last_move() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["mirror-move"], [100, 100, 100, 100, 100, 1]);
    let p2 = mon(&dex, "meowth", &["tackle"], [100; 6]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle
        .turn(
            TurnAction::use_move("mirror-move"),
            TurnAction::use_move("tackle"),
        )
        .unwrap();
    let text = battle.get_all_text();
    assert!(text.iter().any(|l| l == "PIKACHU used Mirror Move!"));
    assert!(text.iter().any(|l| l == "PIKACHU used Tackle!"));
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 100 - 10);
}

#[test]
fn rest_heals_fully_and_sleeps() {
    let dex = dex();
    let p1 = mon(&dex, "snorlax", &["rest"], [200, 100, 100, 100, 100, 100])
        .with_cur_hp(60)
        .unwrap();
    let p2 = mon(&dex, "meowth", &["growl"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle
        .turn(TurnAction::use_move("rest"), TurnAction::use_move("growl"))
        .unwrap();
    let text = battle.get_all_text();
    assert!(text.iter().any(|l| l == "SNORLAX went to sleep!"));
    assert!(text.iter().any(|l| l == "SNORLAX regained health!"));
    assert_eq!(battle.trainer(0).roster[0].cur_hp, 200);
    assert_eq!(
        battle.trainer(0).roster[0].nv_status.map(|s| s.kind),
        Some(NvStatusKind::Asleep)
    );

    let mark = battle.get_all_text().len();
    battle
        .turn(TurnAction::use_move("rest"), TurnAction::use_move("growl"))
        .unwrap();
    assert!(battle
        .text_since(mark)
        .iter()
        .any(|l| l == "SNORLAX is fast asleep!"));
}

#[test]
fn thief_takes_an_unheld_targets_item() {
    let dex = dex();
    let p1 = mon(&dex, "meowth", &["thief"], [100; 6]);
    let p2 = mon(&dex, "pikachu", &["growl"], [100, 100, 100, 100, 100, 1])
        .with_item(&dex, "oran-berry")
        .unwrap();
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle
        .turn(TurnAction::use_move("thief"), TurnAction::use_move("growl"))
        .unwrap();
    assert!(battle
        .get_all_text()
        .iter()
        .any(|l| l == "MEOWTH stole PIKACHU's oran-berry!"));
    assert_eq!(battle.trainer(0).roster[0].item.as_deref(), Some("oran-berry"));
    assert_eq!(battle.trainer(1).roster[0].item, None);
}

#[test]
fn spikes_hurt_the_next_combatant_in() {
    let dex = dex();
    let p1 = mon(&dex, "geodude", &["spikes", "harden"], [100; 6]);
    let roster = vec![
        mon(&dex, "meowth", &["growl"], [100, 100, 100, 100, 100, 1]),
        mon(&dex, "abra", &["growl"], [100; 6]),
    ];
    let t1 = Trainer::new("Ash", vec![p1]).unwrap();
    let t2 = Trainer::new("Misty", roster).unwrap();
    let mut battle = Battle::new(dex.clone(), t1, t2).unwrap().with_rng(exact());
    battle.start().unwrap();
    battle
        .turn(TurnAction::use_move("spikes"), TurnAction::use_move("growl"))
        .unwrap();
    assert!(battle
        .get_all_text()
        .iter()
        .any(|l| l == "Spikes were scattered all around the feet of Misty's team!"));
    assert_eq!(battle.trainer(1).spikes, 1);

    battle
        .turn(TurnAction::use_move("harden"), TurnAction::switch())
        .unwrap();
    assert!(battle
        .get_all_text()
        .iter()
        .any(|l| l == "ABRA is hurt by the spikes!"));
    // One layer: an eighth of max HP on entry.
    assert_eq!(battle.trainer(1).roster[1].cur_hp, 100 - 12);
}

#[test]
fn curse_splits_on_the_users_typing() {
    let dex = dex();
    let p1 = mon(&dex, "geodude", &["curse"], [100; 6]);
    let p2 = mon(&dex, "meowth", &["splash"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle
        .turn(TurnAction::use_move("curse"), TurnAction::use_move("splash"))
        .unwrap();
    let cursed = &battle.trainer(0).roster[0];
    assert_eq!(cursed.stage(Stat::Attack), 1);
    assert_eq!(cursed.stage(Stat::Defense), 1);
    assert_eq!(cursed.stage(Stat::Speed), -1);

    let p1 = mon(&dex, "gastly", &["curse"], [100; 6]);
    let p2 = mon(&dex, "meowth", &["splash"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle
        .turn(TurnAction::use_move("curse"), TurnAction::use_move("splash"))
        .unwrap();
    assert!(battle
        .get_all_text()
        .iter()
        .any(|l| l == "GASTLY cut its own HP and laid a curse on MEOWTH!"));
    assert_eq!(battle.trainer(0).roster[0].cur_hp, 50);
    assert!(battle.trainer(1).roster[0].v.cursed);
    // The curse bleeds a quarter each end-of-turn tick.
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 100 - 25);
}

#[test]
fn heal_block_stops_recovery_moves() {
    let dex = dex();
    let p1 = mon(&dex, "jigglypuff", &["recover"], [100, 100, 100, 100, 100, 1])
        .with_cur_hp(40)
        .unwrap();
    let p2 = mon(&dex, "abra", &["heal-block"], [100; 6]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle
        .turn(
            TurnAction::use_move("recover"),
            TurnAction::use_move("heal-block"),
        )
        .unwrap();
    let text = battle.get_all_text();
    assert!(text
        .iter()
        .any(|l| l == "JIGGLYPUFF was prevented from healing!"));
    assert!(text.iter().any(|l| l == "But, it failed!"));
    assert_eq!(battle.trainer(0).roster[0].cur_hp, 40);
}

#[test]
fn rooting_heals_every_tick_and_ingrain_traps() {
    let dex = dex();
    let roster = vec![
        mon(&dex, "bulbasaur", &["ingrain"], [100; 6]),
        mon(&dex, "abra", &["growl"], [100; 6]),
    ];
    let t1 = Trainer::new("Ash", roster).unwrap();
    let t2 = Trainer::new("Misty", vec![mon(&dex, "meowth", &["tackle"], [100, 100, 100, 100, 100, 1])]).unwrap();
    let mut battle = Battle::new(dex.clone(), t1, t2).unwrap().with_rng(exact());
    battle.start().unwrap();
    battle
        .turn(
            TurnAction::use_move("ingrain"),
            TurnAction::use_move("tackle"),
        )
        .unwrap();
    assert!(battle
        .get_all_text()
        .iter()
        .any(|l| l == "BULBASAUR planted its roots!"));
    // Took 10 from the tackle, recovered 1/16 at the tick.
    assert_eq!(battle.trainer(0).roster[0].cur_hp, 100 - 10 + 6);

    let err = battle
        .turn(TurnAction::switch(), TurnAction::use_move("tackle"))
        .unwrap_err();
    assert!(matches!(err, BattleError::Action(ActionError::CannotSwitch(_))));
}

#[test]
fn haze_clears_both_sides_stages() {
    let dex = dex();
    let p1 = mon(&dex, "squirtle", &["haze"], [100; 6]);
    let p2 = mon(&dex, "meowth", &["growl"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle.sides[0].roster[0].apply_stage(Stat::Attack, -3);
    battle.sides[1].roster[0].apply_stage(Stat::Evasion, 2);
    battle
        .turn(TurnAction::use_move("haze"), TurnAction::use_move("growl"))
        .unwrap();
    assert!(battle
        .get_all_text()
        .iter()
        .any(|l| l == "All stat changes were eliminated!"));
    assert_eq!(battle.trainer(0).roster[0].stage(Stat::Attack), 0);
    assert_eq!(battle.trainer(1).roster[0].stage(Stat::Evasion), 0);
}

#[test]
fn weather_moves_install_a_five_turn_spell() {
    let dex = dex();
    let p1 = mon(&dex, "geodude", &["sandstorm"], [100; 6]);
    let p2 = mon(&dex, "onix", &["growl"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle
        .turn(
            TurnAction::use_move("sandstorm"),
            TurnAction::use_move("growl"),
        )
        .unwrap();
    assert!(battle
        .get_all_text()
        .iter()
        .any(|l| l == "A sandstorm kicked up!"));
    assert_eq!(battle.battlefield.weather, crate::Weather::Sandstorm);
    // Five turns installed, one consumed by this turn's tick.
    assert_eq!(battle.battlefield.weather_count, Some(4));

    // A second cast against the same weather fails.
    let mark = battle.get_all_text().len();
    battle
        .turn(
            TurnAction::use_move("sandstorm"),
            TurnAction::use_move("growl"),
        )
        .unwrap();
    assert!(battle
        .text_since(mark)
        .iter()
        .any(|l| l == "But, it failed!"));
}
