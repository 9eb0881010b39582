use std::sync::Arc;

use crate::battle::rng::ScriptedRng;
use crate::battle::session::{Battle, TurnAction};
use crate::dex::Dex;
use crate::pokemon::{NvStatus, Pokemon, StatSpec};
use crate::trainer::Trainer;
use schema::{NvStatusKind, Stat};

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

/// Level 22, 100/100 offense/defense, 40 power, no STAB, neutral:
/// floor((2*22/5 + 2) * 40 / 50 + 2) = 10.
const NEUTRAL_TACKLE: u16 = 10;

#[test]
fn neutral_physical_damage_matches_the_formula() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["tackle"], [100; 6]);
    let p2 = mon(&dex, "meowth", &["growl"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle
        .turn(TurnAction::use_move("tackle"), TurnAction::use_move("growl"))
        .unwrap();
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 100 - NEUTRAL_TACKLE);
}

#[test]
fn stab_and_effectiveness_multiply_in() {
    let dex = dex();
    // Grass move from a grass type into a water type: 1.5 * 2.0.
    let p1 = mon(&dex, "bulbasaur", &["vine-whip"], [100; 6]);
    let p2 = mon(&dex, "squirtle", &["growl"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle
        .turn(
            TurnAction::use_move("vine-whip"),
            TurnAction::use_move("growl"),
        )
        .unwrap();
    // (10.8 * 45 / 50 + 2) * 1.5 * 2.0 = 35.16
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 100 - 35);
    assert!(battle
        .get_all_text()
        .iter()
        .any(|l| l == "It's super effective!"));
}

#[test]
fn resisted_hits_narrate_and_shrink() {
    let dex = dex();
    let p1 = mon(&dex, "squirtle", &["water-gun"], [100; 6]);
    let p2 = mon(&dex, "bulbasaur", &["growl"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle
        .turn(
            TurnAction::use_move("water-gun"),
            TurnAction::use_move("growl"),
        )
        .unwrap();
    // (10.8 * 40 / 50 + 2) * 1.5 * 0.5 = 7.98
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 100 - 7);
    assert!(battle
        .get_all_text()
        .iter()
        .any(|l| l == "It's not very effective..."));
}

#[test]
fn immune_targets_take_nothing() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["tackle"], [100; 6]);
    let p2 = mon(&dex, "gastly", &["growl"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle
        .turn(TurnAction::use_move("tackle"), TurnAction::use_move("growl"))
        .unwrap();
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 100);
    assert!(battle
        .get_all_text()
        .iter()
        .any(|l| l == "It doesn't affect GASTLY"));
}

#[test]
fn critical_hits_double_and_announce() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["tackle"], [100; 6]);
    let p2 = mon(&dex, "meowth", &["growl"], [100, 100, 100, 100, 100, 1]);
    let mut battle =
        duel(&dex, p1, p2).with_rng(ScriptedRng::new(1).force_hit(true).crit(true).variance(1.0));
    battle.start().unwrap();
    battle
        .turn(TurnAction::use_move("tackle"), TurnAction::use_move("growl"))
        .unwrap();
    // (10.8 * 40 / 50 + 2) * 2 = 21.28
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 100 - 21);
    assert!(battle.get_all_text().iter().any(|l| l == "A critical hit!"));
}

#[test]
fn critical_hits_ignore_unfavorable_stages_and_screens() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["tackle"], [100; 6]);
    let p2 = mon(&dex, "meowth", &["growl"], [100, 100, 100, 100, 100, 1]);
    let mut battle =
        duel(&dex, p1, p2).with_rng(ScriptedRng::new(1).force_hit(true).crit(true).variance(1.0));
    battle.start().unwrap();
    battle.sides[0].roster[0].apply_stage(Stat::Attack, -2);
    battle.sides[1].reflect = 3;
    battle
        .turn(TurnAction::use_move("tackle"), TurnAction::use_move("growl"))
        .unwrap();
    // max(actual, effective) attack over min(actual, effective) defense,
    // screens skipped: same 21 as an unmodified crit.
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 100 - 21);
}

#[test]
fn lowered_attack_and_reflect_shrink_normal_hits() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["tackle"], [100; 6]);
    let p2 = mon(&dex, "meowth", &["growl"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle.sides[0].roster[0].apply_stage(Stat::Attack, -2);
    battle
        .turn(TurnAction::use_move("tackle"), TurnAction::use_move("growl"))
        .unwrap();
    // Halved attack: 10.8 * 40 * 0.5 / 50 + 2 = 6.32
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 100 - 6);

    battle.sides[0].roster[0].reset_stages();
    battle.sides[1].reflect = 3;
    let before = battle.trainer(1).roster[0].cur_hp;
    battle
        .turn(TurnAction::use_move("tackle"), TurnAction::use_move("growl"))
        .unwrap();
    assert_eq!(battle.trainer(1).roster[0].cur_hp, before - 6);
}

#[test]
fn burn_halves_physical_damage() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["tackle"], [100; 6]);
    let p2 = mon(&dex, "meowth", &["growl"], [200, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle.sides[0].roster[0].nv_status = Some(NvStatus::new(NvStatusKind::Burned));
    battle
        .turn(TurnAction::use_move("tackle"), TurnAction::use_move("growl"))
        .unwrap();
    // Burned physical: 10.8 * 40 / 50 * 0.5 + 2 = 6.32. The attacker
    // also chips 1/16 burn damage at end of turn.
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 200 - 6);
    assert_eq!(battle.trainer(0).roster[0].cur_hp, 100 - 6);
}

#[test]
fn misses_narrate_by_evasion_state() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["tackle"], [100; 6]);
    let p2 = mon(&dex, "meowth", &["growl"], [100, 100, 100, 100, 100, 1]);
    let mut battle =
        duel(&dex, p1, p2).with_rng(ScriptedRng::new(1).force_hit(false).crit(false));
    battle.start().unwrap();
    battle
        .turn(TurnAction::use_move("tackle"), TurnAction::use_move("growl"))
        .unwrap();
    assert!(battle
        .get_all_text()
        .iter()
        .any(|l| l == "PIKACHU's attack missed!"));

    battle.sides[1].roster[0].apply_stage(Stat::Evasion, 1);
    let mark = battle.get_all_text().len();
    battle
        .turn(TurnAction::use_move("tackle"), TurnAction::use_move("growl"))
        .unwrap();
    assert!(battle
        .text_since(mark)
        .iter()
        .any(|l| l == "MEOWTH avoided the attack!"));
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 100);
}

#[test]
fn ohko_empties_the_bar_or_does_nothing() {
    let dex = dex();
    let p1 = mon(&dex, "cubone", &["fissure"], [100; 6]);
    let p2 = mon(&dex, "meowth", &["growl"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle
        .turn(
            TurnAction::use_move("fissure"),
            TurnAction::use_move("growl"),
        )
        .unwrap();
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 0);
    assert!(battle
        .get_all_text()
        .iter()
        .any(|l| l == "It's a one-hit KO!"));

    // Ground against a flier: no damage, narrated immunity.
    let p1 = mon(&dex, "cubone", &["fissure"], [100; 6]);
    let p2 = mon(&dex, "butterfree", &["growl"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle
        .turn(
            TurnAction::use_move("fissure"),
            TurnAction::use_move("growl"),
        )
        .unwrap();
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 100);
    assert!(battle
        .get_all_text()
        .iter()
        .any(|l| l == "It doesn't affect BUTTERFREE"));
}

#[test]
fn fixed_and_level_damage_ignore_stats() {
    let dex = dex();
    let p1 = mon(
        &dex,
        "dratini",
        &["dragon-rage", "sonic-boom", "seismic-toss"],
        [100; 6],
    );
    let p2 = mon(&dex, "onix", &["growl"], [300, 100, 250, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle
        .turn(
            TurnAction::use_move("dragon-rage"),
            TurnAction::use_move("growl"),
        )
        .unwrap();
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 300 - 40);
    battle
        .turn(
            TurnAction::use_move("sonic-boom"),
            TurnAction::use_move("growl"),
        )
        .unwrap();
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 300 - 40 - 20);
    battle
        .turn(
            TurnAction::use_move("seismic-toss"),
            TurnAction::use_move("growl"),
        )
        .unwrap();
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 300 - 40 - 20 - 22);
}

#[test]
fn super_fang_halves_from_max() {
    let dex = dex();
    let p1 = mon(&dex, "meowth", &["super-fang"], [100; 6]);
    let p2 = mon(&dex, "snorlax", &["growl"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle
        .turn(
            TurnAction::use_move("super-fang"),
            TurnAction::use_move("growl"),
        )
        .unwrap();
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 50);
}

#[test]
fn counter_returns_double_physical_damage() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["tackle"], [100; 6]);
    let p2 = mon(&dex, "meowth", &["counter"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle
        .turn(
            TurnAction::use_move("tackle"),
            TurnAction::use_move("counter"),
        )
        .unwrap();
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 100 - NEUTRAL_TACKLE);
    assert_eq!(battle.trainer(0).roster[0].cur_hp, 100 - 2 * NEUTRAL_TACKLE);
}

#[test]
fn levitation_grants_ground_immunity() {
    let dex = dex();
    let p1 = mon(&dex, "cubone", &["earthquake"], [100; 6]);
    let p2 = mon(&dex, "gastly", &["growl"], [100, 100, 100, 100, 100, 1])
        .with_ability(&dex, "levitate")
        .unwrap();
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle
        .turn(
            TurnAction::use_move("earthquake"),
            TurnAction::use_move("growl"),
        )
        .unwrap();
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 100);
    assert!(battle
        .get_all_text()
        .iter()
        .any(|l| l == "It doesn't affect GASTLY"));
}

#[test]
fn counter_fails_without_a_stored_hit() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["growl"], [100; 6]);
    let p2 = mon(&dex, "meowth", &["counter"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle
        .turn(
            TurnAction::use_move("growl"),
            TurnAction::use_move("counter"),
        )
        .unwrap();
    assert!(battle.get_all_text().iter().any(|l| l == "But, it failed!"));
    assert_eq!(battle.trainer(0).roster[0].cur_hp, 100);
}
