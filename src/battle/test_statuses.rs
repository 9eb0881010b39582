use std::sync::Arc;

use crate::battle::rng::ScriptedRng;
use crate::battle::session::{Battle, TurnAction};
use crate::dex::Dex;
use crate::pokemon::{NvStatus, Pokemon, StatSpec};
use crate::trainer::Trainer;
use schema::NvStatusKind;

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
fn status_moves_apply_their_condition() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["thunder-wave"], [100; 6]);
    let p2 = mon(&dex, "meowth", &["growl"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact().paralyzed(false));
    battle.start().unwrap();
    battle
        .turn(
            TurnAction::use_move("thunder-wave"),
            TurnAction::use_move("growl"),
        )
        .unwrap();
    assert!(battle
        .get_all_text()
        .iter()
        .any(|l| l == "MEOWTH is paralyzed! It may be unable to move!"));
    assert_eq!(
        battle.trainer(1).roster[0].nv_status.map(|s| s.kind),
        Some(NvStatusKind::Paralyzed)
    );
}

#[test]
fn repeat_status_narrates_already_afflicted() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["thunder-wave"], [100; 6]);
    let p2 = mon(&dex, "meowth", &["growl"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact().paralyzed(false));
    battle.start().unwrap();
    battle
        .turn(
            TurnAction::use_move("thunder-wave"),
            TurnAction::use_move("growl"),
        )
        .unwrap();
    let mark = battle.get_all_text().len();
    battle
        .turn(
            TurnAction::use_move("thunder-wave"),
            TurnAction::use_move("growl"),
        )
        .unwrap();
    assert!(battle
        .text_since(mark)
        .iter()
        .any(|l| l == "MEOWTH is already paralyzed!"));
}

#[test]
fn fire_types_cannot_be_burned() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["will-o-wisp"], [100; 6]);
    let p2 = mon(&dex, "charmander", &["growl"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle
        .turn(
            TurnAction::use_move("will-o-wisp"),
            TurnAction::use_move("growl"),
        )
        .unwrap();
    assert!(battle.get_all_text().iter().any(|l| l == "But, it failed!"));
    assert_eq!(battle.trainer(1).roster[0].nv_status, None);
}

#[test]
fn paralysis_can_consume_the_turn() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["tackle"], [100; 6]);
    let p2 = mon(&dex, "meowth", &["tackle"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact().paralyzed(true));
    battle.start().unwrap();
    battle.sides[0].roster[0].nv_status = Some(NvStatus::new(NvStatusKind::Paralyzed));
    battle
        .turn(TurnAction::use_move("tackle"), TurnAction::use_move("tackle"))
        .unwrap();
    assert!(battle
        .get_all_text()
        .iter()
        .any(|l| l == "PIKACHU is paralyzed! It can't move!"));
    // The blocked attacker dealt nothing; the foe still connected.
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 100);
    assert!(battle.trainer(0).roster[0].cur_hp < 100);
}

#[test]
fn frozen_combatants_stay_locked_until_the_thaw() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["tackle"], [100; 6]);
    let p2 = mon(&dex, "meowth", &["splash"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact().thaw(false));
    battle.start().unwrap();
    battle.sides[0].roster[0].nv_status = Some(NvStatus::new(NvStatusKind::Frozen));
    battle
        .turn(TurnAction::use_move("tackle"), TurnAction::use_move("splash"))
        .unwrap();
    assert!(battle
        .get_all_text()
        .iter()
        .any(|l| l == "PIKACHU is frozen solid!"));
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 100);

    battle.set_rng(exact().thaw(true));
    let mark = battle.get_all_text().len();
    battle
        .turn(TurnAction::use_move("tackle"), TurnAction::use_move("splash"))
        .unwrap();
    let text = battle.text_since(mark);
    assert!(text.iter().any(|l| l == "PIKACHU thawed out!"));
    assert!(text.iter().any(|l| l == "PIKACHU used Tackle!"));
    assert_eq!(battle.trainer(0).roster[0].nv_status, None);
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 90);
}

#[test]
fn sleep_counts_down_then_wakes() {
    let dex = dex();
    let p1 = mon(&dex, "abra", &["hypnosis"], [100; 6]);
    let p2 = mon(&dex, "meowth", &["tackle"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact().sleep_turns_fixed(2));
    battle.start().unwrap();
    battle
        .turn(
            TurnAction::use_move("hypnosis"),
            TurnAction::use_move("tackle"),
        )
        .unwrap();
    let text = battle.get_all_text();
    assert!(text.iter().any(|l| l == "MEOWTH fell asleep!"));
    // The target's own action was slept through.
    assert!(text.iter().any(|l| l == "MEOWTH is fast asleep!"));
    assert_eq!(battle.trainer(0).roster[0].cur_hp, 100);

    let mark = battle.get_all_text().len();
    battle
        .turn(
            TurnAction::use_move("hypnosis"),
            TurnAction::use_move("tackle"),
        )
        .unwrap();
    let text = battle.text_since(mark);
    assert!(text.iter().any(|l| l == "MEOWTH woke up!"));
    assert!(text.iter().any(|l| l == "MEOWTH used Tackle!"));
}

#[test]
fn flinch_blocks_the_slower_combatant() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["stomp"], [100; 6]);
    let p2 = mon(&dex, "meowth", &["tackle"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact().flinch(true));
    battle.start().unwrap();
    battle
        .turn(TurnAction::use_move("stomp"), TurnAction::use_move("tackle"))
        .unwrap();
    assert!(battle
        .get_all_text()
        .iter()
        .any(|l| l == "MEOWTH flinched and couldn't move"));
    assert_eq!(battle.trainer(0).roster[0].cur_hp, 100);
    // Flinch is consumed with the blocked action.
    assert!(!battle.trainer(1).roster[0].v.flinched);
}

#[test]
fn confusion_can_redirect_into_a_self_hit() {
    let dex = dex();
    let p1 = mon(&dex, "gastly", &["confuse-ray"], [100; 6]);
    let p2 = mon(&dex, "meowth", &["tackle"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(
        &dex,
        p1,
        p2,
    )
    .with_rng(
        exact()
            .confusion_turns_fixed(3)
            .confusion_self_hit(true),
    );
    battle.start().unwrap();
    battle
        .turn(
            TurnAction::use_move("confuse-ray"),
            TurnAction::use_move("tackle"),
        )
        .unwrap();
    let text = battle.get_all_text();
    assert!(text.iter().any(|l| l == "MEOWTH became confused!"));
    assert!(text.iter().any(|l| l == "MEOWTH is confused!"));
    assert!(text.iter().any(|l| l == "It hurt itself in its confusion!"));
    // The 40-power typeless self-hit landed instead of the move.
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 100 - 10);
    assert_eq!(battle.trainer(0).roster[0].cur_hp, 100);
    assert_eq!(battle.trainer(1).roster[0].v.confused, 2);
}

#[test]
fn secondary_shield_blocks_incidental_status() {
    let dex = dex();
    let p1 = mon(&dex, "bulbasaur", &["poison-sting"], [100; 6]);
    let p2 = mon(&dex, "meowth", &["splash"], [100, 100, 100, 100, 100, 1])
        .with_ability(&dex, "shield-dust")
        .unwrap();
    let mut battle = duel(&dex, p1, p2).with_rng(exact().effect(true).status(true));
    battle.start().unwrap();
    battle
        .turn(
            TurnAction::use_move("poison-sting"),
            TurnAction::use_move("splash"),
        )
        .unwrap();
    // The hit lands; the rider never does.
    assert!(battle.trainer(1).roster[0].cur_hp < 100);
    assert_eq!(battle.trainer(1).roster[0].nv_status, None);
}

#[test]
fn substitutes_block_fresh_status() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["thunder-wave"], [100, 100, 100, 100, 100, 1]);
    let p2 = mon(&dex, "meowth", &["substitute"], [100; 6]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle
        .turn(
            TurnAction::use_move("thunder-wave"),
            TurnAction::use_move("substitute"),
        )
        .unwrap();
    assert!(battle.get_all_text().iter().any(|l| l == "But, it failed!"));
    assert_eq!(battle.trainer(1).roster[0].nv_status, None);
}
