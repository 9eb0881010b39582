use std::sync::Arc;

use crate::battle::rng::ScriptedRng;
use crate::battle::session::{Battle, TurnAction};
use crate::dex::Dex;
use crate::pokemon::{NvStatus, Pokemon, StatSpec};
use crate::trainer::Trainer;
use schema::{NvStatusKind, RootingKind, Weather};

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

fn quiet_turn(battle: &mut Battle) {
    battle
        .turn(TurnAction::use_move("splash"), TurnAction::use_move("splash"))
        .unwrap();
}

fn splashers(dex: &Arc<Dex>) -> (Pokemon, Pokemon) {
    (
        mon(dex, "pikachu", &["splash"], [100; 6]),
        mon(dex, "meowth", &["splash"], [100, 100, 100, 100, 100, 1]),
    )
}

#[test]
fn poison_takes_an_eighth_each_turn() {
    let dex = dex();
    let (p1, p2) = splashers(&dex);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle.sides[0].roster[0].nv_status = Some(NvStatus::new(NvStatusKind::Poisoned));
    quiet_turn(&mut battle);
    assert!(battle
        .get_all_text()
        .iter()
        .any(|l| l == "PIKACHU is hurt by poison!"));
    assert_eq!(battle.trainer(0).roster[0].cur_hp, 100 - 12);
}

#[test]
fn bad_poison_ramps_by_sixteenths() {
    let dex = dex();
    let (p1, p2) = splashers(&dex);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle.sides[0].roster[0].nv_status = Some(NvStatus {
        kind: NvStatusKind::BadlyPoisoned,
        counter: 1,
    });
    quiet_turn(&mut battle);
    assert_eq!(battle.trainer(0).roster[0].cur_hp, 100 - 6);
    quiet_turn(&mut battle);
    assert_eq!(battle.trainer(0).roster[0].cur_hp, 100 - 6 - 12);
    quiet_turn(&mut battle);
    assert_eq!(battle.trainer(0).roster[0].cur_hp, 100 - 6 - 12 - 18);
    assert_eq!(battle.trainer(0).roster[0].nv_status.unwrap().counter, 4);
}

#[test]
fn burn_takes_a_sixteenth_each_turn() {
    let dex = dex();
    let (p1, p2) = splashers(&dex);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle.sides[0].roster[0].nv_status = Some(NvStatus::new(NvStatusKind::Burned));
    quiet_turn(&mut battle);
    assert!(battle
        .get_all_text()
        .iter()
        .any(|l| l == "PIKACHU is hurt by its burn!"));
    assert_eq!(battle.trainer(0).roster[0].cur_hp, 100 - 6);
}

#[test]
fn sandstorm_spares_rock_and_ground_types() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["splash"], [100; 6]);
    let p2 = mon(&dex, "geodude", &["splash"], [100, 100, 100, 100, 100, 1]);
    let t1 = Trainer::new("Ash", vec![p1]).unwrap();
    let t2 = Trainer::new("Misty", vec![p2]).unwrap();
    let mut battle = Battle::with_setting(dex.clone(), t1, t2, None, Some("sandstorm"))
        .unwrap()
        .with_rng(exact());
    battle.start().unwrap();
    quiet_turn(&mut battle);
    assert!(battle
        .get_all_text()
        .iter()
        .any(|l| l == "PIKACHU is buffeted by the sandstorm!"));
    assert_eq!(battle.trainer(0).roster[0].cur_hp, 100 - 6);
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 100);
}

#[test]
fn hail_spares_ice_types() {
    let dex = dex();
    let p1 = mon(&dex, "lapras", &["splash"], [100; 6]);
    let p2 = mon(&dex, "meowth", &["splash"], [100, 100, 100, 100, 100, 1]);
    let t1 = Trainer::new("Ash", vec![p1]).unwrap();
    let t2 = Trainer::new("Misty", vec![p2]).unwrap();
    let mut battle = Battle::with_setting(dex.clone(), t1, t2, None, Some("hail"))
        .unwrap()
        .with_rng(exact());
    battle.start().unwrap();
    quiet_turn(&mut battle);
    assert!(battle
        .get_all_text()
        .iter()
        .any(|l| l == "MEOWTH is pelted by the hail!"));
    assert_eq!(battle.trainer(0).roster[0].cur_hp, 100);
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 100 - 6);
}

#[test]
fn nightmares_only_torment_sleepers() {
    let dex = dex();
    let (p1, p2) = splashers(&dex);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    {
        let victim = &mut battle.sides[0].roster[0];
        victim.nv_status = Some(NvStatus {
            kind: NvStatusKind::Asleep,
            counter: 4,
        });
        victim.v.nightmare = true;
    }
    quiet_turn(&mut battle);
    assert!(battle
        .get_all_text()
        .iter()
        .any(|l| l == "PIKACHU is locked in a nightmare!"));
    assert_eq!(battle.trainer(0).roster[0].cur_hp, 100 - 25);

    // Waking ends the nightmare without further damage.
    battle.sides[0].roster[0].nv_status = None;
    quiet_turn(&mut battle);
    assert!(!battle.trainer(0).roster[0].v.nightmare);
    assert_eq!(battle.trainer(0).roster[0].cur_hp, 100 - 25);
}

#[test]
fn aqua_ring_restores_each_tick() {
    let dex = dex();
    let (p1, p2) = splashers(&dex);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    {
        let rooted = &mut battle.sides[0].roster[0];
        rooted.cur_hp = 40;
        rooted.v.rooting = Some(RootingKind::AquaRing);
    }
    quiet_turn(&mut battle);
    assert!(battle
        .get_all_text()
        .iter()
        .any(|l| l == "A veil of water restored PIKACHU's HP!"));
    assert_eq!(battle.trainer(0).roster[0].cur_hp, 46);
}

#[test]
fn leftovers_trickle_back_hp() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["splash"], [100; 6])
        .with_item(&dex, "leftovers")
        .unwrap()
        .with_cur_hp(40)
        .unwrap();
    let p2 = mon(&dex, "meowth", &["splash"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    quiet_turn(&mut battle);
    assert!(battle
        .get_all_text()
        .iter()
        .any(|l| l == "PIKACHU restored a little HP using its Leftovers!"));
    assert_eq!(battle.trainer(0).roster[0].cur_hp, 46);
}

#[test]
fn held_berry_triggers_right_after_the_damaging_action() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["tackle"], [100; 6]);
    let p2 = mon(&dex, "meowth", &["splash"], [100, 100, 100, 100, 100, 1])
        .with_cur_hp(58)
        .unwrap()
        .with_item(&dex, "oran-berry")
        .unwrap();
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle
        .turn(TurnAction::use_move("tackle"), TurnAction::use_move("splash"))
        .unwrap();
    // 58 - 10 = 48 dips below half; the berry restores 10 on the spot.
    assert!(battle
        .get_all_text()
        .iter()
        .any(|l| l == "MEOWTH ate its Oran Berry!"));
    assert_eq!(battle.trainer(1).roster[0].cur_hp, 58);
    assert_eq!(battle.trainer(1).roster[0].item, None);
}

#[test]
fn move_weather_decays_and_clears() {
    let dex = dex();
    let p1 = mon(&dex, "geodude", &["sandstorm", "harden"], [100; 6]);
    let p2 = mon(&dex, "onix", &["splash"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle
        .turn(
            TurnAction::use_move("sandstorm"),
            TurnAction::use_move("splash"),
        )
        .unwrap();
    for _ in 0..3 {
        battle
            .turn(
                TurnAction::use_move("harden"),
                TurnAction::use_move("splash"),
            )
            .unwrap();
        assert_eq!(battle.battlefield.weather, Weather::Sandstorm);
    }
    battle
        .turn(
            TurnAction::use_move("harden"),
            TurnAction::use_move("splash"),
        )
        .unwrap();
    assert!(battle
        .get_all_text()
        .iter()
        .any(|l| l == "The sandstorm subsided."));
    assert_eq!(battle.battlefield.weather, Weather::Clear);
    assert_eq!(battle.battlefield.weather_count, None);
}

#[test]
fn residual_damage_can_finish_a_battle() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["splash"], [100; 6]);
    let p2 = mon(&dex, "meowth", &["splash"], [100, 100, 100, 100, 100, 1])
        .with_cur_hp(5)
        .unwrap();
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle.sides[1].roster[0].nv_status = Some(NvStatus::new(NvStatusKind::Poisoned));
    quiet_turn(&mut battle);
    let text = battle.get_all_text();
    assert!(text.iter().any(|l| l == "MEOWTH fainted!"));
    assert!(text.iter().any(|l| l == "Ash has defeated Misty!"));
    assert_eq!(battle.winner().unwrap().name, "Ash");
}

#[test]
fn disable_counters_tick_for_everyone() {
    let dex = dex();
    let (p1, p2) = splashers(&dex);
    let mut battle = duel(&dex, p1, p2).with_rng(exact());
    battle.start().unwrap();
    battle.sides[0].roster[0].moves.push(crate::moves::MoveInstance::new(
        Dex::bundled().unwrap().move_data("tackle").unwrap().clone(),
    ));
    battle.sides[0].roster[0].moves[1].disabled = 2;
    battle.sides[1].roster[0].moves[0].disabled = 1;
    // Neither combatant owns the tick; both count down each turn.
    quiet_turn(&mut battle);
    assert_eq!(battle.trainer(0).roster[0].moves[1].disabled, 1);
    assert_eq!(battle.trainer(1).roster[0].moves[0].disabled, 0);
}
