use std::sync::Arc;

use pretty_assertions::assert_eq;

use crate::battle::rng::ScriptedRng;
use crate::battle::session::{Battle, TurnAction};
use crate::dex::Dex;
use crate::errors::{ActionError, BattleError, LifecycleError};
use crate::pokemon::{Pokemon, StatSpec};
use crate::trainer::Trainer;

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

fn pinned() -> ScriptedRng {
    ScriptedRng::new(1).force_hit(true).crit(false)
}

#[test]
fn one_tackle_ends_the_short_battle() {
    let dex = dex();
    let p1 = mon(&dex, "bulbasaur", &["tackle"], [100, 100, 100, 100, 100, 100]);
    let p2 = mon(&dex, "charmander", &["tackle"], [1, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, p1, p2).with_rng(pinned());

    assert!(!battle.battle_started());
    battle.start().unwrap();
    assert!(battle.battle_started());
    assert_eq!(battle.turn_count(), 0);

    battle
        .turn(TurnAction::use_move("tackle"), TurnAction::use_move("tackle"))
        .unwrap();

    let expected = vec![
        "Ash sent out BULBASAUR!",
        "Misty sent out CHARMANDER!",
        "Turn 1:",
        "BULBASAUR used Tackle!",
        "CHARMANDER fainted!",
        "Ash has defeated Misty!",
    ];
    assert_eq!(battle.get_all_text(), expected);
    assert_eq!(battle.last_move.as_deref(), Some("tackle"));
    assert_eq!(battle.turn_count(), 1);
    assert_eq!(battle.winner().unwrap().name, "Ash");
    assert!(battle.is_finished());

    // The session stops accepting turns once decided.
    let err = battle
        .turn(TurnAction::use_move("tackle"), TurnAction::use_move("tackle"))
        .unwrap_err();
    assert_eq!(err, BattleError::Lifecycle(LifecycleError::Finished));
}

#[test]
fn nicknames_flow_through_narration_and_speed_orders_actions() {
    let dex = dex();
    let p1 = mon(&dex, "bulbasaur", &["tackle"], [100, 100, 100, 100, 100, 1])
        .with_nickname("from Ash");
    let p2 = mon(&dex, "charmander", &["tackle"], [1, 100, 100, 100, 100, 100])
        .with_nickname("from Misty");
    let mut battle = duel(&dex, p1, p2).with_rng(pinned());
    battle.start().unwrap();
    battle
        .turn(TurnAction::use_move("tackle"), TurnAction::use_move("tackle"))
        .unwrap();

    let expected = vec![
        "Ash sent out FROM ASH!",
        "Misty sent out FROM MISTY!",
        "Turn 1:",
        "FROM MISTY used Tackle!",
        "FROM ASH used Tackle!",
        "FROM MISTY fainted!",
        "Ash has defeated Misty!",
    ];
    assert_eq!(battle.get_all_text(), expected);
    assert_eq!(battle.winner().unwrap().name, "Ash");
}

#[test]
fn equal_speed_keeps_submission_order() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["growl"], [100, 100, 100, 100, 100, 77]);
    let p2 = mon(&dex, "meowth", &["growl"], [100, 100, 100, 100, 100, 77]);
    let mut battle = duel(&dex, p1, p2).with_rng(pinned());
    battle.start().unwrap();
    battle
        .turn(TurnAction::use_move("growl"), TurnAction::use_move("growl"))
        .unwrap();

    let text = battle.get_all_text();
    let first = text.iter().position(|l| l == "PIKACHU used Growl!").unwrap();
    let second = text.iter().position(|l| l == "MEOWTH used Growl!").unwrap();
    assert!(first < second);
}

#[test]
fn session_weather_never_wears_off() {
    let dex = dex();
    let p1 = mon(&dex, "bulbasaur", &["tackle"], [100, 1, 100, 100, 100, 100]);
    let p2 = mon(&dex, "charmander", &["tackle"], [100, 1, 100, 100, 100, 1]);
    let t1 = Trainer::new("Ash", vec![p1]).unwrap();
    let t2 = Trainer::new("Misty", vec![p2]).unwrap();
    let mut battle = Battle::with_setting(dex.clone(), t1, t2, None, Some("rain"))
        .unwrap()
        .with_rng(pinned());
    battle.start().unwrap();

    for turn in 1..=3u32 {
        let mark = battle.get_all_text().len();
        battle
            .turn(TurnAction::use_move("tackle"), TurnAction::use_move("tackle"))
            .unwrap();
        let expected = vec![
            format!("Turn {}:", turn),
            "BULBASAUR used Tackle!".to_string(),
            "CHARMANDER used Tackle!".to_string(),
            "Rain continues to fall.".to_string(),
        ];
        assert_eq!(battle.text_since(mark), expected);
    }
    assert_eq!(battle.battlefield.weather, crate::Weather::Rain);
    assert_eq!(battle.battlefield.weather_count, None);
}

#[test]
fn invalid_setting_fails_construction() {
    let dex = dex();
    let make = |dex: &Arc<Dex>| {
        (
            Trainer::new("Ash", vec![mon(dex, "pikachu", &["tackle"], [100; 6])]).unwrap(),
            Trainer::new("Misty", vec![mon(dex, "meowth", &["tackle"], [100; 6])]).unwrap(),
        )
    };
    let (t1, t2) = make(&dex);
    assert!(matches!(
        Battle::with_setting(dex.clone(), t1, t2, Some("volcano"), None),
        Err(BattleError::Construction(_))
    ));
    let (t1, t2) = make(&dex);
    assert!(matches!(
        Battle::with_setting(dex.clone(), t1, t2, None, Some("meteor-shower")),
        Err(BattleError::Construction(_))
    ));
    let (t1, t2) = make(&dex);
    assert!(Battle::with_setting(dex.clone(), t1, t2, Some("water"), None).is_ok());
}

#[test]
fn lifecycle_errors() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["tackle"], [100; 6]);
    let p2 = mon(&dex, "meowth", &["tackle"], [100; 6]);
    let mut battle = duel(&dex, p1, p2);

    let err = battle
        .turn(TurnAction::use_move("tackle"), TurnAction::use_move("tackle"))
        .unwrap_err();
    assert_eq!(err, BattleError::Lifecycle(LifecycleError::NotStarted));

    battle.start().unwrap();
    assert_eq!(
        battle.start().unwrap_err(),
        BattleError::Lifecycle(LifecycleError::AlreadyStarted)
    );
}

#[test]
fn trainers_cannot_battle_twice_at_once() {
    let dex = dex();
    let mut t1 = Trainer::new("Ash", vec![mon(&dex, "pikachu", &["tackle"], [100; 6])]).unwrap();
    let t2 = Trainer::new("Misty", vec![mon(&dex, "meowth", &["tackle"], [100; 6])]).unwrap();
    t1.in_battle = true;
    assert!(matches!(
        Battle::new(dex.clone(), t1, t2),
        Err(BattleError::Lifecycle(LifecycleError::AlreadyInBattle(_)))
    ));
}

#[test]
fn released_trainers_can_battle_again() {
    let dex = dex();
    let p1 = mon(&dex, "pikachu", &["tackle"], [100; 6]);
    let p2 = mon(&dex, "meowth", &["tackle"], [100; 6]);
    let mut battle = duel(&dex, p1, p2);
    battle.start().unwrap();
    let (t1, t2) = battle.into_trainers();
    assert!(!t1.in_battle);
    let mut rematch = Battle::new(dex.clone(), t1, t2).unwrap();
    rematch.start().unwrap();
}

#[test]
fn illegal_actions_error_before_any_mutation() {
    let dex = dex();
    let mut weak = mon(&dex, "pikachu", &["tackle", "growl"], [100; 6]);
    weak.moves[1].cur_pp = 0;
    let p2 = mon(&dex, "meowth", &["tackle"], [100; 6]);
    let mut battle = duel(&dex, weak, p2).with_rng(pinned());
    battle.start().unwrap();
    let baseline = battle.get_all_text().len();

    let err = battle
        .turn(TurnAction::use_move("splash"), TurnAction::use_move("tackle"))
        .unwrap_err();
    assert_eq!(
        err,
        BattleError::Action(ActionError::MoveNotKnown("splash".to_string()))
    );

    let err = battle
        .turn(TurnAction::use_move("growl"), TurnAction::use_move("tackle"))
        .unwrap_err();
    assert_eq!(
        err,
        BattleError::Action(ActionError::NoPpRemaining("growl".to_string()))
    );

    let err = battle
        .turn(TurnAction::switch(), TurnAction::use_move("tackle"))
        .unwrap_err();
    assert!(matches!(err, BattleError::Action(ActionError::CannotSwitch(_))));

    let err = battle
        .turn(
            TurnAction::use_item("master-sword", 0),
            TurnAction::use_move("tackle"),
        )
        .unwrap_err();
    assert!(matches!(err, BattleError::Action(ActionError::UnknownItem(_))));

    let err = battle
        .turn(
            TurnAction::use_item("potion", 4),
            TurnAction::use_move("tackle"),
        )
        .unwrap_err();
    assert_eq!(
        err,
        BattleError::Action(ActionError::InvalidItemTarget(4))
    );

    // Nothing resolved, nothing narrated.
    assert_eq!(battle.get_all_text().len(), baseline);
    assert_eq!(battle.turn_count(), 0);
}

#[test]
fn trapped_combatants_cannot_switch() {
    let dex = dex();
    let roster = vec![
        mon(&dex, "pikachu", &["tackle"], [100; 6]),
        mon(&dex, "meowth", &["tackle"], [100; 6]),
    ];
    let t1 = Trainer::new("Ash", roster).unwrap();
    let t2 = Trainer::new("Misty", vec![mon(&dex, "abra", &["tackle"], [100; 6])]).unwrap();
    let mut battle = Battle::new(dex.clone(), t1, t2).unwrap().with_rng(pinned());
    battle.start().unwrap();
    battle.sides[0].roster[0].v.perma_trapped = true;

    let err = battle
        .turn(TurnAction::switch(), TurnAction::use_move("tackle"))
        .unwrap_err();
    assert!(matches!(err, BattleError::Action(ActionError::CannotSwitch(_))));
}

#[test]
fn switches_resolve_before_moves() {
    let dex = dex();
    let roster = vec![
        mon(&dex, "pikachu", &["tackle"], [100; 6]),
        mon(&dex, "meowth", &["tackle"], [100; 6]),
    ];
    let t1 = Trainer::new("Ash", roster).unwrap();
    let t2 = Trainer::new("Misty", vec![mon(&dex, "abra", &["tackle"], [100; 6])]).unwrap();
    let mut battle = Battle::new(dex.clone(), t1, t2).unwrap().with_rng(pinned());
    battle.start().unwrap();
    let mark = battle.get_all_text().len();

    battle
        .turn(TurnAction::switch(), TurnAction::use_move("tackle"))
        .unwrap();

    let text = battle.text_since(mark);
    assert_eq!(text[0], "Turn 1:");
    assert_eq!(text[1], "Ash withdrew PIKACHU!");
    assert_eq!(text[2], "Ash sent out MEOWTH!");
    assert_eq!(text[3], "ABRA used Tackle!");
    assert_eq!(battle.trainer(0).current, 1);
}

#[test]
fn items_heal_before_moves_resolve() {
    let dex = dex();
    let hurt = mon(&dex, "pikachu", &["tackle"], [100; 6])
        .with_cur_hp(40)
        .unwrap();
    let p2 = mon(&dex, "meowth", &["growl"], [100; 6]);
    let mut battle = duel(&dex, hurt, p2).with_rng(pinned());
    battle.start().unwrap();

    battle
        .turn(
            TurnAction::use_item("potion", 0),
            TurnAction::use_move("growl"),
        )
        .unwrap();

    assert!(battle
        .get_all_text()
        .iter()
        .any(|l| l == "Ash used Potion on PIKACHU!"));
    assert_eq!(battle.trainer(0).roster[0].cur_hp, 60);
}

#[test]
fn struggle_is_the_last_resort() {
    let dex = dex();
    let mut empty = mon(&dex, "pikachu", &["tackle"], [100; 6]);
    empty.moves[0].cur_pp = 0;
    let p2 = mon(&dex, "meowth", &["growl"], [100, 100, 100, 100, 100, 1]);
    let mut battle = duel(&dex, empty, p2).with_rng(pinned());
    battle.start().unwrap();

    // Struggle is rejected while a usable move remains.
    let err = battle
        .turn(TurnAction::use_move("tackle"), TurnAction::use_move("growl"))
        .unwrap_err();
    assert_eq!(
        err,
        BattleError::Action(ActionError::NoPpRemaining("tackle".to_string()))
    );

    battle
        .turn(
            TurnAction::use_move("struggle"),
            TurnAction::use_move("growl"),
        )
        .unwrap();
    let text = battle.get_all_text();
    assert!(text.iter().any(|l| l == "PIKACHU has no moves left!"));
    assert!(text.iter().any(|l| l == "PIKACHU used Struggle!"));
    assert!(text.iter().any(|l| l == "PIKACHU is hit with recoil!"));
    assert!(battle.trainer(1).roster[0].cur_hp < 100);
    assert_eq!(battle.trainer(0).roster[0].cur_hp, 100 - 25);
}

#[test]
fn faint_replacement_uses_the_selection_callback_mid_turn() {
    let dex = dex();
    let roster = vec![
        mon(&dex, "pikachu", &["tackle"], [1, 100, 100, 100, 100, 1]),
        mon(&dex, "meowth", &["tackle"], [100; 6]),
        mon(&dex, "abra", &["tackle"], [100; 6]),
    ];
    let t1 = Trainer::new("Ash", roster)
        .unwrap()
        .with_selection(|trainer| trainer.current = 2);
    let t2 = Trainer::new("Misty", vec![mon(&dex, "geodude", &["tackle"], [100; 6])]).unwrap();
    let mut battle = Battle::new(dex.clone(), t1, t2).unwrap().with_rng(pinned());
    battle.start().unwrap();

    battle
        .turn(TurnAction::use_move("tackle"), TurnAction::use_move("tackle"))
        .unwrap();

    let text = battle.get_all_text();
    let faint = text.iter().position(|l| l == "PIKACHU fainted!").unwrap();
    let replace = text.iter().position(|l| l == "Ash sent out ABRA!").unwrap();
    assert!(faint < replace);
    assert_eq!(battle.trainer(0).current, 2);
    // The fainted side's action was dropped, and the replacement does
    // not inherit it.
    assert!(!text.iter().any(|l| l == "PIKACHU used Tackle!"));
    assert!(!text.iter().any(|l| l == "ABRA used Tackle!"));
}

#[test]
fn fainted_roster_order_replacement_without_callback() {
    let dex = dex();
    let roster = vec![
        mon(&dex, "pikachu", &["tackle"], [1, 100, 100, 100, 100, 1]),
        mon(&dex, "meowth", &["tackle"], [100; 6]),
    ];
    let t1 = Trainer::new("Ash", roster).unwrap();
    let t2 = Trainer::new("Misty", vec![mon(&dex, "geodude", &["tackle"], [100; 6])]).unwrap();
    let mut battle = Battle::new(dex.clone(), t1, t2).unwrap().with_rng(pinned());
    battle.start().unwrap();
    battle
        .turn(TurnAction::use_move("tackle"), TurnAction::use_move("tackle"))
        .unwrap();
    assert_eq!(battle.trainer(0).current, 1);
    assert!(battle.winner().is_none());
}
