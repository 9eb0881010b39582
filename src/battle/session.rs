use std::sync::Arc;

use schema::{NvStatusKind, PokemonType, RootingKind, Weather};

use crate::battle::engine::{BattleCtx, MoveOrigin};
use crate::battle::log::EventLog;
use crate::battle::rng::{BattleRng, StandardRng};
use crate::dex::{Dex, ItemKind};
use crate::errors::{ActionError, BattleResult, LifecycleError};
use crate::field::Battlefield;
use crate::moves::{title_case, MoveInstance};
use crate::pokemon::NvStatus;
use crate::trainer::Trainer;

/// One side's submission for a turn.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnAction {
    /// Use a move by catalog name
    Move(String),
    /// Use a bag item on a roster member
    Item { name: String, target: usize },
    /// Switch out through the trainer's replacement policy
    Switch,
}

impl TurnAction {
    pub fn use_move(name: &str) -> TurnAction {
        TurnAction::Move(name.to_string())
    }

    pub fn use_item(name: &str, target: usize) -> TurnAction {
        TurnAction::Item {
            name: name.to_string(),
            target,
        }
    }

    pub fn switch() -> TurnAction {
        TurnAction::Switch
    }
}

/// A match between two trainers: validates and orders submitted actions,
/// drives move resolution, runs the end-of-turn tick, and declares the
/// winner. All narration accumulates in the session's event log.
pub struct Battle {
    dex: Arc<Dex>,
    pub(crate) sides: [Trainer; 2],
    pub battlefield: Battlefield,
    rng: Box<dyn BattleRng>,
    started: bool,
    turn_count: u32,
    winner: Option<usize>,
    log: EventLog,
    pub last_move: Option<String>,
}

impl Battle {
    pub fn new(dex: Arc<Dex>, t1: Trainer, t2: Trainer) -> BattleResult<Battle> {
        Battle::with_setting(dex, t1, t2, None, None)
    }

    /// Construct with an explicit terrain and/or weather. Weather set
    /// here has no duration and never wears off on its own.
    pub fn with_setting(
        dex: Arc<Dex>,
        t1: Trainer,
        t2: Trainer,
        terrain: Option<&str>,
        weather: Option<&str>,
    ) -> BattleResult<Battle> {
        for trainer in [&t1, &t2] {
            if trainer.in_battle {
                return Err(LifecycleError::AlreadyInBattle(trainer.name.clone()).into());
            }
        }
        let battlefield = Battlefield::new(terrain, weather)?;
        Ok(Battle {
            dex,
            sides: [t1, t2],
            battlefield,
            rng: Box::new(StandardRng::new()),
            started: false,
            turn_count: 0,
            winner: None,
            log: EventLog::new(),
            last_move: None,
        })
    }

    /// Substitute the randomness source, pinning outcomes for tests or
    /// replays.
    pub fn with_rng(mut self, rng: impl BattleRng + 'static) -> Battle {
        self.rng = Box::new(rng);
        self
    }

    /// Swap the randomness source mid-battle.
    pub fn set_rng(&mut self, rng: impl BattleRng + 'static) {
        self.rng = Box::new(rng);
    }

    pub fn start(&mut self) -> BattleResult<()> {
        if self.started {
            return Err(LifecycleError::AlreadyStarted.into());
        }
        for side in 0..2 {
            if self.sides[side].in_battle {
                return Err(LifecycleError::AlreadyInBattle(self.sides[side].name.clone()).into());
            }
        }
        for side in 0..2 {
            self.sides[side].in_battle = true;
            let trainer = self.sides[side].name.clone();
            let nickname = self.sides[side].active().nickname.clone();
            self.log.push(format!("{} sent out {}!", trainer, nickname));
        }
        self.started = true;
        Ok(())
    }

    /// Resolve one full turn from both sides' submissions. Validation is
    /// all-or-nothing: an illegal action errors out before any state
    /// changes.
    pub fn turn(&mut self, action1: TurnAction, action2: TurnAction) -> BattleResult<()> {
        if !self.started {
            return Err(LifecycleError::NotStarted.into());
        }
        if self.winner.is_some() {
            return Err(LifecycleError::Finished.into());
        }
        self.validate_action(0, &action1)?;
        self.validate_action(1, &action2)?;

        self.turn_count += 1;
        self.log.push(format!("Turn {}:", self.turn_count));
        let actions = [action1, action2];
        let mut entered = [false, false];

        // Switches and items resolve before any move, in submission
        // order.
        for side in 0..2 {
            if self.is_forced(side) {
                continue;
            }
            if actions[side] == TurnAction::Switch {
                self.do_switch(side, &mut entered);
            }
        }
        for side in 0..2 {
            if self.is_forced(side) {
                continue;
            }
            if let TurnAction::Item { name, target } = &actions[side] {
                self.do_item(side, &name.to_lowercase(), *target);
                self.post_action(&mut entered);
            }
        }

        // Moves resolve by effective speed; equal speed keeps submission
        // order (side one first).
        let mut movers: Vec<usize> = (0..2)
            .filter(|&side| {
                self.is_forced(side) || matches!(actions[side], TurnAction::Move(_))
            })
            .collect();
        movers.sort_by_key(|&side| std::cmp::Reverse(self.sides[side].active().effective_speed()));

        // An action belongs to the combatant that was on the field when
        // the turn began; a mid-turn replacement does not inherit it.
        let actors = [self.sides[0].current, self.sides[1].current];
        let mut is_first = true;
        for &side in &movers {
            if self.winner.is_some() {
                break;
            }
            if self.sides[side].current != actors[side] || !self.sides[side].active().is_alive() {
                continue;
            }
            self.resolve_move_action(side, &actions[side], is_first);
            is_first = false;
            self.post_action(&mut entered);
        }

        if self.winner.is_none() {
            self.end_of_turn(entered);
        }
        Ok(())
    }

    pub fn get_all_text(&self) -> &[String] {
        self.log.all()
    }

    pub fn text_since(&self, start: usize) -> &[String] {
        self.log.since(start)
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn trainer(&self, side: usize) -> &Trainer {
        &self.sides[side]
    }

    pub fn winner(&self) -> Option<&Trainer> {
        self.winner.map(|side| &self.sides[side])
    }

    pub fn battle_started(&self) -> bool {
        self.started
    }

    pub fn is_finished(&self) -> bool {
        self.winner.is_some()
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// Tear down the session and hand the trainers back, ready for a new
    /// battle.
    pub fn into_trainers(mut self) -> (Trainer, Trainer) {
        for side in 0..2 {
            self.sides[side].in_battle = false;
            self.sides[side].light_screen = 0;
            self.sides[side].reflect = 0;
            self.sides[side].spikes = 0;
            for pokemon in &mut self.sides[side].roster {
                pokemon.switch_out();
            }
        }
        let [t1, t2] = self.sides;
        (t1, t2)
    }

    fn ctx(&mut self) -> BattleCtx<'_> {
        BattleCtx {
            dex: self.dex.as_ref(),
            field: &mut self.battlefield,
            sides: &mut self.sides,
            log: &mut self.log,
            rng: self.rng.as_mut(),
            last_move: &mut self.last_move,
        }
    }

    /// A combatant locked into a continuation or a recharge turn acts on
    /// its own; the submitted action is accepted and ignored.
    fn is_forced(&self, side: usize) -> bool {
        let active = self.sides[side].active();
        !active.next_actions.is_empty() || active.v.recharging
    }

    fn validate_action(&self, side: usize, action: &TurnAction) -> Result<(), ActionError> {
        if self.is_forced(side) {
            return Ok(());
        }
        let trainer = &self.sides[side];
        let active = trainer.active();
        match action {
            TurnAction::Move(name) => {
                let name = name.to_lowercase();
                if name == "struggle" {
                    return if active.out_of_usable_moves() {
                        Ok(())
                    } else {
                        Err(ActionError::MoveNotKnown(name))
                    };
                }
                match active.find_move(&name) {
                    None => Err(ActionError::MoveNotKnown(name)),
                    Some((index, copied)) => {
                        let pp = if copied {
                            active.copied.as_ref().map_or(0, |c| c.cur_pp)
                        } else {
                            active.moves[index].cur_pp
                        };
                        if pp == 0 {
                            Err(ActionError::NoPpRemaining(name))
                        } else if active.v.rage && name != "rage" {
                            Err(ActionError::MoveNotKnown(name))
                        } else {
                            Ok(())
                        }
                    }
                }
            }
            TurnAction::Item { name, target } => {
                if self.dex.item(&name.to_lowercase()).is_none() {
                    return Err(ActionError::UnknownItem(name.clone()));
                }
                match trainer.roster.get(*target) {
                    Some(member) if member.is_alive() => Ok(()),
                    _ => Err(ActionError::InvalidItemTarget(*target)),
                }
            }
            TurnAction::Switch => {
                if !trainer.has_reserve() {
                    return Err(ActionError::CannotSwitch(
                        "no healthy reserve to switch to".to_string(),
                    ));
                }
                if active.is_trapped() {
                    return Err(ActionError::CannotSwitch(format!(
                        "{} is trapped",
                        active.nickname
                    )));
                }
                Ok(())
            }
        }
    }

    fn do_switch(&mut self, side: usize, entered: &mut [bool; 2]) {
        let old_index = self.sides[side].current;
        let Some(choice) = self.sides[side].choose_replacement() else {
            return;
        };
        let trainer = self.sides[side].name.clone();
        let old = self.sides[side].roster[old_index].nickname.clone();
        self.sides[side].roster[old_index].switch_out();
        self.clear_foe_marks(side);
        self.sides[side].current = choice;
        entered[side] = true;
        let incoming = self.sides[side].active().nickname.clone();
        self.log.push(format!("{} withdrew {}!", trainer, old));
        self.log.push(format!("{} sent out {}!", trainer, incoming));
    }

    /// Marks a departing combatant leaves dangling on its opponent:
    /// identification, aim, and any binding it was maintaining.
    fn clear_foe_marks(&mut self, switching_side: usize) {
        let foe = 1 - switching_side;
        let foe_active = self.sides[foe].active_mut();
        foe_active.v.foresight = false;
        foe_active.v.lock_on = 0;
        if let Some(binding) = foe_active.v.binding {
            if binding.source == switching_side {
                foe_active.v.binding = None;
            }
        }
    }

    fn do_item(&mut self, side: usize, name: &str, target: usize) {
        let Some(kind) = self.dex.item(name).map(|item| item.kind.clone()) else {
            return;
        };
        let trainer = self.sides[side].name.clone();
        let target_nick = self.sides[side].roster[target].nickname.clone();
        self.log.push(format!(
            "{} used {} on {}!",
            trainer,
            title_case(name),
            target_nick
        ));
        let member = &mut self.sides[side].roster[target];
        let worked = match kind {
            ItemKind::Medicine { heal } => {
                member.v.heal_block == 0 && member.heal(heal) > 0
            }
            ItemKind::StatusCure { status } => match member.nv_status {
                Some(current) if status.map_or(true, |wanted| wanted == current.kind) => {
                    member.nv_status = None;
                    self.log
                        .push(format!("{}'s status returned to normal!", target_nick));
                    return;
                }
                _ => false,
            },
            ItemKind::FullRestore => {
                let healed = member.v.heal_block == 0 && member.heal(u16::MAX) > 0;
                let cured = member.nv_status.take().is_some();
                healed || cured
            }
            _ => false,
        };
        if worked {
            self.log.push(format!("{} regained health!", target_nick));
        } else {
            self.log.push("But, it failed!".to_string());
        }
    }

    fn resolve_move_action(&mut self, side: usize, action: &TurnAction, is_first: bool) {
        if self.sides[side].active().v.recharging {
            self.sides[side].active_mut().v.recharging = false;
            let nickname = self.sides[side].active().nickname.clone();
            self.log.push(format!("{} must recharge!", nickname));
            return;
        }
        if let Some(queued) = self.sides[side].active_mut().next_actions.pop_front() {
            self.ctx().process_move(side, MoveOrigin::Queued(queued), is_first);
            return;
        }
        let TurnAction::Move(name) = action else {
            return;
        };
        let name = name.to_lowercase();
        if name == "struggle" && self.sides[side].active().find_move("struggle").is_none() {
            let nickname = self.sides[side].active().nickname.clone();
            self.log.push(format!("{} has no moves left!", nickname));
            if let Some(data) = self.dex.move_data("struggle").cloned() {
                let transient = MoveInstance::new(data);
                self.ctx()
                    .process_move(side, MoveOrigin::Virtual(transient), is_first);
            }
            return;
        }
        let Some((index, copied)) = self.sides[side].active().find_move(&name) else {
            return;
        };
        self.ctx()
            .process_move(side, MoveOrigin::Slot { index, copied }, is_first);
    }

    /// Housekeeping after any resolved action: automatic held-berry
    /// healing, then faint announcements, replacements, and win
    /// detection.
    fn post_action(&mut self, entered: &mut [bool; 2]) {
        self.berry_check();
        self.handle_faints(entered);
    }

    fn berry_check(&mut self) {
        for side in 0..2 {
            let (alive, below_half, blocked, item) = {
                let active = self.sides[side].active();
                (
                    active.is_alive(),
                    active.cur_hp <= active.max_hp / 2,
                    active.v.heal_block > 0,
                    active.item.clone(),
                )
            };
            if !alive || !below_half || blocked {
                continue;
            }
            let Some(item_name) = item else { continue };
            let Some(ItemKind::HealBerry { heal }) =
                self.dex.item(&item_name).map(|i| i.kind.clone())
            else {
                continue;
            };
            let active = self.sides[side].active_mut();
            active.item = None;
            active.heal(heal);
            let nickname = active.nickname.clone();
            self.log
                .push(format!("{} ate its {}!", nickname, title_case(&item_name)));
        }
    }

    fn handle_faints(&mut self, entered: &mut [bool; 2]) {
        self.ctx().faint_check();
        for side in 0..2 {
            if self.winner.is_some() {
                return;
            }
            if self.sides[side].active().is_alive() {
                continue;
            }
            if self.sides[side].all_fainted() {
                let winner = 1 - side;
                self.winner = Some(winner);
                let winner_name = self.sides[winner].name.clone();
                let loser_name = self.sides[side].name.clone();
                self.log
                    .push(format!("{} has defeated {}!", winner_name, loser_name));
                return;
            }
            let old_index = self.sides[side].current;
            if let Some(choice) = self.sides[side].choose_replacement() {
                self.sides[side].roster[old_index].switch_out();
                self.clear_foe_marks(side);
                self.sides[side].current = choice;
                entered[side] = true;
                let trainer = self.sides[side].name.clone();
                let incoming = self.sides[side].active().nickname.clone();
                self.log.push(format!("{} sent out {}!", trainer, incoming));
            }
        }
    }

    /// End-of-turn housekeeping, in order: residual status damage,
    /// trap/curse/seed transfer, rooting and leftovers healing, weather
    /// decay, hazard damage for combatants that entered this turn, and
    /// counter ticks.
    fn end_of_turn(&mut self, entered: [bool; 2]) {
        let mut entered = entered;

        // Residual non-volatile status and weather chip damage.
        for side in 0..2 {
            let (alive, nickname, max_hp) = self.active_summary(side);
            if !alive {
                continue;
            }
            let status = self.sides[side].active().nv_status;
            match status {
                Some(NvStatus {
                    kind: NvStatusKind::Poisoned,
                    ..
                }) => {
                    let damage = (max_hp / 8).max(1);
                    self.sides[side].active_mut().take_damage(damage);
                    self.log.push(format!("{} is hurt by poison!", nickname));
                }
                Some(NvStatus {
                    kind: NvStatusKind::BadlyPoisoned,
                    counter,
                }) => {
                    let step = counter.min(15) as u32;
                    let damage = ((max_hp as u32 * step / 16) as u16).max(1);
                    let active = self.sides[side].active_mut();
                    active.take_damage(damage);
                    active.nv_status = Some(NvStatus {
                        kind: NvStatusKind::BadlyPoisoned,
                        counter: counter.saturating_add(1),
                    });
                    self.log.push(format!("{} is hurt by poison!", nickname));
                }
                Some(NvStatus {
                    kind: NvStatusKind::Burned,
                    ..
                }) => {
                    let damage = (max_hp / 16).max(1);
                    self.sides[side].active_mut().take_damage(damage);
                    self.log.push(format!("{} is hurt by its burn!", nickname));
                }
                _ => {}
            }

            let (immune_sand, immune_hail) = {
                let active = self.sides[side].active();
                (
                    active.has_type(PokemonType::Rock) || active.has_type(PokemonType::Ground),
                    active.has_type(PokemonType::Ice),
                )
            };
            match self.battlefield.weather {
                Weather::Sandstorm if !immune_sand && self.sides[side].active().is_alive() => {
                    let damage = (max_hp / 16).max(1);
                    self.sides[side].active_mut().take_damage(damage);
                    self.log
                        .push(format!("{} is buffeted by the sandstorm!", nickname));
                }
                Weather::Hail if !immune_hail && self.sides[side].active().is_alive() => {
                    let damage = (max_hp / 16).max(1);
                    self.sides[side].active_mut().take_damage(damage);
                    self.log.push(format!("{} is pelted by the hail!", nickname));
                }
                _ => {}
            }
        }

        // Binding, nightmare, curse, and leech seed transfer.
        for side in 0..2 {
            let (alive, nickname, max_hp) = self.active_summary(side);
            if !alive {
                continue;
            }

            if let Some(binding) = self.sides[side].active().v.binding {
                let damage = (max_hp / 16).max(1);
                self.sides[side].active_mut().take_damage(damage);
                self.log.push(format!(
                    "{} is hurt by {}!",
                    nickname,
                    binding.kind.display_name()
                ));
                let active = self.sides[side].active_mut();
                if binding.turns <= 1 {
                    active.v.binding = None;
                    self.log.push(format!(
                        "{} was freed from {}!",
                        nickname,
                        binding.kind.display_name()
                    ));
                } else {
                    active.v.binding = Some(crate::pokemon::Binding {
                        turns: binding.turns - 1,
                        ..binding
                    });
                }
            }

            if self.sides[side].active().v.nightmare {
                let asleep = matches!(
                    self.sides[side].active().nv_status,
                    Some(NvStatus {
                        kind: NvStatusKind::Asleep,
                        ..
                    })
                );
                if asleep {
                    let damage = (max_hp / 4).max(1);
                    self.sides[side].active_mut().take_damage(damage);
                    self.log
                        .push(format!("{} is locked in a nightmare!", nickname));
                } else {
                    self.sides[side].active_mut().v.nightmare = false;
                }
            }

            if self.sides[side].active().v.cursed && self.sides[side].active().is_alive() {
                let damage = (max_hp / 4).max(1);
                self.sides[side].active_mut().take_damage(damage);
                self.log
                    .push(format!("{} is afflicted by the curse!", nickname));
            }

            if self.sides[side].active().v.leech_seed && self.sides[side].active().is_alive() {
                let damage = (max_hp / 8).max(1);
                let dealt = self.sides[side].active_mut().take_damage(damage);
                self.log
                    .push(format!("{}'s health is sapped by Leech Seed!", nickname));
                let foe = 1 - side;
                let foe_active = self.sides[foe].active_mut();
                if foe_active.is_alive() && foe_active.v.heal_block == 0 {
                    foe_active.heal(dealt);
                }
            }
        }

        // Rooting and leftovers healing.
        for side in 0..2 {
            let (alive, nickname, max_hp) = self.active_summary(side);
            if !alive {
                continue;
            }
            let rooting = self.sides[side].active().v.rooting;
            if let Some(kind) = rooting {
                if self.sides[side].active().v.heal_block == 0 {
                    let amount = (max_hp / 16).max(1);
                    if self.sides[side].active_mut().heal(amount) > 0 {
                        let text = match kind {
                            RootingKind::AquaRing => {
                                format!("A veil of water restored {}'s HP!", nickname)
                            }
                            RootingKind::Ingrain => {
                                format!("{} absorbed nutrients with its roots!", nickname)
                            }
                        };
                        self.log.push(text);
                    }
                }
            }
            let has_leftovers = {
                let active = self.sides[side].active();
                active
                    .item
                    .as_deref()
                    .and_then(|name| self.dex.item(name))
                    .map_or(false, |item| matches!(item.kind, ItemKind::Leftovers))
            };
            if has_leftovers && self.sides[side].active().v.heal_block == 0 {
                let amount = (max_hp / 16).max(1);
                if self.sides[side].active_mut().heal(amount) > 0 {
                    self.log.push(format!(
                        "{} restored a little HP using its Leftovers!",
                        nickname
                    ));
                }
            }
        }

        // Weather runs down only when it has a duration.
        if self.battlefield.weather != Weather::Clear {
            match self.battlefield.weather_count {
                Some(count) if count <= 1 => {
                    let ended = Battlefield::ended_text(self.battlefield.weather);
                    self.battlefield.clear_weather();
                    if let Some(text) = ended {
                        self.log.push(text.to_string());
                    }
                }
                Some(count) => {
                    self.battlefield.weather_count = Some(count - 1);
                    if let Some(text) = self.battlefield.continues_text() {
                        self.log.push(text.to_string());
                    }
                }
                None => {
                    if let Some(text) = self.battlefield.continues_text() {
                        self.log.push(text.to_string());
                    }
                }
            }
        }

        // Entry hazards for combatants that came in this turn.
        for side in 0..2 {
            if !entered[side] || self.sides[side].spikes == 0 {
                continue;
            }
            let (alive, nickname, max_hp) = self.active_summary(side);
            if !alive {
                continue;
            }
            let divisor = match self.sides[side].spikes {
                1 => 8,
                2 => 6,
                _ => 4,
            };
            let damage = (max_hp / divisor).max(1);
            self.sides[side].active_mut().take_damage(damage);
            self.log.push(format!("{} is hurt by the spikes!", nickname));
        }

        // Counter ticks.
        for side in 0..2 {
            let active = self.sides[side].active_mut();
            active.tick_disable_counters();
            active.v.mist = active.v.mist.saturating_sub(1);
            active.v.heal_block = active.v.heal_block.saturating_sub(1);
            active.v.lock_on = active.v.lock_on.saturating_sub(1);
            active.v.flinched = false;
            if active.v.protect {
                active.v.protect = false;
            } else {
                active.v.protect_streak = 0;
            }
            self.sides[side].tick_screens();
        }

        self.handle_faints(&mut entered);
    }

    fn active_summary(&self, side: usize) -> (bool, String, u16) {
        let active = self.sides[side].active();
        (active.is_alive(), active.nickname.clone(), active.max_hp)
    }
}
