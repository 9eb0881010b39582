use schema::{BindingKind, MoveCategory, NvStatusKind, RootingKind, Stat, Weather};

use crate::battle::damage::DamageOpts;
use crate::battle::effects::{MoveEffect, Recipient};
use crate::battle::log::EventLog;
use crate::battle::rng::BattleRng;
use crate::dex::{Dex, ItemKind};
use crate::field::Battlefield;
use crate::moves::{MoveData, MoveInstance};
use crate::pokemon::{Binding, NvStatus, Pokemon, QueuedMove, StreakState};
use crate::trainer::Trainer;

/// Moves a copying effect may never produce: they either recurse or make
/// no sense secondhand.
pub(crate) const UNCOPYABLE: &[&str] = &[
    "counter",
    "covet",
    "detect",
    "metronome",
    "mimic",
    "mirror-move",
    "protect",
    "sketch",
    "struggle",
    "thief",
    "transform",
];

/// Moves usable while fast asleep.
pub(crate) const SLEEP_USABLE: &[&str] = &["snore", "sleep-talk"];

/// Where the move being resolved came from.
pub(crate) enum MoveOrigin {
    /// A moveset slot (or the mimic copy); PP and state write back here
    Slot { index: usize, copied: bool },
    /// A forced continuation popped from the combatant's queue
    Queued(QueuedMove),
    /// A transient move that lives nowhere (struggle)
    Virtual(MoveInstance),
}

/// Everything one action resolution may read or mutate, borrowed from the
/// session for the duration of the action.
pub(crate) struct BattleCtx<'a> {
    pub dex: &'a Dex,
    pub field: &'a mut Battlefield,
    pub sides: &'a mut [Trainer; 2],
    pub log: &'a mut EventLog,
    pub rng: &'a mut dyn BattleRng,
    pub last_move: &'a mut Option<String>,
}

impl BattleCtx<'_> {
    pub(crate) fn active(&self, side: usize) -> &Pokemon {
        let trainer = &self.sides[side];
        &trainer.roster[trainer.current]
    }

    pub(crate) fn active_mut(&mut self, side: usize) -> &mut Pokemon {
        let current = self.sides[side].current;
        &mut self.sides[side].roster[current]
    }

    fn nick(&self, side: usize) -> String {
        self.active(side).nickname.clone()
    }

    fn holds_item_kind(&self, side: usize, probe: fn(&ItemKind) -> bool) -> bool {
        self.active(side)
            .item
            .as_deref()
            .and_then(|name| self.dex.item(name))
            .map_or(false, |item| probe(&item.kind))
    }

    /// Narrate newly emptied HP bars, once per combatant.
    pub(crate) fn faint_check(&mut self) {
        for side in 0..2 {
            let pokemon = self.active_mut(side);
            if !pokemon.is_alive() && !pokemon.faint_announced {
                pokemon.faint_announced = true;
                let nickname = pokemon.nickname.clone();
                self.log.push(format!("{} fainted!", nickname));
            }
        }
    }

    /// Route move damage through the defender's substitute if one is up;
    /// otherwise land it and keep the retaliation bookkeeping current.
    pub(crate) fn apply_move_damage(&mut self, def: usize, amount: u16, data: &MoveData) -> u16 {
        let defender = self.active_mut(def);
        if defender.v.substitute > 0 {
            let nickname = defender.nickname.clone();
            if amount >= defender.v.substitute {
                defender.v.substitute = 0;
                self.log
                    .push(format!("The substitute took damage for {}!", nickname));
                self.log.push(format!("{}'s substitute faded!", nickname));
            } else {
                defender.v.substitute -= amount;
                self.log
                    .push(format!("The substitute took damage for {}!", nickname));
            }
            return amount;
        }
        let dealt = defender.take_damage(amount);
        defender.last_damage_taken = dealt;
        defender.last_move_hit_by = Some(data.clone());
        if let Some(stored) = defender.v.bide_damage.as_mut() {
            *stored = stored.saturating_add(dealt);
        }
        dealt
    }

    /// Heal that respects heal blocking. Returns the amount restored.
    fn heal_checked(&mut self, side: usize, amount: u16) -> u16 {
        if self.active(side).v.heal_block > 0 {
            return 0;
        }
        self.active_mut(side).heal(amount)
    }

    /// Execute one attacker's move through the full pipeline: disable
    /// gate, status gate, announcement, accuracy, protection, effect
    /// dispatch, faint check.
    pub(crate) fn process_move(&mut self, atk: usize, origin: MoveOrigin, is_first: bool) {
        let def = 1 - atk;
        let (mut mv, phase, slot) = match &origin {
            MoveOrigin::Slot { index, copied } => {
                let attacker = self.active(atk);
                let fetched = if *copied {
                    attacker.copied.clone()
                } else {
                    attacker.moves.get(*index).cloned()
                };
                let Some(fetched) = fetched else { return };
                (fetched, 0, if *copied { None } else { Some(*index) })
            }
            MoveOrigin::Queued(queued) => (queued.mv.clone(), queued.phase, None),
            MoveOrigin::Virtual(inst) => (inst.clone(), 0, None),
        };

        // A released vanishing move surfaces before the strike resolves,
        // whether or not it goes on to hit.
        if phase > 0
            && matches!(
                MoveEffect::from_id(mv.data.effect_id),
                Some(MoveEffect::ChargeFly) | Some(MoveEffect::ChargeDig)
            )
        {
            let attacker = self.active_mut(atk);
            attacker.v.in_air = false;
            attacker.v.in_ground = false;
            attacker.v.invulnerable = false;
        }

        if matches!(&origin, MoveOrigin::Slot { .. }) {
            if mv.is_disabled() {
                self.log
                    .push(format!("{} is disabled!", mv.data.display_name()));
                return;
            }
            mv.spend_pp();
        }

        if !self.pre_move_gate(atk, &mv) {
            self.commit_move(atk, &origin, mv);
            return;
        }

        let nickname = self.nick(atk);
        self.log
            .push(format!("{} used {}!", nickname, mv.data.display_name()));
        *self.last_move = Some(mv.data.name.clone());
        {
            let attacker = self.active_mut(atk);
            attacker.last_move = Some(mv.data.clone());
            // Switching moves breaks a running streak.
            if let Some(streak) = attacker.v.streak.clone() {
                if streak.move_name != mv.data.name {
                    attacker.v.streak = None;
                    for owned in &mut attacker.moves {
                        if owned.data.name == streak.move_name {
                            owned.reset_power();
                        }
                    }
                }
            }
        }

        if !self.roll_hit(atk, def, &mv) {
            if self.active(def).evasion_stage > 0 {
                let defender = self.nick(def);
                self.log.push(format!("{} avoided the attack!", defender));
            } else {
                self.missed(atk);
            }
            if MoveEffect::from_id(mv.data.effect_id) == Some(MoveEffect::Streak) {
                self.active_mut(atk).v.streak = None;
                mv.reset_power();
            }
            self.commit_move(atk, &origin, mv);
            return;
        }
        self.active_mut(atk).last_successful_move = Some(mv.data.clone());

        let protected = {
            let defender = self.active(def);
            defender.is_alive() && defender.v.protect
        };
        if protected && mv.data.is_single_target() {
            let defender = self.nick(def);
            self.log.push(format!("{} protected itself!", defender));
            self.commit_move(atk, &origin, mv);
            return;
        }

        self.process_effect(atk, def, &mut mv, slot, phase, is_first);
        self.faint_check();
        self.commit_move(atk, &origin, mv);
    }

    fn commit_move(&mut self, atk: usize, origin: &MoveOrigin, mv: MoveInstance) {
        if let MoveOrigin::Slot { index, copied } = origin {
            let attacker = self.active_mut(atk);
            if *copied {
                if mv.cur_pp == 0 {
                    attacker.copied = None;
                } else if attacker.copied.as_ref().map(|c| c.data.id) == Some(mv.data.id) {
                    attacker.copied = Some(mv);
                }
            } else if let Some(slot_mv) = attacker.moves.get_mut(*index) {
                if slot_mv.data.id == mv.data.id {
                    *slot_mv = mv;
                }
            }
        }
    }

    /// Pre-move status gating. Returns false when the turn is spent
    /// without the move executing.
    fn pre_move_gate(&mut self, atk: usize, mv: &MoveInstance) -> bool {
        let nickname = self.nick(atk);

        if matches!(
            self.active(atk).nv_status,
            Some(NvStatus { kind: NvStatusKind::Frozen, .. })
        ) {
            if !self.rng.thaw_check() {
                self.log.push(format!("{} is frozen solid!", nickname));
                return false;
            }
            self.active_mut(atk).nv_status = None;
            self.log.push(format!("{} thawed out!", nickname));
        }

        if let Some(status) = self.active(atk).nv_status {
            if status.kind == NvStatusKind::Asleep {
                if status.counter == 0 {
                    self.active_mut(atk).nv_status = None;
                } else {
                    let remaining = status.counter - 1;
                    if remaining > 0 {
                        self.active_mut(atk).nv_status = Some(NvStatus {
                            kind: NvStatusKind::Asleep,
                            counter: remaining,
                        });
                        self.log.push(format!("{} is fast asleep!", nickname));
                        if !SLEEP_USABLE.contains(&mv.data.name.as_str()) {
                            return false;
                        }
                    } else {
                        self.active_mut(atk).nv_status = None;
                        self.log.push(format!("{} woke up!", nickname));
                    }
                }
            }
        }

        if self.active(atk).v.flinched {
            self.active_mut(atk).v.flinched = false;
            self.log
                .push(format!("{} flinched and couldn't move", nickname));
            return false;
        }

        if matches!(
            self.active(atk).nv_status,
            Some(NvStatus { kind: NvStatusKind::Paralyzed, .. })
        ) && self.rng.paralysis_check()
        {
            self.log
                .push(format!("{} is paralyzed! It can't move!", nickname));
            return false;
        }

        if self.active(atk).v.confused > 0 {
            self.active_mut(atk).v.confused -= 1;
            if self.active(atk).v.confused > 0 {
                self.log.push(format!("{} is confused!", nickname));
                if self.rng.confusion_self_hit_check() {
                    self.log.push("It hurt itself in its confusion!".to_string());
                    let self_hit = MoveData::confusion_self_hit();
                    self.calculate_damage(atk, atk, &self_hit, Some(40), DamageOpts::default());
                    self.faint_check();
                    return false;
                }
            }
        }

        true
    }

    /// Effect dispatch: chance gate, then exactly one handler per effect
    /// variant. Handlers either finish and return, or configure the
    /// trailing damage call and fall through.
    fn process_effect(
        &mut self,
        atk: usize,
        def: usize,
        mv: &mut MoveInstance,
        slot: Option<usize>,
        phase: u8,
        is_first: bool,
    ) {
        let chance = mv.data.effect_chance.unwrap_or(100) as u32;
        if self.rng.effect_roll() > chance {
            return;
        }
        let Some(effect) = MoveEffect::from_id(mv.data.effect_id) else {
            return;
        };

        let mut crit_bonus: Option<u16> = None;
        let mut inv_bypass = false;
        let mut power = mv.power;
        let ef_stat = mv.data.effect_stat.unwrap_or(0);
        let ef_amount = mv.data.effect_amount.unwrap_or(0);

        match effect {
            MoveEffect::Plain => {
                self.calculate_damage(atk, def, &mv.data, power, DamageOpts::default());
                return;
            }
            MoveEffect::HitThenStatChange(recipient) => {
                self.calculate_damage(atk, def, &mv.data, power, DamageOpts::default());
                let side = recipient_side(atk, def, recipient);
                if !self.active(side).is_alive() {
                    return;
                }
                self.give_stat_change(side, ef_stat, ef_amount as i8, false);
                return;
            }
            MoveEffect::HitThenStatus(recipient) => {
                self.calculate_damage(atk, def, &mv.data, power, DamageOpts::default());
                let side = recipient_side(atk, def, recipient);
                if self.active(side).is_alive() {
                    self.give_nv_status(ef_stat, side, false);
                }
                return;
            }
            MoveEffect::InflictVolatile(recipient) => {
                let side = recipient_side(atk, def, recipient);
                if !self.active(side).is_alive() {
                    self.failed();
                    return;
                }
                if ef_stat == 1 {
                    self.flinch(side, is_first);
                } else {
                    self.confuse(side, false);
                }
                return;
            }
            MoveEffect::RaisedCrit => {
                crit_bonus = Some(ef_amount as u16);
            }
            MoveEffect::MultiHit => {
                if !self.active(def).is_alive() {
                    self.missed(atk);
                }
                let hits = self.rng.multi_hit_count();
                let mut remaining = hits;
                while remaining > 0 && self.active(def).is_alive() {
                    self.calculate_damage(
                        atk,
                        def,
                        &mv.data,
                        power,
                        DamageOpts {
                            skip_faint_check: true,
                            ..DamageOpts::default()
                        },
                    );
                    remaining -= 1;
                }
                self.log.push(format!("Hit {} time(s)!", hits));
                return;
            }
            MoveEffect::DoubleHit => {
                if !self.active(def).is_alive() {
                    self.missed(atk);
                }
                let opts = DamageOpts {
                    skip_faint_check: true,
                    ..DamageOpts::default()
                };
                self.calculate_damage(atk, def, &mv.data, power, opts);
                if self.active(def).is_alive() {
                    self.calculate_damage(atk, def, &mv.data, power, opts);
                } else {
                    self.log.push("Hit 1 time(s)!".to_string());
                    return;
                }
                self.log.push("Hit 2 time(s)!".to_string());
                return;
            }
            MoveEffect::InflictStatus(recipient) => {
                let side = recipient_side(atk, def, recipient);
                if self.active(side).is_alive() {
                    self.give_nv_status(ef_stat, side, true);
                } else {
                    self.failed();
                }
                return;
            }
            MoveEffect::ForceConfuse => {
                if !self.active(def).is_alive() {
                    return;
                }
                if ef_stat == 0 {
                    self.confuse(def, true);
                }
                return;
            }
            MoveEffect::StatChange(recipient) => {
                if recipient == Recipient::Target && self.active(def).v.mist > 0 {
                    let defender = self.nick(def);
                    self.log
                        .push(format!("{}'s protected by mist.", defender));
                    return;
                }
                let side = recipient_side(atk, def, recipient);
                self.give_stat_change(side, ef_stat, ef_amount as i8, false);
                return;
            }
            MoveEffect::StompFlinch => {
                if self.active(def).v.minimized {
                    power = power.map(|p| p * 2);
                }
                self.calculate_damage(atk, def, &mv.data, power, DamageOpts::default());
                if self.rng.flinch_roll(30) {
                    self.flinch(def, is_first);
                }
                return;
            }
            MoveEffect::Ohko => {
                if !self.active(def).is_alive() {
                    self.missed(atk);
                }
                let t_mult = self.type_multiplier(mv.data.move_type, self.active(def));
                if t_mult != 0.0 {
                    self.apply_move_damage(def, u16::MAX, &mv.data);
                    self.faint_check();
                    if !self.active(def).is_alive() {
                        self.log.push("It's a one-hit KO!".to_string());
                    }
                } else {
                    let defender = self.nick(def);
                    self.log.push(format!("It doesn't affect {}", defender));
                }
                return;
            }
            MoveEffect::ChargeRazorWind => {
                if phase == 0 {
                    let nickname = self.nick(atk);
                    if self.holds_item_kind(atk, |k| matches!(k, ItemKind::ChargeHerb)) {
                        self.log.push(format!(
                            "{} became fully charged due to its Power Herb!",
                            nickname
                        ));
                    } else {
                        self.log
                            .push(format!("{} whipped up a whirlwind!", nickname));
                        self.active_mut(atk)
                            .next_actions
                            .push_back(QueuedMove { mv: mv.clone(), phase: 1 });
                        return;
                    }
                }
                crit_bonus = Some(ef_amount as u16);
            }
            MoveEffect::GustAntiAir => {
                if self.active(def).v.in_air {
                    inv_bypass = true;
                    power = power.map(|p| p * 2);
                }
            }
            MoveEffect::ChargeFly => {
                if phase == 0 {
                    let nickname = self.nick(atk);
                    if self.holds_item_kind(atk, |k| matches!(k, ItemKind::ChargeHerb)) {
                        self.log.push(format!(
                            "{} became fully charged due to its Power Herb!",
                            nickname
                        ));
                    } else {
                        self.log.pop_last();
                        self.log.push(format!("{} flew up high!", nickname));
                        let attacker = self.active_mut(atk);
                        attacker.v.in_air = true;
                        attacker.v.invulnerable = true;
                        attacker
                            .next_actions
                            .push_back(QueuedMove { mv: mv.clone(), phase: 1 });
                        return;
                    }
                }
            }
            MoveEffect::Binding => {
                self.calculate_damage(atk, def, &mv.data, power, DamageOpts::default());
                let eligible = {
                    let defender = self.active(def);
                    defender.is_alive()
                        && defender.v.substitute == 0
                        && defender.v.binding.is_none()
                };
                if eligible {
                    if let Some(kind) = BindingKind::from_code(ef_stat) {
                        let turns = self.rng.trap_turns();
                        self.active_mut(def).v.binding = Some(Binding {
                            kind,
                            turns,
                            source: atk,
                        });
                        let attacker = self.nick(atk);
                        let defender = self.nick(def);
                        let text = match kind {
                            BindingKind::Bind => {
                                format!("{} was squeezed by {}!", defender, attacker)
                            }
                            BindingKind::Wrap => {
                                format!("{} was wrapped by {}!", defender, attacker)
                            }
                            BindingKind::FireSpin => {
                                format!("{} was trapped in the vortex!", defender)
                            }
                            BindingKind::Clamp => {
                                format!("{} clamped {}!", attacker, defender)
                            }
                        };
                        self.log.push(text);
                    }
                }
                return;
            }
            MoveEffect::CrashRisk => {
                if !self.active(def).is_alive() {
                    return;
                }
                let dealt = self
                    .calculate_damage(atk, def, &mv.data, power, DamageOpts::default())
                    .map(|d| d / 2)
                    .unwrap_or(0);
                if dealt == 0 {
                    return;
                }
                let nickname = self.nick(atk);
                self.log
                    .push(format!("{} kept going and crashed!", nickname));
                self.active_mut(atk).take_damage(dealt);
                return;
            }
            MoveEffect::AntiDig => {
                if self.active(def).v.in_ground {
                    inv_bypass = true;
                    power = power.map(|p| p * 2);
                }
            }
            MoveEffect::RecoilQuarter | MoveEffect::RecoilThird => {
                let dealt = self.calculate_damage(atk, def, &mv.data, power, DamageOpts::default());
                if let Some(dealt) = dealt {
                    if dealt > 0 {
                        let recoil = if effect == MoveEffect::RecoilQuarter {
                            dealt / 4
                        } else {
                            dealt / 3
                        };
                        self.active_mut(atk).take_damage(recoil);
                        let nickname = self.nick(atk);
                        self.log.push(format!("{} is hit with recoil!", nickname));
                    }
                }
                return;
            }
            MoveEffect::Rampage => {
                if phase == 0 {
                    let turns = self.rng.rampage_turns();
                    self.active_mut(atk)
                        .next_actions
                        .push_back(QueuedMove { mv: mv.clone(), phase: turns });
                } else if phase > 1 {
                    self.active_mut(atk)
                        .next_actions
                        .push_back(QueuedMove { mv: mv.clone(), phase: phase - 1 });
                } else {
                    self.calculate_damage(atk, def, &mv.data, power, DamageOpts::default());
                    self.confuse(atk, false);
                    return;
                }
            }
            MoveEffect::DoubleHitPoison => {
                self.calculate_damage(atk, def, &mv.data, power, DamageOpts::default());
                if !self.active(def).is_alive() {
                    return;
                }
                if self.rng.status_roll(20) {
                    self.give_nv_status(4, def, false);
                }
                self.calculate_damage(atk, def, &mv.data, power, DamageOpts::default());
                if self.active(def).is_alive() && self.rng.status_roll(20) {
                    self.give_nv_status(4, def, false);
                }
                return;
            }
            MoveEffect::FixedDamage => {
                let t_mult = self.type_multiplier(mv.data.move_type, self.active(def));
                if self.active(def).is_alive() && t_mult != 0.0 {
                    self.apply_move_damage(def, ef_amount as u16, &mv.data);
                } else {
                    self.missed(atk);
                }
                return;
            }
            MoveEffect::Disable => {
                let last = self.active(def).last_move.clone();
                let usable = match &last {
                    Some(data) => {
                        let defender = self.active(def);
                        let has_disabled = defender.moves.iter().any(|m| m.is_disabled());
                        let has_pp = defender
                            .find_move(&data.name)
                            .map(|(i, copied)| {
                                if copied {
                                    defender.copied.as_ref().map_or(0, |c| c.cur_pp)
                                } else {
                                    defender.moves[i].cur_pp
                                }
                            })
                            .unwrap_or(0)
                            > 0;
                        !has_disabled && has_pp
                    }
                    None => false,
                };
                if !usable {
                    self.failed();
                    return;
                }
                let Some(data) = last else { return };
                let turns = self.rng.disable_turns();
                let trainer = self.sides[def].name.clone();
                let defender = self.nick(def);
                if let Some((i, false)) = self.active(def).find_move(&data.name) {
                    self.active_mut(def).moves[i].disabled = turns;
                }
                self.log.push(format!(
                    "{}'s {}'s {} was disabled!",
                    trainer,
                    defender,
                    data.display_name()
                ));
                return;
            }
            MoveEffect::Mist => {
                if self.active(atk).v.mist > 0 {
                    self.failed();
                    return;
                }
                let trainer = self.sides[atk].name.clone();
                self.log
                    .push(format!("{}'s team became shrouded in mist!", trainer));
                self.active_mut(atk).v.mist = 5;
                return;
            }
            MoveEffect::RechargeAfter => {
                self.active_mut(atk).v.recharging = true;
            }
            MoveEffect::WeightScaled => {
                let weight = self.active(def).weight;
                power = Some(match weight {
                    0..=99 => 20,
                    100..=249 => 40,
                    250..=499 => 60,
                    500..=999 => 80,
                    1000..=1999 => 100,
                    _ => 120,
                });
            }
            MoveEffect::CounterPhysical => {
                let (hit_by_physical, stored) = {
                    let attacker = self.active(atk);
                    (
                        attacker
                            .last_move_hit_by
                            .as_ref()
                            .map_or(false, |m| m.category == MoveCategory::Physical),
                        attacker.last_damage_taken,
                    )
                };
                let t_mult = self.type_multiplier(mv.data.move_type, self.active(def));
                if self.active(def).is_alive() && hit_by_physical && stored > 0 && t_mult != 0.0 {
                    self.apply_move_damage(def, stored.saturating_mul(2), &mv.data);
                } else {
                    self.failed();
                }
                return;
            }
            MoveEffect::LevelDamage => {
                let t_mult = self.type_multiplier(mv.data.move_type, self.active(def));
                if t_mult != 0.0 {
                    if self.active(def).is_alive() {
                        let level = self.active(atk).level as u16;
                        self.apply_move_damage(def, level, &mv.data);
                    } else {
                        self.missed(atk);
                    }
                }
                return;
            }
            MoveEffect::DrainHalf => {
                let dealt = self.calculate_damage(atk, def, &mv.data, power, DamageOpts::default());
                if let Some(dealt) = dealt {
                    if dealt > 0 {
                        let restore = if dealt == 1 { 1 } else { dealt / 2 };
                        self.heal_checked(atk, restore);
                        let defender = self.nick(def);
                        self.log
                            .push(format!("{} had it's energy drained!", defender));
                    }
                }
                return;
            }
            MoveEffect::LeechSeed => {
                let eligible = {
                    let defender = self.active(def);
                    defender.is_alive() && defender.v.substitute == 0 && !defender.v.leech_seed
                };
                if eligible {
                    self.active_mut(def).v.leech_seed = true;
                    let defender = self.nick(def);
                    self.log.push(format!("{} was seeded!", defender));
                }
                return;
            }
            MoveEffect::ChargeSolar => {
                if phase == 0 {
                    let nickname = self.nick(atk);
                    if self.holds_item_kind(atk, |k| matches!(k, ItemKind::ChargeHerb)) {
                        self.log.push(format!(
                            "{} became fully charged due to its Power Herb!",
                            nickname
                        ));
                    } else {
                        self.log.pop_last();
                        self.log.push(format!("{} absorbed light!", nickname));
                        self.active_mut(atk)
                            .next_actions
                            .push_back(QueuedMove { mv: mv.clone(), phase: 1 });
                        return;
                    }
                }
            }
            MoveEffect::SecondaryParalyze => {
                self.calculate_damage(atk, def, &mv.data, power, DamageOpts::default());
                if self.active(def).is_alive() && self.rng.status_roll(30) {
                    self.give_nv_status(3, def, false);
                }
                return;
            }
            MoveEffect::ChargeDig => {
                if phase == 0 {
                    let nickname = self.nick(atk);
                    if self.holds_item_kind(atk, |k| matches!(k, ItemKind::ChargeHerb)) {
                        self.log.push(format!(
                            "{} became fully charged due to its Power Herb!",
                            nickname
                        ));
                    } else {
                        self.log.pop_last();
                        self.log
                            .push(format!("{} burrowed its way under the ground!", nickname));
                        let attacker = self.active_mut(atk);
                        attacker.v.in_ground = true;
                        attacker.v.invulnerable = true;
                        attacker
                            .next_actions
                            .push_back(QueuedMove { mv: mv.clone(), phase: 1 });
                        return;
                    }
                }
            }
            MoveEffect::Rage => {
                self.active_mut(atk).v.rage = true;
            }
            MoveEffect::Mimic => {
                let last = self.active(def).last_move.clone();
                let blocked = {
                    let attacker = self.active(atk);
                    attacker.copied.is_some()
                        || !self.active(def).is_alive()
                        || last
                            .as_ref()
                            .map_or(true, |data| attacker.knows_move(&data.name))
                };
                if blocked {
                    self.failed();
                    return;
                }
                let Some(data) = last else { return };
                let display = data.display_name();
                self.active_mut(atk).copied = Some(MoveInstance::copied(data));
                let nickname = self.nick(atk);
                self.log.push(format!("{} learned {}", nickname, display));
                return;
            }
            MoveEffect::DoubleDefDrop => {
                self.give_stat_change(def, Stat::Defense.index() as i16, -2, true);
                return;
            }
            MoveEffect::HealHalf => {
                if self.active(atk).v.heal_block > 0 {
                    self.failed();
                    return;
                }
                let amount = self.active(atk).max_hp / 2;
                self.active_mut(atk).heal(amount);
                let nickname = self.nick(atk);
                self.log.push(format!("{} recovered health!", nickname));
                return;
            }
            MoveEffect::Minimize => {
                self.active_mut(atk).v.minimized = true;
                self.give_stat_change(atk, Stat::Evasion.index() as i16, 1, false);
                return;
            }
            MoveEffect::DefenseCurl => {
                let attacker = self.active_mut(atk);
                attacker.v.curled = true;
                for owned in &mut attacker.moves {
                    if MoveEffect::from_id(owned.data.effect_id) == Some(MoveEffect::Streak)
                        && owned.power == owned.data.power
                    {
                        owned.power = owned.power.map(|p| p * 2);
                    }
                }
                self.give_stat_change(atk, Stat::Defense.index() as i16, 1, false);
                return;
            }
            MoveEffect::Screen => {
                let trainer_name = self.sides[atk].name.clone();
                if ef_stat == 1 {
                    if self.sides[atk].light_screen > 0 {
                        self.failed();
                        return;
                    }
                    self.sides[atk].light_screen = 5;
                    self.log.push(format!(
                        "Light Screen raised {}'s team's Special Defense!",
                        trainer_name
                    ));
                } else {
                    if self.sides[atk].reflect > 0 {
                        self.failed();
                        return;
                    }
                    self.sides[atk].reflect = 5;
                    self.log.push(format!(
                        "Reflect raised {}'s team's Defense!",
                        trainer_name
                    ));
                }
                return;
            }
            MoveEffect::Haze => {
                self.active_mut(atk).reset_stages();
                self.active_mut(def).reset_stages();
                self.log
                    .push("All stat changes were eliminated!".to_string());
                return;
            }
            MoveEffect::FocusEnergy => {
                let attacker = self.active_mut(atk);
                attacker.crit_stage = (attacker.crit_stage + 2).min(4);
                let nickname = self.nick(atk);
                self.log.push(format!("{} is getting pumped!", nickname));
                return;
            }
            MoveEffect::Bide => {
                let nickname = self.nick(atk);
                if phase == 0 {
                    self.active_mut(atk).v.bide_damage = Some(0);
                    let turns = if is_first { 2 } else { 3 };
                    self.active_mut(atk)
                        .next_actions
                        .push_back(QueuedMove { mv: mv.clone(), phase: turns });
                    self.log.push(format!("{} is storing energy!", nickname));
                } else if phase > 1 {
                    self.log.pop_last();
                    self.log.push(format!("{} is storing energy!", nickname));
                    self.active_mut(atk)
                        .next_actions
                        .push_back(QueuedMove { mv: mv.clone(), phase: phase - 1 });
                } else {
                    self.log.pop_last();
                    self.log.push(format!("{} unleashed energy!", nickname));
                    let stored = self.active(atk).v.bide_damage.unwrap_or(0);
                    self.active_mut(atk).v.bide_damage = None;
                    if self.active(def).is_alive() {
                        if stored > 0 {
                            self.apply_move_damage(def, stored.saturating_mul(2), &mv.data);
                        }
                    } else {
                        self.missed(atk);
                    }
                }
                return;
            }
            MoveEffect::Metronome => {
                let picked = loop {
                    let candidate = self.dex.random_move(self.rng).clone();
                    let known = self.active(atk).knows_move(&candidate.name);
                    if !known
                        && !UNCOPYABLE.contains(&candidate.name.as_str())
                        && MoveEffect::from_id(candidate.effect_id) != Some(MoveEffect::Metronome)
                    {
                        break candidate;
                    }
                };
                let nickname = self.nick(atk);
                self.log
                    .push(format!("{} used {}!", nickname, picked.display_name()));
                let mut transient = MoveInstance::new(picked);
                self.process_effect(atk, def, &mut transient, None, 0, is_first);
                return;
            }
            MoveEffect::MirrorMove => {
                let last = self.active(def).last_move.clone();
                match last {
                    Some(data) if self.active(def).is_alive() => {
                        let nickname = self.nick(atk);
                        self.log
                            .push(format!("{} used {}!", nickname, data.display_name()));
                        let mut transient = MoveInstance::new(data);
                        self.process_effect(atk, def, &mut transient, None, 0, is_first);
                    }
                    _ => self.failed(),
                }
                return;
            }
            MoveEffect::SacrificialBlast => {
                let own_hp = self.active(atk).cur_hp;
                self.active_mut(atk).take_damage(own_hp);
                self.calculate_damage(atk, def, &mv.data, power, DamageOpts::default());
                return;
            }
            MoveEffect::ChargeSkullBash => {
                if phase == 0 {
                    let nickname = self.nick(atk);
                    if self.holds_item_kind(atk, |k| matches!(k, ItemKind::ChargeHerb)) {
                        self.log.push(format!(
                            "{} became fully charged due to its Power Herb!",
                            nickname
                        ));
                    } else {
                        self.log.pop_last();
                        self.log.push(format!("{} tucked in its head!", nickname));
                        self.give_stat_change(atk, Stat::Defense.index() as i16, 1, false);
                        self.active_mut(atk)
                            .next_actions
                            .push_back(QueuedMove { mv: mv.clone(), phase: 1 });
                        return;
                    }
                }
            }
            MoveEffect::DreamEater => {
                if !self.active(def).is_alive() {
                    self.missed(atk);
                    return;
                }
                let asleep = matches!(
                    self.active(def).nv_status,
                    Some(NvStatus { kind: NvStatusKind::Asleep, .. })
                );
                if asleep {
                    let dealt =
                        self.calculate_damage(atk, def, &mv.data, power, DamageOpts::default());
                    if let Some(dealt) = dealt {
                        if dealt > 0 {
                            let restore = if dealt == 1 { 1 } else { dealt / 2 };
                            self.heal_checked(atk, restore);
                        }
                    }
                    let defender = self.nick(def);
                    self.log.push(format!("{}'s dream was eaten!", defender));
                } else {
                    self.failed();
                }
                return;
            }
            MoveEffect::ChargeSkyAttack => {
                if phase == 0 {
                    let nickname = self.nick(atk);
                    if self.holds_item_kind(atk, |k| matches!(k, ItemKind::ChargeHerb)) {
                        self.log.push(format!(
                            "{} became fully charged due to its Power Herb!",
                            nickname
                        ));
                    } else {
                        self.log.pop_last();
                        self.log
                            .push(format!("{} became cloaked in a harsh light!", nickname));
                        self.active_mut(atk)
                            .next_actions
                            .push_back(QueuedMove { mv: mv.clone(), phase: 1 });
                        return;
                    }
                }
                self.calculate_damage(
                    atk,
                    def,
                    &mv.data,
                    power,
                    DamageOpts {
                        crit_bonus: Some(1),
                        ..DamageOpts::default()
                    },
                );
                if self.rng.flinch_roll(30) {
                    self.flinch(def, is_first);
                }
                return;
            }
            MoveEffect::Transform => {
                let possible = {
                    let defender = self.active(def);
                    defender.is_alive()
                        && !defender.v.transformed
                        && !self.active(atk).v.transformed
                };
                if !possible {
                    self.failed();
                    return;
                }
                let target = self.active(def).clone();
                let target_name = target.name.clone();
                self.active_mut(atk).transform_into(&target);
                let nickname = self.nick(atk);
                self.log
                    .push(format!("{} transformed into {}!", nickname, target_name));
                return;
            }
            MoveEffect::Psywave => {
                let factor = self.rng.psywave_factor();
                let level = self.active(atk).level as u32;
                let dmg = (level * (factor * 10 + 50) / 100).max(1) as u16;
                if self.active(def).is_alive() {
                    self.apply_move_damage(def, dmg, &mv.data);
                } else {
                    self.missed(atk);
                }
                return;
            }
            MoveEffect::Splash => {
                self.log.push("But nothing happened!".to_string());
                return;
            }
            MoveEffect::SacrificialBlastPierce => {
                if !self.active(def).is_alive() {
                    self.failed();
                    return;
                }
                let own_hp = self.active(atk).cur_hp;
                self.active_mut(atk).take_damage(own_hp);
                let old_def = self.active(def).stats_actual[2];
                self.active_mut(def).stats_actual[2] = (old_def / 2).max(1);
                self.active_mut(def).recalculate_effective_stats();
                self.calculate_damage(atk, def, &mv.data, power, DamageOpts::default());
                self.active_mut(def).stats_actual[2] = old_def;
                self.active_mut(def).recalculate_effective_stats();
                return;
            }
            MoveEffect::Rest => {
                if self.active(atk).v.heal_block > 0 {
                    self.failed();
                    return;
                }
                self.force_sleep(atk, 3);
                let nickname = self.nick(atk);
                self.log.push(format!("{} went to sleep!", nickname));
                let max = self.active(atk).max_hp;
                self.active_mut(atk).heal(max);
                self.log.push(format!("{} regained health!", nickname));
                return;
            }
            MoveEffect::Conversion => {
                let candidates: Vec<_> = {
                    let attacker = self.active(atk);
                    attacker
                        .moves
                        .iter()
                        .map(|m| m.data.move_type)
                        .filter(|t| !attacker.has_type(*t))
                        .collect()
                };
                if candidates.is_empty() {
                    self.failed();
                    return;
                }
                let picked = candidates[self.rng.pick(candidates.len())];
                self.active_mut(atk).types = (picked, None);
                return;
            }
            MoveEffect::TriAttack => {
                self.calculate_damage(atk, def, &mv.data, power, DamageOpts::default());
                if self.active(def).is_alive() && self.rng.status_roll(20) {
                    let status = [1, 2, 3][self.rng.pick(3)];
                    self.give_nv_status(status, def, false);
                }
                return;
            }
            MoveEffect::HalveHp => {
                let t_mult = self.type_multiplier(mv.data.move_type, self.active(def));
                if !self.active(def).is_alive() || t_mult == 0.0 {
                    self.failed();
                    return;
                }
                let dmg = (self.active(def).max_hp / 2).max(1);
                self.apply_move_damage(def, dmg, &mv.data);
                return;
            }
            MoveEffect::Substitute => {
                if self.active(atk).v.substitute > 0 {
                    self.failed();
                    return;
                }
                let (cur, max) = {
                    let attacker = self.active(atk);
                    (attacker.cur_hp, attacker.max_hp)
                };
                let cost = max / 4;
                if cur < cost {
                    self.log.push(
                        "But it does not have enough HP left to make a substitute!".to_string(),
                    );
                    return;
                }
                let paid = self.active_mut(atk).take_damage(cost);
                self.active_mut(atk).v.substitute = paid + 1;
                let nickname = self.nick(atk);
                self.log.push(format!("{} made a substitute!", nickname));
                return;
            }
            MoveEffect::Struggle => {
                self.calculate_damage(atk, def, &mv.data, power, DamageOpts::default());
                let recoil = (self.active(atk).max_hp / 4).max(1);
                self.active_mut(atk).take_damage(recoil);
                let nickname = self.nick(atk);
                self.log.push(format!("{} is hit with recoil!", nickname));
                return;
            }
            MoveEffect::Sketch => {
                let last = self.active(def).last_move.clone();
                let blocked = {
                    let attacker = self.active(atk);
                    attacker.v.transformed
                        || !attacker.o_move_names.contains(&mv.data.name)
                        || !self.active(def).is_alive()
                        || last
                            .as_ref()
                            .map_or(true, |data| attacker.knows_move(&data.name))
                };
                let (Some(slot), Some(data), false) = (slot, last, blocked) else {
                    self.failed();
                    return;
                };
                self.active_mut(atk).moves[slot] = MoveInstance::new(data);
                return;
            }
            MoveEffect::RampUpTripleHit => {
                if !self.active(def).is_alive() {
                    self.missed(atk);
                }
                let mut ramped = power;
                let mut hits = 0;
                while hits < 3 && self.active(def).is_alive() {
                    self.calculate_damage(
                        atk,
                        def,
                        &mv.data,
                        ramped,
                        DamageOpts {
                            skip_faint_check: true,
                            ..DamageOpts::default()
                        },
                    );
                    ramped = ramped.map(|p| p + 10);
                    hits += 1;
                }
                self.log.push(format!("Hit {} time(s)!", hits));
                return;
            }
            MoveEffect::StealItem => {
                self.calculate_damage(atk, def, &mv.data, power, DamageOpts::default());
                let stolen = {
                    let defender = self.active(def);
                    match (&defender.item, &self.active(atk).item) {
                        (Some(item), None) => Some(item.clone()),
                        _ => None,
                    }
                };
                if let Some(item) = stolen {
                    let attacker = self.nick(atk);
                    let defender = self.nick(def);
                    self.log
                        .push(format!("{} stole {}'s {}!", attacker, defender, item));
                    self.active_mut(def).item = None;
                    self.active_mut(atk).item = Some(item);
                }
                return;
            }
            MoveEffect::PermaTrap => {
                let eligible = {
                    let defender = self.active(def);
                    defender.is_alive() && !defender.v.invulnerable
                };
                if eligible {
                    self.active_mut(def).v.perma_trapped = true;
                    let defender = self.nick(def);
                    self.log
                        .push(format!("{} can no longer escape!", defender));
                } else {
                    self.failed();
                }
                return;
            }
            MoveEffect::LockOn => {
                if self.active(def).is_alive() {
                    self.active_mut(atk).v.lock_on = 2;
                    let attacker = self.nick(atk);
                    let defender = self.nick(def);
                    self.log
                        .push(format!("{} took aim at {}!", attacker, defender));
                } else {
                    self.failed();
                }
                return;
            }
            MoveEffect::Nightmare => {
                let eligible = {
                    let defender = self.active(def);
                    defender.is_alive()
                        && matches!(
                            defender.nv_status,
                            Some(NvStatus { kind: NvStatusKind::Asleep, .. })
                        )
                        && defender.v.substitute == 0
                };
                if eligible {
                    self.active_mut(def).v.nightmare = true;
                    let defender = self.nick(def);
                    self.log
                        .push(format!("{} began having a nightmare!", defender));
                } else {
                    self.failed();
                }
                return;
            }
            MoveEffect::ThawStrike => {
                if matches!(
                    self.active(atk).nv_status,
                    Some(NvStatus { kind: NvStatusKind::Frozen, .. })
                ) {
                    self.active_mut(atk).nv_status = None;
                    let nickname = self.nick(atk);
                    self.log.push(format!("{} thawed out!", nickname));
                }
                self.calculate_damage(atk, def, &mv.data, power, DamageOpts::default());
                if self.active(def).is_alive() && self.rng.status_roll(10) {
                    self.give_nv_status(1, def, false);
                }
                return;
            }
            MoveEffect::SleepTalkStrike => {
                let asleep = matches!(
                    self.active(atk).nv_status,
                    Some(NvStatus { kind: NvStatusKind::Asleep, .. })
                );
                if self.active(def).is_alive() && asleep {
                    self.calculate_damage(atk, def, &mv.data, power, DamageOpts::default());
                    if self.rng.flinch_roll(30) {
                        self.flinch(def, is_first);
                    }
                } else {
                    self.failed();
                }
                return;
            }
            MoveEffect::Curse => {
                let is_ghost = self.active(atk).has_type(schema::PokemonType::Ghost);
                if !is_ghost {
                    let (atk_stage, def_stage, spd_stage) = {
                        let attacker = self.active(atk);
                        (
                            attacker.stage(Stat::Attack),
                            attacker.stage(Stat::Defense),
                            attacker.stage(Stat::Speed),
                        )
                    };
                    if atk_stage == 6 && def_stage == 6 && spd_stage == -6 {
                        self.failed();
                        return;
                    }
                    if atk_stage < 6 {
                        self.give_stat_change(atk, Stat::Attack.index() as i16, 1, false);
                    }
                    if def_stage < 6 {
                        self.give_stat_change(atk, Stat::Defense.index() as i16, 1, false);
                    }
                    if spd_stage > -6 {
                        self.give_stat_change(atk, Stat::Speed.index() as i16, -1, false);
                    }
                } else {
                    let eligible = {
                        let defender = self.active(def);
                        defender.is_alive() && !defender.v.cursed && defender.v.substitute == 0
                    };
                    if !eligible {
                        self.failed();
                        return;
                    }
                    let cost = self.active(atk).max_hp / 2;
                    self.active_mut(atk).take_damage(cost);
                    self.active_mut(def).v.cursed = true;
                    let attacker = self.nick(atk);
                    let defender = self.nick(def);
                    self.log.push(format!(
                        "{} cut its own HP and laid a curse on {}!",
                        attacker, defender
                    ));
                }
                return;
            }
            MoveEffect::DesperationPower => {
                let (cur, max) = {
                    let attacker = self.active(atk);
                    (attacker.cur_hp as u32, attacker.max_hp as u32)
                };
                let hp_ratio = cur * 10000 / max;
                power = Some(match hp_ratio {
                    r if r >= 6719 => 20,
                    r if r >= 3438 => 40,
                    r if r >= 2031 => 80,
                    r if r >= 938 => 100,
                    r if r >= 313 => 150,
                    _ => 200,
                });
            }
            MoveEffect::ResistanceShift => {
                let hit_by = self.active(atk).last_move_hit_by.clone();
                let Some(hit_by) = hit_by else {
                    self.failed();
                    return;
                };
                let candidates: Vec<_> = {
                    let attacker = self.active(atk);
                    self.dex
                        .all_types()
                        .into_iter()
                        .filter(|t| self.dex.type_effectiveness(hit_by.move_type, *t) < 1.0)
                        .filter(|t| !attacker.has_type(*t))
                        .collect()
                };
                if candidates.is_empty() {
                    self.failed();
                    return;
                }
                let picked = candidates[self.rng.pick(candidates.len())];
                self.active_mut(atk).types = (picked, None);
                let nickname = self.nick(atk);
                self.log.push(format!(
                    "{} transformed into the {} type!",
                    nickname,
                    picked.to_string().to_uppercase()
                ));
                return;
            }
            MoveEffect::SpitePpDrain => {
                let last = self.active(def).last_move.clone();
                let reduced = match &last {
                    Some(data) if self.active(def).is_alive() => {
                        let defender = self.active_mut(def);
                        match defender.find_move(&data.name) {
                            Some((i, false)) if defender.moves[i].cur_pp > 0 => {
                                let cut = defender.moves[i].cur_pp.min(4);
                                defender.moves[i].cur_pp -= cut;
                                Some((data.display_name(), cut))
                            }
                            _ => None,
                        }
                    }
                    _ => None,
                };
                match reduced {
                    Some((display, cut)) => {
                        let defender = self.nick(def);
                        self.log.push(format!(
                            "It reduced the pp of {}'s {} by {}!",
                            defender, display, cut
                        ));
                    }
                    None => self.failed(),
                }
                return;
            }
            MoveEffect::Protect => {
                if self.active(atk).v.substitute > 0 {
                    self.failed();
                    return;
                }
                let streak = self.active(atk).v.protect_streak;
                let denominator = 2u32.pow(streak.min(3) as u32).min(8);
                if self.rng.protect_roll(denominator) {
                    let attacker = self.active_mut(atk);
                    attacker.v.protect = true;
                    attacker.v.protect_streak = attacker.v.protect_streak.saturating_add(1);
                } else {
                    self.failed();
                }
                return;
            }
            MoveEffect::BellyDrum => {
                let (cur, max, stage) = {
                    let attacker = self.active(atk);
                    (attacker.cur_hp, attacker.max_hp, attacker.stage(Stat::Attack))
                };
                if max / 2 > cur || stage == 6 {
                    self.failed();
                    return;
                }
                self.active_mut(atk).take_damage(max / 2);
                let nickname = self.nick(atk);
                self.log.push(format!(
                    "{} cut its own HP and maximized its Attack!",
                    nickname
                ));
                let attacker = self.active_mut(atk);
                attacker.stat_stages[Stat::Attack.index()] = 6;
                attacker.recalculate_effective_stats();
                return;
            }
            MoveEffect::Spikes => {
                if self.sides[def].spikes < 3 {
                    self.sides[def].spikes += 1;
                    let trainer = self.sides[def].name.clone();
                    self.log.push(format!(
                        "Spikes were scattered all around the feet of {}'s team!",
                        trainer
                    ));
                } else {
                    self.failed();
                }
                return;
            }
            MoveEffect::Foresight => {
                if self.active(def).is_alive() && !self.active(atk).v.foresight {
                    self.active_mut(atk).v.foresight = true;
                    let attacker = self.nick(atk);
                    let defender = self.nick(def);
                    self.log
                        .push(format!("{} identified {}!", attacker, defender));
                } else {
                    self.failed();
                }
                return;
            }
            MoveEffect::Streak => {
                let dealt = self.calculate_damage(atk, def, &mv.data, power, DamageOpts::default());
                if dealt.is_none() {
                    return;
                }
                let count = match &self.active(atk).v.streak {
                    Some(streak) if streak.move_name == mv.data.name => streak.count,
                    _ => 0,
                };
                if count + 1 >= 5 {
                    self.active_mut(atk).v.streak = None;
                    mv.reset_power();
                } else {
                    self.active_mut(atk).v.streak = Some(StreakState {
                        move_name: mv.data.name.clone(),
                        count: count + 1,
                    });
                    mv.power = mv.power.map(|p| p.saturating_mul(2));
                }
                return;
            }
            MoveEffect::SetWeather => {
                let weather = match ef_stat {
                    1 => Weather::Rain,
                    2 => Weather::Sandstorm,
                    3 => Weather::HarshSunlight,
                    4 => Weather::Hail,
                    _ => {
                        self.failed();
                        return;
                    }
                };
                if self.field.weather == weather {
                    self.failed();
                    return;
                }
                self.field.set_weather(weather, 5);
                if let Some(text) = Battlefield::started_text(weather) {
                    self.log.push(text.to_string());
                }
                return;
            }
            MoveEffect::HealBlock => {
                let eligible = {
                    let defender = self.active(def);
                    defender.is_alive() && defender.v.heal_block == 0
                };
                if eligible {
                    self.active_mut(def).v.heal_block = 5;
                    let defender = self.nick(def);
                    self.log
                        .push(format!("{} was prevented from healing!", defender));
                } else {
                    self.failed();
                }
                return;
            }
            MoveEffect::Rooting => {
                if self.active(atk).v.rooting.is_some() {
                    self.failed();
                    return;
                }
                let nickname = self.nick(atk);
                if ef_stat == 1 {
                    self.active_mut(atk).v.rooting = Some(RootingKind::AquaRing);
                    self.log.push(format!(
                        "{} surrounded itself with a veil of water!",
                        nickname
                    ));
                } else {
                    self.active_mut(atk).v.rooting = Some(RootingKind::Ingrain);
                    self.log.push(format!("{} planted its roots!", nickname));
                }
                return;
            }
        }

        // Shared tail: handlers that only adjust power, crit tier, or
        // bypass flags land here.
        self.calculate_damage(
            atk,
            def,
            &mv.data,
            power,
            DamageOpts {
                crit_bonus,
                inv_bypass,
                skip_faint_check: false,
            },
        );
    }
}

fn recipient_side(atk: usize, def: usize, recipient: Recipient) -> usize {
    match recipient {
        Recipient::User => atk,
        Recipient::Target => def,
    }
}
