use schema::{MoveCategory, NvStatusKind, PokemonType};

use crate::battle::effects::MoveEffect;
use crate::battle::engine::BattleCtx;
use crate::dex::AbilityCap;
use crate::moves::{MoveData, MoveInstance};
use crate::pokemon::Pokemon;

/// Per-call switches for the damage subroutine.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct DamageOpts {
    /// Extra critical-hit tiers granted by the effect
    pub crit_bonus: Option<u16>,
    /// Strike through semi-invulnerability
    pub inv_bypass: bool,
    /// Defer the faint check to the caller (multi-hit sequences)
    pub skip_faint_check: bool,
}

impl BattleCtx<'_> {
    /// Combined effectiveness of a move type against the defender's type
    /// pair. Typeless is neutral against everything.
    pub(crate) fn type_multiplier(&self, move_type: PokemonType, defender: &Pokemon) -> f64 {
        if move_type == PokemonType::Typeless {
            return 1.0;
        }
        let mut mult = self.dex.type_effectiveness(move_type, defender.types.0);
        if let Some(second) = defender.types.1 {
            mult *= self.dex.type_effectiveness(move_type, second);
        }
        mult
    }

    /// Accuracy check for one use of a move. Absent accuracy always hits;
    /// one-hit-knockout moves use the level-differential threshold
    /// instead of the standard stage arithmetic.
    pub(crate) fn roll_hit(&mut self, atk: usize, def: usize, mv: &MoveInstance) -> bool {
        let (a_level, a_acc_stage, a_foresight, a_lock_on, a_ability) = {
            let a = self.active(atk);
            (
                a.level,
                a.accuracy_stage,
                a.v.foresight,
                a.v.lock_on,
                a.ability.clone(),
            )
        };
        let (d_level, d_eva_stage, d_ability) = {
            let d = self.active(def);
            (d.level, d.evasion_stage, d.ability.clone())
        };

        let Some(accuracy) = mv.accuracy else {
            // OHKO moves carry no standard accuracy and roll against the
            // level differential.
            if MoveEffect::from_id(mv.data.effect_id) == Some(MoveEffect::Ohko) {
                let threshold = a_level as i32 - d_level as i32 + 30;
                return (self.rng.hit_roll() as i32) <= threshold;
            }
            return true;
        };

        if a_lock_on > 0 {
            return true;
        }
        if self.dex.ability_has(a_ability.as_deref(), AbilityCap::AlwaysHit)
            || self.dex.ability_has(d_ability.as_deref(), AbilityCap::AlwaysHit)
        {
            return true;
        }

        let mut eva_stage = d_eva_stage;
        if a_foresight && eva_stage > 0 {
            eva_stage = 0;
        }
        let stage = (a_acc_stage - eva_stage).clamp(-6, 6) as i32;
        let stage_mult = 3i32.max(3 + stage) as f64 / 3i32.max(3 - stage) as f64;

        let ability_mult = if self.dex.ability_has(a_ability.as_deref(), AbilityCap::AccuracyBoost)
        {
            1.3
        } else {
            1.0
        };
        let threshold =
            accuracy as f64 * stage_mult * self.field.acc_modifier * ability_mult;
        self.rng.hit_roll() as f64 <= threshold
    }

    /// The damage subroutine: computes and applies one hit, narrating
    /// crits and effectiveness. Returns the damage dealt, or None when no
    /// damage happened (status move, dead or untouchable target, zero
    /// effectiveness, missing power).
    pub(crate) fn calculate_damage(
        &mut self,
        atk: usize,
        def: usize,
        data: &MoveData,
        power: Option<u16>,
        opts: DamageOpts,
    ) -> Option<u16> {
        if data.category == MoveCategory::Status {
            return None;
        }
        if !self.active(def).is_alive() {
            self.missed(atk);
            return None;
        }
        if !opts.inv_bypass && self.active(def).v.invulnerable {
            let defender = self.active(def);
            if defender.v.in_air || defender.v.in_ground {
                let nickname = defender.nickname.clone();
                self.log.push(format!("{} avoided the attack!", nickname));
            }
            return None;
        }
        let power = match power {
            Some(p) if p > 0 => p,
            _ => return None,
        };
        let t_mult = self.type_multiplier(data.move_type, self.active(def));
        let ability_immune = data.move_type == PokemonType::Ground
            && self
                .dex
                .ability_has(self.active(def).ability.as_deref(), AbilityCap::GroundImmune);
        if t_mult == 0.0 || ability_immune {
            let nickname = self.active(def).nickname.clone();
            self.log.push(format!("It doesn't affect {}", nickname));
            return None;
        }

        let crit_total = {
            let stage = self.active(atk).crit_stage as u16;
            opts.crit_bonus.map_or(stage, |bonus| bonus + stage)
        };
        let is_crit = if crit_total <= 4 {
            self.rng.crit_stage_roll(crit_total as u8)
        } else {
            self.rng.crit_per_mille(crit_total as u32)
        };
        let crit_mult = if is_crit {
            self.log.push("A critical hit!".to_string());
            2.0
        } else {
            1.0
        };
        if t_mult < 1.0 {
            self.log.push("It's not very effective...".to_string());
        } else if t_mult > 1.0 {
            self.log.push("It's super effective!".to_string());
        }

        self.active_mut(atk).recalculate_effective_stats();
        self.active_mut(def).recalculate_effective_stats();

        let (atk_index, def_index) = match data.category {
            MoveCategory::Physical => (1, 2),
            _ => (3, 4),
        };
        let (a_level, a_actual, a_effective, a_types, a_burned) = {
            let a = self.active(atk);
            (
                a.level,
                a.stats_actual,
                a.stats_effective,
                a.types,
                matches!(
                    a.nv_status,
                    Some(status) if status.kind == NvStatusKind::Burned
                ),
            )
        };
        let (d_actual, d_effective) = {
            let d = self.active(def);
            (d.stats_actual, d.stats_effective)
        };
        let screen_up = match data.category {
            MoveCategory::Physical => self.sides[def].reflect > 0,
            MoveCategory::Special => self.sides[def].light_screen > 0,
            MoveCategory::Status => false,
        };

        // On a crit, stage changes only count when they favor the
        // attacker, and screens do not apply.
        let ad_ratio = if is_crit {
            let a = a_actual[atk_index].max(a_effective[atk_index]) as f64;
            let d = d_actual[def_index].min(d_effective[def_index]) as f64;
            a / d
        } else {
            let mut ratio = a_effective[atk_index] as f64 / d_effective[def_index] as f64;
            if screen_up {
                ratio /= 2.0;
            }
            ratio
        };

        let burn = if a_burned && data.category == MoveCategory::Physical {
            0.5
        } else {
            1.0
        };
        let stab = if data.move_type != PokemonType::Typeless
            && (a_types.0 == data.move_type || a_types.1 == Some(data.move_type))
        {
            1.5
        } else {
            1.0
        };
        let random_mult = self.rng.damage_variance();

        let level = a_level as f64;
        let mut damage = (2.0 * level / 5.0 + 2.0) * power as f64 * ad_ratio / 50.0 * burn + 2.0;
        damage *= crit_mult * random_mult * stab * t_mult;
        let amount = damage.min(u16::MAX as f64) as u16;

        let dealt = self.apply_move_damage(def, amount, data);
        if !opts.skip_faint_check {
            self.faint_check();
        }
        Some(dealt)
    }
}
