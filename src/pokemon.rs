use std::collections::VecDeque;
use std::str::FromStr;

use schema::{BindingKind, Gender, NvStatusKind, PokemonType, RootingKind, Stat};
use serde::{Deserialize, Serialize};

use crate::dex::Dex;
use crate::errors::ConstructionError;
use crate::moves::{MoveData, MoveInstance};

/// Non-volatile status plus its counter: turns remaining for sleep, the
/// rising severity for badly-poisoned, zero otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NvStatus {
    pub kind: NvStatusKind,
    pub counter: u8,
}

impl NvStatus {
    pub fn new(kind: NvStatusKind) -> NvStatus {
        NvStatus { kind, counter: 0 }
    }
}

/// A multi-turn trap: residual damage every end-of-turn tick until the
/// counter expires, switching blocked meanwhile. `source` is the side
/// index of the combatant that applied it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    pub kind: BindingKind,
    pub turns: u8,
    pub source: usize,
}

/// Consecutive-use state for streak moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakState {
    pub move_name: String,
    pub count: u8,
}

/// A forced continuation: the combatant's next turn is spent on this move
/// rather than a fresh selection. `phase` counts release turns remaining
/// (1 for a charge move's strike turn, higher for stored-energy moves).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedMove {
    pub mv: MoveInstance,
    pub phase: u8,
}

/// Per-battle conditions, cleared when the combatant leaves the field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VolatileStatus {
    pub confused: u8,
    pub flinched: bool,
    pub leech_seed: bool,
    pub binding: Option<Binding>,
    pub nightmare: bool,
    pub cursed: bool,
    pub rooting: Option<RootingKind>,
    pub substitute: u16,
    pub minimized: bool,
    pub transformed: bool,
    pub perma_trapped: bool,
    pub recharging: bool,
    pub invulnerable: bool,
    pub in_air: bool,
    pub in_ground: bool,
    pub mist: u8,
    pub protect: bool,
    pub protect_streak: u8,
    pub foresight: bool,
    pub lock_on: u8,
    pub heal_block: u8,
    /// Damage stored while biding; None when not biding
    pub bide_damage: Option<u16>,
    pub rage: bool,
    pub streak: Option<StreakState>,
    pub curled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct TransformBackup {
    stats_actual: [u16; 6],
    types: (PokemonType, Option<PokemonType>),
    moves: Vec<MoveInstance>,
}

/// How a combatant's stat line is supplied at construction.
pub enum StatSpec<'a> {
    /// Explicit six-entry line: HP, Atk, Def, SpAtk, SpDef, Spe
    Actual([u16; 6]),
    /// Computed from the species base stats
    Spread {
        ivs: [u8; 6],
        evs: [u8; 6],
        nature: &'a str,
    },
}

/// One creature's full battle state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: u16,
    pub name: String,
    pub nickname: String,
    pub level: u8,
    pub gender: Gender,
    pub types: (PokemonType, Option<PokemonType>),
    pub weight: u16,
    pub stats_actual: [u16; 6],
    pub stats_effective: [u16; 6],
    pub max_hp: u16,
    pub cur_hp: u16,
    pub stat_stages: [i8; 6],
    pub accuracy_stage: i8,
    pub evasion_stage: i8,
    pub crit_stage: u8,
    pub nv_status: Option<NvStatus>,
    pub v: VolatileStatus,
    pub moves: Vec<MoveInstance>,
    /// Transient copy produced by move-copying effects
    pub copied: Option<MoveInstance>,
    /// Names the moveset held at construction; permanent copying is
    /// restricted to original slots
    pub o_move_names: Vec<String>,
    pub item: Option<String>,
    pub o_item: Option<String>,
    pub ability: Option<String>,
    pub last_move: Option<MoveData>,
    pub last_successful_move: Option<MoveData>,
    pub last_move_hit_by: Option<MoveData>,
    pub last_damage_taken: u16,
    pub next_actions: VecDeque<QueuedMove>,
    pub(crate) assigned: bool,
    pub(crate) faint_announced: bool,
    transform_backup: Option<Box<TransformBackup>>,
}

impl Pokemon {
    /// Build a combatant from a species name.
    pub fn new(
        dex: &Dex,
        species: &str,
        level: u8,
        move_names: &[&str],
        gender: &str,
        stats: StatSpec,
    ) -> Result<Pokemon, ConstructionError> {
        let data = dex
            .species(species)
            .ok_or_else(|| ConstructionError::UnknownSpecies(species.to_string()))?
            .clone();
        Pokemon::build(dex, data, level, move_names, gender, stats)
    }

    /// Build a combatant from a dex number.
    pub fn from_id(
        dex: &Dex,
        species_id: u16,
        level: u8,
        move_names: &[&str],
        gender: &str,
        stats: StatSpec,
    ) -> Result<Pokemon, ConstructionError> {
        let data = dex
            .species_by_id(species_id)
            .ok_or_else(|| ConstructionError::UnknownSpecies(species_id.to_string()))?
            .clone();
        Pokemon::build(dex, data, level, move_names, gender, stats)
    }

    fn build(
        dex: &Dex,
        species: crate::dex::SpeciesData,
        level: u8,
        move_names: &[&str],
        gender: &str,
        stats: StatSpec,
    ) -> Result<Pokemon, ConstructionError> {
        if move_names.is_empty() {
            return Err(ConstructionError::EmptyMoveset);
        }
        if move_names.len() > 4 {
            return Err(ConstructionError::OversizedMoveset(move_names.len()));
        }
        let mut moves = Vec::with_capacity(move_names.len());
        for name in move_names {
            let data = dex
                .move_data(name)
                .ok_or_else(|| ConstructionError::UnknownMove(name.to_string()))?;
            if moves.iter().any(|m: &MoveInstance| m.data.id == data.id) {
                return Err(ConstructionError::DuplicateMove(name.to_string()));
            }
            moves.push(MoveInstance::new(data.clone()));
        }
        let gender = Gender::from_str(&gender.to_lowercase())
            .map_err(|_| ConstructionError::InvalidGender(gender.to_string()))?;
        if !(1..=100).contains(&level) {
            return Err(ConstructionError::InvalidLevel(level));
        }

        let stats_actual = match stats {
            StatSpec::Actual(line) => {
                if line.iter().any(|&s| s == 0) {
                    return Err(ConstructionError::InvalidStats(
                        "every stat must be at least 1".to_string(),
                    ));
                }
                line
            }
            StatSpec::Spread { ivs, evs, nature } => {
                if ivs.iter().any(|&iv| iv > 31) {
                    return Err(ConstructionError::InvalidEvIv("IVs cap at 31".to_string()));
                }
                let ev_total: u32 = evs.iter().map(|&ev| ev as u32).sum();
                if ev_total > 510 {
                    return Err(ConstructionError::InvalidEvIv(
                        "EV total caps at 510".to_string(),
                    ));
                }
                let (plus, minus) = dex
                    .nature_mods(nature)
                    .ok_or_else(|| ConstructionError::UnknownNature(nature.to_string()))?;
                compute_stats(&species.base_stats, level, &ivs, &evs, plus, minus)
            }
        };

        let max_hp = stats_actual[0];
        let o_move_names = moves.iter().map(|m| m.data.name.clone()).collect();
        let mut pokemon = Pokemon {
            id: species.id,
            nickname: species.name.to_uppercase(),
            name: species.name,
            level,
            gender,
            types: species.types,
            weight: species.weight,
            stats_actual,
            stats_effective: stats_actual,
            max_hp,
            cur_hp: max_hp,
            stat_stages: [0; 6],
            accuracy_stage: 0,
            evasion_stage: 0,
            crit_stage: 0,
            nv_status: None,
            v: VolatileStatus::default(),
            moves,
            copied: None,
            o_move_names,
            item: None,
            o_item: None,
            ability: None,
            last_move: None,
            last_successful_move: None,
            last_move_hit_by: None,
            last_damage_taken: 0,
            next_actions: VecDeque::new(),
            assigned: false,
            faint_announced: false,
            transform_backup: None,
        };
        pokemon.recalculate_effective_stats();
        Ok(pokemon)
    }

    pub fn with_nickname(mut self, nickname: &str) -> Pokemon {
        self.nickname = nickname.to_uppercase();
        self
    }

    pub fn with_cur_hp(mut self, cur_hp: u16) -> Result<Pokemon, ConstructionError> {
        if cur_hp > self.max_hp {
            return Err(ConstructionError::InvalidHp {
                cur: cur_hp,
                max: self.max_hp,
            });
        }
        self.cur_hp = cur_hp;
        Ok(self)
    }

    pub fn with_item(mut self, dex: &Dex, item: &str) -> Result<Pokemon, ConstructionError> {
        let data = dex
            .item(item)
            .ok_or_else(|| ConstructionError::UnknownItem(item.to_string()))?;
        self.item = Some(data.name.clone());
        self.o_item = Some(data.name.clone());
        Ok(self)
    }

    pub fn with_ability(mut self, dex: &Dex, ability: &str) -> Result<Pokemon, ConstructionError> {
        let data = dex
            .ability(ability)
            .ok_or_else(|| ConstructionError::UnknownAbility(ability.to_string()))?;
        self.ability = Some(data.name.clone());
        Ok(self)
    }

    pub fn is_alive(&self) -> bool {
        self.cur_hp > 0
    }

    pub fn has_type(&self, t: PokemonType) -> bool {
        self.types.0 == t || self.types.1 == Some(t)
    }

    /// Recompute stage-adjusted stats. HP is never stage-adjusted.
    pub fn recalculate_effective_stats(&mut self) {
        self.stats_effective[0] = self.stats_actual[0];
        for i in 1..6 {
            self.stats_effective[i] =
                apply_stage_multiplier(self.stats_actual[i], self.stat_stages[i]);
        }
    }

    /// Remove HP, flooring at zero. Returns the amount actually removed;
    /// bookkeeping for counters and bide is the engine's job.
    pub fn take_damage(&mut self, amount: u16) -> u16 {
        let dealt = amount.min(self.cur_hp);
        self.cur_hp -= dealt;
        dealt
    }

    /// Restore HP, capped at max. Returns the amount actually restored.
    pub fn heal(&mut self, amount: u16) -> u16 {
        let healed = amount.min(self.max_hp - self.cur_hp);
        self.cur_hp += healed;
        healed
    }

    pub fn stage(&self, stat: Stat) -> i8 {
        match stat {
            Stat::Accuracy => self.accuracy_stage,
            Stat::Evasion => self.evasion_stage,
            other => self.stat_stages[other.index()],
        }
    }

    /// Shift one stage, clamped to [-6, 6].
    pub fn apply_stage(&mut self, stat: Stat, delta: i8) {
        match stat {
            Stat::Accuracy => {
                self.accuracy_stage = (self.accuracy_stage + delta).clamp(-6, 6);
            }
            Stat::Evasion => {
                self.evasion_stage = (self.evasion_stage + delta).clamp(-6, 6);
            }
            other => {
                let i = other.index();
                self.stat_stages[i] = (self.stat_stages[i] + delta).clamp(-6, 6);
                self.recalculate_effective_stats();
            }
        }
    }

    pub fn reset_stages(&mut self) {
        self.stat_stages = [0; 6];
        self.accuracy_stage = 0;
        self.evasion_stage = 0;
        self.recalculate_effective_stats();
    }

    pub fn effective_speed(&self) -> u16 {
        let speed = self.stats_effective[Stat::Speed.index()];
        match self.nv_status {
            Some(NvStatus {
                kind: NvStatusKind::Paralyzed,
                ..
            }) => speed / 4,
            _ => speed,
        }
    }

    /// Moveset slot holding `name`, the mimic copy included (flagged by
    /// the bool).
    pub fn find_move(&self, name: &str) -> Option<(usize, bool)> {
        if let Some(i) = self.moves.iter().position(|m| m.name() == name) {
            return Some((i, false));
        }
        if self.copied.as_ref().map(|c| c.name() == name) == Some(true) {
            return Some((0, true));
        }
        None
    }

    pub fn knows_move(&self, name: &str) -> bool {
        self.find_move(name).is_some()
    }

    /// True when no moveset slot can legally be chosen.
    pub fn out_of_usable_moves(&self) -> bool {
        self.moves.iter().all(|m| m.cur_pp == 0 || m.is_disabled())
            && self
                .copied
                .as_ref()
                .map_or(true, |c| c.cur_pp == 0 || c.is_disabled())
    }

    /// Switching is blocked by traps and roots.
    pub fn is_trapped(&self) -> bool {
        self.v.binding.is_some()
            || self.v.perma_trapped
            || self.v.bide_damage.is_some()
            || self.v.rooting == Some(RootingKind::Ingrain)
    }

    /// Copy the target's stat line (HP excepted), types, and moves. The
    /// original self is restored on switch-out.
    pub fn transform_into(&mut self, target: &Pokemon) {
        self.transform_backup = Some(Box::new(TransformBackup {
            stats_actual: self.stats_actual,
            types: self.types,
            moves: self.moves.clone(),
        }));
        for i in 1..6 {
            self.stats_actual[i] = target.stats_actual[i];
        }
        self.types = target.types;
        self.moves = target
            .moves
            .iter()
            .map(|m| MoveInstance::copied(m.data.clone()))
            .collect();
        self.v.transformed = true;
        self.recalculate_effective_stats();
    }

    /// Reset battle-local state when leaving the field: volatiles, stages,
    /// transient copies, queued actions, and any transformation. The
    /// badly-poisoned ramp also falls back to its first step.
    pub fn switch_out(&mut self) {
        if let Some(backup) = self.transform_backup.take() {
            self.stats_actual = backup.stats_actual;
            self.types = backup.types;
            self.moves = backup.moves;
        }
        self.v = VolatileStatus::default();
        self.stat_stages = [0; 6];
        self.accuracy_stage = 0;
        self.evasion_stage = 0;
        self.crit_stage = 0;
        self.copied = None;
        self.next_actions.clear();
        self.last_move = None;
        self.last_successful_move = None;
        self.last_move_hit_by = None;
        self.last_damage_taken = 0;
        if let Some(status) = self.nv_status.as_mut() {
            if status.kind == NvStatusKind::BadlyPoisoned {
                status.counter = 1;
            }
        }
        self.recalculate_effective_stats();
    }

    /// Tick every moveset slot's disable countdown once.
    pub fn tick_disable_counters(&mut self) {
        for mv in &mut self.moves {
            mv.disabled = mv.disabled.saturating_sub(1);
        }
        if let Some(copy) = self.copied.as_mut() {
            copy.disabled = copy.disabled.saturating_sub(1);
        }
    }
}

/// Stage multiplier for the six core stats: max(2, 2+stage)/max(2, 2-stage).
fn apply_stage_multiplier(stat: u16, stage: i8) -> u16 {
    let stage = stage.clamp(-6, 6) as i32;
    let numerator = 2i32.max(2 + stage) as u32;
    let denominator = 2i32.max(2 - stage) as u32;
    (stat as u32 * numerator / denominator) as u16
}

fn compute_stats(
    base: &[u16; 6],
    level: u8,
    ivs: &[u8; 6],
    evs: &[u8; 6],
    plus: usize,
    minus: usize,
) -> [u16; 6] {
    let level = level as u32;
    let mut stats = [0u16; 6];
    for i in 0..6 {
        let core = 2 * base[i] as u32 + ivs[i] as u32 + evs[i] as u32 / 4;
        stats[i] = if i == 0 {
            (core * level / 100 + level + 10) as u16
        } else {
            let mut stat = (core * level / 100 + 5) as f64;
            if plus == i && minus != i {
                stat *= 1.1;
            } else if minus == i && plus != i {
                stat *= 0.9;
            }
            stat as u16
        };
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn dex() -> Dex {
        Dex::bundled().unwrap()
    }

    fn pikachu(dex: &Dex) -> Pokemon {
        Pokemon::new(
            dex,
            "pikachu",
            22,
            &["tackle"],
            "male",
            StatSpec::Actual([100, 100, 100, 100, 100, 100]),
        )
        .unwrap()
    }

    #[test]
    fn construction_defaults() {
        let dex = dex();
        let p = pikachu(&dex);
        assert_eq!(p.id, 25);
        assert_eq!(p.name, "pikachu");
        assert_eq!(p.nickname, "PIKACHU");
        assert_eq!(p.types, (PokemonType::Electric, None));
        assert_eq!(p.cur_hp, 100);
        assert_eq!(p.max_hp, 100);
        assert!(p.is_alive());
    }

    #[test]
    fn construction_by_id_matches_name_lookup() {
        let dex = dex();
        let by_id = Pokemon::from_id(
            &dex,
            25,
            22,
            &["tackle"],
            "male",
            StatSpec::Actual([100; 6]),
        )
        .unwrap();
        assert_eq!(by_id.name, "pikachu");
    }

    #[test]
    fn construction_rejects_bad_input() {
        let dex = dex();
        let actual = StatSpec::Actual([100; 6]);
        assert!(matches!(
            Pokemon::new(&dex, "missingno", 22, &["tackle"], "male", actual),
            Err(ConstructionError::UnknownSpecies(_))
        ));
        assert!(matches!(
            Pokemon::new(&dex, "pikachu", 22, &[], "male", StatSpec::Actual([100; 6])),
            Err(ConstructionError::EmptyMoveset)
        ));
        assert!(matches!(
            Pokemon::new(
                &dex,
                "pikachu",
                22,
                &["pound", "scratch", "tackle", "growl", "leer"],
                "male",
                StatSpec::Actual([100; 6]),
            ),
            Err(ConstructionError::OversizedMoveset(5))
        ));
        assert!(matches!(
            Pokemon::new(
                &dex,
                "pikachu",
                22,
                &["tackle", "tackle"],
                "male",
                StatSpec::Actual([100; 6]),
            ),
            Err(ConstructionError::DuplicateMove(_))
        ));
        assert!(matches!(
            Pokemon::new(
                &dex,
                "pikachu",
                22,
                &["tackle"],
                "neutral",
                StatSpec::Actual([100; 6]),
            ),
            Err(ConstructionError::InvalidGender(_))
        ));
        assert!(matches!(
            Pokemon::new(
                &dex,
                "pikachu",
                0,
                &["tackle"],
                "male",
                StatSpec::Actual([100; 6]),
            ),
            Err(ConstructionError::InvalidLevel(0))
        ));
        assert!(matches!(
            Pokemon::new(
                &dex,
                "pikachu",
                22,
                &["tackle"],
                "male",
                StatSpec::Actual([100, 0, 100, 100, 100, 100]),
            ),
            Err(ConstructionError::InvalidStats(_))
        ));
    }

    #[test]
    fn spread_stats_follow_the_formula() {
        let dex = dex();
        // Pikachu base: 35/55/40/50/50/90, level 50, full IVs, no EVs.
        let p = Pokemon::new(
            &dex,
            "pikachu",
            50,
            &["tackle"],
            "female",
            StatSpec::Spread {
                ivs: [31; 6],
                evs: [0; 6],
                nature: "hardy",
            },
        )
        .unwrap();
        assert_eq!(p.max_hp, (2 * 35 + 31) * 50 / 100 + 50 + 10);
        assert_eq!(p.stats_actual[1], (2 * 55 + 31) * 50 / 100 + 5);
    }

    #[test]
    fn nature_adjusts_computed_stats() {
        let dex = dex();
        let spread = |nature| {
            Pokemon::new(
                &dex,
                "pikachu",
                50,
                &["tackle"],
                "female",
                StatSpec::Spread {
                    ivs: [31; 6],
                    evs: [0; 6],
                    nature,
                },
            )
            .unwrap()
        };
        let neutral = spread("hardy");
        let adamant = spread("adamant");
        assert_eq!(
            adamant.stats_actual[1],
            (neutral.stats_actual[1] as f64 * 1.1) as u16
        );
        assert_eq!(
            adamant.stats_actual[3],
            (neutral.stats_actual[3] as f64 * 0.9) as u16
        );
    }

    #[test]
    fn spread_rejects_out_of_range_values() {
        let dex = dex();
        assert!(matches!(
            Pokemon::new(
                &dex,
                "pikachu",
                50,
                &["tackle"],
                "male",
                StatSpec::Spread {
                    ivs: [32, 0, 0, 0, 0, 0],
                    evs: [0; 6],
                    nature: "hardy",
                },
            ),
            Err(ConstructionError::InvalidEvIv(_))
        ));
        assert!(matches!(
            Pokemon::new(
                &dex,
                "pikachu",
                50,
                &["tackle"],
                "male",
                StatSpec::Spread {
                    ivs: [0; 6],
                    evs: [252, 252, 252, 0, 0, 0],
                    nature: "hardy",
                },
            ),
            Err(ConstructionError::InvalidEvIv(_))
        ));
        assert!(matches!(
            Pokemon::new(
                &dex,
                "pikachu",
                50,
                &["tackle"],
                "male",
                StatSpec::Spread {
                    ivs: [0; 6],
                    evs: [0; 6],
                    nature: "zesty",
                },
            ),
            Err(ConstructionError::UnknownNature(_))
        ));
    }

    #[test]
    fn cur_hp_cannot_exceed_max() {
        let dex = dex();
        assert!(pikachu(&dex).with_cur_hp(50).is_ok());
        assert!(matches!(
            pikachu(&dex).with_cur_hp(101),
            Err(ConstructionError::InvalidHp { .. })
        ));
    }

    #[rstest]
    #[case(0, 100)]
    #[case(1, 150)]
    #[case(2, 200)]
    #[case(6, 400)]
    #[case(-1, 66)]
    #[case(-2, 50)]
    #[case(-6, 25)]
    fn stage_multipliers_match_the_table(#[case] stage: i8, #[case] expected: u16) {
        assert_eq!(apply_stage_multiplier(100, stage), expected);
    }

    #[test]
    fn stages_clamp_at_six() {
        let dex = dex();
        let mut p = pikachu(&dex);
        for _ in 0..5 {
            p.apply_stage(Stat::Attack, 2);
        }
        assert_eq!(p.stage(Stat::Attack), 6);
        p.apply_stage(Stat::Evasion, -8);
        assert_eq!(p.stage(Stat::Evasion), -6);
    }

    #[test]
    fn damage_and_heal_respect_bounds() {
        let dex = dex();
        let mut p = pikachu(&dex);
        assert_eq!(p.take_damage(30), 30);
        assert_eq!(p.cur_hp, 70);
        assert_eq!(p.take_damage(500), 70);
        assert!(!p.is_alive());
        assert_eq!(p.heal(40), 40);
        assert_eq!(p.heal(500), 60);
        assert_eq!(p.cur_hp, p.max_hp);
    }

    #[test]
    fn paralysis_quarters_speed() {
        let dex = dex();
        let mut p = pikachu(&dex);
        assert_eq!(p.effective_speed(), 100);
        p.nv_status = Some(NvStatus::new(NvStatusKind::Paralyzed));
        assert_eq!(p.effective_speed(), 25);
    }

    #[test]
    fn switch_out_clears_battle_state() {
        let dex = dex();
        let mut p = pikachu(&dex);
        p.apply_stage(Stat::Attack, 2);
        p.v.confused = 3;
        p.v.binding = Some(Binding {
            kind: BindingKind::Wrap,
            turns: 2,
            source: 1,
        });
        p.crit_stage = 2;
        p.nv_status = Some(NvStatus {
            kind: NvStatusKind::BadlyPoisoned,
            counter: 5,
        });
        p.switch_out();
        assert_eq!(p.stage(Stat::Attack), 0);
        assert_eq!(p.v, VolatileStatus::default());
        assert_eq!(p.crit_stage, 0);
        assert_eq!(p.nv_status.unwrap().counter, 1);
    }

    #[test]
    fn transform_copies_and_restores() {
        let dex = dex();
        let mut p = pikachu(&dex);
        let target = Pokemon::new(
            &dex,
            "snorlax",
            22,
            &["body-slam", "rest"],
            "male",
            StatSpec::Actual([200, 150, 90, 80, 120, 40]),
        )
        .unwrap();
        let original_attack = p.stats_actual[1];
        p.transform_into(&target);
        assert!(p.v.transformed);
        assert_eq!(p.stats_actual[1], 150);
        assert_eq!(p.max_hp, 100);
        assert_eq!(p.moves.len(), 2);
        assert!(p.moves.iter().all(|m| m.cur_pp <= 5));
        p.switch_out();
        assert_eq!(p.stats_actual[1], original_attack);
        assert_eq!(p.moves.len(), 1);
    }

    #[test]
    fn trapped_states_block_switching() {
        let dex = dex();
        let mut p = pikachu(&dex);
        assert!(!p.is_trapped());
        p.v.perma_trapped = true;
        assert!(p.is_trapped());
        p.v.perma_trapped = false;
        p.v.rooting = Some(RootingKind::Ingrain);
        assert!(p.is_trapped());
        p.v.rooting = Some(RootingKind::AquaRing);
        assert!(!p.is_trapped());
    }
}
