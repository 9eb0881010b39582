use schema::{MoveCategory, PokemonType};
use serde::{Deserialize, Serialize};

/// Catalog entry for one move, as loaded from the bundled move table.
/// `effect_id` selects the resolution behavior; `effect_stat` and
/// `effect_amount` are its parameters (target stat and stage delta for stat
/// changes, status code for infliction, fixed damage, screen kind, and so
/// on). `accuracy: None` means the move never misses by normal means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveData {
    pub id: u16,
    pub name: String,
    pub category: MoveCategory,
    pub power: Option<u16>,
    pub accuracy: Option<u8>,
    pub move_type: PokemonType,
    pub max_pp: u8,
    pub effect_id: u8,
    pub effect_chance: Option<u8>,
    pub effect_stat: Option<i16>,
    pub effect_amount: Option<i16>,
    pub targets: u8,
}

/// Target-mask slots that single-target protection applies to.
const PROTECTABLE_TARGETS: std::ops::RangeInclusive<u8> = 8..=11;

/// "oran-berry" -> "Oran Berry": the capitalization narration uses for
/// move and item names.
pub(crate) fn title_case(name: &str) -> String {
    name.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl MoveData {
    pub fn is_single_target(&self) -> bool {
        PROTECTABLE_TARGETS.contains(&self.targets)
    }

    /// "fire-spin" -> "Fire Spin", as narration prints move names.
    pub fn display_name(&self) -> String {
        title_case(&self.name)
    }

    /// The typeless 40-power hit a confused combatant lands on itself.
    /// It never appears in the catalog and bypasses the effect pipeline.
    pub fn confusion_self_hit() -> MoveData {
        MoveData {
            id: 0,
            name: "self-attack".to_string(),
            category: MoveCategory::Physical,
            power: Some(40),
            accuracy: None,
            move_type: PokemonType::Typeless,
            max_pp: 1,
            effect_id: 0,
            effect_chance: None,
            effect_stat: None,
            effect_amount: None,
            targets: 10,
        }
    }
}

/// Mutable runtime wrapper around one catalog move: current PP, live power
/// and accuracy (streak moves and copies adjust them; `reset_power`
/// restores the catalog value), and the disable countdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveInstance {
    pub data: MoveData,
    pub cur_pp: u8,
    pub power: Option<u16>,
    pub accuracy: Option<u8>,
    pub disabled: u8,
}

impl MoveInstance {
    pub fn new(data: MoveData) -> MoveInstance {
        MoveInstance {
            cur_pp: data.max_pp,
            power: data.power,
            accuracy: data.accuracy,
            disabled: 0,
            data,
        }
    }

    /// A transient copy with reduced PP, as produced by move-copying
    /// effects.
    pub fn copied(data: MoveData) -> MoveInstance {
        let mut inst = MoveInstance::new(data);
        inst.cur_pp = inst.cur_pp.min(5);
        inst
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled > 0
    }

    pub fn spend_pp(&mut self) {
        self.cur_pp = self.cur_pp.saturating_sub(1);
    }

    pub fn restore_pp(&mut self, amount: u8) {
        self.cur_pp = (self.cur_pp + amount).min(self.data.max_pp);
    }

    pub fn reset_power(&mut self) {
        self.power = self.data.power;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MoveData {
        MoveData {
            id: 7,
            name: "fire-spin".to_string(),
            category: MoveCategory::Special,
            power: Some(35),
            accuracy: Some(85),
            move_type: PokemonType::Fire,
            max_pp: 15,
            effect_id: 24,
            effect_chance: None,
            effect_stat: Some(3),
            effect_amount: None,
            targets: 10,
        }
    }

    #[test]
    fn display_name_capitalizes_words() {
        assert_eq!(sample().display_name(), "Fire Spin");
    }

    #[test]
    fn pp_never_exceeds_max_or_underflows() {
        let mut inst = MoveInstance::new(sample());
        inst.restore_pp(10);
        assert_eq!(inst.cur_pp, 15);
        inst.cur_pp = 0;
        inst.spend_pp();
        assert_eq!(inst.cur_pp, 0);
    }

    #[test]
    fn copied_instances_cap_pp_at_five() {
        let inst = MoveInstance::copied(sample());
        assert_eq!(inst.cur_pp, 5);
    }

    #[test]
    fn power_reset_restores_catalog_value() {
        let mut inst = MoveInstance::new(sample());
        inst.power = Some(280);
        inst.reset_power();
        assert_eq!(inst.power, Some(35));
    }

    #[test]
    fn single_target_mask_window() {
        let mut data = sample();
        assert!(data.is_single_target());
        data.targets = 7;
        assert!(!data.is_single_target());
    }
}
