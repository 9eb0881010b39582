use std::collections::HashMap;

use schema::{NvStatusKind, PokemonType};
use serde::{Deserialize, Serialize};

use crate::battle::effects::MoveEffect;
use crate::battle::rng::BattleRng;
use crate::errors::ConstructionError;
use crate::moves::MoveData;

/// Species entry from the bundled species table. Base stats are in the
/// canonical HP/Atk/Def/SpAtk/SpDef/Spe ordering; weight is in hectograms,
/// which is what the weight-scaled power thresholds expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesData {
    pub id: u16,
    pub name: String,
    pub types: (PokemonType, Option<PokemonType>),
    pub base_stats: [u16; 6],
    pub weight: u16,
}

/// Capabilities an ability descriptor can grant. The engine only ever asks
/// whether a capability is present; no ability names appear in handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityCap {
    /// Moves used by or against the holder never miss
    AlwaysHit,
    /// Holder's accuracy multiplied by 1.3
    AccuracyBoost,
    /// Secondary effect chances against the holder never trigger
    BlocksSecondary,
    /// Holder is immune to ground-type damage
    GroundImmune,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityData {
    pub name: String,
    pub caps: Vec<AbilityCap>,
}

impl AbilityData {
    pub fn has(&self, cap: AbilityCap) -> bool {
        self.caps.contains(&cap)
    }
}

/// What an item does when used or held.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Restores a fixed amount of HP when used from the bag
    Medicine { heal: u16 },
    /// Cures one non-volatile status, or any if `status` is None
    StatusCure { status: Option<NvStatusKind> },
    /// Full HP restore plus any-status cure
    FullRestore,
    /// Held: automatically eaten at or below half HP
    HealBerry { heal: u16 },
    /// Held: a two-turn charge move resolves both phases at once
    ChargeHerb,
    /// Held: restores 1/16 max HP at the end of every turn
    Leftovers,
    /// Valid to hold, no battle behavior modeled
    Plain,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemData {
    pub name: String,
    pub kind: ItemKind,
}

#[derive(Debug, Deserialize)]
struct NatureEntry {
    plus: usize,
    minus: usize,
}

/// Immutable reference-data provider: species, move catalog, natures, the
/// type-effectiveness matrix, ability and item descriptors. Loaded once
/// (from the bundled RON tables or caller-supplied RON text) and passed
/// explicitly into construction and battles, so independent battles and
/// tests never share hidden global state.
#[derive(Debug)]
pub struct Dex {
    species: Vec<SpeciesData>,
    species_by_name: HashMap<String, usize>,
    moves: Vec<MoveData>,
    moves_by_name: HashMap<String, usize>,
    natures: HashMap<String, (usize, usize)>,
    type_chart: Vec<Vec<f64>>,
    abilities: HashMap<String, AbilityData>,
    items: HashMap<String, ItemData>,
}

impl Dex {
    /// Build a provider from the reference tables bundled with the crate.
    pub fn bundled() -> Result<Dex, ConstructionError> {
        Dex::from_ron_strs(
            include_str!("../data/species.ron"),
            include_str!("../data/moves.ron"),
            include_str!("../data/natures.ron"),
            include_str!("../data/type_chart.ron"),
            include_str!("../data/abilities.ron"),
            include_str!("../data/items.ron"),
        )
    }

    /// Build a provider from caller-supplied RON tables.
    pub fn from_ron_strs(
        species: &str,
        moves: &str,
        natures: &str,
        type_chart: &str,
        abilities: &str,
        items: &str,
    ) -> Result<Dex, ConstructionError> {
        let species: Vec<SpeciesData> = parse("species", species)?;
        let moves: Vec<MoveData> = parse("moves", moves)?;
        let natures: HashMap<String, NatureEntry> = parse("natures", natures)?;
        let type_chart: Vec<Vec<f64>> = parse("type chart", type_chart)?;
        let abilities: Vec<AbilityData> = parse("abilities", abilities)?;
        let items: Vec<ItemData> = parse("items", items)?;

        let type_count = PokemonType::chart_order().len();
        if type_chart.len() != type_count || type_chart.iter().any(|row| row.len() != type_count) {
            return Err(ConstructionError::MalformedData(format!(
                "type chart must be {0}x{0}",
                type_count
            )));
        }
        for entry in &moves {
            if MoveEffect::from_id(entry.effect_id).is_none() {
                return Err(ConstructionError::MalformedData(format!(
                    "move {} has unknown effect id {}",
                    entry.name, entry.effect_id
                )));
            }
        }
        for nature in natures.values() {
            if !(1..=5).contains(&nature.plus) || !(1..=5).contains(&nature.minus) {
                return Err(ConstructionError::MalformedData(
                    "nature modifier indices must target a non-HP stat".to_string(),
                ));
            }
        }

        let species_by_name = species
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.clone(), i))
            .collect();
        let moves_by_name = moves
            .iter()
            .enumerate()
            .map(|(i, m)| (m.name.clone(), i))
            .collect();
        Ok(Dex {
            species,
            species_by_name,
            moves,
            moves_by_name,
            natures: natures
                .into_iter()
                .map(|(name, n)| (name, (n.plus, n.minus)))
                .collect(),
            type_chart,
            abilities: abilities.into_iter().map(|a| (a.name.clone(), a)).collect(),
            items: items.into_iter().map(|i| (i.name.clone(), i)).collect(),
        })
    }

    pub fn species(&self, name: &str) -> Option<&SpeciesData> {
        self.species_by_name
            .get(&name.to_lowercase())
            .map(|&i| &self.species[i])
    }

    pub fn species_by_id(&self, id: u16) -> Option<&SpeciesData> {
        self.species.iter().find(|s| s.id == id)
    }

    pub fn move_data(&self, name: &str) -> Option<&MoveData> {
        self.moves_by_name
            .get(&name.to_lowercase())
            .map(|&i| &self.moves[i])
    }

    /// Effectiveness multiplier of an attacking type against one defending
    /// type. Callers multiply over the defender's type pair.
    pub fn type_effectiveness(&self, attacking: PokemonType, defending: PokemonType) -> f64 {
        self.type_chart[attacking.chart_index()][defending.chart_index()]
    }

    /// (boosted, hindered) stat indices for a nature. Equal indices mean a
    /// neutral nature.
    pub fn nature_mods(&self, nature: &str) -> Option<(usize, usize)> {
        self.natures.get(&nature.to_lowercase()).copied()
    }

    pub fn ability(&self, name: &str) -> Option<&AbilityData> {
        self.abilities.get(&name.to_lowercase())
    }

    /// Capability query for an optional ability name. Unknown or absent
    /// abilities grant nothing.
    pub fn ability_has(&self, name: Option<&str>, cap: AbilityCap) -> bool {
        name.and_then(|n| self.ability(n))
            .map_or(false, |a| a.has(cap))
    }

    pub fn item(&self, name: &str) -> Option<&ItemData> {
        self.items.get(&name.to_lowercase())
    }

    /// Uniformly chosen catalog move, for moves that call out to a random
    /// move. The caller filters ineligible picks and re-rolls.
    pub fn random_move(&self, rng: &mut dyn BattleRng) -> &MoveData {
        &self.moves[rng.pick(self.moves.len())]
    }

    /// Every real element type (excludes the typeless pseudo-type).
    pub fn all_types(&self) -> Vec<PokemonType> {
        PokemonType::chart_order()
            .into_iter()
            .filter(|t| *t != PokemonType::Typeless)
            .collect()
    }
}

fn parse<'a, T: Deserialize<'a>>(table: &str, text: &'a str) -> Result<T, ConstructionError> {
    ron::from_str(text)
        .map_err(|err| ConstructionError::MalformedData(format!("{} table: {}", table, err)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::rng::ScriptedRng;

    #[test]
    fn bundled_tables_load() {
        let dex = Dex::bundled().expect("bundled data must parse");
        assert!(dex.species("bulbasaur").is_some());
        assert!(dex.species("BULBASAUR").is_some());
        assert_eq!(dex.species_by_id(25).unwrap().name, "pikachu");
        assert!(dex.move_data("tackle").is_some());
        assert!(dex.move_data("shadow-sledge").is_none());
    }

    #[test]
    fn type_chart_lookups() {
        let dex = Dex::bundled().unwrap();
        assert_eq!(
            dex.type_effectiveness(PokemonType::Electric, PokemonType::Ground),
            0.0
        );
        assert_eq!(
            dex.type_effectiveness(PokemonType::Rock, PokemonType::Fire),
            2.0
        );
        assert_eq!(
            dex.type_effectiveness(PokemonType::Typeless, PokemonType::Ghost),
            1.0
        );
    }

    #[test]
    fn nature_lookup_is_case_insensitive() {
        let dex = Dex::bundled().unwrap();
        assert_eq!(dex.nature_mods("Adamant"), Some((1, 3)));
        assert_eq!(dex.nature_mods("hardy"), Some((1, 1)));
        assert_eq!(dex.nature_mods("spicy"), None);
    }

    #[test]
    fn ability_caps_query() {
        let dex = Dex::bundled().unwrap();
        assert!(dex.ability_has(Some("compound-eyes"), AbilityCap::AccuracyBoost));
        assert!(!dex.ability_has(Some("static"), AbilityCap::AccuracyBoost));
        assert!(!dex.ability_has(None, AbilityCap::AlwaysHit));
    }

    #[test]
    fn random_move_comes_from_catalog() {
        let dex = Dex::bundled().unwrap();
        let mut rng = ScriptedRng::new(7);
        let picked = dex.random_move(&mut rng);
        assert!(dex.move_data(&picked.name).is_some());
    }
}
