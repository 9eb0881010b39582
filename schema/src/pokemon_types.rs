use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Element types as they appear in the bundled type chart. `Typeless` is the
/// pseudo-type used by confusion self-hits and a handful of fixed-damage
/// moves; it is neutral against everything and never receives STAB.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PokemonType {
    Normal,
    Fighting,
    Flying,
    Poison,
    Ground,
    Rock,
    Bug,
    Ghost,
    Fire,
    Water,
    Grass,
    Electric,
    Psychic,
    Ice,
    Dragon,
    Typeless,
}

impl PokemonType {
    /// Row/column position in the bundled effectiveness matrix.
    pub fn chart_index(self) -> usize {
        self as usize
    }

    /// Every type in effectiveness-matrix order.
    pub fn chart_order() -> Vec<PokemonType> {
        use strum::IntoEnumIterator;
        PokemonType::iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn parses_lowercase_names() {
        assert_eq!(PokemonType::from_str("fire").unwrap(), PokemonType::Fire);
        assert_eq!(PokemonType::from_str("typeless").unwrap(), PokemonType::Typeless);
        assert!(PokemonType::from_str("shadow").is_err());
    }

    #[test]
    fn displays_as_data_key() {
        assert_eq!(PokemonType::Electric.to_string(), "electric");
    }
}
