use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveCategory {
    Status,
    Physical,
    Special,
}

/// Stat slots in the canonical ordering the reference data uses:
/// HP, Attack, Defense, Sp. Atk, Sp. Def, Speed, then the two battle-only
/// stages (accuracy, evasion).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    Hp,
    Attack,
    Defense,
    SpAttack,
    SpDefense,
    Speed,
    Accuracy,
    Evasion,
}

impl Stat {
    pub fn from_index(index: usize) -> Option<Stat> {
        match index {
            0 => Some(Stat::Hp),
            1 => Some(Stat::Attack),
            2 => Some(Stat::Defense),
            3 => Some(Stat::SpAttack),
            4 => Some(Stat::SpDefense),
            5 => Some(Stat::Speed),
            6 => Some(Stat::Accuracy),
            7 => Some(Stat::Evasion),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Name used in stage-change narration.
    pub fn display_name(self) -> &'static str {
        match self {
            Stat::Hp => "Health",
            Stat::Attack => "Attack",
            Stat::Defense => "Defense",
            Stat::SpAttack => "Sp. Atk",
            Stat::SpDefense => "Sp. Def",
            Stat::Speed => "Speed",
            Stat::Accuracy => "accuracy",
            Stat::Evasion => "evasion",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Genderless,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Weather {
    Clear,
    HarshSunlight,
    Rain,
    Sandstorm,
    Hail,
    Fog,
}

/// Location category of the battle. Only recorded and validated; a few
/// terrain-sensitive moves read it through the battlefield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Terrain {
    Other,
    Building,
    Cave,
    Sand,
    Water,
    Grass,
    Snow,
    Ice,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn stat_index_round_trip() {
        for i in 0..8 {
            assert_eq!(Stat::from_index(i).unwrap().index(), i);
        }
        assert!(Stat::from_index(8).is_none());
    }

    #[test]
    fn weather_parses_kebab_case() {
        assert_eq!(Weather::from_str("harsh-sunlight").unwrap(), Weather::HarshSunlight);
        assert!(Weather::from_str("acid-rain").is_err());
    }

    #[test]
    fn gender_rejects_unknown() {
        assert!(Gender::from_str("neutral").is_err());
        assert_eq!(Gender::from_str("genderless").unwrap(), Gender::Genderless);
    }
}
