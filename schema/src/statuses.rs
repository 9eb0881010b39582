use serde::{Deserialize, Serialize};

/// Non-volatile status conditions. A combatant holds at most one, with a
/// companion counter (sleep turns remaining, badly-poisoned severity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NvStatusKind {
    Burned,
    Frozen,
    Paralyzed,
    Poisoned,
    Asleep,
    BadlyPoisoned,
}

impl NvStatusKind {
    /// Numeric code used by the move catalog's effect parameters.
    pub fn from_code(code: i16) -> Option<NvStatusKind> {
        match code {
            1 => Some(NvStatusKind::Burned),
            2 => Some(NvStatusKind::Frozen),
            3 => Some(NvStatusKind::Paralyzed),
            4 => Some(NvStatusKind::Poisoned),
            5 => Some(NvStatusKind::Asleep),
            6 => Some(NvStatusKind::BadlyPoisoned),
            _ => None,
        }
    }
}

/// Flavors of the 2-5 turn trapping effect; each narrates differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BindingKind {
    Bind,
    Wrap,
    FireSpin,
    Clamp,
}

impl BindingKind {
    pub fn from_code(code: i16) -> Option<BindingKind> {
        match code {
            1 => Some(BindingKind::Bind),
            2 => Some(BindingKind::Wrap),
            3 => Some(BindingKind::FireSpin),
            4 => Some(BindingKind::Clamp),
            _ => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            BindingKind::Bind => "Bind",
            BindingKind::Wrap => "Wrap",
            BindingKind::FireSpin => "Fire Spin",
            BindingKind::Clamp => "Clamp",
        }
    }
}

/// Self-rooting effects that heal at end of turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RootingKind {
    AquaRing,
    Ingrain,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_catalog() {
        assert_eq!(NvStatusKind::from_code(1), Some(NvStatusKind::Burned));
        assert_eq!(NvStatusKind::from_code(6), Some(NvStatusKind::BadlyPoisoned));
        assert_eq!(NvStatusKind::from_code(0), None);
    }

    #[test]
    fn binding_codes_match_catalog() {
        assert_eq!(BindingKind::from_code(4), Some(BindingKind::Clamp));
        assert_eq!(BindingKind::FireSpin.display_name(), "Fire Spin");
    }
}
