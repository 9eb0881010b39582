use std::fmt;

use crate::errors::ConstructionError;
use crate::pokemon::Pokemon;

type SelectionFn = Box<dyn FnMut(&mut Trainer)>;

/// One side of a battle: an ordered roster of 1-6 combatants, the active
/// pointer, team-wide volatiles, and an optional replacement policy run
/// when the active combatant faints.
pub struct Trainer {
    pub name: String,
    pub roster: Vec<Pokemon>,
    pub current: usize,
    pub light_screen: u8,
    pub reflect: u8,
    pub spikes: u8,
    pub(crate) in_battle: bool,
    selection: Option<SelectionFn>,
}

impl Trainer {
    pub fn new(name: &str, mut roster: Vec<Pokemon>) -> Result<Trainer, ConstructionError> {
        if roster.is_empty() || roster.len() > 6 {
            return Err(ConstructionError::InvalidRosterSize(roster.len()));
        }
        for pokemon in &mut roster {
            if pokemon.assigned {
                return Err(ConstructionError::AlreadyAssigned(pokemon.nickname.clone()));
            }
            pokemon.assigned = true;
        }
        Ok(Trainer {
            name: name.to_string(),
            roster,
            current: 0,
            light_screen: 0,
            reflect: 0,
            spikes: 0,
            in_battle: false,
            selection: None,
        })
    }

    /// Install the replacement-selection callback. It receives the trainer
    /// and should set `current` to the chosen reserve; an invalid choice
    /// falls back to roster order.
    pub fn with_selection(mut self, selection: impl FnMut(&mut Trainer) + 'static) -> Trainer {
        self.selection = Some(Box::new(selection));
        self
    }

    pub fn active(&self) -> &Pokemon {
        &self.roster[self.current]
    }

    pub fn active_mut(&mut self) -> &mut Pokemon {
        let current = self.current;
        &mut self.roster[current]
    }

    /// First healthy reserve in roster order.
    pub fn first_available(&self) -> Option<usize> {
        self.roster
            .iter()
            .enumerate()
            .find(|(i, p)| *i != self.current && p.is_alive())
            .map(|(i, _)| i)
    }

    pub fn has_reserve(&self) -> bool {
        self.first_available().is_some()
    }

    pub fn all_fainted(&self) -> bool {
        self.roster.iter().all(|p| !p.is_alive())
    }

    /// Pick a replacement for the active slot: the installed callback if
    /// any, roster order otherwise. Returns the chosen index, or None
    /// with nothing alive in reserve.
    pub(crate) fn choose_replacement(&mut self) -> Option<usize> {
        let fallback = self.first_available()?;
        if let Some(mut selection) = self.selection.take() {
            selection(self);
            self.selection = Some(selection);
            let chosen = self.current;
            if chosen < self.roster.len() && self.roster[chosen].is_alive() {
                return Some(chosen);
            }
        }
        Some(fallback)
    }

    pub(crate) fn tick_screens(&mut self) {
        self.light_screen = self.light_screen.saturating_sub(1);
        self.reflect = self.reflect.saturating_sub(1);
    }
}

impl fmt::Debug for Trainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trainer")
            .field("name", &self.name)
            .field("roster", &self.roster)
            .field("current", &self.current)
            .field("light_screen", &self.light_screen)
            .field("reflect", &self.reflect)
            .field("spikes", &self.spikes)
            .field("in_battle", &self.in_battle)
            .field("selection", &self.selection.as_ref().map(|_| "<callback>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dex::Dex;
    use crate::pokemon::StatSpec;

    fn member(dex: &Dex) -> Pokemon {
        Pokemon::new(
            dex,
            "pikachu",
            22,
            &["tackle"],
            "male",
            StatSpec::Actual([100; 6]),
        )
        .unwrap()
    }

    #[test]
    fn roster_bounds_are_enforced() {
        let dex = Dex::bundled().unwrap();
        assert!(matches!(
            Trainer::new("Ash", vec![]),
            Err(ConstructionError::InvalidRosterSize(0))
        ));
        let seven: Vec<_> = (0..7).map(|_| member(&dex)).collect();
        assert!(matches!(
            Trainer::new("Ash", seven),
            Err(ConstructionError::InvalidRosterSize(7))
        ));
        let trainer = Trainer::new("Ash", vec![member(&dex)]).unwrap();
        assert_eq!(trainer.name, "Ash");
        assert!(!trainer.in_battle);
        assert_eq!(trainer.roster.len(), 1);
    }

    #[test]
    fn combatants_cannot_be_shared_between_trainers() {
        let dex = Dex::bundled().unwrap();
        let trainer = Trainer::new("Ash", vec![member(&dex)]).unwrap();
        let reused = trainer.roster[0].clone();
        assert!(matches!(
            Trainer::new("Misty", vec![reused]),
            Err(ConstructionError::AlreadyAssigned(_))
        ));
    }

    #[test]
    fn replacement_prefers_callback_choice() {
        let dex = Dex::bundled().unwrap();
        let roster = vec![member(&dex), member(&dex), member(&dex)];
        let mut trainer = Trainer::new("Ash", roster)
            .unwrap()
            .with_selection(|t| t.current = 2);
        trainer.roster[0].take_damage(200);
        assert_eq!(trainer.choose_replacement(), Some(2));
    }

    #[test]
    fn replacement_falls_back_to_roster_order() {
        let dex = Dex::bundled().unwrap();
        let roster = vec![member(&dex), member(&dex), member(&dex)];
        // Callback picks a fainted reserve; roster order wins instead.
        let mut trainer = Trainer::new("Ash", roster)
            .unwrap()
            .with_selection(|t| t.current = 2);
        trainer.roster[0].take_damage(200);
        trainer.roster[2].take_damage(200);
        assert_eq!(trainer.choose_replacement(), Some(1));
    }

    #[test]
    fn no_replacement_when_roster_is_wiped() {
        let dex = Dex::bundled().unwrap();
        let mut trainer = Trainer::new("Ash", vec![member(&dex)]).unwrap();
        trainer.roster[0].take_damage(200);
        assert!(trainer.all_fainted());
        assert_eq!(trainer.choose_replacement(), None);
    }
}
