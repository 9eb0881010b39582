use std::str::FromStr;

use schema::{Terrain, Weather};
use serde::{Deserialize, Serialize};

use crate::errors::ConstructionError;

/// Shared field state: weather with an optional remaining-turn count
/// (None means indefinite, as with weather set at session start), the
/// location category, and the global accuracy modifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Battlefield {
    pub weather: Weather,
    pub weather_count: Option<u8>,
    pub terrain: Terrain,
    pub acc_modifier: f64,
}

impl Battlefield {
    pub fn new(terrain: Option<&str>, weather: Option<&str>) -> Result<Battlefield, ConstructionError> {
        let terrain = match terrain {
            Some(t) => Terrain::from_str(&t.to_lowercase())
                .map_err(|_| ConstructionError::InvalidTerrain(t.to_string()))?,
            None => Terrain::Other,
        };
        let weather = match weather {
            Some(w) => Weather::from_str(&w.to_lowercase())
                .map_err(|_| ConstructionError::InvalidWeather(w.to_string()))?,
            None => Weather::Clear,
        };
        Ok(Battlefield {
            weather,
            weather_count: None,
            terrain,
            acc_modifier: if weather == Weather::Fog { 0.6 } else { 1.0 },
        })
    }

    /// Install weather for a fixed number of turns, as weather moves do.
    pub fn set_weather(&mut self, weather: Weather, turns: u8) {
        self.weather = weather;
        self.weather_count = Some(turns);
        self.acc_modifier = if weather == Weather::Fog { 0.6 } else { 1.0 };
    }

    pub fn clear_weather(&mut self) {
        self.weather = Weather::Clear;
        self.weather_count = None;
        self.acc_modifier = 1.0;
    }

    pub fn started_text(weather: Weather) -> Option<&'static str> {
        match weather {
            Weather::Rain => Some("It started to rain!"),
            Weather::Sandstorm => Some("A sandstorm kicked up!"),
            Weather::HarshSunlight => Some("The sunlight turned harsh!"),
            Weather::Hail => Some("It started to hail!"),
            Weather::Fog => Some("The fog is deep..."),
            Weather::Clear => None,
        }
    }

    pub fn continues_text(&self) -> Option<&'static str> {
        match self.weather {
            Weather::Rain => Some("Rain continues to fall."),
            Weather::Sandstorm => Some("The sandstorm rages."),
            Weather::HarshSunlight => Some("The sunlight is strong."),
            Weather::Hail => Some("Hail continues to fall."),
            Weather::Fog => Some("The fog is deep..."),
            Weather::Clear => None,
        }
    }

    pub fn ended_text(weather: Weather) -> Option<&'static str> {
        match weather {
            Weather::Rain => Some("The rain stopped."),
            Weather::Sandstorm => Some("The sandstorm subsided."),
            Weather::HarshSunlight => Some("The sunlight faded."),
            Weather::Hail => Some("The hail stopped."),
            Weather::Fog => Some("The fog lifted."),
            Weather::Clear => None,
        }
    }
}

impl Default for Battlefield {
    fn default() -> Self {
        Battlefield {
            weather: Weather::Clear,
            weather_count: None,
            terrain: Terrain::Other,
            acc_modifier: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_terrain_and_weather_names() {
        assert!(Battlefield::new(Some("water"), None).is_ok());
        assert!(matches!(
            Battlefield::new(Some("lava"), None),
            Err(ConstructionError::InvalidTerrain(_))
        ));
        assert!(Battlefield::new(None, Some("rain")).is_ok());
        assert!(matches!(
            Battlefield::new(None, Some("acid-rain")),
            Err(ConstructionError::InvalidWeather(_))
        ));
    }

    #[test]
    fn session_weather_is_indefinite() {
        let field = Battlefield::new(None, Some("rain")).unwrap();
        assert_eq!(field.weather, Weather::Rain);
        assert_eq!(field.weather_count, None);
    }

    #[test]
    fn fog_lowers_the_accuracy_modifier() {
        let field = Battlefield::new(None, Some("fog")).unwrap();
        assert_eq!(field.acc_modifier, 0.6);
        let mut field = Battlefield::default();
        field.set_weather(Weather::Fog, 5);
        assert_eq!(field.acc_modifier, 0.6);
        field.clear_weather();
        assert_eq!(field.acc_modifier, 1.0);
    }

    #[test]
    fn move_set_weather_carries_a_duration() {
        let mut field = Battlefield::default();
        field.set_weather(Weather::Sandstorm, 5);
        assert_eq!(field.weather_count, Some(5));
        assert_eq!(field.continues_text(), Some("The sandstorm rages."));
        assert_eq!(
            Battlefield::ended_text(Weather::Sandstorm),
            Some("The sandstorm subsided.")
        );
    }
}
