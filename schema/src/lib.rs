// Shared vocabulary for the battle simulation engine. These are the enums
// the reference data is keyed on, split out of the main crate so both the
// engine and any data tooling agree on names and serialized spellings.

pub use battle_types::*;
pub use pokemon_types::*;
pub use statuses::*;

pub mod battle_types;
pub mod pokemon_types;
pub mod statuses;
