//! Deterministic turn-based battle simulation engine.
//!
//! A battle runs between two [`Trainer`]s, each fielding a roster of
//! [`Pokemon`] built against an explicit reference-data provider
//! ([`Dex`]). The [`Battle`] session validates and orders one action per
//! side per turn, drives the move-resolution pipeline, and narrates
//! everything into an append-only event log. Every random decision flows
//! through the [`BattleRng`] seams, so tests pin outcomes individually.

pub mod battle;
pub mod dex;
pub mod errors;
pub mod field;
pub mod moves;
pub mod pokemon;
pub mod trainer;

// Shared vocabulary types from the schema crate.
pub use schema::{
    BindingKind, Gender, MoveCategory, NvStatusKind, PokemonType, RootingKind, Stat, Terrain,
    Weather,
};

// Core session types.
pub use battle::log::EventLog;
pub use battle::rng::{BattleRng, ScriptedRng, StandardRng};
pub use battle::session::{Battle, TurnAction};

// Entity construction.
pub use dex::{AbilityCap, AbilityData, Dex, ItemData, ItemKind, SpeciesData};
pub use field::Battlefield;
pub use moves::{MoveData, MoveInstance};
pub use pokemon::{Pokemon, StatSpec};
pub use trainer::Trainer;

// Error taxonomy.
pub use errors::{ActionError, BattleError, BattleResult, ConstructionError, LifecycleError};
