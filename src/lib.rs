//! Pokedex Registry
//!
//! Owners arranged in a circular ring, each holding a pokedex kept as a
//! binary search tree keyed by species id. Species come from a read-only
//! first-generation catalog.

// --- MODULE DECLARATIONS ---
pub mod console;
pub mod errors;
pub mod events;
pub mod fight;
pub mod menu;
pub mod owners;
pub mod pokedex;
pub mod pokemon;
pub mod registry;
pub mod species;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{PokemonType, SpeciesEntry};

// --- From this crate's modules (`src/`) ---

// Errors and results.
pub use errors::{
    CatalogError, CatalogResult, OwnerError, OwnerResult, PokedexError, PokedexResult,
    RegistryError, RegistryResult,
};

// Core data structures.
pub use owners::{Direction, MergeReport, Owner, OwnerId, OwnerRing};
pub use pokedex::{DisplayOrder, EvolutionOutcome, NodeRef, PokedexTree, TraversalOrder};
pub use pokemon::PokemonRecord;
pub use species::Catalog;

// User-level operations and their reporting.
pub use events::{EventBus, RegistryEvent};
pub use fight::{fight_score, FightOutcome, FightReport};
pub use registry::Registry;

// Interactive front end.
pub use console::Console;
pub use menu::Menu;
