// Pokedex Registry Schema - Shared type definitions
// This crate contains the catalog data types shared between the registry core
// and anything that reads or writes catalog files.

// Re-export the main types
pub use pokemon_types::*;
pub use species_data::*;

pub mod pokemon_types;
pub mod species_data;
