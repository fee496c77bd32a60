use crate::PokemonType;
use serde::{Deserialize, Serialize};

/// One row of the species catalog.
///
/// `id` doubles as the 1-based catalog index. When `evolvable` is set, the
/// species evolves into the entry at `id + 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesEntry {
    pub id: u16,
    pub name: String,
    pub pokemon_type: PokemonType,
    pub hit_points: u16,
    pub attack: u16,
    pub evolvable: bool,
}

impl SpeciesEntry {
    pub fn new(
        id: u16,
        name: impl Into<String>,
        pokemon_type: PokemonType,
        hit_points: u16,
        attack: u16,
        evolvable: bool,
    ) -> Self {
        SpeciesEntry {
            id,
            name: name.into(),
            pokemon_type,
            hit_points,
            attack,
            evolvable,
        }
    }
}
