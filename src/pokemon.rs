use schema::{PokemonType, SpeciesEntry};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A creature held in an owner's pokedex.
///
/// Copied by value out of the catalog. Records are never edited in place;
/// evolution swaps the whole record for the next species' record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonRecord {
    pub id: u16,
    pub name: String,
    pub pokemon_type: PokemonType,
    pub hit_points: u16,
    pub attack: u16,
    pub evolvable: bool,
}

impl PokemonRecord {
    pub fn new(
        id: u16,
        name: impl Into<String>,
        pokemon_type: PokemonType,
        hit_points: u16,
        attack: u16,
        evolvable: bool,
    ) -> Self {
        PokemonRecord {
            id,
            name: name.into(),
            pokemon_type,
            hit_points,
            attack,
            evolvable,
        }
    }
}

impl From<&SpeciesEntry> for PokemonRecord {
    fn from(entry: &SpeciesEntry) -> Self {
        PokemonRecord {
            id: entry.id,
            name: entry.name.clone(),
            pokemon_type: entry.pokemon_type,
            hit_points: entry.hit_points,
            attack: entry.attack,
            evolvable: entry.evolvable,
        }
    }
}

impl fmt::Display for PokemonRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Name: {}, Type: {}, HP: {}, Attack: {}, Can Evolve: {}",
            self.id,
            self.name,
            self.pokemon_type,
            self.hit_points,
            self.attack,
            if self.evolvable { "Yes" } else { "No" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_record_copies_every_catalog_field() {
        let entry = SpeciesEntry::new(25, "Pikachu", PokemonType::Electric, 35, 55, true);
        let record = PokemonRecord::from(&entry);

        assert_eq!(
            record,
            PokemonRecord::new(25, "Pikachu", PokemonType::Electric, 35, 55, true)
        );
    }

    #[test]
    fn test_display_line() {
        let record = PokemonRecord::new(1, "Bulbasaur", PokemonType::Grass, 45, 49, true);
        assert_eq!(
            record.to_string(),
            "ID: 1, Name: Bulbasaur, Type: GRASS, HP: 45, Attack: 49, Can Evolve: Yes"
        );

        let record = PokemonRecord::new(3, "Venusaur", PokemonType::Grass, 80, 82, false);
        assert!(record.to_string().ends_with("Can Evolve: No"));
    }
}
