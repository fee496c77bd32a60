use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Elemental type of a species. Closed set; catalog files must use one of these.
///
/// Displays in upper case (`GRASS`), and parses case-insensitively.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum PokemonType {
    Grass,
    Fire,
    Water,
    Bug,
    Normal,
    Poison,
    Electric,
    Ground,
    Fairy,
    Fighting,
    Psychic,
    Rock,
    Ghost,
    Dragon,
    Ice,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_display_is_upper_case() {
        assert_eq!(PokemonType::Grass.to_string(), "GRASS");
        assert_eq!(PokemonType::Fighting.to_string(), "FIGHTING");
    }

    #[test]
    fn test_every_type_parses_back_from_its_display_name() {
        for pokemon_type in PokemonType::iter() {
            let shown = pokemon_type.to_string();
            assert_eq!(PokemonType::from_str(&shown), Ok(pokemon_type));
            assert_eq!(PokemonType::from_str(&shown.to_lowercase()), Ok(pokemon_type));
        }
        assert_eq!(PokemonType::iter().count(), 15);
    }

    #[test]
    fn test_flying_is_not_a_type() {
        assert!(PokemonType::from_str("FLYING").is_err());
    }
}
