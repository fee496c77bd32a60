use crate::fight::{FightOutcome, FightReport};
use crate::pokemon::PokemonRecord;
use std::fmt;

/// Something a registry operation did, for the display layer to render.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryEvent {
    OwnerCreated {
        owner: String,
        starter: PokemonRecord,
    },
    OwnerDeleted {
        owner: String,
    },
    PokemonAdded {
        owner: String,
        pokemon: PokemonRecord,
    },
    PokemonReleased {
        owner: String,
        pokemon: PokemonRecord,
    },
    PokemonEvolved {
        owner: String,
        from: PokemonRecord,
        into: PokemonRecord,
    },
    /// The evolved form was already owned, so the lower stage was released.
    EvolutionAlreadyOwned {
        owner: String,
        released: PokemonRecord,
        existing: u16,
    },
    FightResolved(FightReport),
    PokemonTransferred {
        from: String,
        into: String,
        pokemon: PokemonRecord,
    },
    MergeCollision {
        from: String,
        into: String,
        pokemon: PokemonRecord,
    },
    OwnerAbsorbed {
        absorbed: String,
        into: String,
    },
    OwnersSorted {
        count: usize,
    },
}

impl RegistryEvent {
    /// Player-facing text for the event.
    pub fn format(&self) -> String {
        match self {
            RegistryEvent::OwnerCreated { owner, starter } => format!(
                "New Pokedex created for {} with starter {}.",
                owner, starter.name
            ),
            RegistryEvent::OwnerDeleted { owner } => {
                format!("Deleting {}'s entire Pokedex...", owner)
            }
            RegistryEvent::PokemonAdded { pokemon, .. } => {
                format!("Pokemon {} (ID {}) added.", pokemon.name, pokemon.id)
            }
            RegistryEvent::PokemonReleased { pokemon, .. } => {
                format!("Removing Pokemon {} (ID {}).", pokemon.name, pokemon.id)
            }
            RegistryEvent::PokemonEvolved { from, into, .. } => format!(
                "Pokemon evolved from {} (ID {}) to {} (ID {}).",
                from.name, from.id, into.name, into.id
            ),
            RegistryEvent::EvolutionAlreadyOwned {
                released, existing, ..
            } => format!(
                "Evolution ID {} already in the Pokedex. Releasing {} (ID {}).",
                existing, released.name, released.id
            ),
            RegistryEvent::FightResolved(report) => {
                let verdict = match report.outcome {
                    FightOutcome::FirstWins => format!("{} wins!", report.first.name),
                    FightOutcome::SecondWins => format!("{} wins!", report.second.name),
                    FightOutcome::Draw => "It's a tie!".to_string(),
                };
                format!(
                    "Pokemon 1: {} (Score = {:.2})\nPokemon 2: {} (Score = {:.2})\n{}",
                    report.first.name,
                    report.first_score.into_inner(),
                    report.second.name,
                    report.second_score.into_inner(),
                    verdict
                )
            }
            RegistryEvent::PokemonTransferred { into, pokemon, .. } => {
                format!("{} (ID {}) joins {}.", pokemon.name, pokemon.id, into)
            }
            RegistryEvent::MergeCollision { into, pokemon, .. } => format!(
                "{} already has ID {}; {}'s copy was dropped.",
                into, pokemon.id, pokemon.name
            ),
            RegistryEvent::OwnerAbsorbed { absorbed, .. } => format!(
                "Merge completed.\nOwner '{}' has been removed after merging.",
                absorbed
            ),
            RegistryEvent::OwnersSorted { .. } => "Owners sorted by name.".to_string(),
        }
    }
}

/// Ordered events from one registry operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventBus {
    events: Vec<RegistryEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: RegistryEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[RegistryEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Formatted lines, one per event.
    pub fn messages(&self) -> Vec<String> {
        self.events.iter().map(RegistryEvent::format).collect()
    }
}

impl From<RegistryEvent> for EventBus {
    fn from(event: RegistryEvent) -> Self {
        EventBus {
            events: vec![event],
        }
    }
}

impl fmt::Display for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for message in self.messages() {
            writeln!(f, "{}", message)?;
        }
        Ok(())
    }
}
