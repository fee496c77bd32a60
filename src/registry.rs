//! User-level registry operations.
//!
//! `Registry` pairs the owner ring with the species catalog and turns menu
//! inputs (positions, ids, names) into ring and tree operations. Mutating
//! operations report what they did through an [`EventBus`].

use crate::errors::{OwnerError, PokedexError, RegistryError, RegistryResult};
use crate::events::{EventBus, RegistryEvent};
use crate::fight::{self, FightReport};
use crate::owners::{Direction, MergeReport, Owner, OwnerId, OwnerRing};
use crate::pokedex::{evolve, traversal, DisplayOrder, EvolutionOutcome};
use crate::pokemon::PokemonRecord;
use crate::species::{Catalog, STARTER_COUNT};
use tracing::debug;

#[derive(Debug)]
pub struct Registry {
    catalog: Catalog,
    owners: OwnerRing,
}

impl Registry {
    pub fn new(catalog: Catalog) -> Self {
        Registry {
            catalog,
            owners: OwnerRing::new(),
        }
    }

    /// A registry over the built-in first-generation catalog.
    pub fn with_builtin_catalog() -> RegistryResult<Self> {
        Ok(Self::new(crate::species::builtin()?.clone()))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn owners(&self) -> &OwnerRing {
        &self.owners
    }

    pub fn owner(&self, id: OwnerId) -> RegistryResult<&Owner> {
        Ok(self.owners.get(id).ok_or(OwnerError::StaleHandle)?)
    }

    /// Open a pokedex for `name` with starter `1..=3`.
    pub fn open_pokedex(&mut self, name: &str, starter_choice: i64) -> RegistryResult<EventBus> {
        if self.owners.contains_name(name) {
            return Err(OwnerError::DuplicateName(name.to_string()).into());
        }
        let choice = checked_choice(starter_choice, STARTER_COUNT)?;
        let starter = PokemonRecord::from(self.catalog.starter(choice)?);

        self.owners.create_owner(name, starter.clone())?;
        Ok(RegistryEvent::OwnerCreated {
            owner: name.to_string(),
            starter,
        }
        .into())
    }

    /// The owner at a 1-based position counted forward from head.
    pub fn owner_at(&self, position: i64) -> RegistryResult<OwnerId> {
        if self.owners.is_empty() {
            return Err(OwnerError::EmptyRing.into());
        }
        let position = checked_choice(position, self.owners.len())?;
        Ok(self.owners.nth(position - 1).ok_or(OwnerError::EmptyRing)?)
    }

    pub fn add_pokemon(&mut self, owner: OwnerId, id: i64) -> RegistryResult<EventBus> {
        let species_id = checked_choice(id, self.catalog.len())?;
        let pokemon = self.catalog.get(species_id).map(PokemonRecord::from)?;
        let entry = self.owners.get_mut(owner).ok_or(OwnerError::StaleHandle)?;

        entry.pokedex.insert(pokemon.clone())?;
        Ok(RegistryEvent::PokemonAdded {
            owner: entry.name.clone(),
            pokemon,
        }
        .into())
    }

    pub fn release_pokemon(&mut self, owner: OwnerId, id: i64) -> RegistryResult<EventBus> {
        let entry = self.owners.get_mut(owner).ok_or(OwnerError::StaleHandle)?;
        if entry.pokedex.is_empty() {
            return Err(PokedexError::Empty.into());
        }
        let id = pokedex_id(id)?;

        let pokemon = entry.pokedex.remove(id)?;
        Ok(RegistryEvent::PokemonReleased {
            owner: entry.name.clone(),
            pokemon,
        }
        .into())
    }

    pub fn evolve_pokemon(&mut self, owner: OwnerId, id: i64) -> RegistryResult<EventBus> {
        let entry = self.owners.get_mut(owner).ok_or(OwnerError::StaleHandle)?;
        if entry.pokedex.is_empty() {
            return Err(PokedexError::Empty.into());
        }
        let id = pokedex_id(id)?;

        let event = match evolve(&mut entry.pokedex, &self.catalog, id)? {
            EvolutionOutcome::Evolved { from, into } => RegistryEvent::PokemonEvolved {
                owner: entry.name.clone(),
                from,
                into,
            },
            EvolutionOutcome::AlreadyPresent { released, existing } => {
                RegistryEvent::EvolutionAlreadyOwned {
                    owner: entry.name.clone(),
                    released,
                    existing,
                }
            }
        };
        Ok(event.into())
    }

    pub fn fight(&self, owner: OwnerId, first: i64, second: i64) -> RegistryResult<FightReport> {
        let entry = self.owner(owner)?;
        if entry.pokedex.is_empty() {
            return Err(PokedexError::Empty.into());
        }
        Ok(fight::fight(
            &entry.pokedex,
            pokedex_id(first)?,
            pokedex_id(second)?,
        )?)
    }

    pub fn listing(&self, owner: OwnerId, order: DisplayOrder) -> RegistryResult<Vec<PokemonRecord>> {
        let entry = self.owner(owner)?;
        if entry.pokedex.is_empty() {
            return Err(PokedexError::Empty.into());
        }
        Ok(traversal::listing(&entry.pokedex, order))
    }

    pub fn delete_pokedex(&mut self, position: i64) -> RegistryResult<EventBus> {
        let target = self.owner_at(position)?;
        let removed = self.owners.delete_owner(target)?;
        Ok(RegistryEvent::OwnerDeleted {
            owner: removed.name,
        }
        .into())
    }

    /// Fold `second_name`'s pokedex into `first_name`'s and drop
    /// `second_name`. Colliding ids keep the first owner's record.
    pub fn merge_pokedexes(&mut self, first_name: &str, second_name: &str) -> RegistryResult<EventBus> {
        self.require_owners(2)?;
        let first = self.find_owner(first_name)?;
        let second = self.find_owner(second_name)?;

        let MergeReport {
            absorbed,
            transferred,
            collisions,
        } = self.owners.merge_owners(first, second)?;
        debug!(into = first_name, absorbed = %absorbed, "merge finished");

        let mut events = EventBus::new();
        for pokemon in transferred {
            events.push(RegistryEvent::PokemonTransferred {
                from: absorbed.clone(),
                into: first_name.to_string(),
                pokemon,
            });
        }
        for pokemon in collisions {
            events.push(RegistryEvent::MergeCollision {
                from: absorbed.clone(),
                into: first_name.to_string(),
                pokemon,
            });
        }
        events.push(RegistryEvent::OwnerAbsorbed {
            absorbed,
            into: first_name.to_string(),
        });
        Ok(events)
    }

    pub fn sort_owners(&mut self) -> RegistryResult<EventBus> {
        self.require_owners(2)?;
        self.owners.sort_by_name();
        Ok(RegistryEvent::OwnersSorted {
            count: self.owners.len(),
        }
        .into())
    }

    /// Owner names met walking `count` steps from head. The walk is lazy, so
    /// a huge count costs nothing until it is consumed.
    pub fn owners_in_direction(
        &self,
        direction: Direction,
        count: i64,
    ) -> RegistryResult<impl Iterator<Item = &str> + '_> {
        if self.owners.is_empty() {
            return Err(OwnerError::EmptyRing.into());
        }
        if count < 0 {
            return Err(RegistryError::NegativeCount(count));
        }
        let count = usize::try_from(count).unwrap_or(usize::MAX);
        Ok(self
            .owners
            .walk(direction, count)
            .map(|owner| owner.name.as_str()))
    }

    /// Release every owner and pokedex.
    pub fn release_all(&mut self) {
        debug!(owners = self.owners.len(), "releasing all owners");
        self.owners.clear();
    }

    fn find_owner(&self, name: &str) -> RegistryResult<OwnerId> {
        Ok(self
            .owners
            .find_by_name(name)
            .ok_or_else(|| OwnerError::NotFound(name.to_string()))?)
    }

    fn require_owners(&self, required: usize) -> RegistryResult<()> {
        let available = self.owners.len();
        if available < required {
            return Err(OwnerError::NotEnoughOwners {
                required,
                available,
            }
            .into());
        }
        Ok(())
    }
}

/// Validate a 1-based choice against `1..=max`.
fn checked_choice(choice: i64, max: usize) -> RegistryResult<usize> {
    usize::try_from(choice)
        .ok()
        .filter(|&c| c >= 1 && c <= max)
        .ok_or(RegistryError::InvalidChoice { choice, max })
}

/// Pokedex ids are positive `u16` values.
fn pokedex_id(id: i64) -> RegistryResult<u16> {
    u16::try_from(id)
        .ok()
        .filter(|&id| id > 0)
        .ok_or(RegistryError::InvalidChoice {
            choice: id,
            max: usize::from(u16::MAX),
        })
}
