use super::tree::PokedexTree;
use crate::errors::{PokedexError, RegistryResult};
use crate::pokemon::PokemonRecord;
use crate::species::Catalog;
use tracing::debug;

/// What an evolution did to the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvolutionOutcome {
    /// `from` was replaced by a fresh copy of `into`.
    Evolved {
        from: PokemonRecord,
        into: PokemonRecord,
    },
    /// The evolved form was already present, so only `released` was removed.
    AlreadyPresent {
        released: PokemonRecord,
        existing: u16,
    },
}

/// Evolve the creature with identifier `id` into the next catalog species.
///
/// Never creates a duplicate: if the evolved form is already in the tree the
/// lower stage is released and the existing node is left untouched.
pub fn evolve(
    tree: &mut PokedexTree,
    catalog: &Catalog,
    id: u16,
) -> RegistryResult<EvolutionOutcome> {
    if !tree.contains(id) {
        return Err(PokedexError::NotFound(id).into());
    }

    let evolved = match catalog.evolution_of(id)? {
        Some(next) => PokemonRecord::from(next),
        None => return Err(PokedexError::NotEvolvable(id).into()),
    };

    if tree.contains(evolved.id) {
        let released = tree.remove(id)?;
        debug!(id, existing = evolved.id, "evolved form already owned");
        return Ok(EvolutionOutcome::AlreadyPresent {
            released,
            existing: evolved.id,
        });
    }

    // Secure the replacement slot before anything is removed.
    tree.reserve(1)?;
    let from = tree.remove(id)?;
    tree.insert(evolved.clone())?;
    debug!(from = id, into = evolved.id, "pokemon evolved");

    Ok(EvolutionOutcome::Evolved {
        from,
        into: evolved,
    })
}
