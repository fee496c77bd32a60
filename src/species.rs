use crate::errors::{CatalogError, CatalogResult};
use crate::pokemon::PokemonRecord;
use schema::SpeciesEntry;
use std::path::Path;
use std::sync::LazyLock;

// Built-in catalog data, parsed on first use.
const BUILTIN_CATALOG: &str = include_str!("../data/catalog.ron");

static BUILTIN: LazyLock<CatalogResult<Catalog>> =
    LazyLock::new(|| Catalog::from_ron(BUILTIN_CATALOG));

/// Number of starter species offered to a new owner.
pub const STARTER_COUNT: usize = 3;

/// The built-in first-generation catalog.
pub fn builtin() -> CatalogResult<&'static Catalog> {
    BUILTIN.as_ref().map_err(Clone::clone)
}

/// Read-only, ordered species table.
///
/// Entries are numbered `1..=len()` and the number doubles as the index, so
/// the species at index `i` evolves into the one at `i + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<SpeciesEntry>,
}

impl Catalog {
    /// Build a catalog, checking that entries are numbered `1..=n` in order.
    pub fn new(entries: Vec<SpeciesEntry>) -> CatalogResult<Self> {
        if entries.is_empty() {
            return Err(CatalogError::Malformed("catalog has no species".to_string()));
        }

        for (position, entry) in entries.iter().enumerate() {
            let expected = position + 1;
            if usize::from(entry.id) != expected {
                return Err(CatalogError::Malformed(format!(
                    "entry {} ('{}') has id {}, expected {}",
                    position, entry.name, entry.id, expected
                )));
            }
        }

        Ok(Catalog { entries })
    }

    /// Parse a RON list of species entries.
    pub fn from_ron(text: &str) -> CatalogResult<Self> {
        let entries: Vec<SpeciesEntry> =
            ron::from_str(text).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::new(entries)
    }

    /// Load a RON catalog file from disk.
    pub fn load(path: &Path) -> CatalogResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Parse(format!("{}: {}", path.display(), e)))?;
        Self::from_ron(&text)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Species at a 1-based index.
    pub fn get(&self, index: usize) -> CatalogResult<&SpeciesEntry> {
        index
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .ok_or(CatalogError::UnknownSpecies(index))
    }

    /// Copy the species at `id` out as a fresh record.
    pub fn record(&self, id: u16) -> CatalogResult<PokemonRecord> {
        self.get(usize::from(id)).map(PokemonRecord::from)
    }

    /// The species `id` evolves into, if its evolve flag is set and the chain
    /// does not run off the end of the catalog.
    pub fn evolution_of(&self, id: u16) -> CatalogResult<Option<&SpeciesEntry>> {
        let index = usize::from(id);
        let species = self.get(index)?;
        if !species.evolvable {
            return Ok(None);
        }
        Ok(self.entries.get(index))
    }

    /// Starter choices `1..=STARTER_COUNT` map to indices 1, 4 and 7.
    pub fn starter(&self, choice: usize) -> CatalogResult<&SpeciesEntry> {
        if choice == 0 || choice > STARTER_COUNT {
            return Err(CatalogError::UnknownSpecies(choice));
        }
        self.get((choice - 1) * 3 + 1)
    }

    pub fn starters(&self) -> Vec<&SpeciesEntry> {
        (1..=STARTER_COUNT)
            .filter_map(|choice| self.starter(choice).ok())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpeciesEntry> {
        self.entries.iter()
    }
}
