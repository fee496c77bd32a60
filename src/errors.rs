use std::fmt;

/// Main error type for the Pokedex registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Error raised by an owner's pokedex tree
    Pokedex(PokedexError),
    /// Error raised by the owner ring
    Owner(OwnerError),
    /// Error related to species catalog lookup or loading
    Catalog(CatalogError),
    /// A numbered choice was outside `1..=max`
    InvalidChoice { choice: i64, max: usize },
    /// A repeat count was negative
    NegativeCount(i64),
}

/// Errors raised by a single owner's pokedex tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PokedexError {
    /// No creature with this identifier is in the tree
    NotFound(u16),
    /// A creature with this identifier is already in the tree
    DuplicateIdentifier(u16),
    /// The species cannot evolve, or is the last entry of its chain
    NotEvolvable(u16),
    /// The operation needs at least one creature
    Empty,
    /// Node storage could not be grown
    AllocationFailure,
}

/// Errors raised by the owner ring
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerError {
    /// No live owner has this name
    NotFound(String),
    /// The handle refers to an owner that has been deleted
    StaleHandle,
    /// An owner with this name is already live
    DuplicateName(String),
    /// The ring has no owners
    EmptyRing,
    /// The operation needs more owners than the ring holds
    NotEnoughOwners { required: usize, available: usize },
    /// Both sides of a merge name the same owner
    SelfMerge(String),
    /// A ring direction token other than F or B
    InvalidDirection(String),
    /// Owner storage could not be grown
    AllocationFailure,
}

/// Errors related to the species catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// No species at this 1-based index
    UnknownSpecies(usize),
    /// Catalog text is not valid RON
    Parse(String),
    /// Catalog entries are out of order, missing, or empty
    Malformed(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::Pokedex(err) => write!(f, "Pokedex error: {}", err),
            RegistryError::Owner(err) => write!(f, "Owner error: {}", err),
            RegistryError::Catalog(err) => write!(f, "Catalog error: {}", err),
            RegistryError::InvalidChoice { choice, max } => {
                write!(f, "Invalid choice {}, expected 1-{}", choice, max)
            }
            RegistryError::NegativeCount(count) => {
                write!(f, "Invalid count {}, expected 0 or more", count)
            }
        }
    }
}

impl fmt::Display for PokedexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PokedexError::NotFound(id) => write!(f, "No Pokemon with ID {} found", id),
            PokedexError::DuplicateIdentifier(id) => {
                write!(f, "Pokemon with ID {} is already in the Pokedex", id)
            }
            PokedexError::NotEvolvable(id) => write!(f, "Pokemon with ID {} cannot evolve", id),
            PokedexError::Empty => write!(f, "Pokedex is empty"),
            PokedexError::AllocationFailure => write!(f, "Memory allocation failed"),
        }
    }
}

impl fmt::Display for OwnerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnerError::NotFound(name) => write!(f, "Owner '{}' not found", name),
            OwnerError::StaleHandle => write!(f, "Owner no longer exists"),
            OwnerError::DuplicateName(name) => write!(f, "Owner '{}' already exists", name),
            OwnerError::EmptyRing => write!(f, "No existing Pokedexes"),
            OwnerError::NotEnoughOwners {
                required,
                available,
            } => write!(
                f,
                "Not enough owners: need {}, have {}",
                required, available
            ),
            OwnerError::SelfMerge(name) => write!(f, "Cannot merge '{}' with itself", name),
            OwnerError::InvalidDirection(token) => {
                write!(f, "Unknown direction '{}', expected F or B", token)
            }
            OwnerError::AllocationFailure => write!(f, "Memory allocation failed"),
        }
    }
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::UnknownSpecies(index) => write!(f, "No species at index {}", index),
            CatalogError::Parse(details) => write!(f, "Catalog parse failure: {}", details),
            CatalogError::Malformed(details) => write!(f, "Malformed catalog: {}", details),
        }
    }
}

impl std::error::Error for RegistryError {}
impl std::error::Error for PokedexError {}
impl std::error::Error for OwnerError {}
impl std::error::Error for CatalogError {}

impl From<PokedexError> for RegistryError {
    fn from(err: PokedexError) -> Self {
        RegistryError::Pokedex(err)
    }
}

impl From<OwnerError> for RegistryError {
    fn from(err: OwnerError) -> Self {
        RegistryError::Owner(err)
    }
}

impl From<CatalogError> for RegistryError {
    fn from(err: CatalogError) -> Self {
        RegistryError::Catalog(err)
    }
}

/// Type alias for Results using RegistryError
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Type alias for Results using PokedexError
pub type PokedexResult<T> = Result<T, PokedexError>;

/// Type alias for Results using OwnerError
pub type OwnerResult<T> = Result<T, OwnerError>;

/// Type alias for Results using CatalogError
pub type CatalogResult<T> = Result<T, CatalogError>;
