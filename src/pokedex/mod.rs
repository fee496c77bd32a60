pub mod evolution;
pub mod traversal;
pub mod tree;

pub use evolution::{evolve, EvolutionOutcome};
pub use traversal::{DisplayOrder, TraversalOrder};
pub use tree::{NodeRef, PokedexTree};
