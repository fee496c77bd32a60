//! Tree walkers parameterized by a per-node visit closure.
//!
//! The walk order is fixed by the walker; only the visit action varies. The
//! collecting variants accumulate into a `Vec` and back display, alphabetical
//! listing and merge.

use super::tree::{NodeRef, PokedexTree};
use crate::pokemon::PokemonRecord;
use std::collections::VecDeque;

/// Structural walk orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalOrder {
    BreadthFirst,
    PreOrder,
    InOrder,
    PostOrder,
}

/// Orders offered by the display menu, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayOrder {
    Walk(TraversalOrder),
    Alphabetical,
}

impl DisplayOrder {
    pub const ALL: [DisplayOrder; 5] = [
        DisplayOrder::Walk(TraversalOrder::BreadthFirst),
        DisplayOrder::Walk(TraversalOrder::PreOrder),
        DisplayOrder::Walk(TraversalOrder::InOrder),
        DisplayOrder::Walk(TraversalOrder::PostOrder),
        DisplayOrder::Alphabetical,
    ];

    /// Map a 1-based menu choice to an order.
    pub fn from_choice(choice: i64) -> Option<Self> {
        let index = usize::try_from(choice).ok()?.checked_sub(1)?;
        Self::ALL.get(index).copied()
    }

    pub fn label(&self) -> &'static str {
        match self {
            DisplayOrder::Walk(TraversalOrder::BreadthFirst) => "BFS (Level-Order)",
            DisplayOrder::Walk(TraversalOrder::PreOrder) => "Pre-Order",
            DisplayOrder::Walk(TraversalOrder::InOrder) => "In-Order",
            DisplayOrder::Walk(TraversalOrder::PostOrder) => "Post-Order",
            DisplayOrder::Alphabetical => "Alphabetical (by name)",
        }
    }
}

/// Level-order walk using a FIFO queue seeded with the root.
pub fn breadth_first<F>(tree: &PokedexTree, mut visit: F)
where
    F: FnMut(&PokemonRecord),
{
    let mut queue: VecDeque<NodeRef<'_>> = VecDeque::new();
    queue.extend(tree.root());
    while let Some(node) = queue.pop_front() {
        visit(node.record());
        queue.extend(node.left());
        queue.extend(node.right());
    }
}

pub fn pre_order<F>(tree: &PokedexTree, mut visit: F)
where
    F: FnMut(&PokemonRecord),
{
    fn descend<F: FnMut(&PokemonRecord)>(node: Option<NodeRef<'_>>, visit: &mut F) {
        if let Some(node) = node {
            visit(node.record());
            descend(node.left(), visit);
            descend(node.right(), visit);
        }
    }
    descend(tree.root(), &mut visit);
}

pub fn in_order<F>(tree: &PokedexTree, mut visit: F)
where
    F: FnMut(&PokemonRecord),
{
    fn descend<F: FnMut(&PokemonRecord)>(node: Option<NodeRef<'_>>, visit: &mut F) {
        if let Some(node) = node {
            descend(node.left(), visit);
            visit(node.record());
            descend(node.right(), visit);
        }
    }
    descend(tree.root(), &mut visit);
}

pub fn post_order<F>(tree: &PokedexTree, mut visit: F)
where
    F: FnMut(&PokemonRecord),
{
    fn descend<F: FnMut(&PokemonRecord)>(node: Option<NodeRef<'_>>, visit: &mut F) {
        if let Some(node) = node {
            descend(node.left(), visit);
            descend(node.right(), visit);
            visit(node.record());
        }
    }
    descend(tree.root(), &mut visit);
}

/// Dispatch to the walker for `order`.
pub fn walk<F>(tree: &PokedexTree, order: TraversalOrder, visit: F)
where
    F: FnMut(&PokemonRecord),
{
    match order {
        TraversalOrder::BreadthFirst => breadth_first(tree, visit),
        TraversalOrder::PreOrder => pre_order(tree, visit),
        TraversalOrder::InOrder => in_order(tree, visit),
        TraversalOrder::PostOrder => post_order(tree, visit),
    }
}

/// Copy every record out in walk order.
pub fn collect(tree: &PokedexTree, order: TraversalOrder) -> Vec<PokemonRecord> {
    let mut records = Vec::with_capacity(tree.len());
    walk(tree, order, |record| records.push(record.clone()));
    records
}

/// Every record, stably sorted by name (case-sensitive).
pub fn alphabetical(tree: &PokedexTree) -> Vec<PokemonRecord> {
    let mut records = collect(tree, TraversalOrder::InOrder);
    records.sort_by(|a, b| a.name.cmp(&b.name));
    records
}

pub fn listing(tree: &PokedexTree, order: DisplayOrder) -> Vec<PokemonRecord> {
    match order {
        DisplayOrder::Walk(order) => collect(tree, order),
        DisplayOrder::Alphabetical => alphabetical(tree),
    }
}
