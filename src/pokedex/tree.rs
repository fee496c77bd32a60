use crate::errors::{PokedexError, PokedexResult};
use crate::pokemon::PokemonRecord;
use std::cmp::Ordering;
use tracing::debug;

/// Index of a node slot inside one tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

#[derive(Debug, Clone)]
struct TreeNode {
    record: PokemonRecord,
    left: Option<NodeId>,
    right: Option<NodeId>,
    // Non-owning back-reference, repaired whenever the node is reattached.
    parent: Option<NodeId>,
}

/// An owner's pokedex: an unbalanced binary search tree keyed by creature id.
///
/// Nodes live in an arena with a free-list. Each node is logically owned by
/// its parent's child slot (the root by the tree itself), so releasing a slot
/// is the only way a node goes away.
#[derive(Debug, Clone, Default)]
pub struct PokedexTree {
    slots: Vec<Option<TreeNode>>,
    free: Vec<NodeId>,
    root: Option<NodeId>,
    len: usize,
}

/// Borrowed view of one node, for walking the tree structure.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a PokedexTree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn record(&self) -> &'a PokemonRecord {
        &self.tree.node(self.id).record
    }

    pub fn left(&self) -> Option<NodeRef<'a>> {
        self.tree.node(self.id).left.map(|id| self.tree.node_ref(id))
    }

    pub fn right(&self) -> Option<NodeRef<'a>> {
        self.tree.node(self.id).right.map(|id| self.tree.node_ref(id))
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.tree.node(self.id).parent.map(|id| self.tree.node_ref(id))
    }

    pub fn is_leaf(&self) -> bool {
        let node = self.tree.node(self.id);
        node.left.is_none() && node.right.is_none()
    }
}

impl PokedexTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tree holding a single root record.
    pub fn with_root(record: PokemonRecord) -> PokedexResult<Self> {
        let mut tree = Self::new();
        tree.insert(record)?;
        Ok(tree)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<NodeRef<'_>> {
        self.root.map(|id| self.node_ref(id))
    }

    /// Make sure `additional` more nodes can be stored without allocating.
    pub fn reserve(&mut self, additional: usize) -> PokedexResult<()> {
        let needed = additional.saturating_sub(self.free.len());
        self.slots
            .try_reserve(needed)
            .map_err(|_| PokedexError::AllocationFailure)
    }

    /// Insert a record, rejecting an identifier that is already present.
    pub fn insert(&mut self, record: PokemonRecord) -> PokedexResult<()> {
        let id = record.id;
        let Some(mut current) = self.root else {
            let node = self.allocate(record, None)?;
            self.root = Some(node);
            debug!(id, "inserted pokedex root");
            return Ok(());
        };

        loop {
            let node = self.node(current);
            let next = match id.cmp(&node.record.id) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Err(PokedexError::DuplicateIdentifier(id)),
            };
            match next {
                Some(child) => current = child,
                None => break,
            }
        }

        let new_node = self.allocate(record, Some(current))?;
        let parent = self.node_mut(current);
        if id < parent.record.id {
            parent.left = Some(new_node);
        } else {
            parent.right = Some(new_node);
        }
        debug!(id, "inserted pokedex node");
        Ok(())
    }

    /// Find the record with this identifier.
    pub fn search(&self, id: u16) -> Option<&PokemonRecord> {
        self.find(id).map(|node| &self.node(node).record)
    }

    pub fn search_node(&self, id: u16) -> Option<NodeRef<'_>> {
        self.find(id).map(|node| self.node_ref(node))
    }

    pub fn contains(&self, id: u16) -> bool {
        self.find(id).is_some()
    }

    /// Remove the creature with this identifier and hand back its record.
    pub fn remove(&mut self, id: u16) -> PokedexResult<PokemonRecord> {
        let removed = self.search(id).cloned().ok_or(PokedexError::NotFound(id))?;
        self.root = self.remove_from(self.root, id);
        if let Some(root) = self.root {
            self.node_mut(root).parent = None;
        }
        debug!(id, remaining = self.len, "removed pokedex node");
        Ok(removed)
    }

    /// The smallest identifier in the tree.
    pub fn min(&self) -> Option<&PokemonRecord> {
        self.root.map(|root| &self.node(self.find_min(root)).record)
    }

    /// Release every node.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.root = None;
        self.len = 0;
    }

    fn find(&self, id: u16) -> Option<NodeId> {
        let mut current = self.root;
        while let Some(node_id) = current {
            let node = self.node(node_id);
            current = match id.cmp(&node.record.id) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(node_id),
            };
        }
        None
    }

    fn find_min(&self, mut node_id: NodeId) -> NodeId {
        while let Some(left) = self.node(node_id).left {
            node_id = left;
        }
        node_id
    }

    /// Remove `id` from the subtree rooted at `subtree`, returning the new
    /// subtree root for the caller to store back into its child slot.
    fn remove_from(&mut self, subtree: Option<NodeId>, id: u16) -> Option<NodeId> {
        let current = subtree?;
        let node = self.node(current);
        let (left, right, parent) = (node.left, node.right, node.parent);

        match id.cmp(&node.record.id) {
            Ordering::Less => {
                let new_left = self.remove_from(left, id);
                self.node_mut(current).left = new_left;
                Some(current)
            }
            Ordering::Greater => {
                let new_right = self.remove_from(right, id);
                self.node_mut(current).right = new_right;
                Some(current)
            }
            Ordering::Equal => match (left, right) {
                (None, None) => {
                    self.release(current);
                    None
                }
                (Some(child), None) | (None, Some(child)) => {
                    self.node_mut(child).parent = parent;
                    self.release(current);
                    Some(child)
                }
                (Some(_), Some(right)) => {
                    // Two children: take over the in-order successor's record,
                    // then remove the successor from the right subtree.
                    let successor = self.find_min(right);
                    let record = self.node(successor).record.clone();
                    let successor_id = record.id;
                    self.node_mut(current).record = record;
                    let new_right = self.remove_from(Some(right), successor_id);
                    self.node_mut(current).right = new_right;
                    Some(current)
                }
            },
        }
    }

    fn allocate(&mut self, record: PokemonRecord, parent: Option<NodeId>) -> PokedexResult<NodeId> {
        let node = TreeNode {
            record,
            left: None,
            right: None,
            parent,
        };
        let id = match self.free.pop() {
            Some(id) => {
                self.slots[id.0] = Some(node);
                id
            }
            None => {
                self.slots
                    .try_reserve(1)
                    .map_err(|_| PokedexError::AllocationFailure)?;
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        };
        self.len += 1;
        Ok(id)
    }

    fn release(&mut self, id: NodeId) {
        if self.slots[id.0].take().is_some() {
            self.free.push(id);
            self.len -= 1;
        }
    }

    fn node(&self, id: NodeId) -> &TreeNode {
        match self.slots.get(id.0) {
            Some(Some(node)) => node,
            _ => unreachable!("pokedex link to released node {:?}", id),
        }
    }

    fn node_mut(&mut self, id: NodeId) -> &mut TreeNode {
        match self.slots.get_mut(id.0) {
            Some(Some(node)) => node,
            _ => unreachable!("pokedex link to released node {:?}", id),
        }
    }

    fn node_ref(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { tree: self, id }
    }

    #[cfg(test)]
    fn live_slots(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Check ordering, parent links and the node count. Test helper.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        fn check(
            tree: &PokedexTree,
            node: NodeRef<'_>,
            lower: Option<u16>,
            upper: Option<u16>,
        ) -> usize {
            let id = node.record().id;
            assert!(lower.map_or(true, |low| id > low), "id {} breaks lower bound", id);
            assert!(upper.map_or(true, |high| id < high), "id {} breaks upper bound", id);
            let mut count = 1;
            for child in [node.left(), node.right()].into_iter().flatten() {
                let parent = child.parent().expect("child must link to its parent");
                assert_eq!(parent.id, node.id, "parent link of {}", child.record().id);
            }
            if let Some(left) = node.left() {
                count += check(tree, left, lower, Some(id));
            }
            if let Some(right) = node.right() {
                count += check(tree, right, Some(id), upper);
            }
            count
        }

        match self.root() {
            Some(root) => {
                assert!(root.parent().is_none(), "root must not have a parent");
                assert_eq!(check(self, root, None, None), self.len);
            }
            None => assert_eq!(self.len, 0),
        }
        assert_eq!(self.live_slots(), self.len);
    }
}
