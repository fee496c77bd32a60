use crate::errors::{OwnerError, OwnerResult, PokedexError, RegistryResult};
use crate::pokedex::{traversal, PokedexTree};
use crate::pokemon::PokemonRecord;
use std::cmp::Ordering;
use std::str::FromStr;
use tracing::{debug, warn};

/// Handle to a live owner in an [`OwnerRing`].
///
/// Carries the slot generation, so a handle to a deleted owner is rejected
/// rather than resolving to whoever reused the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId {
    index: usize,
    generation: u32,
}

/// The payload at a ring position: a name and the pokedex it owns.
#[derive(Debug, Clone)]
pub struct Owner {
    pub name: String,
    pub pokedex: PokedexTree,
}

#[derive(Debug)]
struct RingNode {
    owner: Owner,
    next: OwnerId,
    prev: OwnerId,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    node: Option<RingNode>,
}

/// Which link to follow when walking the ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl FromStr for Direction {
    type Err = OwnerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "f" | "forward" => Ok(Direction::Forward),
            "b" | "backward" => Ok(Direction::Backward),
            _ => Err(OwnerError::InvalidDirection(s.trim().to_string())),
        }
    }
}

/// Per-record result of folding one pokedex into another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub absorbed: String,
    /// Records copied into the surviving owner, in breadth-first order.
    pub transferred: Vec<PokemonRecord>,
    /// Records skipped because the surviving owner already had the id.
    /// The absorbed copy is discarded.
    pub collisions: Vec<PokemonRecord>,
}

/// Circular doubly linked list of owners.
///
/// Links are slot indices, so the cycle needs no shared ownership: the ring
/// owns every node through its slot table, and `next`/`prev` are plain
/// traversal edges. The live count is kept alongside the head.
#[derive(Debug, Default)]
pub struct OwnerRing {
    slots: Vec<Slot>,
    free: Vec<usize>,
    head: Option<OwnerId>,
    len: usize,
}

impl OwnerRing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    pub fn head(&self) -> Option<OwnerId> {
        self.head
    }

    pub fn get(&self, id: OwnerId) -> Option<&Owner> {
        self.node(id).map(|node| &node.owner)
    }

    pub fn get_mut(&mut self, id: OwnerId) -> Option<&mut Owner> {
        self.node_mut(id).map(|node| &mut node.owner)
    }

    pub fn next(&self, id: OwnerId) -> Option<OwnerId> {
        self.node(id).map(|node| node.next)
    }

    pub fn prev(&self, id: OwnerId) -> Option<OwnerId> {
        self.node(id).map(|node| node.prev)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.find_by_name(name).is_some()
    }

    pub fn find_by_name(&self, name: &str) -> Option<OwnerId> {
        self.ids().find(|&id| self.get(id).is_some_and(|owner| owner.name == name))
    }

    /// The owner `steps` links forward from head, wrapping around.
    pub fn nth(&self, steps: usize) -> Option<OwnerId> {
        let mut current = self.head?;
        for _ in 0..steps % self.len {
            current = self.next(current)?;
        }
        Some(current)
    }

    /// Open a new owner holding `starter`, placed just before the head so that
    /// a forward walk from head visits owners in creation order.
    pub fn create_owner(&mut self, name: &str, starter: PokemonRecord) -> OwnerResult<OwnerId> {
        if self.contains_name(name) {
            return Err(OwnerError::DuplicateName(name.to_string()));
        }

        let pokedex =
            PokedexTree::with_root(starter).map_err(|_| OwnerError::AllocationFailure)?;
        let owner = Owner {
            name: name.to_string(),
            pokedex,
        };
        let id = self.allocate(owner)?;

        match self.head {
            None => {
                self.head = Some(id);
            }
            Some(head) => {
                let last = self.link(head).prev;
                self.link_mut(id).next = head;
                self.link_mut(id).prev = last;
                self.link_mut(last).next = id;
                self.link_mut(head).prev = id;
            }
        }
        self.len += 1;
        debug!(owner = name, owners = self.len, "owner created");
        Ok(id)
    }

    /// Unlink `id` from the ring and hand back its payload. Dropping the
    /// returned owner releases its pokedex.
    pub fn delete_owner(&mut self, id: OwnerId) -> OwnerResult<Owner> {
        let (next, prev) = {
            let node = self.node(id).ok_or(OwnerError::StaleHandle)?;
            (node.next, node.prev)
        };

        if next == id {
            self.head = None;
        } else {
            self.link_mut(prev).next = next;
            self.link_mut(next).prev = prev;
            if self.head == Some(id) {
                self.head = Some(next);
            }
        }

        let owner = self.release(id);
        self.len -= 1;
        debug!(owner = %owner.name, owners = self.len, "owner deleted");
        Ok(owner)
    }

    /// Copy every record of `second` into `first`, breadth-first, then delete
    /// `second`.
    ///
    /// Ids that `first` already holds are skipped and the absorbed copy is
    /// lost; they are listed in the report. If storage runs out partway,
    /// the records copied so far stay in `first` and `second` is kept.
    pub fn merge_owners(&mut self, first: OwnerId, second: OwnerId) -> RegistryResult<MergeReport> {
        if first == second {
            let name = self.get(first).ok_or(OwnerError::StaleHandle)?.name.clone();
            return Err(OwnerError::SelfMerge(name).into());
        }

        let (absorbed, incoming) = {
            let source = self.get(second).ok_or(OwnerError::StaleHandle)?;
            (
                source.name.clone(),
                traversal::collect(&source.pokedex, traversal::TraversalOrder::BreadthFirst),
            )
        };

        let target = self.get_mut(first).ok_or(OwnerError::StaleHandle)?;
        let mut report = MergeReport {
            absorbed,
            ..MergeReport::default()
        };
        for record in incoming {
            match target.pokedex.insert(record.clone()) {
                Ok(()) => report.transferred.push(record),
                Err(PokedexError::DuplicateIdentifier(id)) => {
                    warn!(id, into = %target.name, "merge collision, absorbed copy dropped");
                    report.collisions.push(record);
                }
                Err(err) => return Err(err.into()),
            }
        }

        self.delete_owner(second)?;
        debug!(
            absorbed = %report.absorbed,
            transferred = report.transferred.len(),
            collisions = report.collisions.len(),
            "owners merged"
        );
        Ok(report)
    }

    /// Bubble the ring positions into name order by swapping payloads between
    /// neighbouring nodes. The links themselves never change, and owners with
    /// equal names keep their relative order.
    pub fn sort_by_name(&mut self) {
        let Some(head) = self.head else {
            return;
        };
        for pass in 0..self.len {
            let mut current = head;
            for _ in 0..self.len - 1 - pass {
                let next = self.link(current).next;
                if self.link(current).owner.name.cmp(&self.link(next).owner.name)
                    == Ordering::Greater
                {
                    self.swap_payloads(current, next);
                }
                current = next;
            }
        }
        debug!(owners = self.len, "owners sorted by name");
    }

    /// Walk `count` steps from head in `direction`, wrapping indefinitely.
    pub fn walk(&self, direction: Direction, count: usize) -> RingWalk<'_> {
        RingWalk {
            ring: self,
            current: self.head,
            direction,
            remaining: count,
        }
    }

    /// One forward lap from head.
    pub fn iter(&self) -> impl Iterator<Item = &Owner> {
        self.walk(Direction::Forward, self.len)
    }

    pub fn ids(&self) -> impl Iterator<Item = OwnerId> + '_ {
        let mut current = self.head;
        (0..self.len).filter_map(move |_| {
            let id = current?;
            current = self.next(id);
            Some(id)
        })
    }

    /// Release every owner.
    pub fn clear(&mut self) {
        while let Some(head) = self.head {
            if self.delete_owner(head).is_err() {
                break;
            }
        }
    }

    fn allocate(&mut self, owner: Owner) -> OwnerResult<OwnerId> {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots
                    .try_reserve(1)
                    .map_err(|_| OwnerError::AllocationFailure)?;
                self.slots.push(Slot::default());
                self.slots.len() - 1
            }
        };
        let slot = &mut self.slots[index];
        let id = OwnerId {
            index,
            generation: slot.generation,
        };
        slot.node = Some(RingNode {
            owner,
            next: id,
            prev: id,
        });
        Ok(id)
    }

    fn release(&mut self, id: OwnerId) -> Owner {
        let slot = &mut self.slots[id.index];
        let node = match slot.node.take() {
            Some(node) => node,
            None => unreachable!("owner slot {} released twice", id.index),
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        node.owner
    }

    fn swap_payloads(&mut self, a: OwnerId, b: OwnerId) {
        if a.index == b.index {
            return;
        }
        let (low, high) = (a.index.min(b.index), a.index.max(b.index));
        let (front, back) = self.slots.split_at_mut(high);
        if let (Some(x), Some(y)) = (front[low].node.as_mut(), back[0].node.as_mut()) {
            std::mem::swap(&mut x.owner, &mut y.owner);
        }
    }

    fn node(&self, id: OwnerId) -> Option<&RingNode> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: OwnerId) -> Option<&mut RingNode> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    fn link(&self, id: OwnerId) -> &RingNode {
        match self.node(id) {
            Some(node) => node,
            None => unreachable!("ring link to released owner {:?}", id),
        }
    }

    fn link_mut(&mut self, id: OwnerId) -> &mut RingNode {
        match self.node_mut(id) {
            Some(node) => node,
            None => unreachable!("ring link to released owner {:?}", id),
        }
    }

    /// Check every forward and backward link. Test helper.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let live = self.slots.iter().filter(|slot| slot.node.is_some()).count();
        assert_eq!(live, self.len, "live slots vs ring length");

        let Some(head) = self.head else {
            assert_eq!(self.len, 0);
            return;
        };
        let mut current = head;
        for _ in 0..self.len {
            let node = self.link(current);
            assert_eq!(self.link(node.next).prev, current, "next.prev");
            assert_eq!(self.link(node.prev).next, current, "prev.next");
            current = node.next;
        }
        assert_eq!(current, head, "forward lap must return to head");
    }
}

/// Iterator returned by [`OwnerRing::walk`].
pub struct RingWalk<'a> {
    ring: &'a OwnerRing,
    current: Option<OwnerId>,
    direction: Direction,
    remaining: usize,
}

impl<'a> Iterator for RingWalk<'a> {
    type Item = &'a Owner;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.current?;
        let node = self.ring.node(id)?;
        self.remaining -= 1;
        self.current = Some(match self.direction {
            Direction::Forward => node.next,
            Direction::Backward => node.prev,
        });
        Some(&node.owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;
    use schema::PokemonType;
    use std::collections::BTreeSet;

    fn record(id: u16) -> PokemonRecord {
        PokemonRecord::new(id, format!("Mon{}", id), PokemonType::Water, 40, 40, false)
    }

    fn ring_of(names: &[&str]) -> (OwnerRing, Vec<OwnerId>) {
        let mut ring = OwnerRing::new();
        let ids = names
            .iter()
            .enumerate()
            .map(|(i, name)| ring.create_owner(name, record(i as u16 + 1)).unwrap())
            .collect();
        (ring, ids)
    }

    fn names(ring: &OwnerRing) -> Vec<String> {
        ring.iter().map(|owner| owner.name.clone()).collect()
    }

    fn pokedex_ids(ring: &OwnerRing, id: OwnerId) -> Vec<u16> {
        traversal::collect(&ring.get(id).unwrap().pokedex, traversal::TraversalOrder::InOrder)
            .iter()
            .map(|r| r.id)
            .collect()
    }

    #[test]
    fn test_single_owner_links_to_itself() {
        let (ring, ids) = ring_of(&["Ash"]);
        let head = ring.head().unwrap();
        assert_eq!(head, ids[0]);
        assert_eq!(ring.next(head), Some(head));
        assert_eq!(ring.prev(head), Some(head));
        assert_eq!(ring.get(head).unwrap().pokedex.len(), 1);
        ring.assert_consistent();
    }

    #[test]
    fn test_creation_order_is_kept_and_lap_returns_to_head() {
        let (ring, _) = ring_of(&["Ash", "Misty", "Brock", "Gary"]);
        assert_eq!(names(&ring), vec!["Ash", "Misty", "Brock", "Gary"]);

        let head = ring.head().unwrap();
        let mut current = head;
        for _ in 0..4 {
            current = ring.next(current).unwrap();
        }
        assert_eq!(current, head);
        ring.assert_consistent();
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let (mut ring, _) = ring_of(&["Ash"]);
        assert_eq!(
            ring.create_owner("Ash", record(9)),
            Err(OwnerError::DuplicateName("Ash".to_string()))
        );
        assert_eq!(ring.len(), 1);
        ring.assert_consistent();
    }

    #[rstest]
    #[case("head", 0, vec!["Misty", "Brock"])]
    #[case("middle", 1, vec!["Ash", "Brock"])]
    #[case("tail", 2, vec!["Ash", "Misty"])]
    fn test_delete_keeps_links(
        #[case] desc: &str,
        #[case] position: usize,
        #[case] expected: Vec<&str>,
    ) {
        let (mut ring, ids) = ring_of(&["Ash", "Misty", "Brock"]);
        let removed = ring.delete_owner(ids[position]).unwrap();

        assert_eq!(ring.len(), 2, "{}", desc);
        assert_eq!(names(&ring), expected, "{}", desc);
        assert!(!ring.contains_name(&removed.name), "{}", desc);
        ring.assert_consistent();
    }

    #[test]
    fn test_deleting_last_owner_empties_ring() {
        let (mut ring, ids) = ring_of(&["Ash"]);
        ring.delete_owner(ids[0]).unwrap();
        assert!(ring.is_empty());
        assert_eq!(ring.len(), 0);
        assert_eq!(ring.iter().count(), 0);
        ring.assert_consistent();
    }

    #[test]
    fn test_stale_handle_is_rejected_after_slot_reuse() {
        let (mut ring, ids) = ring_of(&["Ash", "Misty"]);
        ring.delete_owner(ids[0]).unwrap();
        let reborn = ring.create_owner("Brock", record(5)).unwrap();

        assert!(ring.get(ids[0]).is_none());
        assert_eq!(ring.delete_owner(ids[0]).err(), Some(OwnerError::StaleHandle));
        assert_eq!(ring.get(reborn).unwrap().name, "Brock");
        ring.assert_consistent();
    }

    #[test]
    fn test_merge_moves_records_and_drops_second() {
        let (mut ring, ids) = ring_of(&["Ash", "Misty"]);
        for id in [10, 20, 30] {
            ring.get_mut(ids[1]).unwrap().pokedex.insert(record(id)).unwrap();
        }

        let report = ring.merge_owners(ids[0], ids[1]).unwrap();

        assert_eq!(report.absorbed, "Misty");
        assert!(report.collisions.is_empty());
        assert_eq!(report.transferred.len(), 4);
        assert_eq!(pokedex_ids(&ring, ids[0]), vec![1, 2, 10, 20, 30]);
        assert_eq!(names(&ring), vec!["Ash"]);
        assert!(ring.get(ids[1]).is_none());
        ring.assert_consistent();
    }

    #[test]
    fn test_merge_collision_keeps_first_owners_record() {
        let (mut ring, ids) = ring_of(&["Ash", "Misty"]);
        let mut rival = record(1);
        rival.name = "Rival".to_string();
        ring.get_mut(ids[1]).unwrap().pokedex.insert(rival.clone()).unwrap();

        let report = ring.merge_owners(ids[0], ids[1]).unwrap();

        assert_eq!(report.collisions, vec![rival]);
        let survivor = &ring.get(ids[0]).unwrap().pokedex;
        assert_eq!(survivor.search(1).unwrap().name, "Mon1");
        assert!(survivor.contains(2));
    }

    #[test]
    fn test_merge_with_itself_is_rejected() {
        let (mut ring, ids) = ring_of(&["Ash", "Misty"]);
        assert!(ring.merge_owners(ids[0], ids[0]).is_err());
        assert_eq!(ring.len(), 2);
    }

    #[test]
    fn test_sort_swaps_payloads_only() {
        let (mut ring, _) = ring_of(&["Bob", "Alice", "Charlie"]);
        let links_before: Vec<OwnerId> = ring.ids().collect();

        ring.sort_by_name();

        assert_eq!(names(&ring), vec!["Alice", "Bob", "Charlie"]);
        assert_eq!(ring.ids().collect::<Vec<_>>(), links_before);
        assert_eq!(ring.len(), 3);
        // Trees travel with their names: Alice was created second.
        let alice = ring.find_by_name("Alice").unwrap();
        assert_eq!(pokedex_ids(&ring, alice), vec![2]);
        ring.assert_consistent();
    }

    #[test]
    fn test_sort_reverse_order() {
        let (mut ring, _) = ring_of(&["e", "d", "c", "b", "a"]);
        ring.sort_by_name();
        assert_eq!(names(&ring), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_walk_wraps_in_both_directions() {
        let (ring, _) = ring_of(&["Ash", "Misty", "Brock"]);
        let forward: Vec<&str> = ring
            .walk(Direction::Forward, 5)
            .map(|o| o.name.as_str())
            .collect();
        assert_eq!(forward, vec!["Ash", "Misty", "Brock", "Ash", "Misty"]);

        let backward: Vec<&str> = ring
            .walk(Direction::Backward, 4)
            .map(|o| o.name.as_str())
            .collect();
        assert_eq!(backward, vec!["Ash", "Brock", "Misty", "Ash"]);
    }

    #[rstest]
    #[case("f", Ok(Direction::Forward))]
    #[case("F", Ok(Direction::Forward))]
    #[case("forward", Ok(Direction::Forward))]
    #[case("b", Ok(Direction::Backward))]
    #[case("Backward", Ok(Direction::Backward))]
    #[case(" sideways ", Err(OwnerError::InvalidDirection("sideways".to_string())))]
    #[case("", Err(OwnerError::InvalidDirection(String::new())))]
    fn test_direction_tokens(#[case] token: &str, #[case] expected: Result<Direction, OwnerError>) {
        assert_eq!(token.parse::<Direction>(), expected);
    }

    #[test]
    fn test_unknown_direction_message() {
        let err = "L".parse::<Direction>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown direction 'L', expected F or B");
    }

    #[test]
    fn test_nth_wraps() {
        let (ring, ids) = ring_of(&["Ash", "Misty", "Brock"]);
        assert_eq!(ring.nth(0), Some(ids[0]));
        assert_eq!(ring.nth(2), Some(ids[2]));
        assert_eq!(ring.nth(4), Some(ids[1]));
        assert_eq!(OwnerRing::new().nth(0), None);
    }

    #[test]
    fn test_clear_releases_everything() {
        let (mut ring, _) = ring_of(&["Ash", "Misty", "Brock"]);
        ring.clear();
        assert!(ring.is_empty());
        assert_eq!(ring.len(), 0);
        ring.assert_consistent();
    }

    /// A record whose name and stats say which owner it came from.
    fn owned_by(owner: &str, id: u16) -> PokemonRecord {
        PokemonRecord::new(id, format!("{}-{}", owner, id), PokemonType::Water, id, id / 2, id % 2 == 0)
    }

    fn seeded(ring: &mut OwnerRing, owner: &str, ids: &BTreeSet<u16>) -> OwnerId {
        let mut ids = ids.iter().copied();
        let starter = ids.next().unwrap();
        let handle = ring.create_owner(owner, owned_by(owner, starter)).unwrap();
        for id in ids {
            ring.get_mut(handle).unwrap().pokedex.insert(owned_by(owner, id)).unwrap();
        }
        handle
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Every id only the absorbed owner held arrives with its exact record;
        /// ids both owners held keep the survivor's record.
        #[test]
        fn merge_copies_every_non_colliding_record(
            first in prop::collection::btree_set(1u16..200, 1..30),
            second in prop::collection::btree_set(1u16..200, 1..30),
        ) {
            let mut ring = OwnerRing::new();
            let ash = seeded(&mut ring, "Ash", &first);
            seeded(&mut ring, "Brock", &BTreeSet::from([1]));
            let misty = seeded(&mut ring, "Misty", &second);

            let report = ring.merge_owners(ash, misty).unwrap();

            let survivor = &ring.get(ash).unwrap().pokedex;
            for &id in second.difference(&first) {
                let expected = owned_by("Misty", id);
                prop_assert_eq!(survivor.search(id), Some(&expected));
            }
            for &id in &first {
                let expected = owned_by("Ash", id);
                prop_assert_eq!(survivor.search(id), Some(&expected));
            }
            prop_assert_eq!(survivor.len(), first.union(&second).count());
            prop_assert_eq!(report.transferred.len(), second.difference(&first).count());
            prop_assert_eq!(report.collisions.len(), first.intersection(&second).count());
            survivor.assert_consistent();

            prop_assert!(ring.get(misty).is_none());
            prop_assert_eq!(names(&ring), vec!["Ash", "Brock"]);
            ring.assert_consistent();
        }
    }
}
