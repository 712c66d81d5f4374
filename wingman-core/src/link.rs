//! Bounded, role-tagged relation between an owner entity and its targets.
//!
//! A [`Link`] stores identifiers, never references. Each role holds an
//! ordered queue of ids (front = oldest) bounded by the governing
//! [`Shape`]. Ids are resolved to live items through a deferred
//! [`Resolver`] every time contents are read, so a link rebuilt before its
//! registry is populated starts resolving as soon as the items appear.
//!
//! Two assignment policies exist side by side:
//!
//! - [`Link::assign_or_replace`] evicts the oldest occupant of a full role
//!   ("revolve"). A capacity-1 role therefore behaves as exclusive assignment.
//! - [`Link::strict_assign`] refuses with [`LinkError::CapacityExceeded`].

use crate::{Item, ItemId, LinkError, Resolver, RoleTag, Shape};
use std::collections::{btree_map, BTreeMap, HashSet};
use std::fmt;
use std::iter::FusedIterator;
use std::sync::Arc;

/// Persisted form of a link: role tag to ordered identifiers.
pub type LinkSnapshot<R> = BTreeMap<R, Vec<ItemId>>;

/// Role-partitioned, capacity-bounded set of target identifiers.
pub struct Link<R: RoleTag, T> {
    shape: &'static Shape<R>,
    slots: BTreeMap<R, Vec<ItemId>>,
    resolver: Resolver<T>,
}

impl<R: RoleTag, T: Item + 'static> Link<R, T> {
    /// An empty link governed by `shape`.
    pub fn new(shape: &'static Shape<R>, resolver: Resolver<T>) -> Self {
        Self {
            shape,
            slots: BTreeMap::new(),
            resolver,
        }
    }

    /// Reconstruct a link from a snapshot without resolving any identifier.
    ///
    /// Identifiers that do not (yet) exist in the registry are accepted.
    /// Empty role entries are dropped.
    ///
    /// # Errors
    ///
    /// - [`LinkError::UnknownRole`] if a role is outside the shape
    /// - [`LinkError::CapacityExceeded`] if a role holds more ids than allowed
    /// - [`LinkError::DuplicateEntry`] if an id repeats within one role
    pub fn rebuild(
        shape: &'static Shape<R>,
        snapshot: LinkSnapshot<R>,
        resolver: Resolver<T>,
    ) -> Result<Self, LinkError> {
        let mut slots = BTreeMap::new();
        for (role, ids) in snapshot {
            let capacity = shape.capacity_of(role)?;
            if ids.len() > capacity {
                return Err(LinkError::CapacityExceeded {
                    relation: shape.relation(),
                    role: role.to_string(),
                    capacity,
                    attempted: ids.len(),
                });
            }
            let mut seen = HashSet::with_capacity(ids.len());
            for id in &ids {
                if !seen.insert(id.as_str()) {
                    return Err(LinkError::DuplicateEntry {
                        relation: shape.relation(),
                        role: role.to_string(),
                        id: id.clone(),
                    });
                }
            }
            if !ids.is_empty() {
                slots.insert(role, ids);
            }
        }
        Ok(Self {
            shape,
            slots,
            resolver,
        })
    }

    /// Like [`Link::rebuild`], but a missing snapshot yields an empty link.
    pub fn rebuild_or_empty(
        shape: &'static Shape<R>,
        snapshot: Option<LinkSnapshot<R>>,
        resolver: Resolver<T>,
    ) -> Result<Self, LinkError> {
        match snapshot {
            Some(snapshot) => Self::rebuild(shape, snapshot, resolver),
            None => Ok(Self::new(shape, resolver)),
        }
    }

    // ========================================================================
    // MUTATION
    // ========================================================================

    /// Assign `target` to `role`, evicting the oldest occupant if the role is
    /// full. Assigning a target already in the role changes nothing.
    ///
    /// Returns the evicted identifier, if any.
    pub fn assign_or_replace(&mut self, role: R, target: &T) -> Result<Option<ItemId>, LinkError> {
        let capacity = self.shape.capacity_of(role)?;
        let queue = self.slots.entry(role).or_default();
        if queue.iter().any(|id| id == target.id()) {
            return Ok(None);
        }
        let evicted = if queue.len() >= capacity {
            Some(queue.remove(0))
        } else {
            None
        };
        queue.push(target.id().to_string());
        Ok(evicted)
    }

    /// Assign `target` to `role` without evicting anyone.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::CapacityExceeded`] if the role is full and
    /// `target` is not already in it.
    pub fn strict_assign(&mut self, role: R, target: &T) -> Result<(), LinkError> {
        let capacity = self.shape.capacity_of(role)?;
        let occupied = self.ids(role);
        if occupied.iter().any(|id| id == target.id()) {
            return Ok(());
        }
        if occupied.len() >= capacity {
            return Err(LinkError::CapacityExceeded {
                relation: self.shape.relation(),
                role: role.to_string(),
                capacity,
                attempted: occupied.len() + 1,
            });
        }
        self.slots
            .entry(role)
            .or_default()
            .push(target.id().to_string());
        Ok(())
    }

    /// Remove `target` from `role`, preserving the order of the rest.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::AssociationNotFound`] if `target` does not
    /// occupy `role`.
    pub fn remove(&mut self, role: R, target: &T) -> Result<(), LinkError> {
        self.remove_id(role, target.id())
    }

    /// Remove `id` from `role` without resolving it, so a dangling id can be
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns [`LinkError::AssociationNotFound`] if `id` does not occupy
    /// `role`.
    pub fn remove_id(&mut self, role: R, id: &str) -> Result<(), LinkError> {
        self.shape.capacity_of(role)?;
        let not_found = || LinkError::AssociationNotFound {
            relation: self.shape.relation(),
            role: role.to_string(),
            id: id.to_string(),
        };
        let queue = self.slots.get_mut(&role).ok_or_else(not_found)?;
        let position = queue
            .iter()
            .position(|entry| entry == id)
            .ok_or_else(not_found)?;
        queue.remove(position);
        if queue.is_empty() {
            self.slots.remove(&role);
        }
        Ok(())
    }

    /// Remove `id` from every role. Returns how many slots it occupied.
    pub fn purge(&mut self, id: &str) -> usize {
        let mut removed = 0;
        self.slots.retain(|_, queue| {
            let before = queue.len();
            queue.retain(|entry| entry != id);
            removed += before - queue.len();
            !queue.is_empty()
        });
        removed
    }

    // ========================================================================
    // READS
    // ========================================================================

    /// Identifiers occupying `role`, oldest first.
    pub fn ids(&self, role: R) -> &[ItemId] {
        self.slots.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `id` occupies `role`.
    pub fn contains(&self, role: R, id: &str) -> bool {
        self.ids(role).iter().any(|entry| entry == id)
    }

    /// Roles that `id` occupies.
    pub fn roles_of(&self, id: &str) -> Vec<R> {
        self.slots
            .iter()
            .filter(|(_, queue)| queue.iter().any(|entry| entry == id))
            .map(|(role, _)| *role)
            .collect()
    }

    /// Total number of occupied slots across all roles.
    pub fn len(&self) -> usize {
        self.slots.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn shape(&self) -> &'static Shape<R> {
        self.shape
    }

    pub fn resolver(&self) -> &Resolver<T> {
        &self.resolver
    }

    /// Resolve each occupant of `role`, oldest first.
    pub fn resolve(&self, role: R) -> impl Iterator<Item = Option<Arc<T>>> + '_ {
        self.ids(role).iter().map(|id| self.resolver.resolve(id))
    }

    /// Resolve the oldest occupant of `role`. Handy for capacity-1 roles.
    pub fn resolve_first(&self, role: R) -> Option<Arc<T>> {
        self.ids(role)
            .first()
            .and_then(|id| self.resolver.resolve(id))
    }

    /// Every (role, target) pair, resolved on demand.
    ///
    /// Unresolvable ids are yielded with `target == None` rather than
    /// aborting the walk. The iterator is finite, and cloning it or calling
    /// this method again restarts the walk.
    pub fn resolved_contents(&self) -> ResolvedContents<'_, R, T> {
        ResolvedContents {
            resolver: &self.resolver,
            slots: self.slots.iter(),
            current: None,
        }
    }

    /// Independent copy of the stored identifiers.
    pub fn snapshot(&self) -> LinkSnapshot<R> {
        self.slots.clone()
    }
}

impl<R: RoleTag, T> Clone for Link<R, T> {
    fn clone(&self) -> Self {
        Self {
            shape: self.shape,
            slots: self.slots.clone(),
            resolver: self.resolver.clone(),
        }
    }
}

impl<R: RoleTag, T> PartialEq for Link<R, T> {
    fn eq(&self, other: &Self) -> bool {
        self.shape.relation() == other.shape.relation() && self.slots == other.slots
    }
}

impl<R: RoleTag, T> fmt::Debug for Link<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link")
            .field("relation", &self.shape.relation())
            .field("slots", &self.slots)
            .field("resolver", &self.resolver)
            .finish()
    }
}

impl<R: RoleTag, T: Item + 'static> fmt::Display for Link<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("None");
        }
        let mut previous: Option<R> = None;
        for entry in self.resolved_contents() {
            match previous {
                Some(role) if role == entry.role => f.write_str(", ")?,
                Some(_) => write!(f, "; {}: ", entry.role)?,
                None => write!(f, "{}: ", entry.role)?,
            }
            match &entry.target {
                Some(target) => f.write_str(&target.label())?,
                None => f.write_str(entry.id)?,
            }
            previous = Some(entry.role);
        }
        Ok(())
    }
}

// ============================================================================
// RESOLVED CONTENTS
// ============================================================================

/// One occupied slot with its resolution result.
#[derive(Debug)]
pub struct LinkEntry<'a, R, T> {
    pub role: R,
    pub id: &'a str,
    /// `None` when no item with `id` is currently registered.
    pub target: Option<Arc<T>>,
}

impl<R, T> LinkEntry<'_, R, T> {
    pub fn is_resolved(&self) -> bool {
        self.target.is_some()
    }
}

/// Lazy walk over a link's slots. See [`Link::resolved_contents`].
pub struct ResolvedContents<'a, R: RoleTag, T> {
    resolver: &'a Resolver<T>,
    slots: btree_map::Iter<'a, R, Vec<ItemId>>,
    current: Option<(R, std::slice::Iter<'a, ItemId>)>,
}

impl<R: RoleTag, T> Clone for ResolvedContents<'_, R, T> {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver,
            slots: self.slots.clone(),
            current: self.current.clone(),
        }
    }
}

impl<'a, R: RoleTag, T: 'static> Iterator for ResolvedContents<'a, R, T> {
    type Item = LinkEntry<'a, R, T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((role, ids)) = &mut self.current {
                if let Some(id) = ids.next() {
                    return Some(LinkEntry {
                        role: *role,
                        id: id.as_str(),
                        target: self.resolver.resolve(id),
                    });
                }
            }
            let (role, ids) = self.slots.next()?;
            self.current = Some((*role, ids.iter()));
        }
    }
}

impl<R: RoleTag, T: 'static> FusedIterator for ResolvedContents<'_, R, T> {}


// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================

#[cfg(test)]
mod prop_tests {
    use super::*;
    use crate::{EntityType, FlightCrewRole, CREW_FLIGHT_SHAPE};
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    struct Tag(String);

    impl Item for Tag {
        const ENTITY_TYPE: EntityType = EntityType::Crew;

        fn id(&self) -> &str {
            &self.0
        }

        fn label(&self) -> String {
            self.0.clone()
        }
    }

    #[derive(Debug, Clone)]
    enum Op {
        Revolve(FlightCrewRole, u8),
        Strict(FlightCrewRole, u8),
        Remove(FlightCrewRole, u8),
    }

    fn arb_role() -> impl Strategy<Value = FlightCrewRole> {
        prop::sample::select(FlightCrewRole::ALL)
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (arb_role(), 0u8..20).prop_map(|(r, i)| Op::Revolve(r, i)),
            (arb_role(), 0u8..20).prop_map(|(r, i)| Op::Strict(r, i)),
            (arb_role(), 0u8..20).prop_map(|(r, i)| Op::Remove(r, i)),
        ]
    }

    fn tag(i: u8) -> Tag {
        Tag(format!("crew-{i}"))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Capacity and uniqueness hold after every operation.
        #[test]
        fn prop_invariants_hold_after_every_op(ops in prop::collection::vec(arb_op(), 0..60)) {
            let mut link: Link<FlightCrewRole, Tag> =
                Link::new(&CREW_FLIGHT_SHAPE, Resolver::detached());
            for op in ops {
                let _ = match op {
                    Op::Revolve(role, i) => link.assign_or_replace(role, &tag(i)).map(|_| ()),
                    Op::Strict(role, i) => link.strict_assign(role, &tag(i)),
                    Op::Remove(role, i) => link.remove(role, &tag(i)),
                };
                for role in FlightCrewRole::ALL {
                    let ids = link.ids(*role);
                    prop_assert!(ids.len() <= CREW_FLIGHT_SHAPE.capacity_of(*role).unwrap());
                    let unique: HashSet<&ItemId> = ids.iter().collect();
                    prop_assert_eq!(unique.len(), ids.len());
                }
            }
        }

        /// Rebuilding from a snapshot reproduces the snapshot.
        #[test]
        fn prop_snapshot_rebuild_roundtrip(ops in prop::collection::vec(arb_op(), 0..60)) {
            let mut link: Link<FlightCrewRole, Tag> =
                Link::new(&CREW_FLIGHT_SHAPE, Resolver::detached());
            for op in ops {
                if let Op::Revolve(role, i) = op {
                    link.assign_or_replace(role, &tag(i)).unwrap();
                }
            }
            let rebuilt = Link::<FlightCrewRole, Tag>::rebuild(
                &CREW_FLIGHT_SHAPE,
                link.snapshot(),
                Resolver::detached(),
            ).unwrap();
            prop_assert_eq!(rebuilt.snapshot(), link.snapshot());
        }

        /// Revolve keeps the newest `capacity` distinct assignments in order.
        #[test]
        fn prop_revolve_keeps_newest(n in 1u8..40) {
            let mut link: Link<FlightCrewRole, Tag> =
                Link::new(&CREW_FLIGHT_SHAPE, Resolver::detached());
            let role = FlightCrewRole::Trainee;
            for i in 0..n {
                link.assign_or_replace(role, &tag(i)).unwrap();
            }
            let capacity = CREW_FLIGHT_SHAPE.capacity_of(role).unwrap();
            let start = n.saturating_sub(capacity as u8);
            let expected: Vec<ItemId> = (start..n).map(|i| tag(i).0).collect();
            prop_assert_eq!(link.ids(role), expected.as_slice());
        }
    }
}
