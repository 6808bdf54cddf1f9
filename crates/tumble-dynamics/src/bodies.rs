use tumble_core::BodyId;

use crate::body::Body;

/// Bodies kept sorted by id. Ids only grow, so insertion is a push and every
/// iteration is in id order.
#[derive(Clone, Debug, Default)]
pub struct BodySet {
    bodies: Vec<Body>,
}

impl BodySet {
    pub fn new() -> Self { Self::default() }
    pub fn with_capacity(cap: usize) -> Self { Self { bodies: Vec::with_capacity(cap) } }

    #[inline] pub fn len(&self) -> usize { self.bodies.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.bodies.is_empty() }

    /// Appends `body`. Its id must be greater than every id already stored.
    pub fn insert(&mut self, body: Body) {
        debug_assert!(self.bodies.last().map_or(true, |b| b.id < body.id));
        self.bodies.push(body);
    }

    #[inline] pub fn index_of(&self, id: BodyId) -> Option<usize> {
        self.bodies.binary_search_by(|b| b.id.cmp(&id)).ok()
    }

    pub fn remove(&mut self, id: BodyId) -> Option<Body> {
        self.index_of(id).map(|i| self.bodies.remove(i))
    }

    #[inline] pub fn get(&self, id: BodyId) -> Option<&Body> { self.index_of(id).map(|i| &self.bodies[i]) }
    #[inline] pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        let i = self.index_of(id)?;
        Some(&mut self.bodies[i])
    }
    #[inline] pub fn contains(&self, id: BodyId) -> bool { self.index_of(id).is_some() }

    /// Smallest-id dynamic body; the eviction candidate.
    pub fn oldest_dynamic(&self) -> Option<BodyId> {
        self.bodies.iter().find(|b| !b.is_static()).map(|b| b.id)
    }

    /// Two distinct bodies by index, both mutable.
    pub fn pair_mut(&mut self, i: usize, j: usize) -> (&mut Body, &mut Body) {
        assert_ne!(i, j, "pair_mut on the same body");
        if i < j {
            let (lo, hi) = self.bodies.split_at_mut(j);
            (&mut lo[i], &mut hi[0])
        } else {
            let (lo, hi) = self.bodies.split_at_mut(i);
            (&mut hi[0], &mut lo[j])
        }
    }

    #[inline] pub fn as_slice(&self) -> &[Body] { &self.bodies }
    #[inline] pub fn iter(&self) -> std::slice::Iter<'_, Body> { self.bodies.iter() }
    #[inline] pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Body> { self.bodies.iter_mut() }
    pub fn ids(&self) -> impl ExactSizeIterator<Item = BodyId> + '_ { self.bodies.iter().map(|b| b.id) }
}
