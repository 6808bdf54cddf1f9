use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tumble_core::{Scalar, WorldError};

/// Opaque surface tag. Only used as a lookup key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MaterialId(pub u32);

impl MaterialId {
    /// Stable id from a human name (first 4 bytes of its blake3 digest).
    pub fn from_name(name: &str) -> Self {
        let h = blake3::hash(name.as_bytes());
        let b = h.as_bytes();
        MaterialId(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "mat#{:08x}", self.0) }
}

/// What the solver uses for one contact.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContactMaterial {
    pub friction: Scalar,
    pub restitution: Scalar,
}

impl ContactMaterial {
    /// Used for any pair without a record.
    pub const FALLBACK: ContactMaterial = ContactMaterial { friction: 0.3, restitution: 0.0 };

    pub fn new(friction: Scalar, restitution: Scalar) -> Result<Self, WorldError> {
        let ok = friction.is_finite() && friction >= 0.0 && (0.0..=1.0).contains(&restitution);
        if ok { Ok(Self { friction, restitution }) } else { Err(WorldError::InvalidMaterialParams { friction, restitution }) }
    }

    /// Min friction, max restitution. Symmetric.
    #[inline]
    pub fn combine(a: ContactMaterial, b: ContactMaterial) -> ContactMaterial {
        ContactMaterial { friction: a.friction.min(b.friction), restitution: a.restitution.max(b.restitution) }
    }
}

impl Default for ContactMaterial {
    fn default() -> Self { Self::FALLBACK }
}

#[inline]
fn ordered_pair(a: MaterialId, b: MaterialId) -> (MaterialId, MaterialId) {
    match a.cmp(&b) {
        Ordering::Less | Ordering::Equal => (a, b),
        Ordering::Greater => (b, a),
    }
}

/// Per-pair records plus optional per-material base properties.
///
/// Lookup order: explicit pair record, then the combination of both base
/// properties when both materials have one, then [`ContactMaterial::FALLBACK`].
#[derive(Clone, Debug, Default)]
pub struct ContactMaterialTable {
    pairs: BTreeMap<(MaterialId, MaterialId), ContactMaterial>,
    base: BTreeMap<MaterialId, ContactMaterial>,
}

impl ContactMaterialTable {
    pub fn new() -> Self { Self::default() }

    /// Insert or overwrite the record for the unordered pair `{a, b}`.
    pub fn insert(&mut self, a: MaterialId, b: MaterialId, friction: Scalar, restitution: Scalar) -> Result<(), WorldError> {
        let m = ContactMaterial::new(friction, restitution)?;
        self.pairs.insert(ordered_pair(a, b), m);
        Ok(())
    }

    pub fn set_material_props(&mut self, id: MaterialId, friction: Scalar, restitution: Scalar) -> Result<(), WorldError> {
        let m = ContactMaterial::new(friction, restitution)?;
        self.base.insert(id, m);
        Ok(())
    }

    pub fn pair_record(&self, a: MaterialId, b: MaterialId) -> Option<ContactMaterial> {
        self.pairs.get(&ordered_pair(a, b)).copied()
    }

    pub fn lookup(&self, a: MaterialId, b: MaterialId) -> ContactMaterial {
        if let Some(m) = self.pair_record(a, b) { return m; }
        match (self.base.get(&a), self.base.get(&b)) {
            (Some(ma), Some(mb)) => ContactMaterial::combine(*ma, *mb),
            _ => ContactMaterial::FALLBACK,
        }
    }

    pub fn len(&self) -> usize { self.pairs.len() }
    pub fn is_empty(&self) -> bool { self.pairs.is_empty() }

    /// Records in key order; used for hashing.
    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, MaterialId, ContactMaterial)> + '_ {
        self.pairs.iter().map(|(&(a, b), &m)| (a, b, m))
    }
}
