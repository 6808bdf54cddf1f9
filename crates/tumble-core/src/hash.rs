use blake3::Hasher;
use crate::types::{Isometry, Quat, Vec3, Velocity};
use crate::Scalar;

/// Values that feed a [`StepHasher`] as exact little-endian bytes.
/// Floats hash by bit pattern, so `0.0` and `-0.0` differ.
pub trait HashInto {
    fn hash_into(&self, h: &mut StepHasher);
}

/// blake3 over world state; two worlds with equal digests are bit-identical.
#[derive(Default)]
pub struct StepHasher(Hasher);

impl StepHasher {
    pub fn new() -> Self { Self::default() }

    pub fn bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.0.update(bytes);
        self
    }

    pub fn feed<T: HashInto + ?Sized>(&mut self, value: &T) -> &mut Self {
        value.hash_into(self);
        self
    }

    pub fn finalize(&self) -> [u8; 32] { *self.0.finalize().as_bytes() }
}

macro_rules! hash_le {
    ($($t:ty),*) => {$(
        impl HashInto for $t {
            #[inline] fn hash_into(&self, h: &mut StepHasher) { h.bytes(&self.to_le_bytes()); }
        }
    )*};
}
hash_le!(u8, u32, u64, Scalar);

impl HashInto for Vec3 {
    fn hash_into(&self, h: &mut StepHasher) { h.feed(&self.x).feed(&self.y).feed(&self.z); }
}

impl HashInto for Quat {
    fn hash_into(&self, h: &mut StepHasher) { h.feed(&self.x).feed(&self.y).feed(&self.z).feed(&self.w); }
}

impl HashInto for Isometry {
    fn hash_into(&self, h: &mut StepHasher) { h.feed(&self.pos).feed(&self.rot); }
}

impl HashInto for Velocity {
    fn hash_into(&self, h: &mut StepHasher) { h.feed(&self.lin).feed(&self.ang); }
}

impl<T: HashInto> HashInto for [T] {
    fn hash_into(&self, h: &mut StepHasher) {
        for v in self { v.hash_into(h); }
    }
}
