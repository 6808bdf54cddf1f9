use core::fmt;

/// Stable body handle. Ids are handed out monotonically and never reused, so a
/// removed body's id stays invalid for the lifetime of the world.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct BodyId(pub u32);
impl fmt::Display for BodyId { fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "BodyId({})", self.0) } }
