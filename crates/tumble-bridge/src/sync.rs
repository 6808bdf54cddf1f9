use tracing::warn;
use tumble_core::{BodyId, SimWarning, Vec3, WorldError};
use tumble_world::World;

use crate::proxy::RenderProxy;

/// One body paired with its visual proxy and an optional constant force.
#[derive(Clone, Debug)]
pub struct Binding<P> {
    pub body: BodyId,
    pub proxy: P,
    pub force: Option<Vec3>,
}

/// Caller-owned binding table. Reads bodies, writes proxies, never the reverse.
#[derive(Clone, Debug)]
pub struct Synchronizer<P> {
    bindings: Vec<Binding<P>>,
}

impl<P> Default for Synchronizer<P> {
    fn default() -> Self { Self { bindings: Vec::new() } }
}

impl<P: RenderProxy> Synchronizer<P> {
    pub fn new() -> Self { Self::default() }

    pub fn bind(&mut self, body: BodyId, proxy: P, force: Option<Vec3>) {
        self.bindings.push(Binding { body, proxy, force });
    }

    /// Removes every binding for `body`, returning the proxies.
    pub fn unbind(&mut self, body: BodyId) -> Vec<P> {
        let (gone, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.bindings).into_iter().partition(|b| b.body == body);
        self.bindings = kept;
        gone.into_iter().map(|b| b.proxy).collect()
    }

    pub fn len(&self) -> usize { self.bindings.len() }
    pub fn is_empty(&self) -> bool { self.bindings.is_empty() }
    pub fn bindings(&self) -> &[Binding<P>] { &self.bindings }

    pub fn proxy(&self, body: BodyId) -> Option<&P> {
        self.bindings.iter().find(|b| b.body == body).map(|b| &b.proxy)
    }

    /// Re-applies each bound constant force. The body's world position is the
    /// application point relative to its centre, so a body away from the origin
    /// also picks up a `position x force` torque. Bindings to removed bodies are
    /// skipped here and dropped by [`Synchronizer::sync`].
    pub fn apply_forces(&self, world: &mut World) -> Result<(), WorldError> {
        for b in &self.bindings {
            let Some(f) = b.force else { continue };
            let pos = match world.pose(b.body) {
                Ok(pose) => pose.pos,
                Err(WorldError::UnknownBody(_)) => continue,
                Err(e) => return Err(e),
            };
            match world.apply_force(b.body, f, pos.cross(f)) {
                Ok(()) | Err(WorldError::UnknownBody(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Copies every bound body's pose into its proxy. Bindings whose body is
    /// gone are dropped and reported.
    pub fn sync(&mut self, world: &World) -> Vec<SimWarning> {
        let mut warnings = Vec::new();
        self.bindings.retain_mut(|b| match world.pose(b.body) {
            Ok(pose) => {
                b.proxy.set_transform(pose.pos, pose.rot);
                true
            }
            Err(_) => {
                let w = SimWarning::StaleBinding { body: b.body };
                warn!("{w}");
                warnings.push(w);
                false
            }
        });
        warnings
    }
}
