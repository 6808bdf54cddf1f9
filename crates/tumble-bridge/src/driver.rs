use tumble_core::{BodyId, Vec3, WorldError};
use tumble_world::{FrameReport, Spawned, World};

use crate::proxy::RenderProxy;
use crate::sync::Synchronizer;

/// The render-loop side: owns the world and the binding table and runs one
/// frame in a fixed order: bound forces, step, bind spawned bodies, sync.
pub struct FrameDriver<P, F> {
    world: World,
    sync: Synchronizer<P>,
    make_proxy: F,
}

impl<P, F> FrameDriver<P, F>
where
    P: RenderProxy,
    F: FnMut(&Spawned) -> P,
{
    /// `make_proxy` builds the visual for every body the spawn queue creates.
    pub fn new(world: World, make_proxy: F) -> Self {
        Self { world, sync: Synchronizer::new(), make_proxy }
    }

    pub fn world(&self) -> &World { &self.world }
    pub fn world_mut(&mut self) -> &mut World { &mut self.world }
    pub fn synchronizer(&self) -> &Synchronizer<P> { &self.sync }

    pub fn bind(&mut self, body: BodyId, proxy: P, force: Option<Vec3>) {
        self.sync.bind(body, proxy, force);
    }

    /// Runs one render frame of real duration `dt`. Stale-binding warnings are
    /// appended to the step's own warnings.
    pub fn frame(&mut self, dt: f64) -> Result<FrameReport, WorldError> {
        self.sync.apply_forces(&mut self.world)?;
        let mut report = self.world.step(dt);
        for s in &report.spawned {
            let proxy = (self.make_proxy)(s);
            self.sync.bind(s.id, proxy, Some(s.command.force));
        }
        for id in &report.evicted {
            self.sync.unbind(*id);
        }
        report.warnings.extend(self.sync.sync(&self.world));
        Ok(report)
    }
}
