use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use parking_lot::Mutex;
use tumble_core::{Isometry, Quat, Vec3};

/// Externally owned visual handle. Physics only ever writes to it.
pub trait RenderProxy {
    fn set_transform(&mut self, position: Vec3, orientation: Quat);
}

impl RenderProxy for Isometry {
    fn set_transform(&mut self, position: Vec3, orientation: Quat) {
        self.pos = position;
        self.rot = orientation;
    }
}

impl<P: RenderProxy + ?Sized> RenderProxy for Box<P> {
    fn set_transform(&mut self, position: Vec3, orientation: Quat) {
        (**self).set_transform(position, orientation);
    }
}

/// Shared with the renderer on the same thread.
impl<P: RenderProxy> RenderProxy for Rc<RefCell<P>> {
    fn set_transform(&mut self, position: Vec3, orientation: Quat) {
        self.borrow_mut().set_transform(position, orientation);
    }
}

/// Shared with a renderer on another thread.
impl<P: RenderProxy> RenderProxy for Arc<Mutex<P>> {
    fn set_transform(&mut self, position: Vec3, orientation: Quat) {
        self.lock().set_transform(position, orientation);
    }
}

/// Headless proxy: keeps the last transform and counts writes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PoseLog {
    pub last: Option<Isometry>,
    pub writes: u64,
}

impl RenderProxy for PoseLog {
    fn set_transform(&mut self, position: Vec3, orientation: Quat) {
        self.last = Some(Isometry { pos: position, rot: orientation });
        self.writes += 1;
    }
}
