use anyhow::Result;

use crate::coords::Viewport;
use crate::device::Gpu;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// Errors returned from any callback stop the event loop and are handed back
/// from `Runtime::run`.
pub trait App {
    /// Called once after the window and GPU context exist, before the first frame.
    fn on_init(&mut self, gpu: &Gpu<'_>) -> Result<()> {
        let _ = gpu;
        Ok(())
    }

    /// Called with the new drawable size in logical pixels after init and on every resize.
    fn on_resize(&mut self, viewport: Viewport) {
        let _ = viewport;
    }

    /// Called once per redraw.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl>;
}
