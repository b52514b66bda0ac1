use crate::coords::Viewport;

/// Per-frame handles a backend needs to submit work.
pub struct RenderCtx<'a> {
    pub queue: &'a wgpu::Queue,
    /// Format of this frame's color target; pipelines must be built for it.
    pub surface_format: wgpu::TextureFormat,
    pub viewport: Viewport, // logical px
}

/// This frame's encoder and color attachment, already cleared.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}
