/// RenderDevice trait: the graphics backend seam.
///
/// The pipeline decides what runs, in which order, reading which buffers;
/// a device turns each stage invocation into GPU work. Every failure is
/// reported as an `Error` and aborts the frame.

use crate::error::Result;
use super::chain::ChainKind;
use super::render_scene::SceneSnapshot;
use super::stage::StageId;

/// Handle of an off-screen color buffer owned by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u32);

/// Everything a device needs to run one stage
#[derive(Debug, Clone, Copy)]
pub struct StageInvocation<'a> {
    pub chain: ChainKind,
    pub stage: StageId,
    /// Buffers read by the stage, in binding order
    pub inputs: &'a [BufferId],
    pub output: BufferId,
    /// Raw uniform block
    pub uniforms: &'a [u8],
    /// Scene graph state, for scene-sampling stages
    pub scene: Option<&'a SceneSnapshot>,
}

pub trait RenderDevice {
    fn create_color_buffer(&mut self, label: &str, width: u32, height: u32) -> Result<BufferId>;

    fn resize_color_buffer(&mut self, buffer: BufferId, width: u32, height: u32) -> Result<()>;

    fn destroy_color_buffer(&mut self, buffer: BufferId);

    fn execute_stage(&mut self, invocation: &StageInvocation<'_>) -> Result<()>;

    /// Show `buffer` on the visible framebuffer
    fn present(&mut self, buffer: BufferId) -> Result<()>;
}
