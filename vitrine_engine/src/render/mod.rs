//! Render module: the multi-pass composite pipeline.
//!
//! `RenderPipeline` owns the base scene graph and four pass chains. GPU work
//! goes through the `RenderDevice` trait; `MockDevice` records it instead.

mod chain;
mod device;
mod mock_device;
mod pipeline;
mod render_scene;
mod settings;
mod stage;

pub use chain::{ChainKind, PassChain};
pub use device::{BufferId, RenderDevice, StageInvocation};
pub use mock_device::{MockDevice, MockDeviceLog, StageRecord};
pub use pipeline::{FrameStats, RenderPipeline};
pub use render_scene::{Background, NodeKey, RenderScene, SceneSnapshot, SurfaceSnapshot};
pub use settings::{AoOutput, RenderSettings, ToneMapping, MAX_SUPERSAMPLE_LEVEL};
pub use stage::{
    AdderUniforms, AmbientOcclusionUniforms, BloomUniforms, ColorBalanceUniforms, FxaaUniforms,
    MergerUniforms, ScalarUniforms, Stage, StageId, StageParams, SupersampleUniforms, ADDER_WEIGHTS,
};
