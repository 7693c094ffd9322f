/// Mock render device (no GPU required)
///
/// Records every call it receives and tracks a symbolic description of each
/// buffer's content, e.g. `gamma(color_balance(add(mul(scene,ao),bloom(scene))))`.
/// Tests and headless hosts inspect the record through a `MockDeviceLog`
/// handle taken before the device is moved into the pipeline.

use std::sync::{Arc, Mutex, MutexGuard};
use rustc_hash::FxHashMap;
use crate::error::Result;
use crate::engine_bail;
use super::chain::ChainKind;
use super::device::{BufferId, RenderDevice, StageInvocation};
use super::render_scene::SceneSnapshot;
use super::stage::{MergerUniforms, StageId};

// ============================================================================
// Records
// ============================================================================

/// One executed stage
#[derive(Debug, Clone)]
pub struct StageRecord {
    pub chain: ChainKind,
    pub stage: StageId,
    pub inputs: Vec<BufferId>,
    pub output: BufferId,
    pub uniforms: Vec<u8>,
    pub scene: Option<SceneSnapshot>,
    /// Symbolic content written to `output`
    pub content: String,
}

#[derive(Debug, Default)]
struct DeviceLog {
    stages: Vec<StageRecord>,
    /// Index into `stages` at each present
    frame_ends: Vec<usize>,
    presented: Vec<String>,
    buffers_created: u32,
    buffers_destroyed: u32,
    resizes: u32,
}

/// Shared read handle on a mock device's record
#[derive(Debug, Clone, Default)]
pub struct MockDeviceLog(Arc<Mutex<DeviceLog>>);

impl MockDeviceLog {
    fn lock(&self) -> MutexGuard<'_, DeviceLog> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Every executed stage since creation or the last `clear`
    pub fn stages(&self) -> Vec<StageRecord> {
        self.lock().stages.clone()
    }

    /// Stage ids of the last presented frame, in execution order
    pub fn last_frame_order(&self) -> Vec<StageId> {
        self.last_frame().iter().map(|r| r.stage).collect()
    }

    /// Stages of the last presented frame
    pub fn last_frame(&self) -> Vec<StageRecord> {
        let log = self.lock();
        let end = log.frame_ends.last().copied().unwrap_or(0);
        let start = if log.frame_ends.len() >= 2 {
            log.frame_ends[log.frame_ends.len() - 2]
        } else {
            0
        };
        log.stages[start..end].to_vec()
    }

    /// Last record of `stage` in the last presented frame
    pub fn last_record(&self, stage: StageId) -> Option<StageRecord> {
        self.last_frame().into_iter().rev().find(|r| r.stage == stage)
    }

    /// Symbolic content of every presented buffer, oldest first
    pub fn presented(&self) -> Vec<String> {
        self.lock().presented.clone()
    }

    pub fn last_presented(&self) -> Option<String> {
        self.lock().presented.last().cloned()
    }

    pub fn frame_count(&self) -> usize {
        self.lock().presented.len()
    }

    pub fn buffers_created(&self) -> u32 {
        self.lock().buffers_created
    }

    pub fn buffers_destroyed(&self) -> u32 {
        self.lock().buffers_destroyed
    }

    pub fn resize_count(&self) -> u32 {
        self.lock().resizes
    }

    pub fn clear(&self) {
        *self.lock() = DeviceLog::default();
    }
}

// ============================================================================
// Mock device
// ============================================================================

#[derive(Debug)]
struct MockBuffer {
    label: String,
    width: u32,
    height: u32,
    content: String,
}

#[derive(Debug, Default)]
pub struct MockDevice {
    log: MockDeviceLog,
    buffers: FxHashMap<BufferId, MockBuffer>,
    next_id: u32,
    fail_on: Option<StageId>,
}

impl MockDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every execution of `stage` fail with a backend error
    pub fn failing_on(mut self, stage: StageId) -> Self {
        self.fail_on = Some(stage);
        self
    }

    pub fn log(&self) -> MockDeviceLog {
        self.log.clone()
    }

    /// Size of a live buffer
    pub fn buffer_size(&self, buffer: BufferId) -> Option<(u32, u32)> {
        self.buffers.get(&buffer).map(|b| (b.width, b.height))
    }

    fn content(&self, buffer: BufferId) -> Result<&str> {
        match self.buffers.get(&buffer) {
            Some(b) => Ok(&b.content),
            None => engine_bail!("vitrine::MockDevice", "Unknown buffer {:?}", buffer),
        }
    }

    /// Symbolic result of running `invocation` on its inputs
    fn compose(&self, invocation: &StageInvocation<'_>) -> Result<String> {
        let inputs = invocation
            .inputs
            .iter()
            .map(|b| self.content(*b).map(str::to_string))
            .collect::<Result<Vec<_>>>()?;
        let first = inputs.first().cloned().unwrap_or_default();

        Ok(match invocation.stage {
            StageId::MainScene | StageId::BloomScene => "scene".to_string(),
            StageId::Supersample => "ssaa".to_string(),
            StageId::AmbientOcclusion => "ao".to_string(),
            StageId::LuminantBloom | StageId::SceneBloom => format!("bloom({})", first),
            StageId::PixelMerger => {
                let uniforms: MergerUniforms = bytemuck::try_pod_read_unaligned(invocation.uniforms)
                    .unwrap_or(MergerUniforms { merge: 0, show_ao: 0, _pad: [0; 2] });
                match inputs.get(1) {
                    Some(ao) if uniforms.merge != 0 && uniforms.show_ao != 0 => ao.clone(),
                    Some(ao) if uniforms.merge != 0 => format!("mul({},{})", first, ao),
                    _ => first,
                }
            }
            StageId::PixelAdder => {
                let added = inputs.get(1).cloned().unwrap_or_default();
                format!("add({},{})", first, added)
            }
            other => format!("{}({})", other.label(), first),
        })
    }
}

impl RenderDevice for MockDevice {
    fn create_color_buffer(&mut self, label: &str, width: u32, height: u32) -> Result<BufferId> {
        self.next_id += 1;
        let id = BufferId(self.next_id);
        self.buffers.insert(id, MockBuffer {
            label: label.to_string(),
            width,
            height,
            content: String::new(),
        });
        self.log.lock().buffers_created += 1;
        Ok(id)
    }

    fn resize_color_buffer(&mut self, buffer: BufferId, width: u32, height: u32) -> Result<()> {
        let Some(b) = self.buffers.get_mut(&buffer) else {
            engine_bail!("vitrine::MockDevice", "Resize of unknown buffer {:?}", buffer);
        };
        b.width = width;
        b.height = height;
        self.log.lock().resizes += 1;
        Ok(())
    }

    fn destroy_color_buffer(&mut self, buffer: BufferId) {
        if self.buffers.remove(&buffer).is_some() {
            self.log.lock().buffers_destroyed += 1;
        }
    }

    fn execute_stage(&mut self, invocation: &StageInvocation<'_>) -> Result<()> {
        if self.fail_on == Some(invocation.stage) {
            engine_bail!("vitrine::MockDevice", "Injected failure in stage {}", invocation.stage.label());
        }

        let content = self.compose(invocation)?;
        match self.buffers.get_mut(&invocation.output) {
            Some(b) => b.content = content.clone(),
            None => engine_bail!("vitrine::MockDevice", "Stage {} writes unknown buffer {:?}",
                invocation.stage.label(), invocation.output),
        }

        self.log.lock().stages.push(StageRecord {
            chain: invocation.chain,
            stage: invocation.stage,
            inputs: invocation.inputs.to_vec(),
            output: invocation.output,
            uniforms: invocation.uniforms.to_vec(),
            scene: invocation.scene.cloned(),
            content,
        });
        Ok(())
    }

    fn present(&mut self, buffer: BufferId) -> Result<()> {
        let content = self.content(buffer)?.to_string();
        crate::engine_trace!("vitrine::MockDevice", "Present {:?} ({})",
            buffer, self.buffers.get(&buffer).map(|b| b.label.as_str()).unwrap_or_default());
        let mut log = self.log.lock();
        let end = log.stages.len();
        log.frame_ends.push(end);
        log.presented.push(content);
        Ok(())
    }
}

#[cfg(test)]
#[path = "mock_device_tests.rs"]
mod tests;
