/// PassChain: an ordered run of stages producing one color buffer.
///
/// Stages ping-pong between the chain's two buffers; the buffer written by
/// the last executed stage is the chain's latest output. Inserting or
/// removing a stage never reorders the others.

use super::device::BufferId;
use super::stage::{Stage, StageId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainKind {
    /// Luminant objects only, on a black scene
    Bloom,
    AmbientOcclusion,
    /// Base scene with true materials
    Main,
    /// Composite of the other three, presented to the screen
    Final,
}

impl ChainKind {
    pub const ALL: [ChainKind; 4] = [
        ChainKind::Bloom,
        ChainKind::AmbientOcclusion,
        ChainKind::Main,
        ChainKind::Final,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChainKind::Bloom => "bloom",
            ChainKind::AmbientOcclusion => "ambient_occlusion",
            ChainKind::Main => "main",
            ChainKind::Final => "final",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PassChain {
    kind: ChainKind,
    stages: Vec<Stage>,
    buffers: [Option<BufferId>; 2],
    latest: Option<BufferId>,
}

impl PassChain {
    pub fn new(kind: ChainKind) -> Self {
        Self { kind, stages: Vec::new(), buffers: [None, None], latest: None }
    }

    pub fn kind(&self) -> ChainKind {
        self.kind
    }

    // ===== STRUCTURE =====

    pub fn push(&mut self, stage: Stage) {
        self.stages.push(stage);
    }

    /// Insert at `index`, clamped to the end of the chain
    pub fn insert(&mut self, index: usize, stage: Stage) {
        let index = index.min(self.stages.len());
        self.stages.insert(index, stage);
    }

    /// Remove the first stage with `id`
    pub fn remove(&mut self, id: StageId) -> Option<Stage> {
        let index = self.position(id)?;
        Some(self.stages.remove(index))
    }

    pub fn position(&self, id: StageId) -> Option<usize> {
        self.stages.iter().position(|s| s.id == id)
    }

    pub fn contains(&self, id: StageId) -> bool {
        self.position(id).is_some()
    }

    pub fn stage(&self, id: StageId) -> Option<&Stage> {
        self.stages.iter().find(|s| s.id == id)
    }

    pub fn stage_mut(&mut self, id: StageId) -> Option<&mut Stage> {
        self.stages.iter_mut().find(|s| s.id == id)
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn stage_ids(&self) -> Vec<StageId> {
        self.stages.iter().map(|s| s.id).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    // ===== BUFFERS =====

    pub fn buffers(&self) -> [Option<BufferId>; 2] {
        self.buffers
    }

    pub(crate) fn set_buffers(&mut self, buffers: [BufferId; 2]) {
        self.buffers = [Some(buffers[0]), Some(buffers[1])];
    }

    /// Buffer stage `index` writes to
    pub(crate) fn output_for(&self, index: usize) -> Option<BufferId> {
        self.buffers[index % 2]
    }

    /// Buffer written by the last executed stage
    pub fn latest(&self) -> Option<BufferId> {
        self.latest
    }

    pub(crate) fn set_latest(&mut self, buffer: BufferId) {
        self.latest = Some(buffer);
    }
}

#[cfg(test)]
#[path = "chain_tests.rs"]
mod tests;
