use fortune_core::{Portrait, PortraitSource, ReadingStep, ShareableContent, Tracked};
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct FlowState {
    pub step: ReadingStep,
    /// Animation sub-step, only meaningful while `step` is `Reading`.
    pub reading_step: u8,
    pub activity: usize,
    pub portrait: Option<Portrait>,
    pub shareable_content: Option<ShareableContent>,
    pub source: Option<PortraitSource>,
}

impl FlowState {
    pub fn is_loading(&self) -> bool {
        self.activity > 0
    }

    pub fn has_results(&self) -> bool {
        self.step == ReadingStep::Results && self.portrait.is_some()
    }
}

impl Tracked for FlowState {
    fn activity_mut(&mut self) -> &mut usize {
        &mut self.activity
    }
}
