use crate::selection::Selection;
use chrono::{DateTime, Utc};
use fortune_core::{AnalyticsSummary, ChartKind, Post, SortConfig, Tracked};
use serde::Serialize;

/// Everything the dashboard renders from. Published on every mutation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardState {
    pub posts: Vec<Post>,
    pub analytics: AnalyticsSummary,
    pub sort: SortConfig,
    pub selection: Selection,
    pub chart_kind: ChartKind,
    pub activity: usize,
    pub last_loaded_at: Option<DateTime<Utc>>,
}

impl DashboardState {
    pub fn is_loading(&self) -> bool {
        self.activity > 0
    }

    pub fn all_selected(&self) -> bool {
        !self.posts.is_empty() && self.selection.len() == self.posts.len()
    }
}

impl Tracked for DashboardState {
    fn activity_mut(&mut self) -> &mut usize {
        &mut self.activity
    }
}
