use crate::chart::{self, ChartSink};
use crate::selection::Selection;
use crate::sorting::{next_sort_config, sort_posts};
use crate::state::DashboardState;
use chrono::Utc;
use fortune_core::{
    ActivityGuard, ChartKind, ChartSeries, DashboardConfig, DashboardGateway, ErrorReporter,
    Observable, Outcome, PostField,
};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Owns the post collection and every view derived from it.
///
/// Methods take `&mut self`, so two operations on one controller never
/// interleave. Failures are reported on the [`ErrorReporter`] and surface as
/// an [`Outcome`].
pub struct DashboardController<G: DashboardGateway> {
    gateway: Arc<G>,
    chart_sink: Arc<dyn ChartSink>,
    reporter: ErrorReporter,
    config: DashboardConfig,
    state: Observable<DashboardState>,
}

impl<G: DashboardGateway> DashboardController<G> {
    pub fn new(
        gateway: Arc<G>,
        chart_sink: Arc<dyn ChartSink>,
        reporter: ErrorReporter,
        config: DashboardConfig,
    ) -> Self {
        Self {
            gateway,
            chart_sink,
            reporter,
            config,
            state: Observable::new(DashboardState::default()),
        }
    }

    /// Chart shown from the first render on.
    pub fn with_chart_kind(self, kind: ChartKind) -> Self {
        self.state.update(|s| s.chart_kind = kind);
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> DashboardState {
        self.state.snapshot()
    }

    pub fn is_loading(&self) -> bool {
        self.state.read(|s| s.is_loading())
    }

    pub fn reporter(&self) -> &ErrorReporter {
        &self.reporter
    }

    /// Initial load followed by the first chart render.
    pub async fn init(&mut self) -> Outcome {
        let outcome = self.load_data().await;
        self.render_chart();
        outcome
    }

    /// Fetch posts and analytics together. Both replace the current values
    /// or neither does.
    pub async fn load_data(&mut self) -> Outcome {
        let _activity = ActivityGuard::begin(&self.state);
        debug!("Loading posts and analytics");

        let loaded = futures::try_join!(self.gateway.fetch_posts(), self.gateway.fetch_analytics());
        match loaded {
            Ok((mut posts, analytics)) => {
                let sort = self.state.read(|s| s.sort);
                sort_posts(&mut posts, sort);
                info!("Loaded {} posts", posts.len());

                self.state.update(|s| {
                    s.posts = posts;
                    s.analytics = analytics;
                    s.last_loaded_at = Some(Utc::now());
                });
                Outcome::Completed
            }
            Err(error) => {
                self.reporter.report_error("load_data", &error);
                Outcome::Failed
            }
        }
    }

    /// Ask the server to sync, then reload.
    pub async fn sync_data(&mut self) -> Outcome {
        let _activity = ActivityGuard::begin(&self.state);
        info!("Syncing data");

        let synced = match self.gateway.sync().await {
            Ok(result) => {
                debug!("Sync result: {}", result);
                true
            }
            Err(error) if self.config.reload_after_failed_sync => {
                self.reporter.report_warning("sync_data", &error);
                false
            }
            Err(error) => {
                self.reporter.report_error("sync_data", &error);
                return Outcome::Failed;
            }
        };

        match (self.load_data().await, synced) {
            (Outcome::Completed, true) => Outcome::Completed,
            (Outcome::Completed, false) => Outcome::Degraded,
            _ => Outcome::Failed,
        }
    }

    pub fn sort_posts(&mut self) {
        self.state.update(|s| {
            let sort = s.sort;
            sort_posts(&mut s.posts, sort);
        });
    }

    pub fn set_sort_field(&mut self, field: PostField) {
        self.state.update(|s| {
            s.sort = next_sort_config(s.sort, field);
            let sort = s.sort;
            sort_posts(&mut s.posts, sort);
        });
        debug!("Sorting by {}", field);
    }

    /// [`set_sort_field`](Self::set_sort_field) from a wire name such as
    /// `"views"`.
    pub fn set_sort_field_by_name(&mut self, name: &str) -> Outcome {
        match name.parse::<PostField>() {
            Ok(field) => {
                self.set_sort_field(field);
                Outcome::Completed
            }
            Err(error) => {
                self.reporter.report_warning("set_sort_field", &error);
                Outcome::Skipped
            }
        }
    }

    /// Returns whether `post_id` is selected afterwards.
    pub fn toggle_selection(&mut self, post_id: &str) -> bool {
        let mut selected = false;
        self.state.update(|s| selected = s.selection.toggle(post_id));
        selected
    }

    pub fn toggle_select_all(&mut self) {
        self.state.update(|s| {
            if s.selection.len() == s.posts.len() {
                s.selection.clear();
            } else {
                s.selection = Selection::from_ids(s.posts.iter().map(|p| p.id.clone()));
            }
        });
    }

    /// Send the selection for analysis and reload. The selection is only
    /// cleared once both succeeded.
    pub async fn analyze_selected(&mut self) -> Outcome {
        let post_ids = self.state.read(|s| s.selection.ids().to_vec());
        if post_ids.is_empty() {
            debug!("Nothing selected, skipping analysis");
            return Outcome::Skipped;
        }

        let _activity = ActivityGuard::begin(&self.state);
        info!("Analyzing {} selected posts", post_ids.len());

        if let Err(error) = self.gateway.analyze(&post_ids).await {
            self.reporter.report_error("analyze_selected", &error);
            return Outcome::Failed;
        }

        match self.load_data().await {
            Outcome::Completed => {
                self.state.update(|s| s.selection.clear());
                Outcome::Completed
            }
            _ => {
                warn!("Analysis succeeded but reload failed, keeping selection");
                Outcome::Failed
            }
        }
    }

    pub fn chart_series(&self, kind: ChartKind) -> ChartSeries {
        self.state.read(|s| chart::project(&s.posts, kind))
    }

    pub fn switch_chart(&mut self, kind: ChartKind) {
        self.state.update(|s| s.chart_kind = kind);
        self.render_chart();
    }

    fn render_chart(&self) {
        let kind = self.state.read(|s| s.chart_kind);
        let series = self.chart_series(kind);
        self.chart_sink.render(&series);
    }
}
