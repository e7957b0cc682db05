pub mod chart;
pub mod controller;
pub mod presentation;
pub mod selection;
pub mod sorting;
pub mod state;

pub use chart::ChartSink;
pub use controller::DashboardController;
pub use presentation::{format_date, truncate_text, EngagementTier, DEFAULT_TRUNCATE_LEN};
pub use selection::Selection;
pub use state::DashboardState;
