use crate::presentation::format_date;
use fortune_core::{ChartKind, ChartPoint, ChartSeries, Post};

/// Receives every recomputed series. Rendering is up to the implementor.
pub trait ChartSink: Send + Sync {
    fn render(&self, series: &ChartSeries);
}

/// Project `posts` onto `kind`, oldest first. Posts without a timestamp come
/// first and equal timestamps keep their collection order.
pub fn project(posts: &[Post], kind: ChartKind) -> ChartSeries {
    let mut chronological: Vec<&Post> = posts.iter().collect();
    chronological.sort_by_key(|post| post.created_at);

    let field = kind.field();
    let points = chronological
        .into_iter()
        .map(|post| ChartPoint {
            timestamp: post.created_at,
            label: format_date(post.created_at),
            value: post.metric(field),
        })
        .collect();

    ChartSeries {
        kind,
        label: kind.label(),
        points,
    }
}
