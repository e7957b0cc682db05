use fortune_core::{Post, PostField, SortConfig};
use std::cmp::Ordering;

/// Stable sort by the configured field. Equal values keep their relative
/// order in both directions.
pub fn sort_posts(posts: &mut [Post], sort: SortConfig) {
    posts.sort_by(|a, b| compare(a, b, sort));
}

fn compare(a: &Post, b: &Post, sort: SortConfig) -> Ordering {
    let (a, b) = (a.metric(sort.field), b.metric(sort.field));
    if sort.descending {
        b.total_cmp(&a)
    } else {
        a.total_cmp(&b)
    }
}

/// Selecting the active field again flips direction; a new field starts
/// descending.
pub fn next_sort_config(current: SortConfig, field: PostField) -> SortConfig {
    if current.field == field {
        SortConfig {
            field,
            descending: !current.descending,
        }
    } else {
        SortConfig {
            field,
            descending: true,
        }
    }
}
