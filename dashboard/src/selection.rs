use serde::Serialize;
use std::collections::HashSet;

/// Set of selected post ids that remembers insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    order: Vec<String>,
    #[serde(skip)]
    members: HashSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Self::new();
        for id in ids {
            selection.insert(id.into());
        }
        selection
    }

    /// Returns `true` if the id is selected after the toggle.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.members.remove(id) {
            self.order.retain(|selected| selected != id);
            false
        } else {
            self.insert(id.to_string());
            true
        }
    }

    fn insert(&mut self, id: String) {
        if self.members.insert(id.clone()) {
            self.order.push(id);
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    pub fn ids(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }
}
