use nd_core::{NewsArticle, Result};

use crate::task::TaskHandle;

/// State for the saved-articles view. Cards render read-only here; the
/// save action is a no-op by construction.
#[derive(Default)]
pub struct SavedView {
    pub articles: Vec<NewsArticle>,
    pub selected: usize,
    pub fetch: Option<TaskHandle<Result<Vec<NewsArticle>>>>,
}

impl SavedView {
    pub fn selected_article(&self) -> Option<&NewsArticle> {
        self.articles.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.articles.is_empty() {
            self.selected = (self.selected + 1).min(self.articles.len() - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}
