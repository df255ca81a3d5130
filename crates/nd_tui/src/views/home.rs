use nd_core::{NewsArticle, Result, UserPreferences};

use crate::task::TaskHandle;
use crate::widgets::preferences::PreferencesForm;

/// State for the main feed: the article list, the user's preferences,
/// the optional dialog, and whatever fetch or preferences save is in
/// flight. Fetch handles abort on drop, so leaving the view suppresses
/// late updates.
pub struct HomeView {
    pub articles: Vec<NewsArticle>,
    pub selected: usize,
    pub preferences: UserPreferences,
    pub dialog: Option<PreferencesForm>,
    /// True while a preferences save is in flight; blocks the navbar
    /// controls and draws the full-screen overlay.
    pub is_updating: bool,
    pub fetch: Option<TaskHandle<Result<Vec<NewsArticle>>>>,
    pub pending_update: Option<(TaskHandle<Result<String>>, UserPreferences)>,
}

impl Default for HomeView {
    fn default() -> Self {
        Self {
            articles: Vec::new(),
            selected: 0,
            preferences: UserPreferences::default(),
            dialog: None,
            is_updating: false,
            fetch: None,
            pending_update: None,
        }
    }
}

impl HomeView {
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

    /// Wholesale replacement, the only way the list ever changes.
    pub fn replace_articles(&mut self, articles: Vec<NewsArticle>) {
        self.articles = articles;
        if self.selected >= self.articles.len() {
            self.selected = self.articles.len().saturating_sub(1);
        }
    }
}
