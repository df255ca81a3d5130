use serde::{Deserialize, Serialize};

/// A news item already summarized and sentiment-scored by the backend.
/// Immutable from the client's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub id: String,
    pub title: String,
    pub summary: String,
    /// Kept as the raw wire label so unrecognized values still
    /// deserialize; parse with [`Sentiment::from_label`] when needed.
    pub sentiment_label: String,
    pub sentiment_explanation: String,
    pub url: String,
}

/// The five ordered sentiment categories the backend assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Sentiment {
    VeryNegative,
    Negative,
    Neutral,
    Positive,
    VeryPositive,
}

impl Sentiment {
    /// Parses a wire label. Returns None for anything outside the five
    /// known categories so callers can pick a default rendering.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "VERY_NEGATIVE" => Some(Sentiment::VeryNegative),
            "NEGATIVE" => Some(Sentiment::Negative),
            "NEUTRAL" => Some(Sentiment::Neutral),
            "POSITIVE" => Some(Sentiment::Positive),
            "VERY_POSITIVE" => Some(Sentiment::VeryPositive),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::VeryNegative => "VERY_NEGATIVE",
            Sentiment::Negative => "NEGATIVE",
            Sentiment::Neutral => "NEUTRAL",
            Sentiment::Positive => "POSITIVE",
            Sentiment::VeryPositive => "VERY_POSITIVE",
        }
    }
}

/// Reading preferences, one logical record per user, upserted keyed on
/// user identity. Topic and source are single-valued strings even
/// though the UI offers a catalog to pick from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub topics: String,
    pub sources: String,
    pub language: String,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            topics: String::new(),
            sources: String::new(),
            language: "en".to_string(),
        }
    }
}

pub const AVAILABLE_TOPICS: &[&str] = &[
    "Technology",
    "Sports",
    "Health",
    "Business",
    "Entertainment",
    "Science",
];

pub const AVAILABLE_SOURCES: &[&str] = &[
    "BBC",
    "CNN",
    "Al Jazeera",
    "Reuters",
    "The Guardian",
    "New York Times",
];

/// (code, display name) pairs for the language selector.
pub const LANGUAGES: &[(&str, &str)] = &[("en", "English"), ("es", "Spanish"), ("fr", "French")];

/// A saved article row: a denormalized copy of the article fields
/// captured at save time, not a live reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedArticle {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub summary: String,
    pub sentiment_label: String,
    pub sentiment_explanation: String,
    pub url: String,
}

impl SavedArticle {
    /// Captures an article for a user. The row id is assigned by the
    /// backend on insert.
    pub fn capture(user_id: &str, article: &NewsArticle) -> Self {
        Self {
            id: String::new(),
            user_id: user_id.to_string(),
            title: article.title.clone(),
            summary: article.summary.clone(),
            sentiment_label: article.sentiment_label.clone(),
            sentiment_explanation: article.sentiment_explanation.clone(),
            url: article.url.clone(),
        }
    }

    /// Re-shapes the row for rendering through the article card. The
    /// card sees the saved row's own id.
    pub fn to_article(&self) -> NewsArticle {
        NewsArticle {
            id: self.id.clone(),
            title: self.title.clone(),
            summary: self.summary.clone(),
            sentiment_label: self.sentiment_label.clone(),
            sentiment_explanation: self.sentiment_explanation.clone(),
            url: self.url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
}

/// Identity-provider session. Lifecycle owned by the provider;
/// read-only to this application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user: User,
}

/// Outcome of a successful registration.
#[derive(Debug, Clone, PartialEq)]
pub enum SignUpOutcome {
    SignedIn(Session),
    /// The provider requires email verification before sign-in.
    VerificationRequired,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_labels_round_trip() {
        for label in [
            "VERY_NEGATIVE",
            "NEGATIVE",
            "NEUTRAL",
            "POSITIVE",
            "VERY_POSITIVE",
        ] {
            let sentiment = Sentiment::from_label(label).unwrap();
            assert_eq!(sentiment.label(), label);
        }
        assert!(Sentiment::from_label("MIXED").is_none());
        assert!(Sentiment::from_label("").is_none());
    }

    #[test]
    fn test_sentiment_ordering() {
        assert!(Sentiment::VeryNegative < Sentiment::Negative);
        assert!(Sentiment::Negative < Sentiment::Neutral);
        assert!(Sentiment::Neutral < Sentiment::Positive);
        assert!(Sentiment::Positive < Sentiment::VeryPositive);
    }

    #[test]
    fn test_saved_article_capture() {
        let article = NewsArticle {
            id: "article-1".to_string(),
            title: "Title".to_string(),
            summary: "Summary".to_string(),
            sentiment_label: "POSITIVE".to_string(),
            sentiment_explanation: "Upbeat tone".to_string(),
            url: "https://example.com/a".to_string(),
        };

        let saved = SavedArticle::capture("user-1", &article);
        assert_eq!(saved.user_id, "user-1");
        assert!(saved.id.is_empty());
        assert_eq!(saved.title, article.title);
        assert_eq!(saved.url, article.url);

        // The round trip carries the saved row id, not the source id.
        let mut saved = saved;
        saved.id = "row-9".to_string();
        let rendered = saved.to_article();
        assert_eq!(rendered.id, "row-9");
        assert_eq!(rendered.summary, article.summary);
    }

    #[test]
    fn test_default_preferences() {
        let prefs = UserPreferences::default();
        assert_eq!(prefs.language, "en");
        assert!(prefs.topics.is_empty());
        assert!(prefs.sources.is_empty());
    }
}
