use async_trait::async_trait;
use nd_core::{NewsArticle, Result, UserPreferences};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::graphql::GraphqlClient;

/// Which slice of the user's processed articles to fetch. One
/// parameterized operation with a single response shape covers both
/// the initial load and the post-preferences reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleScope {
    /// Newest first, at most this many. The initial load uses 10.
    Recent(usize),
    /// Everything processed for the user, newest first.
    All,
}

/// The backend's query/mutation surface, as the client consumes it.
/// Callers pass the bearer token they read from the session store
/// right before the call.
#[async_trait]
pub trait NewsApi: Send + Sync {
    async fn fetch_articles(
        &self,
        access_token: &str,
        user_id: &str,
        scope: ArticleScope,
    ) -> Result<Vec<NewsArticle>>;

    /// Inserts a denormalized copy of the article for the user and
    /// returns the new row id.
    async fn save_article(
        &self,
        access_token: &str,
        user_id: &str,
        article: &NewsArticle,
    ) -> Result<String>;

    async fn saved_articles(&self, access_token: &str, user_id: &str)
        -> Result<Vec<NewsArticle>>;

    /// Upsert keyed on user identity; returns the preferences row id.
    async fn update_preferences(
        &self,
        access_token: &str,
        user_id: &str,
        preferences: &UserPreferences,
    ) -> Result<String>;
}

const PROCESSED_ARTICLES_QUERY: &str = r#"
query ProcessedArticles($userId: uuid!, $limit: Int) {
  processed_articles(
    where: { user_id: { _eq: $userId } },
    order_by: { created_at: desc },
    limit: $limit
  ) {
    id
    title
    summary
    sentiment_label
    sentiment_explanation
    url
  }
}"#;

const SAVE_ARTICLE_MUTATION: &str = r#"
mutation SaveArticle(
  $userId: uuid!,
  $title: String!,
  $summary: String!,
  $sentiment_label: String!,
  $sentiment_explanation: String!,
  $url: String!
) {
  insert_saved_articles_one(object: {
    user_id: $userId,
    title: $title,
    summary: $summary,
    sentiment_label: $sentiment_label,
    sentiment_explanation: $sentiment_explanation,
    url: $url
  }) {
    id
  }
}"#;

const UPDATE_PREFERENCES_MUTATION: &str = r#"
mutation UpdatePreferences(
  $userId: uuid!,
  $topics: String!,
  $sources: String!,
  $language: String!
) {
  insert_user_preferences_one(
    object: {
      user_id: $userId,
      topics: $topics,
      sources: $sources,
      language: $language
    }
    on_conflict: {
      constraint: user_preferences_user_id_key
      update_columns: [topics, sources, language]
    }
  ) {
    id
  }
}"#;

const SAVED_ARTICLES_QUERY: &str = r#"
query GetSavedArticles($userId: uuid!) {
  saved_articles(where: { user_id: { _eq: $userId } }) {
    id
    title
    summary
    sentiment_label
    sentiment_explanation
    url
  }
}"#;

#[derive(Deserialize)]
struct ProcessedArticlesData {
    processed_articles: Vec<NewsArticle>,
}

#[derive(Deserialize)]
struct SavedArticlesData {
    saved_articles: Vec<NewsArticle>,
}

#[derive(Deserialize)]
struct IdRow {
    id: String,
}

#[derive(Deserialize)]
struct SaveArticleData {
    insert_saved_articles_one: IdRow,
}

#[derive(Deserialize)]
struct UpdatePreferencesData {
    insert_user_preferences_one: IdRow,
}

/// GraphQL-backed implementation of [`NewsApi`].
#[derive(Debug)]
pub struct GraphqlNewsApi {
    client: GraphqlClient,
}

impl GraphqlNewsApi {
    pub fn new(client: GraphqlClient) -> Self {
        Self { client }
    }

    fn scope_limit(scope: ArticleScope) -> Value {
        match scope {
            ArticleScope::Recent(limit) => json!(limit),
            ArticleScope::All => Value::Null,
        }
    }
}

#[async_trait]
impl NewsApi for GraphqlNewsApi {
    async fn fetch_articles(
        &self,
        access_token: &str,
        user_id: &str,
        scope: ArticleScope,
    ) -> Result<Vec<NewsArticle>> {
        let variables = json!({
            "userId": user_id,
            "limit": Self::scope_limit(scope),
        });
        let data: ProcessedArticlesData = self
            .client
            .request(PROCESSED_ARTICLES_QUERY, variables, access_token)
            .await?;
        Ok(data.processed_articles)
    }

    async fn save_article(
        &self,
        access_token: &str,
        user_id: &str,
        article: &NewsArticle,
    ) -> Result<String> {
        let variables = json!({
            "userId": user_id,
            "title": article.title,
            "summary": article.summary,
            "sentiment_label": article.sentiment_label,
            "sentiment_explanation": article.sentiment_explanation,
            "url": article.url,
        });
        let data: SaveArticleData = self
            .client
            .request(SAVE_ARTICLE_MUTATION, variables, access_token)
            .await?;
        Ok(data.insert_saved_articles_one.id)
    }

    async fn saved_articles(
        &self,
        access_token: &str,
        user_id: &str,
    ) -> Result<Vec<NewsArticle>> {
        let variables = json!({ "userId": user_id });
        let data: SavedArticlesData = self
            .client
            .request(SAVED_ARTICLES_QUERY, variables, access_token)
            .await?;
        Ok(data.saved_articles)
    }

    async fn update_preferences(
        &self,
        access_token: &str,
        user_id: &str,
        preferences: &UserPreferences,
    ) -> Result<String> {
        let variables = json!({
            "userId": user_id,
            "topics": preferences.topics,
            "sources": preferences.sources,
            "language": preferences.language,
        });
        let data: UpdatePreferencesData = self
            .client
            .request(UPDATE_PREFERENCES_MUTATION, variables, access_token)
            .await?;
        Ok(data.insert_user_preferences_one.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_limit_variable() {
        assert_eq!(GraphqlNewsApi::scope_limit(ArticleScope::Recent(10)), json!(10));
        assert_eq!(GraphqlNewsApi::scope_limit(ArticleScope::All), Value::Null);
    }
}
