use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nd_core::{
    Error, NewsArticle, Result, SavedArticle, Session, SignUpOutcome, User, UserPreferences,
};
use tokio::sync::RwLock;

use crate::articles::{ArticleScope, NewsApi};
use crate::auth::AuthProvider;

struct Account {
    id: String,
    email: String,
    password: String,
}

struct ProcessedRow {
    user_id: String,
    article: NewsArticle,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct State {
    accounts: Vec<Account>,
    // access token -> user id, for tokens this backend issued
    tokens: HashMap<String, String>,
    processed: Vec<ProcessedRow>,
    saved: Vec<SavedArticle>,
    preferences: HashMap<String, (String, UserPreferences)>,
}

/// In-memory stand-in for the remote backend: identity provider and
/// news API in one. Backs the default CLI mode and the behavioral
/// tests; state lives for the process only.
#[derive(Default)]
pub struct MemoryBackend {
    state: RwLock<State>,
    require_verification: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes sign-up report that email verification is pending instead
    /// of returning a session.
    pub fn with_verification_required(mut self) -> Self {
        self.require_verification = true;
        self
    }

    pub async fn seed_account(&self, email: &str, password: &str) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        let mut state = self.state.write().await;
        state.accounts.push(Account {
            id: id.clone(),
            email: email.to_string(),
            password: password.to_string(),
        });
        id
    }

    pub async fn seed_article(&self, user_id: &str, article: NewsArticle) {
        let mut state = self.state.write().await;
        let created_at = Utc::now()
            + chrono::Duration::milliseconds(state.processed.len() as i64);
        state.processed.push(ProcessedRow {
            user_id: user_id.to_string(),
            article,
            created_at,
        });
    }

    async fn authorize(&self, access_token: &str, user_id: &str) -> Result<()> {
        let state = self.state.read().await;
        match state.tokens.get(access_token) {
            Some(owner) if owner == user_id => Ok(()),
            _ => Err(Error::Auth("Invalid or expired access token".to_string())),
        }
    }

    async fn issue_session(&self, account_id: &str, email: &str) -> Session {
        let access_token = uuid::Uuid::new_v4().to_string();
        let mut state = self.state.write().await;
        state
            .tokens
            .insert(access_token.clone(), account_id.to_string());
        Session {
            access_token,
            refresh_token: Some(uuid::Uuid::new_v4().to_string()),
            user: User {
                id: account_id.to_string(),
                email: email.to_string(),
            },
        }
    }
}

#[async_trait]
impl AuthProvider for MemoryBackend {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let account = {
            let state = self.state.read().await;
            state
                .accounts
                .iter()
                .find(|a| a.email == email && a.password == password)
                .map(|a| (a.id.clone(), a.email.clone()))
        };
        match account {
            Some((id, email)) => Ok(self.issue_session(&id, &email).await),
            None => Err(Error::Auth("Incorrect email or password".to_string())),
        }
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome> {
        {
            let mut state = self.state.write().await;
            if state.accounts.iter().any(|a| a.email == email) {
                return Err(Error::Auth("Email already in use".to_string()));
            }
            state.accounts.push(Account {
                id: uuid::Uuid::new_v4().to_string(),
                email: email.to_string(),
                password: password.to_string(),
            });
        }

        if self.require_verification {
            return Ok(SignUpOutcome::VerificationRequired);
        }
        let session = self.sign_in(email, password).await?;
        Ok(SignUpOutcome::SignedIn(session))
    }

    async fn sign_out(&self, session: &Session) -> Result<()> {
        let mut state = self.state.write().await;
        state.tokens.remove(&session.access_token);
        Ok(())
    }
}

#[async_trait]
impl NewsApi for MemoryBackend {
    async fn fetch_articles(
        &self,
        access_token: &str,
        user_id: &str,
        scope: ArticleScope,
    ) -> Result<Vec<NewsArticle>> {
        self.authorize(access_token, user_id).await?;
        let state = self.state.read().await;
        let mut rows: Vec<&ProcessedRow> = state
            .processed
            .iter()
            .filter(|row| row.user_id == user_id)
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let articles = rows.into_iter().map(|row| row.article.clone());
        Ok(match scope {
            ArticleScope::Recent(limit) => articles.take(limit).collect(),
            ArticleScope::All => articles.collect(),
        })
    }

    async fn save_article(
        &self,
        access_token: &str,
        user_id: &str,
        article: &NewsArticle,
    ) -> Result<String> {
        self.authorize(access_token, user_id).await?;
        let mut row = SavedArticle::capture(user_id, article);
        row.id = uuid::Uuid::new_v4().to_string();
        let id = row.id.clone();
        self.state.write().await.saved.push(row);
        Ok(id)
    }

    async fn saved_articles(
        &self,
        access_token: &str,
        user_id: &str,
    ) -> Result<Vec<NewsArticle>> {
        self.authorize(access_token, user_id).await?;
        let state = self.state.read().await;
        Ok(state
            .saved
            .iter()
            .filter(|row| row.user_id == user_id)
            .map(|row| row.to_article())
            .collect())
    }

    async fn update_preferences(
        &self,
        access_token: &str,
        user_id: &str,
        preferences: &UserPreferences,
    ) -> Result<String> {
        self.authorize(access_token, user_id).await?;
        let mut state = self.state.write().await;
        let entry = state
            .preferences
            .entry(user_id.to_string())
            .or_insert_with(|| {
                (uuid::Uuid::new_v4().to_string(), UserPreferences::default())
            });
        entry.1 = preferences.clone();
        Ok(entry.0.clone())
    }
}
