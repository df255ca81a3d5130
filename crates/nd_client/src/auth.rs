use std::fmt;

use async_trait::async_trait;
use nd_core::{Error, Result, Session, SignUpOutcome, User};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

/// Identity-provider operations. Error messages are surfaced to the
/// user verbatim, so implementations should keep them presentable.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome>;

    async fn sign_out(&self, session: &Session) -> Result<()>;
}

#[derive(Serialize)]
struct CredentialsRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct WireUser {
    id: String,
    email: String,
}

#[derive(Deserialize)]
struct WireSession {
    #[serde(rename = "accessToken")]
    access_token: String,
    #[serde(rename = "refreshToken")]
    refresh_token: Option<String>,
    user: WireUser,
}

#[derive(Deserialize)]
struct SessionResponse {
    // Null on sign-up when the provider wants email verification first.
    session: Option<WireSession>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    message: String,
}

impl From<WireSession> for Session {
    fn from(wire: WireSession) -> Self {
        Session {
            access_token: wire.access_token,
            refresh_token: wire.refresh_token,
            user: User {
                id: wire.user.id,
                email: wire.user.email,
            },
        }
    }
}

/// HTTP identity provider speaking email/password endpoints under a
/// single auth base URL.
pub struct HttpAuthProvider {
    http: Client,
    base_url: Url,
}

impl HttpAuthProvider {
    pub fn new(base_url: Url) -> Self {
        Self {
            http: Client::new(),
            base_url,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", path, e)))
    }

    async fn post_credentials(
        &self,
        path: &str,
        email: &str,
        password: &str,
    ) -> Result<SessionResponse> {
        let response = self
            .http
            .post(self.endpoint(path)?)
            .json(&CredentialsRequest { email, password })
            .send()
            .await?;

        if !response.status().is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|e| e.message)
                .unwrap_or_else(|_| "Authentication failed".to_string());
            return Err(Error::Auth(message));
        }

        Ok(response.json().await?)
    }
}

impl fmt::Debug for HttpAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpAuthProvider")
            .field("http", &"<reqwest::Client>")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

#[async_trait]
impl AuthProvider for HttpAuthProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let response = self
            .post_credentials("signin/email-password", email, password)
            .await?;
        let session = response
            .session
            .ok_or_else(|| Error::Auth("No session returned by the provider".to_string()))?;
        Ok(session.into())
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome> {
        let response = self
            .post_credentials("signup/email-password", email, password)
            .await?;
        Ok(match response.session {
            Some(session) => SignUpOutcome::SignedIn(session.into()),
            None => SignUpOutcome::VerificationRequired,
        })
    }

    async fn sign_out(&self, session: &Session) -> Result<()> {
        self.http
            .post(self.endpoint("signout")?)
            .header("Authorization", format!("Bearer {}", session.access_token))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
