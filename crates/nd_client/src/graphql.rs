use std::fmt;

use nd_core::{Error, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

#[derive(Serialize)]
struct GraphqlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Deserialize)]
struct GraphqlEnvelope {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<GraphqlError>>,
}

/// Query/mutation transport for the backend's GraphQL endpoint. Every
/// request carries the caller's bearer token; the client holds no
/// credentials of its own.
pub struct GraphqlClient {
    http: Client,
    endpoint: Url,
}

impl GraphqlClient {
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: Client::new(),
            endpoint,
        }
    }

    pub async fn request<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
        access_token: &str,
    ) -> Result<T> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .header("Authorization", format!("Bearer {}", access_token))
            .json(&GraphqlRequest { query, variables })
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        decode(&body)
    }
}

impl fmt::Debug for GraphqlClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphqlClient")
            .field("http", &"<reqwest::Client>")
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

/// Decodes the `{data, errors}` envelope. Any reported error wins over
/// whatever partial data came with it.
pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    let envelope: GraphqlEnvelope = serde_json::from_str(body)?;

    if let Some(errors) = envelope.errors {
        if !errors.is_empty() {
            let message = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(Error::Api(message));
        }
    }

    let data = envelope
        .data
        .ok_or_else(|| Error::Api("response carried no data".to_string()))?;
    Ok(serde_json::from_value(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Payload {
        count: u32,
    }

    #[test]
    fn test_decode_data() {
        let body = r#"{"data": {"count": 3}}"#;
        let payload: Payload = decode(body).unwrap();
        assert_eq!(payload, Payload { count: 3 });
    }

    #[test]
    fn test_decode_errors_win_over_data() {
        let body = r#"{"data": {"count": 3}, "errors": [{"message": "denied"}, {"message": "again"}]}"#;
        let result: Result<Payload> = decode(body);
        match result {
            Err(Error::Api(message)) => assert_eq!(message, "denied; again"),
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_missing_data() {
        let result: Result<Payload> = decode("{}");
        assert!(matches!(result, Err(Error::Api(_))));
    }
}
