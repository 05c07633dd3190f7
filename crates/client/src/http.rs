//! `reqwest` implementations of the client network seams.

use crate::error::{ClientError, ClientResult};
use crate::registration::{CreateUserResponse, UserApi};
use api_shared::{CreateUserFailure, CreateUserReq, CreateUserRes};
use async_trait::async_trait;

/// Talks to the Eazydoc REST API at `base_url`.
#[derive(Clone, Debug)]
pub struct HttpUserApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpUserApi {
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBaseUrl`] unless `base_url` is an http(s) URL.
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> ClientResult<Self> {
        let base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidBaseUrl(base_url));
        }
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn user_endpoint(&self) -> String {
        format!("{}/api/user", self.base_url)
    }
}

#[async_trait]
impl UserApi for HttpUserApi {
    async fn create_user(&self, req: &CreateUserReq) -> ClientResult<CreateUserResponse> {
        let resp = self
            .client
            .post(self.user_endpoint())
            .json(req)
            .send()
            .await?;

        let status = resp.status();
        let bytes = resp.bytes().await?;
        if status.is_success() {
            return decode_created(&bytes).map(CreateUserResponse::Created);
        }

        // Error bodies are not always JSON; an unreadable one falls back to no message.
        let body = serde_json::from_slice::<CreateUserFailure>(&bytes).unwrap_or_default();
        Ok(CreateUserResponse::Failed {
            status: status.as_u16(),
            body,
        })
    }
}

/// A 2xx body must be a full `CreateUserRes`.
fn decode_created(bytes: &[u8]) -> ClientResult<CreateUserRes> {
    Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_body_decodes() {
        let body = br#"{"message":"User created successfully","user":{"id":"u1","name":"Jane","email":"jane@example.com","role":"patient"}}"#;
        let res = decode_created(body).expect("valid body");
        assert_eq!(res.user.id, "u1");
    }

    #[test]
    fn malformed_success_body_is_a_decode_error() {
        assert!(matches!(
            decode_created(b"<html>ok</html>"),
            Err(ClientError::Decode(_))
        ));
        assert!(matches!(
            decode_created(br#"{"message":"User created successfully"}"#),
            Err(ClientError::Decode(_))
        ));
    }

    #[test]
    fn endpoint_is_joined_without_double_slash() {
        let api = HttpUserApi::new("http://localhost:3000/").expect("valid url");
        assert_eq!(api.user_endpoint(), "http://localhost:3000/api/user");
    }

    #[test]
    fn rejects_non_http_base() {
        assert!(matches!(
            HttpUserApi::new("localhost:3000"),
            Err(ClientError::InvalidBaseUrl(_))
        ));
    }
}
