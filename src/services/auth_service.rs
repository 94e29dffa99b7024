use std::time::Duration;

use reqwest::StatusCode;
use serde::{ Deserialize, Serialize };
use serde_json::{ json, Value };

use crate::error::{ AppError, Result };

/// Thin client for the hosted auth provider (Supabase GoTrue).
///
/// Sessions, tokens and row-level security stay with the provider; this
/// service only shapes requests and relays responses.
pub struct AuthService {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub phone_number: Option<String>,
    pub profile_picture: Option<String>,
}

impl SignUpRequest {
    /// Profile fields travel as user metadata under the provider's `data` key.
    pub fn to_provider_body(&self) -> Value {
        json!({
            "email": self.email,
            "password": self.password,
            "data": {
                "Name": self.name,
                "Surname": self.surname,
                "Phone_Number": self.phone_number,
                "Profile_Picture": self.profile_picture,
            }
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoverRequest {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Pull a human readable message out of a provider error body.
pub fn provider_error_message(status: StatusCode, body: &Value) -> String {
    ["msg", "error_description", "message", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("Auth provider returned status {}", status))
}

impl AuthService {
    pub fn new(base_url: &str, anon_key: &str) -> Result<Self> {
        let client = reqwest::Client
            ::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build auth client: {}", e)))?;

        Ok(Self {
            client,
            base_url: format!("{}/auth/v1", base_url.trim_end_matches('/')),
            anon_key: anon_key.to_string(),
        })
    }

    fn request(&self, method: reqwest::Method, path: &str, token: Option<&str>) -> reqwest::RequestBuilder {
        let builder = self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header("apikey", &self.anon_key);

        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder.bearer_auth(&self.anon_key),
        }
    }

    async fn relay(&self, builder: reqwest::RequestBuilder) -> Result<Value> {
        let response = builder
            .send().await
            .map_err(|e| AppError::External(format!("Auth provider request failed: {}", e)))?;

        let status = response.status();
        let bytes = response.bytes().await?;
        let body: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).to_string())
            })
        };

        if status.is_success() {
            return Ok(body);
        }

        if status == StatusCode::UNAUTHORIZED {
            return Err(AppError::Unauthorized);
        }

        Err(AppError::Auth(provider_error_message(status, &body)))
    }

    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<Value> {
        let builder = self
            .request(reqwest::Method::POST, "/signup", None)
            .json(&request.to_provider_body());
        let body = self.relay(builder).await?;
        tracing::info!("sign-up submitted for {}", request.email);
        Ok(body)
    }

    pub async fn sign_in(&self, credentials: &Credentials) -> Result<Value> {
        let builder = self
            .request(reqwest::Method::POST, "/token?grant_type=password", None)
            .json(credentials);
        self.relay(builder).await
    }

    /// Send a password-reset email.
    pub async fn recover(&self, request: &RecoverRequest) -> Result<Value> {
        let mut path = "/recover".to_string();
        if let Some(redirect_to) = &request.redirect_to {
            path.push_str(&format!("?redirect_to={}", urlencoding::encode(redirect_to)));
        }

        let builder = self
            .request(reqwest::Method::POST, &path, None)
            .json(&json!({ "email": request.email }));
        self.relay(builder).await
    }

    pub async fn get_user(&self, token: &str) -> Result<Value> {
        self.relay(self.request(reqwest::Method::GET, "/user", Some(token))).await
    }

    pub async fn update_user(&self, token: &str, update: &UserUpdateRequest) -> Result<Value> {
        let builder = self.request(reqwest::Method::PUT, "/user", Some(token)).json(update);
        self.relay(builder).await
    }

    pub async fn sign_out(&self, token: &str) -> Result<()> {
        self.relay(self.request(reqwest::Method::POST, "/logout", Some(token))).await?;
        Ok(())
    }
}
