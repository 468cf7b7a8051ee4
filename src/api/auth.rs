use crate::error::Result;
use crate::types::{
    AuthTokens, ChangePasswordRequest, LoginRequest, RefreshTokenRequest, RegisterRequest, User,
};
use crate::QalpuchClient;
use reqwest::Method;

/// Session management: login, registration and token refresh.
///
/// None of these calls touch the client's token; store the returned
/// [`AuthTokens::token`] with [`QalpuchClient::set_token`] when appropriate.
#[derive(Debug, Clone, Copy)]
pub struct Auth<'a> {
    client: &'a QalpuchClient,
}

impl<'a> Auth<'a> {
    pub(crate) fn new(client: &'a QalpuchClient) -> Self {
        Self { client }
    }

    /// Exchanges credentials for a session.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthTokens> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.client.post("/login", &request).await
    }

    /// Creates an account and returns the new user.
    pub async fn register(&self, request: &RegisterRequest) -> Result<User> {
        self.client.post("/register", request).await
    }

    /// Invalidates the session tied to `refresh_token`.
    pub async fn logout(&self, refresh_token: &str) -> Result<()> {
        let request = RefreshTokenRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.client.send(Method::POST, "/logout", Some(&request)).await
    }

    pub async fn change_password(&self, old_password: &str, new_password: &str) -> Result<()> {
        let request = ChangePasswordRequest {
            old_password: old_password.to_string(),
            new_password: new_password.to_string(),
        };
        self.client
            .send(Method::POST, "/change-password", Some(&request))
            .await
    }

    /// Trades a refresh token for a fresh session.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthTokens> {
        let request = RefreshTokenRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.client.post("/refresh", &request).await
    }
}
