use crate::error::Result;
use crate::types::{CreateUserRequest, UpdateUserRequest, User};
use crate::QalpuchClient;

/// User administration. The server restricts most of these to admins.
#[derive(Debug, Clone, Copy)]
pub struct Users<'a> {
    client: &'a QalpuchClient,
}

impl<'a> Users<'a> {
    pub(crate) fn new(client: &'a QalpuchClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        self.client.get("/users").await
    }

    pub async fn get(&self, id: i64) -> Result<User> {
        self.client.get(&format!("/users/{}", id)).await
    }

    /// The user the current token belongs to.
    pub async fn me(&self) -> Result<User> {
        self.client.get("/users/me").await
    }

    pub async fn create(&self, request: &CreateUserRequest) -> Result<User> {
        self.client.post("/users", request).await
    }

    pub async fn update(&self, id: i64, request: &UpdateUserRequest) -> Result<User> {
        self.client.put(&format!("/users/{}", id), request).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client.delete(&format!("/users/{}", id)).await
    }

    /// Deletes the account of the current token's user.
    pub async fn delete_me(&self) -> Result<()> {
        self.client.delete("/users/me").await
    }

    pub async fn search(&self, query: &str) -> Result<Vec<User>> {
        let query: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        self.client.get(&format!("/users/search?q={}", query)).await
    }
}
