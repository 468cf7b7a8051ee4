use crate::error::Result;
use crate::types::{
    AuthTokens, CreateWorkerRequest, RefreshTokenRequest, RegisterWorkerRequest, Worker, WorkerType,
};
use crate::QalpuchClient;

/// Worker provisioning and worker sessions.
///
/// A worker is created by an admin, which yields a one-time provisioning
/// token. The worker process then calls [`register`](Self::register) with
/// that token on an anonymous client to obtain its own session.
#[derive(Debug, Clone, Copy)]
pub struct Workers<'a> {
    client: &'a QalpuchClient,
}

impl<'a> Workers<'a> {
    pub(crate) fn new(client: &'a QalpuchClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Worker>> {
        self.client.get("/worker").await
    }

    pub async fn get(&self, worker_id: &str) -> Result<Worker> {
        self.client.get(&format!("/worker/{}", worker_id)).await
    }

    /// Creates a worker; the returned [`Worker::token`] is its provisioning token.
    pub async fn create(&self, name: &str, capabilities: &[WorkerType]) -> Result<Worker> {
        let request = CreateWorkerRequest { name, capabilities };
        self.client.post("/worker", &request).await
    }

    pub async fn delete(&self, worker_id: &str) -> Result<()> {
        self.client.delete(&format!("/worker/{}", worker_id)).await
    }

    /// Exchanges a provisioning token for a worker session.
    pub async fn register(&self, provisioning_token: &str) -> Result<AuthTokens> {
        let request = RegisterWorkerRequest {
            token: provisioning_token,
        };
        self.client.post("/worker/register", &request).await
    }

    pub async fn refresh_auth(&self, refresh_token: &str) -> Result<AuthTokens> {
        let request = RefreshTokenRequest {
            refresh_token: refresh_token.to_string(),
        };
        self.client.post("/worker/refresh-auth", &request).await
    }
}
