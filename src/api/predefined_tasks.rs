use crate::error::Result;
use crate::types::{CreatePredefinedTaskRequest, PredefinedTask, UpdatePredefinedTaskRequest};
use crate::QalpuchClient;

/// Admin-managed, reusable task configurations.
#[derive(Debug, Clone, Copy)]
pub struct PredefinedTasks<'a> {
    client: &'a QalpuchClient,
}

impl<'a> PredefinedTasks<'a> {
    pub(crate) fn new(client: &'a QalpuchClient) -> Self {
        Self { client }
    }

    pub async fn create(&self, request: &CreatePredefinedTaskRequest) -> Result<PredefinedTask> {
        self.client.post("/predefined-tasks", request).await
    }

    pub async fn list(&self) -> Result<Vec<PredefinedTask>> {
        self.client.get("/predefined-tasks").await
    }

    pub async fn get(&self, id: &str) -> Result<PredefinedTask> {
        self.client.get(&format!("/predefined-tasks/{}", id)).await
    }

    pub async fn update(&self, id: &str, request: &UpdatePredefinedTaskRequest) -> Result<PredefinedTask> {
        self.client
            .put(&format!("/predefined-tasks/{}", id), request)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(&format!("/predefined-tasks/{}", id)).await
    }
}
