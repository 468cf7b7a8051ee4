use super::{bytes_part, path_part};
use crate::builder::TaskBuilder;
use crate::error::Result;
use crate::types::{CreateTaskRequest, Task, UpdateTaskStatusRequest};
use crate::QalpuchClient;
use reqwest::{multipart, Method};
use serde::de::IgnoredAny;
use std::path::Path;

/// Task submission for users and the claim/report cycle for workers.
#[derive(Debug, Clone, Copy)]
pub struct Tasks<'a> {
    client: &'a QalpuchClient,
}

impl<'a> Tasks<'a> {
    pub(crate) fn new(client: &'a QalpuchClient) -> Self {
        Self { client }
    }

    /// Starts building a conversion task for `file_id`.
    pub fn build(&self, file_id: impl Into<String>) -> TaskBuilder<'a> {
        TaskBuilder::new(self.client, file_id)
    }

    /// Lists the tasks created by the current user.
    pub async fn list(&self) -> Result<Vec<Task>> {
        self.client.get("/tasks").await
    }

    /// Creates a task from an inline or predefined configuration.
    pub async fn create(&self, request: &CreateTaskRequest) -> Result<Task> {
        self.client.post("/tasks", request).await
    }

    pub async fn delete(&self, task_id: &str) -> Result<()> {
        self.client.delete(&format!("/tasks/{}", task_id)).await
    }

    /// Claims the next pending task for the authenticated worker.
    ///
    /// Returns `None` when the server has nothing to hand out. The server is
    /// responsible for never handing the same task to two workers.
    pub async fn pending(&self) -> Result<Option<Task>> {
        self.client
            .request::<(), Task>(Method::GET, "/tasks/pending", None)
            .await
    }

    /// Reports progress on a claimed task.
    pub async fn update_status(&self, task_id: &str, request: &UpdateTaskStatusRequest) -> Result<()> {
        self.client
            .send(Method::PATCH, &format!("/tasks/{}", task_id), Some(request))
            .await
    }

    /// Uploads the output of a completed task.
    pub async fn upload_result(&self, task_id: &str, file_name: &str, contents: impl Into<Vec<u8>>) -> Result<()> {
        let form = multipart::Form::new().part("file", bytes_part(file_name, contents.into())?);
        self.upload_result_form(task_id, form).await
    }

    /// Streams the output of a completed task from a local file.
    pub async fn upload_result_path<P: AsRef<Path>>(&self, task_id: &str, path: P) -> Result<()> {
        let form = multipart::Form::new().part("file", path_part(path.as_ref()).await?);
        self.upload_result_form(task_id, form).await
    }

    async fn upload_result_form(&self, task_id: &str, form: multipart::Form) -> Result<()> {
        self.client
            .request_multipart::<IgnoredAny>(&format!("/tasks/{}/result", task_id), form)
            .await?;
        Ok(())
    }
}
