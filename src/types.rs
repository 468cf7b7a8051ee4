use crate::conversion::TaskConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

/// (Internal) The uniform wrapper every API response uses.
///
/// `data` is kept as raw JSON so it can be decoded straight into the caller's
/// type once the envelope says the call succeeded.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<'a> {
    pub(crate) success: bool,
    #[serde(default)]
    pub(crate) message: Option<String>,
    #[serde(default, borrow)]
    pub(crate) data: Option<&'a RawValue>,
    #[serde(default)]
    pub(crate) error: Option<serde_json::Value>,
}

/// (Internal) The message fields of an error body, read without requiring
/// the rest of the envelope.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub(crate) message: Option<String>,
    #[serde(default)]
    pub(crate) error: Option<serde_json::Value>,
}

// --- Auth ---

#[derive(Serialize, Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Body for both logout and token refresh.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

/// The session issued by login, refresh and worker registration.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    /// The bearer token for subsequent calls.
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime of `token` in seconds, when the server reports it.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

// --- Users ---

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// An admin request to create a user.
#[derive(Serialize, Debug, Clone)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub role: String,
}

/// A partial update; unset fields are left unchanged.
#[derive(Serialize, Debug, Clone, Default)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

// --- Files ---

/// Metadata of a stored file.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct File {
    pub id: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub size: i64,
    #[serde(default, rename = "mimetype")]
    pub mime_type: String,
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Debug, Clone)]
pub(crate) struct RenameFileRequest<'a> {
    pub(crate) name: &'a str,
}

// --- Tasks ---

/// Represents the lifecycle state of a conversion task.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Waiting for a worker to claim it.
    #[default]
    Pending,
    /// Claimed by a worker and in progress.
    Processing,
    Completed,
    Failed,
}

/// A status transition recorded on a task.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct TaskLog {
    pub id: String,
    #[serde(default)]
    pub task_status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A conversion task as stored by the server.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Task {
    pub id: String,
    /// The stored configuration. Servers return either a JSON object or a
    /// JSON-encoded string; see [`Task::task_config`].
    #[serde(default)]
    pub config: serde_json::Value,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub source_file_id: String,
    #[serde(default)]
    pub result_file_id: Option<String>,
    #[serde(default)]
    pub logs: Vec<TaskLog>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Parses the stored configuration, if the task has one.
    pub fn task_config(&self) -> Option<Result<TaskConfig, serde_json::Error>> {
        parse_stored_config(&self.config)
    }
}

/// Where a new task takes its configuration from.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum TaskSource {
    /// An inline configuration.
    #[serde(rename = "config")]
    Config(TaskConfig),
    /// A server-stored configuration referenced by id.
    #[serde(rename = "predefinedTaskId")]
    Predefined(String),
}

/// Body of a task creation request.
///
/// The configuration source is either inline or predefined, never both:
///
/// ```json
/// { "file_id": "f1", "config": { "type": "image", "format": "png" } }
/// { "file_id": "f1", "predefinedTaskId": "p1" }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CreateTaskRequest {
    pub file_id: String,
    #[serde(flatten)]
    pub source: TaskSource,
}

impl CreateTaskRequest {
    pub fn with_config(file_id: impl Into<String>, config: impl Into<TaskConfig>) -> Self {
        Self {
            file_id: file_id.into(),
            source: TaskSource::Config(config.into()),
        }
    }

    pub fn from_predefined(file_id: impl Into<String>, predefined_task_id: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            source: TaskSource::Predefined(predefined_task_id.into()),
        }
    }
}

/// A worker's report on the progress of a claimed task.
#[derive(Serialize, Debug, Clone)]
pub struct UpdateTaskStatusRequest {
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
}

impl UpdateTaskStatusRequest {
    pub fn new(status: TaskStatus) -> Self {
        Self {
            status,
            status_message: None,
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.status_message = Some(message.into());
        self
    }
}

// --- Workers ---

/// The kinds of conversion a worker can perform.
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WorkerType {
    Video,
    Image,
    #[serde(alias = "music")]
    Audio,
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum WorkerStatus {
    Online,
    #[default]
    Offline,
    Busy,
    /// A status this SDK version does not know about.
    #[serde(other)]
    Unknown,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Worker {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// One-time provisioning token, only present right after creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default)]
    pub status: WorkerStatus,
    #[serde(default)]
    pub capabilities: Vec<WorkerType>,
    #[serde(default, rename = "userId")]
    pub user_id: i64,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Debug)]
pub(crate) struct CreateWorkerRequest<'a> {
    pub(crate) name: &'a str,
    pub(crate) capabilities: &'a [WorkerType],
}

#[derive(Serialize, Debug)]
pub(crate) struct RegisterWorkerRequest<'a> {
    pub(crate) token: &'a str,
}

// --- Predefined tasks ---

/// A reusable, server-stored task configuration.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PredefinedTask {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub config: serde_json::Value,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub admin_id: i64,
}

impl PredefinedTask {
    /// Parses the stored configuration, which the server may return as a
    /// JSON-encoded string or as an object.
    pub fn task_config(&self) -> Option<Result<TaskConfig, serde_json::Error>> {
        parse_stored_config(&self.config)
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct CreatePredefinedTaskRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub config: TaskConfig,
}

#[derive(Serialize, Debug, Clone, Default)]
pub struct UpdatePredefinedTaskRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<TaskConfig>,
}

fn parse_stored_config(raw: &serde_json::Value) -> Option<Result<TaskConfig, serde_json::Error>> {
    match raw {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) if s.is_empty() => None,
        serde_json::Value::String(s) => Some(serde_json::from_str(s)),
        other => Some(TaskConfig::deserialize(other)),
    }
}
