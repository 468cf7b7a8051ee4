//! An unofficial Rust SDK for the Qalpuch task-processing API.
//!
//! Users upload media files and submit conversion tasks (video, image,
//! audio); workers claim pending tasks, report progress and upload results.
//! Every call goes through one dispatcher that attaches the bearer token,
//! unwraps the API's `{ success, message, data, error }` envelope and
//! classifies failures into typed errors.
//!
//! ## Features
//! - Asynchronous API for users, files, tasks, workers and predefined tasks.
//! - A fluent [`TaskBuilder`] for polymorphic conversion settings.
//! - Typed errors that can be branched on by kind ([`ErrorKind`]).
//! - Cooperative cancellation through [`QalpuchClient::with_cancellation`].
//!
//! ## Example
//!
//! ```no_run
//! use qalpuch::{ImageConfig, ImageFormat, QalpuchClient};
//!
//! # #[tokio::main]
//! # async fn main() -> qalpuch::Result<()> {
//! let client = QalpuchClient::new_with_url("http://localhost:8080/v1", "")?;
//! let session = client.auth().login("user@example.com", "a-strong-password").await?;
//! client.set_token(session.token);
//!
//! let file = client.files().upload("cat.png", std::fs::read("cat.png")?).await?;
//! let task = client
//!     .tasks()
//!     .build(file.id)
//!     .with_image_config(ImageConfig::new().format(ImageFormat::Webp).quality(80))
//!     .execute()
//!     .await?;
//! println!("task {} is {:?}", task.id, task.status);
//! # Ok(())
//! # }
//! ```

pub mod api;
mod builder;
mod client;
mod conversion;
mod error;
mod types;

pub use builder::TaskBuilder;
pub use client::{ClientBuilder, QalpuchClient};
pub use conversion::{
    AudioCodec, AudioConfig, ImageConfig, ImageFormat, TaskConfig, VideoCodec, VideoConfig,
};
pub use error::{ApiError, ErrorKind, QalpuchError, Result};
pub use types::{
    AuthTokens, ChangePasswordRequest, CreatePredefinedTaskRequest, CreateTaskRequest,
    CreateUserRequest, File, LoginRequest, PredefinedTask, RefreshTokenRequest, RegisterRequest,
    Task, TaskLog, TaskSource, TaskStatus, UpdatePredefinedTaskRequest, UpdateTaskStatusRequest,
    UpdateUserRequest, User, Worker, WorkerStatus, WorkerType,
};

pub use tokio_util::sync::CancellationToken;
