//! Fluent construction of conversion tasks.

use crate::conversion::{AudioConfig, ImageConfig, TaskConfig, VideoConfig};
use crate::error::{QalpuchError, Result};
use crate::types::{CreateTaskRequest, Task};
use crate::QalpuchClient;

#[derive(Debug)]
enum BuilderState {
    Empty,
    Configured(TaskConfig),
    /// A setter rejected its input; later setters are ignored.
    Errored(QalpuchError),
}

/// Builds a task for one file and submits it with [`execute`](Self::execute).
///
/// Setters never fail on the spot. An invalid configuration is remembered and
/// reported by `execute`, so the whole chain can be written without
/// intermediate error checks. The variant's `type` tag always follows the
/// setter used. Calling a second setter replaces the first configuration.
///
/// ```no_run
/// # use qalpuch::{QalpuchClient, VideoConfig, VideoCodec};
/// # async fn example(client: &QalpuchClient) -> qalpuch::Result<()> {
/// let task = client
///     .tasks()
///     .build("file-id")
///     .with_video_config(VideoConfig::new().codec(VideoCodec::H264).bitrate(1000))
///     .execute()
///     .await?;
/// println!("created task {}", task.id);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
#[must_use = "a task builder does nothing until `execute` is awaited"]
pub struct TaskBuilder<'a> {
    client: &'a QalpuchClient,
    file_id: String,
    state: BuilderState,
}

impl<'a> TaskBuilder<'a> {
    pub(crate) fn new(client: &'a QalpuchClient, file_id: impl Into<String>) -> Self {
        Self {
            client,
            file_id: file_id.into(),
            state: BuilderState::Empty,
        }
    }

    pub fn file_id(&self) -> &str {
        &self.file_id
    }

    pub fn with_video_config(self, config: VideoConfig) -> Self {
        self.with_config(TaskConfig::Video(config))
    }

    pub fn with_image_config(self, config: ImageConfig) -> Self {
        self.with_config(TaskConfig::Image(config))
    }

    pub fn with_audio_config(self, config: AudioConfig) -> Self {
        self.with_config(TaskConfig::Audio(config))
    }

    /// Attaches any configuration variant, replacing a previous one.
    pub fn with_config(mut self, config: TaskConfig) -> Self {
        if let BuilderState::Errored(_) = self.state {
            return self;
        }
        self.state = match config.validate() {
            Ok(()) => BuilderState::Configured(config),
            Err(err) => BuilderState::Errored(err),
        };
        self
    }

    /// The configuration that `execute` would submit, if any.
    pub fn config(&self) -> Option<&TaskConfig> {
        match &self.state {
            BuilderState::Configured(config) => Some(config),
            _ => None,
        }
    }

    /// Submits the task, consuming the builder.
    ///
    /// # Errors
    ///
    /// - `QalpuchError::IncompleteConfig` if no configuration was attached;
    ///   no request is sent.
    /// - The error latched by a rejected setter; no request is sent.
    /// - Any error of the task creation call, unchanged.
    pub async fn execute(self) -> Result<Task> {
        let config = match self.state {
            BuilderState::Empty => return Err(QalpuchError::IncompleteConfig),
            BuilderState::Errored(err) => return Err(err),
            BuilderState::Configured(config) => config,
        };
        let request = CreateTaskRequest::with_config(self.file_id, config);
        self.client.tasks().create(&request).await
    }
}
