//! Conversion settings attached to a task.
//!
//! A task carries exactly one [`TaskConfig`]. On the wire the variant is a
//! single flat object whose `type` field names the variant:
//!
//! ```json
//! { "type": "video", "codec": "h264", "bitrate": 1000 }
//! ```

use crate::error::{QalpuchError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static RESOLUTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[1-9][0-9]*x[1-9][0-9]*$").unwrap());

/// Video codecs accepted by the conversion workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoCodec {
    H264,
    Vp9,
    Av1,
}

/// Output formats for image conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Webp,
}

/// Audio codecs accepted by the conversion workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioCodec {
    Mp3,
    Aac,
    Opus,
}

/// Parameters for a video conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec: Option<VideoCodec>,
    /// Target bitrate in kbps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u32>,
    /// Frame size as `WIDTHxHEIGHT`, e.g. `1920x1080`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
}

impl VideoConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn codec(mut self, codec: VideoCodec) -> Self {
        self.codec = Some(codec);
        self
    }

    pub fn bitrate(mut self, kbps: u32) -> Self {
        self.bitrate = Some(kbps);
        self
    }

    pub fn resolution(mut self, resolution: impl Into<String>) -> Self {
        self.resolution = Some(resolution.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_positive("video bitrate", self.bitrate)?;
        if let Some(resolution) = &self.resolution {
            if !RESOLUTION_RE.is_match(resolution) {
                return Err(QalpuchError::InvalidConfig(format!(
                    "video resolution `{}` must look like 1920x1080",
                    resolution
                )));
            }
        }
        Ok(())
    }
}

/// Parameters for an image conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ImageFormat>,
    /// Encoder quality, 1 to 100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl ImageConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format(mut self, format: ImageFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn quality(mut self, quality: u8) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(quality) = self.quality {
            if !(1..=100).contains(&quality) {
                return Err(QalpuchError::InvalidConfig(format!(
                    "image quality must be between 1 and 100, got {}",
                    quality
                )));
            }
        }
        check_positive("image width", self.width)?;
        check_positive("image height", self.height)
    }
}

/// Parameters for an audio conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec: Option<AudioCodec>,
    /// Target bitrate in kbps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u32>,
}

impl AudioConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn codec(mut self, codec: AudioCodec) -> Self {
        self.codec = Some(codec);
        self
    }

    pub fn bitrate(mut self, kbps: u32) -> Self {
        self.bitrate = Some(kbps);
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_positive("audio bitrate", self.bitrate)
    }
}

/// One conversion configuration, tagged by media type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TaskConfig {
    Video(VideoConfig),
    Image(ImageConfig),
    /// Older servers tag this variant `"music"`.
    #[serde(alias = "music")]
    Audio(AudioConfig),
}

impl TaskConfig {
    /// The wire discriminant for this variant.
    pub fn type_tag(&self) -> &'static str {
        match self {
            TaskConfig::Video(_) => "video",
            TaskConfig::Image(_) => "image",
            TaskConfig::Audio(_) => "audio",
        }
    }

    /// Checks every field constraint of the wrapped configuration.
    pub fn validate(&self) -> Result<()> {
        match self {
            TaskConfig::Video(config) => config.validate(),
            TaskConfig::Image(config) => config.validate(),
            TaskConfig::Audio(config) => config.validate(),
        }
    }
}

impl From<VideoConfig> for TaskConfig {
    fn from(config: VideoConfig) -> Self {
        TaskConfig::Video(config)
    }
}

impl From<ImageConfig> for TaskConfig {
    fn from(config: ImageConfig) -> Self {
        TaskConfig::Image(config)
    }
}

impl From<AudioConfig> for TaskConfig {
    fn from(config: AudioConfig) -> Self {
        TaskConfig::Audio(config)
    }
}

fn check_positive(field: &str, value: Option<u32>) -> Result<()> {
    match value {
        Some(0) => Err(QalpuchError::InvalidConfig(format!(
            "{} must be greater than zero",
            field
        ))),
        _ => Ok(()),
    }
}
