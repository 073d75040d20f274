//! Monitor configuration and fail-fast validation.

use serde::{Deserialize, Serialize};

use invigil_common::error::InvigilError;
use invigil_model::{AnnotationColor, ImageEncoding, InvalidColor, UnsupportedEncoding};

/// Lowest allowed sampling rate in Hz.
pub const MIN_SAMPLING_RATE_HZ: u32 = 1;
/// Highest allowed sampling rate in Hz.
pub const MAX_SAMPLING_RATE_HZ: u32 = 5;
/// Lowest allowed gaze sensitivity in percent.
pub const MIN_GAZE_SENSITIVITY: u32 = 5;
/// Highest allowed gaze sensitivity in percent.
pub const MAX_GAZE_SENSITIVITY: u32 = 60;

/// Monitor configuration.
///
/// Immutable once the monitor is constructed. `validate` runs synchronously
/// before any async work; any failure aborts construction entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Frames sampled per second (1-5).
    pub sampling_rate_hz: u32,

    /// Snapshot encoding.
    pub image_encoding: ImageEncoding,

    /// Stroke/label color for snapshot annotations.
    pub annotation_color: AnnotationColor,

    /// Looking-away sensitivity as a fraction of the confidence range,
    /// in percent (5-60).
    pub gaze_sensitivity_percent: u32,

    /// Queue events and deliver them in flush batches instead of
    /// immediately.
    pub queueing_enabled: bool,

    /// Flush period in seconds; required and positive when queueing is
    /// enabled.
    pub queue_flush_period_secs: Option<u64>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            sampling_rate_hz: 3,
            image_encoding: ImageEncoding::Jpeg,
            annotation_color: AnnotationColor::default(),
            gaze_sensitivity_percent: 25,
            queueing_enabled: false,
            queue_flush_period_secs: None,
        }
    }
}

/// Validation failures, one variant per rejected field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("sampling rate must be {MIN_SAMPLING_RATE_HZ}-{MAX_SAMPLING_RATE_HZ} Hz, got {0}")]
    SamplingRateOutOfRange(u32),

    #[error(
        "gaze sensitivity must be {MIN_GAZE_SENSITIVITY}-{MAX_GAZE_SENSITIVITY} percent, got {0}"
    )]
    GazeSensitivityOutOfRange(u32),

    #[error("unsupported image encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("invalid annotation color: {0}")]
    InvalidAnnotationColor(String),

    #[error("queue flush period must be a positive number of seconds when queueing is enabled")]
    MissingFlushPeriod,
}

impl From<UnsupportedEncoding> for ConfigError {
    fn from(err: UnsupportedEncoding) -> Self {
        Self::UnsupportedEncoding(err.0)
    }
}

impl From<InvalidColor> for ConfigError {
    fn from(err: InvalidColor) -> Self {
        Self::InvalidAnnotationColor(err.0)
    }
}

impl From<ConfigError> for InvigilError {
    fn from(err: ConfigError) -> Self {
        InvigilError::config(err.to_string())
    }
}

impl MonitorConfig {
    /// Build a config from raw option values, as a host UI would supply
    /// them. Parses the encoding and color names, then validates.
    pub fn from_options(
        sampling_rate_hz: u32,
        image_encoding: &str,
        annotation_color: &str,
        gaze_sensitivity_percent: u32,
        queueing_enabled: bool,
        queue_flush_period_secs: Option<u64>,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            sampling_rate_hz,
            image_encoding: image_encoding.parse::<ImageEncoding>()?,
            annotation_color: annotation_color.parse::<AnnotationColor>()?,
            gaze_sensitivity_percent,
            queueing_enabled,
            queue_flush_period_secs,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate every field. Any failure aborts monitor construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_SAMPLING_RATE_HZ..=MAX_SAMPLING_RATE_HZ).contains(&self.sampling_rate_hz) {
            return Err(ConfigError::SamplingRateOutOfRange(self.sampling_rate_hz));
        }
        if !(MIN_GAZE_SENSITIVITY..=MAX_GAZE_SENSITIVITY).contains(&self.gaze_sensitivity_percent)
        {
            return Err(ConfigError::GazeSensitivityOutOfRange(
                self.gaze_sensitivity_percent,
            ));
        }
        if self.queueing_enabled && !self.queue_flush_period_secs.is_some_and(|secs| secs > 0) {
            return Err(ConfigError::MissingFlushPeriod);
        }
        Ok(())
    }

    /// Gaze sensitivity as a minimum landmark confidence in [0, 1].
    pub fn min_gaze_confidence(&self) -> f32 {
        self.gaze_sensitivity_percent as f32 / 100.0
    }
}
