//! Game configuration.

use std::time::Duration;

use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;

use crate::state::GameStateId;

/// Initial game configuration passed to [`crate::Host::new`] and [`crate::window::run`].
///
/// There's three ways to initialize the config:
///
/// # Example
///
/// ```rust
/// # use pixel_skeleton::Config;
/// Config {
///   title: "My Game".to_owned(),
///   ..Default::default()
/// };
/// ```
///
/// # Example
///
/// ```rust
/// # use pixel_skeleton::Config;
/// Config::default().with_title("My Game");
/// ```
///
/// # Example
///
/// ```rust
/// # use pixel_skeleton::Config;
/// let config = Config::from_toml_str("title = \"My Game\"").unwrap();
/// assert_eq!(config.title, "My Game");
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Amount of horizontal pixels for the buffer.
    ///
    /// Defaults to `320`.
    pub buffer_width: u32,
    /// Amount of vertical pixels for the buffer.
    ///
    /// Defaults to `180`.
    pub buffer_height: u32,
    /// Integer factor applied to the buffer size for the window size.
    ///
    /// Defaults to `4`.
    pub scaling: u32,
    /// Name in the title bar.
    ///
    /// Defaults to `"Game Title"`.
    pub title: String,
    /// Amount of fixed update ticks per second.
    ///
    /// Defaults to `60`.
    pub updates_per_second: u32,
    /// Maximum frame time that can be fed into the accumulator in a single iteration.
    ///
    /// When set, time above it is dropped after a long stall instead of being caught up.
    ///
    /// Defaults to `None`, every elapsed tick is executed.
    pub max_frame_time_secs: Option<f64>,
    /// Interval between FPS reports.
    ///
    /// Defaults to `1.0`.
    pub fps_report_interval_secs: f64,
    /// State that's active when the game starts.
    ///
    /// Defaults to [`GameStateId::Menu`].
    pub initial_state: GameStateId,
}

impl Config {
    /// Parse a config from a TOML string.
    ///
    /// Missing fields fall back to their default value.
    ///
    /// # Errors
    ///
    /// - When the string is not valid TOML or a field has the wrong type.
    /// - When the parsed values are invalid, see [`Config::validate`].
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;

        Ok(config)
    }

    /// Check that the values can be used to run the game loop.
    ///
    /// # Errors
    ///
    /// - When the buffer size, scaling or update rate is zero.
    /// - When one of the time values is not a positive number.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_width == 0 || self.buffer_height == 0 {
            return Err(ConfigError::EmptyBuffer {
                width: self.buffer_width,
                height: self.buffer_height,
            });
        }
        if self.scaling == 0 {
            return Err(ConfigError::Invalid("scaling must be at least 1"));
        }
        if self.updates_per_second == 0 {
            return Err(ConfigError::Invalid("updates_per_second must be at least 1"));
        }
        if self
            .max_frame_time_secs
            .is_some_and(|secs| !(secs.is_finite() && secs > 0.0))
        {
            return Err(ConfigError::Invalid("max_frame_time_secs must be positive"));
        }
        if !(self.fps_report_interval_secs.is_finite() && self.fps_report_interval_secs > 0.0) {
            return Err(ConfigError::Invalid(
                "fps_report_interval_secs must be positive",
            ));
        }

        Ok(())
    }

    /// Set the amount of pixels for the buffer.
    #[must_use]
    pub fn with_buffer_size(mut self, buffer_width: u32, buffer_height: u32) -> Self {
        self.buffer_width = buffer_width;
        self.buffer_height = buffer_height;

        self
    }

    /// Set the integer factor applied to the buffer size for the window size.
    #[must_use]
    pub fn with_scaling(mut self, scaling: u32) -> Self {
        self.scaling = scaling;

        self
    }

    /// Set the name in the title bar.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();

        self
    }

    /// Set the amount of fixed update ticks per second.
    #[must_use]
    pub fn with_updates_per_second(mut self, updates_per_second: u32) -> Self {
        self.updates_per_second = updates_per_second;

        self
    }

    /// Set the maximum frame time fed into the accumulator in a single iteration.
    #[must_use]
    pub fn with_max_frame_time_secs(mut self, max_frame_time_secs: f64) -> Self {
        self.max_frame_time_secs = Some(max_frame_time_secs);

        self
    }

    /// Set the interval between FPS reports.
    #[must_use]
    pub fn with_fps_report_interval_secs(mut self, fps_report_interval_secs: f64) -> Self {
        self.fps_report_interval_secs = fps_report_interval_secs;

        self
    }

    /// Set the state that's active when the game starts.
    #[must_use]
    pub fn with_initial_state(mut self, initial_state: GameStateId) -> Self {
        self.initial_state = initial_state;

        self
    }

    /// Duration of a single update tick.
    #[must_use]
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs(1) / self.updates_per_second.max(1)
    }

    /// Width of the window, the buffer width multiplied by the scaling.
    #[must_use]
    pub const fn window_width(&self) -> u32 {
        self.buffer_width * self.scaling
    }

    /// Height of the window, the buffer height multiplied by the scaling.
    #[must_use]
    pub const fn window_height(&self) -> u32 {
        self.buffer_height * self.scaling
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            buffer_width: 320,
            buffer_height: 180,
            scaling: 4,
            title: "Game Title".to_owned(),
            updates_per_second: 60,
            max_frame_time_secs: None,
            fps_report_interval_secs: 1.0,
            initial_state: GameStateId::Menu,
        }
    }
}

/// Reasons a config can't be used.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// Source is not a valid TOML config.
    #[error("Error parsing config")]
    #[diagnostic(code(pixel_skeleton::config::parse))]
    Parse(#[from] toml::de::Error),
    /// Buffer would not contain any pixels.
    #[error("Buffer size {width}x{height} contains no pixels")]
    #[diagnostic(code(pixel_skeleton::config::empty_buffer))]
    EmptyBuffer {
        /// Configured width.
        width: u32,
        /// Configured height.
        height: u32,
    },
    /// A value is out of range.
    #[error("Invalid config: {0}")]
    #[diagnostic(code(pixel_skeleton::config::invalid))]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{Config, ConfigError};
    use crate::state::GameStateId;

    #[test]
    fn defaults() {
        let config = Config::default();

        assert_eq!(config.buffer_width, 320);
        assert_eq!(config.buffer_height, 180);
        assert_eq!(config.scaling, 4);
        assert_eq!(config.window_width(), 1280);
        assert_eq!(config.window_height(), 720);
        assert_eq!(config.updates_per_second, 60);
        assert_eq!(config.title, "Game Title");
        assert_eq!(config.initial_state, GameStateId::Menu);
        assert_eq!(config.max_frame_time_secs, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn tick_duration() {
        let config = Config::default();
        assert_eq!(config.tick_duration(), Duration::from_nanos(16_666_666));

        let config = config.with_updates_per_second(50);
        assert_eq!(config.tick_duration(), Duration::from_millis(20));
    }

    #[test]
    fn toml_overrides_fields() {
        let config = Config::from_toml_str(
            r#"
            title = "Other"
            scaling = 2
            initial_state = "level1"
            max_frame_time_secs = 0.25
            "#,
        )
        .unwrap();

        assert_eq!(config.title, "Other");
        assert_eq!(config.scaling, 2);
        assert_eq!(config.initial_state, GameStateId::Level1);
        assert_eq!(config.max_frame_time_secs, Some(0.25));
        // Untouched fields keep their defaults
        assert_eq!(config.buffer_width, 320);
        assert_eq!(config.updates_per_second, 60);
    }

    #[test]
    fn toml_rejects_invalid_values() {
        assert!(matches!(
            Config::from_toml_str("buffer_width = 0"),
            Err(ConfigError::EmptyBuffer { width: 0, .. })
        ));
        assert!(matches!(
            Config::from_toml_str("updates_per_second = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_toml_str("max_frame_time_secs = -1.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_toml_str("scaling = \"big\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn builder() {
        let config = Config::default()
            .with_title("Builder")
            .with_buffer_size(64, 32)
            .with_scaling(2)
            .with_initial_state(GameStateId::Level1);

        assert_eq!(config.title, "Builder");
        assert_eq!(config.window_width(), 128);
        assert_eq!(config.window_height(), 64);
        assert_eq!(config.initial_state, GameStateId::Level1);
    }
}
