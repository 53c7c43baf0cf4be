//! Game states and switching between them.

mod level1;
mod manager;
mod menu;

use std::fmt::{Display, Formatter};

use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;

pub use level1::Level1State;
pub use manager::StateManager;
pub use menu::MenuState;

use crate::canvas::Canvas;

/// A single mode of the game, such as a menu or a level.
///
/// Only one state is active at a time, the [`StateManager`] routes the update and render ticks to it.
///
/// # Example
///
/// ```
/// use pixel_skeleton::{canvas::Canvas, state::{State, StateError}, RGBA8};
///
/// struct Blink {
///     on: bool,
/// }
///
/// impl State for Blink {
///     fn update(&mut self) -> Result<(), StateError> {
///         self.on = !self.on;
///
///         Ok(())
///     }
///
///     fn render(&mut self, canvas: &mut Canvas<'_>) -> Result<(), StateError> {
///         if self.on {
///             canvas.set_pixel(0, 0, RGBA8::new(255, 255, 255, 255));
///         }
///
///         Ok(())
///     }
/// }
/// ```
pub trait State: Send {
    /// Advance the state a single fixed tick.
    ///
    /// # Errors
    ///
    /// - When the state can't advance, the error is logged and the game loop continues with the next tick.
    fn update(&mut self) -> Result<(), StateError>;

    /// Draw the current state on the canvas.
    ///
    /// The canvas is cleared to opaque black before this is called.
    ///
    /// # Arguments
    ///
    /// * `canvas` - Pixel buffer to draw on, can't be resized.
    ///
    /// # Errors
    ///
    /// - When the state can't be drawn, the error is logged and the game loop continues with the next tick.
    fn render(&mut self, canvas: &mut Canvas<'_>) -> Result<(), StateError>;

    /// Called when this state becomes the active state.
    #[inline(always)]
    fn on_enter(&mut self) {}

    /// Called when another state becomes the active state.
    #[inline(always)]
    fn on_exit(&mut self) {}

    /// Name used in log messages.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Which state is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStateId {
    /// Main menu.
    #[default]
    Menu,
    /// First level.
    Level1,
}

impl Display for GameStateId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Menu => f.write_str("menu"),
            Self::Level1 => f.write_str("level1"),
        }
    }
}

/// Recoverable failure of a single state tick.
#[derive(Debug, Error, Diagnostic)]
pub enum StateError {
    /// Something the state depends on is not available yet.
    #[error("Resource '{0}' is unavailable")]
    #[diagnostic(code(pixel_skeleton::state::unavailable))]
    Unavailable(String),
    /// Any other failure.
    #[error("{0}")]
    #[diagnostic(code(pixel_skeleton::state::other))]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::GameStateId;

    #[test]
    fn display_matches_config_names() {
        assert_eq!(GameStateId::Menu.to_string(), "menu");
        assert_eq!(GameStateId::Level1.to_string(), "level1");
        assert_eq!(GameStateId::default(), GameStateId::Menu);
    }
}
