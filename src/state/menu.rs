//! Main menu.

use super::{State, StateError};
use crate::canvas::Canvas;

/// Main menu state.
///
/// Doesn't draw anything yet.
#[derive(Debug, Default)]
pub struct MenuState;

impl State for MenuState {
    fn update(&mut self) -> Result<(), StateError> {
        log::trace!("Menu update");

        Ok(())
    }

    fn render(&mut self, _canvas: &mut Canvas<'_>) -> Result<(), StateError> {
        Ok(())
    }

    fn on_enter(&mut self) {
        log::debug!("Entering menu");
    }

    fn name(&self) -> &'static str {
        "menu"
    }
}
