//! First level.

use super::{State, StateError};
use crate::canvas::Canvas;

/// First level of the game.
#[derive(Debug, Default)]
pub struct Level1State;

impl State for Level1State {
    fn update(&mut self) -> Result<(), StateError> {
        log::trace!("Level 1 update");

        Ok(())
    }

    fn render(&mut self, _canvas: &mut Canvas<'_>) -> Result<(), StateError> {
        Ok(())
    }

    fn on_enter(&mut self) {
        log::debug!("Entering level 1");
    }

    fn name(&self) -> &'static str {
        "level1"
    }
}
