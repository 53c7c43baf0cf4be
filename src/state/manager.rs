//! Route ticks to the active state.

use super::{GameStateId, Level1State, MenuState, State, StateError};
use crate::canvas::Canvas;

/// Holds a single long-lived instance of every state and the selector of the active one.
///
/// The instances are created once and live as long as the manager, switching states doesn't recreate them.
pub struct StateManager {
    /// Which state receives the ticks.
    active: GameStateId,
    /// Instance for [`GameStateId::Menu`].
    menu: Box<dyn State>,
    /// Instance for [`GameStateId::Level1`].
    level1: Box<dyn State>,
}

impl StateManager {
    /// Create the manager with the default states.
    ///
    /// # Arguments
    ///
    /// * `initial` - State that's active from the start.
    #[must_use]
    pub fn new(initial: GameStateId) -> Self {
        Self::with_states(initial, Box::new(MenuState), Box::new(Level1State))
    }

    /// Create the manager with custom state implementations.
    ///
    /// # Arguments
    ///
    /// * `initial` - State that's active from the start.
    /// * `menu` - Instance used when [`GameStateId::Menu`] is active.
    /// * `level1` - Instance used when [`GameStateId::Level1`] is active.
    #[must_use]
    pub fn with_states(
        initial: GameStateId,
        menu: Box<dyn State>,
        level1: Box<dyn State>,
    ) -> Self {
        Self {
            active: initial,
            menu,
            level1,
        }
    }

    /// Which state is active.
    #[inline]
    #[must_use]
    pub const fn active(&self) -> GameStateId {
        self.active
    }

    /// Update the active state.
    ///
    /// # Errors
    ///
    /// - When the active state fails to update.
    #[inline]
    pub fn update(&mut self) -> Result<(), StateError> {
        self.active_state_mut().update()
    }

    /// Render the active state.
    ///
    /// # Errors
    ///
    /// - When the active state fails to render.
    #[inline]
    pub fn render(&mut self, canvas: &mut Canvas<'_>) -> Result<(), StateError> {
        self.active_state_mut().render(canvas)
    }

    /// Switch to another state.
    ///
    /// Calls [`State::on_exit`] on the current state and [`State::on_enter`] on the next one.
    ///
    /// # Returns
    ///
    /// - `true` when the active state changed, `false` if `next` was already active.
    pub fn transition_to(&mut self, next: GameStateId) -> bool {
        if next == self.active {
            return false;
        }

        let previous = self.active_name();
        self.active_state_mut().on_exit();
        self.active = next;
        self.active_state_mut().on_enter();

        log::info!("Switched state from {previous} to {}", self.active_name());

        true
    }

    /// Name of the active state as reported by [`State::name`].
    #[must_use]
    pub fn active_name(&self) -> &'static str {
        match self.active {
            GameStateId::Menu => self.menu.name(),
            GameStateId::Level1 => self.level1.name(),
        }
    }

    /// Instance matching the selector.
    fn active_state_mut(&mut self) -> &mut dyn State {
        match self.active {
            GameStateId::Menu => self.menu.as_mut(),
            GameStateId::Level1 => self.level1.as_mut(),
        }
    }
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new(GameStateId::default())
    }
}
