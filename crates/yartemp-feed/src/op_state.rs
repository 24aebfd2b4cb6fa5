//! Refresh state machine.
//!
//! Ensures only one refresh cycle runs at a time. Used by WeatherModel.

/// Operation state for serializing refresh cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum OpState {
    #[default]
    Idle,
    Refreshing,
}

impl OpState {
    /// True if a new refresh can be started.
    pub(crate) fn can_start_refresh(self) -> bool {
        matches!(self, OpState::Idle)
    }

    /// State after a refresh cycle finishes, successfully or not.
    pub(crate) fn on_refresh_done(self) -> Self {
        OpState::Idle
    }
}
