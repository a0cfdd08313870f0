//! Engine lifecycle state.
//!
//! The engine's lifecycle is explicit state behind a readiness query, not
//! an implicit module-level side effect, so tests can construct fresh
//! engines and observers can watch the Loading → Ready transition.

/// Lifecycle state of the render engine.
///
/// Transitions: `Uninitialized → Loading → Ready | LoadFailed`.
/// `LoadFailed` is terminal: the process keeps running (status endpoints
/// stay useful) but every render request is rejected until an operator
/// restarts with a fixed style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineState {
    /// Engine created, style load not yet started.
    Uninitialized,
    /// Style load in progress.
    Loading,
    /// Style loaded; renders are accepted.
    Ready,
    /// Style load failed with the given reason.
    LoadFailed(String),
}

impl EngineState {
    /// Returns a string representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineState::Uninitialized => "uninitialized",
            EngineState::Loading => "loading",
            EngineState::Ready => "ready",
            EngineState::LoadFailed(_) => "load_failed",
        }
    }

    /// True once the engine can accept render work.
    pub fn is_ready(&self) -> bool {
        matches!(self, EngineState::Ready)
    }

    /// Failure reason, if the load failed.
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            EngineState::LoadFailed(reason) => Some(reason),
            _ => None,
        }
    }
}
