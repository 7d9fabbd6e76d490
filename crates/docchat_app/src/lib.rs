//! Docchat app: runtime wiring between the pure core, the HTTP transport,
//! and a line-oriented shell standing in for the browser view.
pub mod effects;
pub mod logging;
pub mod save;
pub mod shell;

use docchat_core::Msg;

/// Event consumed by the main loop: orchestrator messages from either the
/// shell or the transport pump, plus shell control events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Intent(Msg),
    Render,
    Quit,
}
