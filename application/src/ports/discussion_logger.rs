//! Port for structured discussion event logging.
//!
//! Defines the [`DiscussionLogger`] trait for recording discussion events
//! (round starts, turns, insight broadcasts, research passes, final
//! reports) to an external sink used for replay.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures the discussion
//! timeline in a machine-readable format. The core never reads events back;
//! logging is fire-and-forget and an implementation failure is silently
//! ignored. The logger is injected at construction — there is no process
//! global.

use serde_json::Value;

/// Kind of a discussion event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscussionEventKind {
    ConversationStarted,
    RoundStarted,
    StepStarted,
    MessageSent,
    InsightsShared,
    ResearchEvent,
    RoundEnded,
    FinalReports,
}

impl DiscussionEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscussionEventKind::ConversationStarted => "ConversationStarted",
            DiscussionEventKind::RoundStarted => "RoundStarted",
            DiscussionEventKind::StepStarted => "StepStarted",
            DiscussionEventKind::MessageSent => "MessageSent",
            DiscussionEventKind::InsightsShared => "InsightsShared",
            DiscussionEventKind::ResearchEvent => "ResearchEvent",
            DiscussionEventKind::RoundEnded => "RoundEnded",
            DiscussionEventKind::FinalReports => "FinalReports",
        }
    }
}

/// A structured discussion event with a JSON payload of event-specific
/// fields.
#[derive(Debug, Clone)]
pub struct DiscussionEvent {
    pub kind: DiscussionEventKind,
    pub payload: Value,
}

impl DiscussionEvent {
    pub fn new(kind: DiscussionEventKind, payload: Value) -> Self {
        Self { kind, payload }
    }
}

/// Port for logging discussion events.
///
/// The `log` method is intentionally synchronous and non-fallible to avoid
/// disrupting the orchestration flow.
pub trait DiscussionLogger: Send + Sync {
    fn log(&self, event: DiscussionEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoDiscussionLogger;

impl DiscussionLogger for NoDiscussionLogger {
    fn log(&self, _event: DiscussionEvent) {}
}
