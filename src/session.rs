// src/session.rs
//! Request-scoped UI state, advanced only through [`SessionState::apply`].

use crate::models::LogEntry;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    Started { message: String },
    Logged(Vec<LogEntry>),
    Succeeded,
    Failed { message: String },
    Reset,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub phase: Phase,
    pub loading_message: Option<String>,
    pub error: Option<String>,
    pub logs: Vec<LogEntry>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Started { message } => {
                self.phase = Phase::Loading;
                self.loading_message = Some(message);
                self.error = None;
            }
            SessionEvent::Logged(entries) => self.logs.extend(entries),
            SessionEvent::Succeeded => {
                self.phase = Phase::Ready;
                self.loading_message = None;
            }
            SessionEvent::Failed { message } => {
                self.phase = Phase::Failed;
                self.loading_message = None;
                self.error = Some(message);
            }
            SessionEvent::Reset => *self = Self::default(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }
}
