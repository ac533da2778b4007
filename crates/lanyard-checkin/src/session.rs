use crate::resolver::ResolvedCheckin;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle of one scan session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanPhase {
    Idle,
    Scanning,
    Matched,
    AwaitingConfirmation,
    Submitting,
    Success,
    Failed,
}

impl ScanPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid transition from {from:?} to {to:?}")]
    InvalidTransition { from: ScanPhase, to: ScanPhase },
    #[error("submission already started; the session can no longer be cancelled")]
    NotCancellable,
}

/// State machine for one operator scan.
///
/// The only path to `Success` is
/// `Idle -> Scanning -> Matched -> AwaitingConfirmation -> Submitting`;
/// failure is terminal wherever it happens, and cancelling is allowed
/// strictly before `Submitting`. Every other move is an error.
#[derive(Debug, Clone)]
pub struct ScanSession {
    phase: ScanPhase,
    resolved: Option<ResolvedCheckin>,
}

impl ScanSession {
    pub fn new() -> Self {
        Self {
            phase: ScanPhase::Idle,
            resolved: None,
        }
    }

    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    pub fn resolved(&self) -> Option<&ResolvedCheckin> {
        self.resolved.as_ref()
    }

    pub fn start_scan(&mut self) -> Result<(), SessionError> {
        self.step(ScanPhase::Idle, ScanPhase::Scanning)
    }

    pub fn matched(&mut self, resolved: ResolvedCheckin) -> Result<(), SessionError> {
        self.step(ScanPhase::Scanning, ScanPhase::Matched)?;
        self.resolved = Some(resolved);
        Ok(())
    }

    pub fn await_confirmation(&mut self) -> Result<(), SessionError> {
        self.step(ScanPhase::Matched, ScanPhase::AwaitingConfirmation)
    }

    // Matched is the only way in here, so the resolved payload is still set;
    // callers read it back through `resolved()`.
    pub fn begin_submit(&mut self) -> Result<(), SessionError> {
        self.step(ScanPhase::AwaitingConfirmation, ScanPhase::Submitting)
    }

    pub fn complete(&mut self) -> Result<(), SessionError> {
        self.step(ScanPhase::Submitting, ScanPhase::Success)
    }

    /// Mark the scan failed. Terminal: the operator recovers by re-scanning,
    /// which opens a fresh session.
    pub fn fail(&mut self) -> Result<(), SessionError> {
        if self.phase == ScanPhase::Idle || self.phase.is_terminal() {
            return Err(SessionError::InvalidTransition {
                from: self.phase,
                to: ScanPhase::Failed,
            });
        }
        self.phase = ScanPhase::Failed;
        Ok(())
    }

    /// Abandon the scan and drop everything held in memory. Nothing was
    /// written remotely, so there is nothing to clean up.
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        match self.phase {
            ScanPhase::Submitting | ScanPhase::Success | ScanPhase::Failed => {
                Err(SessionError::NotCancellable)
            }
            _ => {
                self.phase = ScanPhase::Idle;
                self.resolved = None;
                Ok(())
            }
        }
    }

    fn step(&mut self, expected: ScanPhase, next: ScanPhase) -> Result<(), SessionError> {
        if self.phase != expected {
            return Err(SessionError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        self.phase = next;
        Ok(())
    }
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::new()
    }
}
