//! Debounced, cancellable request slots.
//!
//! Each logical backend operation that follows user input (preview refresh,
//! size estimate) owns one [`RequestSlot`]. Scheduling a new request
//! supersedes whatever the slot held before, whether it was still waiting
//! out its debounce delay or already in flight. Results are matched against
//! the ticket they were issued for, and results for superseded tickets are
//! discarded, never merged into newer state.
//!
//! The slot is a plain state machine driven by timestamps, so it can be
//! exercised without a browser. The wasm layer supplies the clock, the timer
//! and the `AbortController`.
//!
//! ```text
//!   schedule(t0) ─┐
//!   schedule(t1) ─┼─ supersedes t0
//!   schedule(t2) ─┘
//!                  ... delay ...
//!   take_due(t2 + delay) -> Some(ticket, payload)   // exactly one request
//!   settle(ticket, result) -> Apply | Fail | Discard
//! ```

use std::fmt;

/// Identifies one scheduled request within a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn id(self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
struct Pending<P> {
    ticket: Ticket,
    due_at_ms: u64,
    payload: P,
}

/// What a caller should do with a finished request.
#[derive(Debug, PartialEq)]
pub enum Settled<T, E> {
    /// The result belongs to the latest request: apply it.
    Apply(T),
    /// The latest request failed: surface the error.
    Fail(E),
    /// The request was superseded or cancelled: ignore it silently.
    Discard,
}

/// A single-occupancy, debounced request slot.
#[derive(Debug)]
pub struct RequestSlot<P> {
    name: &'static str,
    delay_ms: u64,
    next_ticket: u64,
    pending: Option<Pending<P>>,
    in_flight: Option<Ticket>,
}

impl<P> RequestSlot<P> {
    pub fn new(name: &'static str, delay_ms: u64) -> Self {
        Self {
            name,
            delay_ms,
            next_ticket: 0,
            pending: None,
            in_flight: None,
        }
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Queue `payload`, superseding any pending or in-flight request.
    ///
    /// The payload becomes due `delay_ms` after `now_ms`.
    pub fn schedule(&mut self, now_ms: u64, payload: P) -> Ticket {
        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);

        if let Some(old) = self.pending.take() {
            tracing::trace!(slot = self.name, superseded = old.ticket.0, "debounced request replaced");
        }
        if let Some(old) = self.in_flight.take() {
            tracing::debug!(slot = self.name, superseded = old.0, "in-flight request superseded");
        }

        self.pending = Some(Pending {
            ticket,
            due_at_ms: now_ms.saturating_add(self.delay_ms),
            payload,
        });
        ticket
    }

    /// Milliseconds until the pending request is due, if one is waiting.
    pub fn time_until_due(&self, now_ms: u64) -> Option<u64> {
        self.pending
            .as_ref()
            .map(|p| p.due_at_ms.saturating_sub(now_ms))
    }

    /// Release the pending payload once its debounce delay has elapsed.
    ///
    /// The request is then considered in flight until settled, cancelled, or
    /// superseded. Returns `None` before the deadline and on every later call.
    pub fn take_due(&mut self, now_ms: u64) -> Option<(Ticket, P)> {
        if self.pending.as_ref()?.due_at_ms > now_ms {
            return None;
        }
        let pending = self.pending.take()?;
        self.in_flight = Some(pending.ticket);
        tracing::trace!(slot = self.name, ticket = pending.ticket.0, "request due");
        Some((pending.ticket, pending.payload))
    }

    /// True while `ticket` is the slot's latest request.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.in_flight == Some(ticket) || self.pending.as_ref().map(|p| p.ticket) == Some(ticket)
    }

    /// True when a request is waiting for its deadline or in flight.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some() || self.in_flight.is_some()
    }

    /// Drop whatever the slot holds. Returns true if anything was cancelled.
    pub fn cancel(&mut self) -> bool {
        let had = self.is_busy();
        self.pending = None;
        self.in_flight = None;
        if had {
            tracing::debug!(slot = self.name, "request cancelled");
        }
        had
    }

    /// Match a finished request against the slot.
    ///
    /// Only the in-flight ticket may deliver; everything else is discarded.
    pub fn settle<T, E>(&mut self, ticket: Ticket, result: Result<T, E>) -> Settled<T, E> {
        if self.in_flight != Some(ticket) {
            tracing::debug!(slot = self.name, ticket = ticket.0, "discarding stale result");
            return Settled::Discard;
        }
        self.in_flight = None;
        match result {
            Ok(value) => Settled::Apply(value),
            Err(err) => Settled::Fail(err),
        }
    }
}

/// Backend operations, used to pick the user-facing failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Upload,
    Preview,
    Render,
    SizeCheck,
}

impl Operation {
    /// Generic message shown to the user when this operation fails.
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::Upload => "Upload failed. Please check file types and sizes.",
            Operation::Preview => "Failed to load preview",
            Operation::Render => "Download failed. Please try again.",
            Operation::SizeCheck => "Backend size check failed.",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Upload => "upload",
            Operation::Preview => "preview",
            Operation::Render => "render",
            Operation::SizeCheck => "size check",
        };
        f.write_str(name)
    }
}

/// Outcome of a failed or abandoned backend request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// Aborted because newer input superseded it. Never shown to the user.
    #[error("{0} request cancelled")]
    Cancelled(Operation),

    /// The backend could not be reached or answered with an error.
    #[error("{operation} failed: {detail}")]
    Failed {
        operation: Operation,
        detail: String,
        /// Message supplied by the backend, preferred over the generic one
        backend_message: Option<String>,
    },
}

impl RequestError {
    pub fn failed(operation: Operation, detail: impl Into<String>) -> Self {
        RequestError::Failed {
            operation,
            detail: detail.into(),
            backend_message: None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RequestError::Cancelled(_))
    }

    /// Text to show the user, or `None` for cancellations.
    pub fn user_message(&self) -> Option<String> {
        match self {
            RequestError::Cancelled(_) => None,
            RequestError::Failed {
                operation,
                backend_message,
                ..
            } => Some(
                backend_message
                    .clone()
                    .unwrap_or_else(|| operation.failure_message().to_string()),
            ),
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
