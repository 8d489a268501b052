//! Workflow domain types for document lifecycle management.
//!
//! This module defines the actions that move a document between states,
//! the party entitled to perform each one, and the audit records left
//! behind by every transition.

use chrono::{DateTime, Utc};
use procura_shared::types::OrganizationId;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::attachment::AttachmentRef;
use crate::workflow::status::DocumentStatus;

/// An action requested against a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Issue a draft to the counterparty.
    Submit,
    /// Counterparty approves.
    Approve,
    /// Counterparty rejects.
    Reject,
    /// Counterparty accepts.
    Accept,
    /// Counterparty signs a contract.
    Sign,
    /// Counterparty sends a contract back for changes.
    RequestChanges,
    /// Issuer sends a revised contract again.
    Resubmit,
    /// Issuer closes the document as fulfilled.
    Complete,
    /// Issuer marks goods as shipped.
    Dispatch,
    /// Counterparty confirms receipt.
    Acknowledge,
    /// Counterparty disputes a delivery.
    Dispute,
    /// Issuer flags an invoice whose due date has passed.
    MarkOverdue,
    /// Full settlement of an invoice. Only the payment ledger may apply it.
    Settle,
    /// Issuer creates or changes a draft. Never a status change.
    Edit,
}

impl Action {
    /// All actions.
    pub const ALL: [Self; 14] = [
        Self::Submit,
        Self::Approve,
        Self::Reject,
        Self::Accept,
        Self::Sign,
        Self::RequestChanges,
        Self::Resubmit,
        Self::Complete,
        Self::Dispatch,
        Self::Acknowledge,
        Self::Dispute,
        Self::MarkOverdue,
        Self::Settle,
        Self::Edit,
    ];

    /// Returns the string representation of the action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Accept => "accept",
            Self::Sign => "sign",
            Self::RequestChanges => "request_changes",
            Self::Resubmit => "resubmit",
            Self::Complete => "complete",
            Self::Dispatch => "dispatch",
            Self::Acknowledge => "acknowledge",
            Self::Dispute => "dispute",
            Self::MarkOverdue => "mark_overdue",
            Self::Settle => "settle",
            Self::Edit => "edit",
        }
    }

    /// Parses an action from a string.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|a| a.as_str() == s)
    }

    /// Returns true if the action must carry a non-empty reason.
    #[must_use]
    pub fn requires_reason(&self) -> bool {
        matches!(self, Self::Reject | Self::Dispute | Self::RequestChanges)
    }

    /// Returns true if the action refuses the document rather than moving it forward.
    ///
    /// Refusals skip line-item submission checks: a counterparty may always
    /// turn down an incomplete draft.
    #[must_use]
    pub fn is_refusal(&self) -> bool {
        matches!(self, Self::Reject | Self::Dispute)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who may perform a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Party {
    /// The side that authored the document.
    Issuer,
    /// The counterparty.
    Recipient,
    /// The engine itself (payment settlement).
    System,
}

/// Audit record appended to a document's history on every transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Status before the transition.
    pub from: DocumentStatus,
    /// Status after the transition.
    pub to: DocumentStatus,
    /// The action applied.
    pub action: Action,
    /// The organization that acted. `None` for engine-driven transitions.
    pub actor: Option<OrganizationId>,
    /// Reason given for refusals and change requests.
    pub reason: Option<String>,
    /// When the transition happened.
    pub at: DateTime<Utc>,
}

/// A request to move a document through its lifecycle.
#[derive(Debug, Clone)]
pub struct TransitionRequest {
    /// The action to apply.
    pub action: Action,
    /// The acting organization.
    pub actor: OrganizationId,
    /// Reason for reject, dispute and request_changes.
    pub reason: Option<String>,
    /// Stored file carried by the transition (e.g. a contract signature).
    pub attachment: Option<AttachmentRef>,
    /// Time the transition takes effect. Also the reference date for overdue checks.
    pub at: DateTime<Utc>,
}

impl TransitionRequest {
    /// Creates a request effective now.
    #[must_use]
    pub fn new(action: Action, actor: OrganizationId) -> Self {
        Self {
            action,
            actor,
            reason: None,
            attachment: None,
            at: Utc::now(),
        }
    }

    /// Set the reason.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attach a stored file.
    #[must_use]
    pub fn with_attachment(mut self, attachment: AttachmentRef) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// Set the effective time.
    #[must_use]
    pub fn at(mut self, at: DateTime<Utc>) -> Self {
        self.at = at;
        self
    }

    /// Returns the trimmed reason if one was given and it is not blank.
    pub(crate) fn reason_text(&self) -> Option<&str> {
        self.reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }
}
