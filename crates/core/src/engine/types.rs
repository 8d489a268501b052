//! Commands accepted by the engine facade.

use chrono::{DateTime, Utc};
use procura_shared::types::OrganizationId;
use rust_decimal::Decimal;

use crate::attachment::FileUpload;
use crate::payment::PaymentKind;
use crate::workflow::Action;

/// A lifecycle action requested by an organization.
#[derive(Debug, Clone)]
pub struct TransitionCommand {
    /// The action to apply.
    pub action: Action,
    /// The acting organization.
    pub actor: OrganizationId,
    /// Reason for reject, dispute and request_changes.
    pub reason: Option<String>,
    /// File to store and attach, e.g. a signature for `sign`.
    pub attachment: Option<FileUpload>,
    /// Effective time; also the reference date for overdue checks.
    pub at: DateTime<Utc>,
}

impl TransitionCommand {
    /// Creates a command effective now.
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

    /// Attach a file.
    #[must_use]
    pub fn with_attachment(mut self, upload: FileUpload) -> Self {
        self.attachment = Some(upload);
        self
    }

    /// Set the effective time.
    #[must_use]
    pub fn at(mut self, at: DateTime<Utc>) -> Self {
        self.at = at;
        self
    }
}

/// A payment against an invoice, made by its buyer.
#[derive(Debug, Clone)]
pub struct PaymentCommand {
    /// The paying organization. Must be the invoice's buyer.
    pub actor: OrganizationId,
    /// Full or partial.
    pub kind: PaymentKind,
    /// Amount; required for partial payments.
    pub amount: Option<Decimal>,
    /// Receipt reference, when the receipt is already stored elsewhere.
    pub receipt_reference: Option<String>,
    /// Receipt file to store; its reference replaces `receipt_reference`.
    pub receipt: Option<FileUpload>,
    /// When the payment was made.
    pub paid_at: DateTime<Utc>,
}

impl PaymentCommand {
    /// A full payment of the remaining balance.
    #[must_use]
    pub fn full(actor: OrganizationId) -> Self {
        Self {
            actor,
            kind: PaymentKind::Full,
            amount: None,
            receipt_reference: None,
            receipt: None,
            paid_at: Utc::now(),
        }
    }

    /// A partial payment. A receipt must still be supplied.
    #[must_use]
    pub fn partial(actor: OrganizationId, amount: Decimal) -> Self {
        Self {
            kind: PaymentKind::Partial,
            amount: Some(amount),
            ..Self::full(actor)
        }
    }

    /// Set a receipt reference.
    #[must_use]
    pub fn with_receipt_reference(mut self, reference: impl Into<String>) -> Self {
        self.receipt_reference = Some(reference.into());
        self
    }

    /// Supply a receipt file.
    #[must_use]
    pub fn with_receipt(mut self, upload: FileUpload) -> Self {
        self.receipt = Some(upload);
        self
    }

    /// Set the payment time.
    #[must_use]
    pub fn at(mut self, paid_at: DateTime<Utc>) -> Self {
        self.paid_at = paid_at;
        self
    }
}
