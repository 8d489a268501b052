//! Applies payments to invoices.

use chrono::{DateTime, Utc};
use procura_shared::types::{OrganizationId, PaymentId, round_money};
use rust_decimal::Decimal;
use tracing::debug;

use super::types::{PaymentKind, PaymentRecord, PaymentRequest};
use crate::document::{Document, DocumentBody, DocumentKind};
use crate::error::{EngineError, EngineResult};
use crate::workflow::{Action, InvoiceStatus, TransitionRequest, WorkflowService};

/// Stateless service for invoice payments.
pub struct PaymentLedger;

impl PaymentLedger {
    /// Applies a payment and returns the updated invoice.
    ///
    /// A full payment clears the balance and moves the invoice to PAID.
    /// A partial payment must be strictly less than the balance and carry a
    /// receipt; the invoice keeps its status.
    ///
    /// # Errors
    ///
    /// * `Validation` if the document is not an invoice, or the amount or receipt is unacceptable
    /// * `InvalidTransition` if the invoice is not PENDING or OVERDUE
    pub fn apply_payment(mut invoice: Document, request: &PaymentRequest) -> EngineResult<Document> {
        let document_id = invoice.id();
        let kind = invoice.kind();
        let status = invoice.status();

        let DocumentBody::Invoice(body) = &mut invoice.body else {
            return Err(EngineError::validation(
                "kind",
                format!("payments can only be applied to invoices, got {kind}"),
            ));
        };
        if !matches!(body.status, InvoiceStatus::Pending | InvoiceStatus::Overdue) {
            return Err(EngineError::InvalidTransition {
                document_id,
                kind: DocumentKind::Invoice,
                status,
                action: Action::Settle,
            });
        }

        let remaining = body.payment.remaining_amount;
        let receipt = request
            .receipt_reference
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        let amount = match request.kind {
            PaymentKind::Full => Self::full_amount(request.amount, remaining)?,
            PaymentKind::Partial => {
                let amount = Self::partial_amount(request.amount, remaining)?;
                if receipt.is_none() {
                    return Err(EngineError::validation(
                        "receipt_reference",
                        "receipt required for partial payment",
                    ));
                }
                amount
            }
        };

        body.payment.paid_amount = round_money(body.payment.paid_amount + amount);
        body.payment.remaining_amount = round_money(remaining - amount);
        if receipt.is_some() {
            body.payment.receipt_reference.clone_from(&receipt);
        }
        body.payment.payments.push(PaymentRecord {
            id: PaymentId::new(),
            kind: request.kind,
            amount,
            receipt_reference: receipt,
            paid_at: request.paid_at,
        });
        debug!(
            %document_id,
            kind = %request.kind,
            %amount,
            remaining = %body.payment.remaining_amount,
            "Payment applied"
        );
        invoice.touch(request.paid_at);

        match request.kind {
            PaymentKind::Full => WorkflowService::settle(invoice, request.paid_at),
            PaymentKind::Partial => Ok(invoice),
        }
    }

    /// Moves a PENDING invoice past its due date to OVERDUE.
    ///
    /// # Errors
    ///
    /// Same as [`WorkflowService::transition`] for the `mark_overdue` action.
    pub fn mark_overdue(
        invoice: Document,
        actor: OrganizationId,
        at: DateTime<Utc>,
    ) -> EngineResult<Document> {
        WorkflowService::transition(
            invoice,
            &TransitionRequest::new(Action::MarkOverdue, actor).at(at),
        )
    }

    fn full_amount(requested: Option<Decimal>, remaining: Decimal) -> EngineResult<Decimal> {
        match requested.map(round_money) {
            Some(amount) if amount != remaining => Err(EngineError::validation(
                "amount",
                format!("full payment must equal the remaining balance {remaining}, got {amount}"),
            )),
            _ => Ok(remaining),
        }
    }

    fn partial_amount(requested: Option<Decimal>, remaining: Decimal) -> EngineResult<Decimal> {
        let amount = requested.map(round_money).ok_or_else(|| {
            EngineError::validation("amount", "amount is required for a partial payment")
        })?;
        if amount <= Decimal::ZERO {
            return Err(EngineError::validation(
                "amount",
                format!("payment amount must be greater than zero, got {amount}"),
            ));
        }
        if amount >= remaining {
            return Err(EngineError::validation(
                "amount",
                format!(
                    "partial payment must be less than the remaining balance {remaining}, got {amount}; use a full payment instead"
                ),
            ));
        }
        Ok(amount)
    }
}
