//! Workflow service for document state transitions.
//!
//! Applies one lifecycle action to a document: looks the action up in the
//! type's transition table, checks who may perform it, runs the guards,
//! freezes totals where required, and appends the audit record.

use chrono::{DateTime, Utc};
use procura_shared::types::OrganizationId;

use crate::document::{Document, DocumentBody, Side};
use crate::error::{EngineError, EngineResult};
use crate::line_items::LineRules;
use crate::workflow::status::DocumentStatus;
use crate::workflow::types::{Action, Party, TransitionRecord, TransitionRequest};

/// Stateless service for document lifecycle transitions.
///
/// Documents are taken by value and returned updated. On error the input is
/// consumed and nothing has been persisted, so callers reload or keep a clone.
pub struct WorkflowService;

impl WorkflowService {
    /// Applies `request` to `document`.
    ///
    /// Checks run in this order:
    /// 1. the `(status, action)` pair must be in the table
    /// 2. the actor must be the buyer or the seller
    /// 3. the actor must be the entitled party
    /// 4. refusals and change requests need a reason
    /// 5. `mark_overdue` needs a due date before the request time
    /// 6. leaving an editable state for review validates lines and adjustments
    ///
    /// # Errors
    ///
    /// * `InvalidTransition` if the action is not legal from the current status,
    ///   or is `settle` (payments settle invoices, not callers)
    /// * `UnauthorizedAction` if the actor is not entitled
    /// * `Validation` if a guard or submission check fails
    pub fn transition(document: Document, request: &TransitionRequest) -> EngineResult<Document> {
        let action = request.action;
        let from = document.status();

        if action == Action::Settle {
            return Err(invalid(&document, action));
        }

        let (to, party) = from
            .next(action)
            .ok_or_else(|| invalid(&document, action))?;

        let side = document
            .side_of(request.actor)
            .ok_or_else(|| unauthorized(&document, action, request.actor))?;

        let entitled = match party {
            Party::Issuer => side == document.kind().issuer_side(),
            Party::Recipient => side == document.kind().issuer_side().opposite(),
            Party::System => false,
        };
        if !entitled {
            return Err(unauthorized(&document, action, request.actor));
        }

        let reason = request.reason_text();
        if action.requires_reason() && reason.is_none() {
            return Err(EngineError::validation(
                "reason",
                format!("a reason is required to {action}"),
            ));
        }

        if action == Action::MarkOverdue {
            Self::check_overdue(&document, request.at)?;
        }

        if from.is_editable() && !to.is_editable() && !action.is_refusal() {
            Self::validate_for_submission(&document)?;
        }

        let mut document = document;
        if let Some(attachment) = &request.attachment {
            if action == Action::Sign
                && let DocumentBody::Contract(body) = &mut document.body
            {
                body.signature = Some(attachment.reference.clone());
            }
            document.attachments.push(attachment.clone());
        }
        match (&mut document.body, action) {
            (DocumentBody::Contract(body), Action::RequestChanges) => {
                body.change_request = reason.map(str::to_string);
            }
            (DocumentBody::Contract(body), Action::Resubmit) => {
                body.change_request = None;
            }
            (DocumentBody::DeliveryNote(body), Action::Dispute) => {
                body.dispute_reason = reason.map(str::to_string);
            }
            _ => {}
        }

        Self::apply(
            document,
            from,
            to,
            action,
            Some(request.actor),
            reason.map(str::to_string),
            request.at,
        )
    }

    /// Moves a PENDING or OVERDUE invoice to PAID. Only the payment ledger calls this.
    pub(crate) fn settle(document: Document, at: DateTime<Utc>) -> EngineResult<Document> {
        let from = document.status();
        match from.next(Action::Settle) {
            Some((to, Party::System)) => Self::apply(document, from, to, Action::Settle, None, None, at),
            _ => Err(invalid(&document, Action::Settle)),
        }
    }

    fn apply(
        mut document: Document,
        from: DocumentStatus,
        to: DocumentStatus,
        action: Action,
        actor: Option<OrganizationId>,
        reason: Option<String>,
        at: DateTime<Utc>,
    ) -> EngineResult<Document> {
        if !document.body.set_status(to) {
            return Err(invalid(&document, action));
        }
        if to.freezes_totals() {
            document.freeze_totals()?;
        }
        document.touch(at);
        document.history.push(TransitionRecord {
            from,
            to,
            action,
            actor,
            reason,
            at,
        });
        Ok(document)
    }

    fn check_overdue(document: &Document, at: DateTime<Utc>) -> EngineResult<()> {
        let today = at.date_naive();
        match document.body() {
            DocumentBody::Invoice(body) => match body.due_date {
                Some(due) if due < today => Ok(()),
                Some(due) => Err(EngineError::validation(
                    "due_date",
                    format!("invoice is not overdue: due {due}, today {today}"),
                )),
                None => Err(EngineError::validation(
                    "due_date",
                    "invoice has no due date",
                )),
            },
            _ => Err(invalid(document, Action::MarkOverdue)),
        }
    }

    fn validate_for_submission(document: &Document) -> EngineResult<()> {
        let kind = document.kind();
        document
            .items()
            .validate_for_submission(LineRules::for_kind(kind))?;
        if let Some(adjustments) = document.body().adjustments() {
            adjustments.validate()?;
        }
        for side in [Side::Buyer, Side::Seller] {
            if let Some(field) = document.party(side).first_missing_field(false) {
                return Err(EngineError::validation(
                    format!("{}.{field}", side.as_str()),
                    format!("{} {field} is required", side.as_str()),
                ));
            }
        }
        Ok(())
    }
}

fn invalid(document: &Document, action: Action) -> EngineError {
    EngineError::InvalidTransition {
        document_id: document.id(),
        kind: document.kind(),
        status: document.status(),
        action,
    }
}

fn unauthorized(document: &Document, action: Action, actor: OrganizationId) -> EngineError {
    EngineError::UnauthorizedAction {
        document_id: document.id(),
        action,
        actor,
    }
}
