//! Transition tables for every document type.
//!
//! Each status enum implements [`Lifecycle`], declaring its initial state,
//! terminal states, states that freeze totals, editable states, and the
//! `(from, action) -> (to, party)` table. Anything not in the table is illegal.

use crate::document::DocumentKind;
use crate::workflow::status::{
    ContractStatus, DeliveryNoteStatus, DocumentStatus, InvoiceStatus, PackingListStatus,
    PurchaseOrderStatus, QuotationStatus, RfqStatus,
};
use crate::workflow::types::{Action, Party};

/// One row of a transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<S> {
    /// Source state.
    pub from: S,
    /// Triggering action.
    pub action: Action,
    /// Target state.
    pub to: S,
    /// Who may trigger it.
    pub party: Party,
}

const fn rule<S>(from: S, action: Action, to: S, party: Party) -> Transition<S> {
    Transition {
        from,
        action,
        to,
        party,
    }
}

/// A per-type status machine.
pub trait Lifecycle: Copy + Eq + Into<DocumentStatus> + 'static {
    /// The document type this lifecycle governs.
    const KIND: DocumentKind;
    /// State of a newly created document.
    const INITIAL: Self;
    /// States with no way out.
    const TERMINAL: &'static [Self];
    /// Non-terminal states whose entry snapshots totals.
    const FROZEN: &'static [Self];
    /// States in which the document's own fields may be edited.
    const EDITABLE: &'static [Self];
    /// The legal transitions.
    const TRANSITIONS: &'static [Transition<Self>];

    /// Looks up the transition for `action` from this state.
    fn find(self, action: Action) -> Option<&'static Transition<Self>> {
        Self::TRANSITIONS
            .iter()
            .find(|t| t.from == self && t.action == action)
    }

    /// Returns true if no transition leaves this state.
    fn is_terminal(self) -> bool {
        Self::TERMINAL.contains(&self)
    }

    /// Returns true if the document may be edited in this state.
    fn is_editable(self) -> bool {
        Self::EDITABLE.contains(&self)
    }

    /// Returns true if entering this state snapshots the document's totals.
    fn freezes_totals(self) -> bool {
        Self::KIND.is_priced() && (Self::FROZEN.contains(&self) || self.is_terminal())
    }
}

impl Lifecycle for RfqStatus {
    const KIND: DocumentKind = DocumentKind::Rfq;
    const INITIAL: Self = Self::Draft;
    const TERMINAL: &'static [Self] = &[Self::Rejected, Self::Completed];
    const FROZEN: &'static [Self] = &[];
    const EDITABLE: &'static [Self] = &[Self::Draft];
    const TRANSITIONS: &'static [Transition<Self>] = &[
        rule(Self::Draft, Action::Submit, Self::Pending, Party::Issuer),
        rule(Self::Pending, Action::Approve, Self::Approved, Party::Recipient),
        rule(Self::Pending, Action::Reject, Self::Rejected, Party::Recipient),
        rule(Self::Approved, Action::Complete, Self::Completed, Party::Issuer),
    ];
}

impl Lifecycle for QuotationStatus {
    const KIND: DocumentKind = DocumentKind::Quotation;
    const INITIAL: Self = Self::Draft;
    const TERMINAL: &'static [Self] = &[Self::Rejected];
    const FROZEN: &'static [Self] = &[Self::Sent, Self::Pending, Self::Accepted];
    const EDITABLE: &'static [Self] = &[Self::Draft];
    const TRANSITIONS: &'static [Transition<Self>] = &[
        rule(Self::Draft, Action::Submit, Self::Sent, Party::Issuer),
        rule(Self::Sent, Action::Accept, Self::Accepted, Party::Recipient),
        rule(Self::Sent, Action::Reject, Self::Rejected, Party::Recipient),
        rule(Self::Pending, Action::Accept, Self::Accepted, Party::Recipient),
        rule(Self::Pending, Action::Reject, Self::Rejected, Party::Recipient),
    ];
}

impl Lifecycle for ContractStatus {
    const KIND: DocumentKind = DocumentKind::Contract;
    const INITIAL: Self = Self::Draft;
    const TERMINAL: &'static [Self] = &[Self::Rejected];
    const FROZEN: &'static [Self] = &[Self::Sent, Self::Signed];
    const EDITABLE: &'static [Self] = &[Self::Draft, Self::PendingChanges];
    const TRANSITIONS: &'static [Transition<Self>] = &[
        rule(Self::Draft, Action::Submit, Self::Sent, Party::Issuer),
        rule(Self::Sent, Action::Sign, Self::Signed, Party::Recipient),
        rule(Self::Sent, Action::Reject, Self::Rejected, Party::Recipient),
        rule(
            Self::Sent,
            Action::RequestChanges,
            Self::PendingChanges,
            Party::Recipient,
        ),
        rule(
            Self::PendingChanges,
            Action::Resubmit,
            Self::Sent,
            Party::Issuer,
        ),
    ];
}

impl Lifecycle for PurchaseOrderStatus {
    const KIND: DocumentKind = DocumentKind::PurchaseOrder;
    const INITIAL: Self = Self::Draft;
    const TERMINAL: &'static [Self] = &[Self::Rejected, Self::Completed];
    const FROZEN: &'static [Self] = &[Self::Pending];
    const EDITABLE: &'static [Self] = &[Self::Draft];
    const TRANSITIONS: &'static [Transition<Self>] = &[
        rule(Self::Draft, Action::Submit, Self::Pending, Party::Issuer),
        rule(Self::Pending, Action::Approve, Self::Approved, Party::Recipient),
        rule(Self::Pending, Action::Reject, Self::Rejected, Party::Recipient),
        rule(Self::Approved, Action::Complete, Self::Completed, Party::Issuer),
    ];
}

impl Lifecycle for DeliveryNoteStatus {
    const KIND: DocumentKind = DocumentKind::DeliveryNote;
    const INITIAL: Self = Self::Pending;
    const TERMINAL: &'static [Self] = &[Self::Acknowledged, Self::Disputed];
    const FROZEN: &'static [Self] = &[];
    const EDITABLE: &'static [Self] = &[Self::Pending];
    const TRANSITIONS: &'static [Transition<Self>] = &[
        rule(Self::Pending, Action::Dispatch, Self::InTransit, Party::Issuer),
        rule(
            Self::Pending,
            Action::Acknowledge,
            Self::Acknowledged,
            Party::Recipient,
        ),
        rule(
            Self::InTransit,
            Action::Acknowledge,
            Self::Acknowledged,
            Party::Recipient,
        ),
        rule(Self::Pending, Action::Dispute, Self::Disputed, Party::Recipient),
        rule(
            Self::InTransit,
            Action::Dispute,
            Self::Disputed,
            Party::Recipient,
        ),
    ];
}

impl Lifecycle for PackingListStatus {
    const KIND: DocumentKind = DocumentKind::PackingList;
    const INITIAL: Self = Self::Pending;
    const TERMINAL: &'static [Self] = &[Self::Acknowledged, Self::Rejected];
    const FROZEN: &'static [Self] = &[];
    const EDITABLE: &'static [Self] = &[Self::Pending];
    const TRANSITIONS: &'static [Transition<Self>] = &[
        rule(
            Self::Pending,
            Action::Acknowledge,
            Self::Acknowledged,
            Party::Recipient,
        ),
        rule(
            Self::Received,
            Action::Acknowledge,
            Self::Acknowledged,
            Party::Recipient,
        ),
        rule(
            Self::Approved,
            Action::Acknowledge,
            Self::Acknowledged,
            Party::Recipient,
        ),
    ];
}

impl Lifecycle for InvoiceStatus {
    const KIND: DocumentKind = DocumentKind::Invoice;
    const INITIAL: Self = Self::Draft;
    const TERMINAL: &'static [Self] = &[Self::Rejected, Self::Paid];
    const FROZEN: &'static [Self] = &[Self::Pending, Self::Accepted];
    const EDITABLE: &'static [Self] = &[Self::Draft];
    const TRANSITIONS: &'static [Transition<Self>] = &[
        rule(Self::Draft, Action::Submit, Self::Pending, Party::Issuer),
        rule(Self::Draft, Action::Accept, Self::Accepted, Party::Recipient),
        rule(Self::Pending, Action::Accept, Self::Accepted, Party::Recipient),
        rule(Self::Draft, Action::Reject, Self::Rejected, Party::Recipient),
        rule(Self::Pending, Action::Reject, Self::Rejected, Party::Recipient),
        rule(Self::Pending, Action::MarkOverdue, Self::Overdue, Party::Issuer),
        rule(Self::Pending, Action::Settle, Self::Paid, Party::System),
        rule(Self::Overdue, Action::Settle, Self::Paid, Party::System),
    ];
}

/// Dispatches `$body` with `$s` bound to the concrete per-type status.
macro_rules! with_lifecycle {
    ($status:expr, $s:ident => $body:expr) => {
        match $status {
            DocumentStatus::Rfq($s) => $body,
            DocumentStatus::Quotation($s) => $body,
            DocumentStatus::Contract($s) => $body,
            DocumentStatus::PurchaseOrder($s) => $body,
            DocumentStatus::DeliveryNote($s) => $body,
            DocumentStatus::PackingList($s) => $body,
            DocumentStatus::Invoice($s) => $body,
        }
    };
}

impl DocumentStatus {
    /// Initial state for documents of the given type.
    #[must_use]
    pub fn initial(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::Rfq => RfqStatus::INITIAL.into(),
            DocumentKind::Quotation => QuotationStatus::INITIAL.into(),
            DocumentKind::Contract => ContractStatus::INITIAL.into(),
            DocumentKind::PurchaseOrder => PurchaseOrderStatus::INITIAL.into(),
            DocumentKind::DeliveryNote => DeliveryNoteStatus::INITIAL.into(),
            DocumentKind::PackingList => PackingListStatus::INITIAL.into(),
            DocumentKind::Invoice => InvoiceStatus::INITIAL.into(),
        }
    }

    /// Returns the target state and entitled party for `action`, if legal.
    #[must_use]
    pub fn next(self, action: Action) -> Option<(Self, Party)> {
        with_lifecycle!(self, s => s.find(action).map(|t| (t.to.into(), t.party)))
    }

    /// Actions legal from this state, in table order.
    #[must_use]
    pub fn available_actions(self) -> Vec<Action> {
        with_lifecycle!(self, s => actions_from(s))
    }

    /// Returns true if no transition leaves this state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        with_lifecycle!(self, s => s.is_terminal())
    }

    /// Returns true if the document may be edited in this state.
    #[must_use]
    pub fn is_editable(self) -> bool {
        with_lifecycle!(self, s => s.is_editable())
    }

    /// Returns true if this is the initial state of its type.
    #[must_use]
    pub fn is_initial(self) -> bool {
        self == Self::initial(self.kind())
    }

    /// Returns true if entering this state snapshots totals.
    #[must_use]
    pub fn freezes_totals(self) -> bool {
        with_lifecycle!(self, s => s.freezes_totals())
    }
}

fn actions_from<S: Lifecycle>(state: S) -> Vec<Action> {
    S::TRANSITIONS
        .iter()
        .filter(|t| t.from == state)
        .map(|t| t.action)
        .collect()
}
