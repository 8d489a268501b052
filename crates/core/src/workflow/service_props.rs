//! Property-based tests for WorkflowService.
//!
//! Every `(type, status, action)` triple is tried against a document forced
//! into that status. Triples absent from the transition table must fail with
//! `InvalidTransition` and never change the status.

use proptest::prelude::*;
use procura_shared::types::OrganizationId;
use rust_decimal_macros::dec;

use crate::document::{Document, DocumentKind, PartySnapshot};
use crate::error::EngineError;
use crate::line_items::LineItem;
use crate::workflow::service::WorkflowService;
use crate::workflow::status::DocumentStatus;
use crate::workflow::types::{Action, TransitionRequest};

fn arb_kind() -> impl Strategy<Value = DocumentKind> {
    prop::sample::select(DocumentKind::ALL.to_vec())
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop::sample::select(Action::ALL.to_vec())
}

fn arb_kind_and_status() -> impl Strategy<Value = (DocumentKind, DocumentStatus)> {
    arb_kind().prop_flat_map(|kind| (Just(kind), prop::sample::select(DocumentStatus::all_for(kind))))
}

struct Fixture {
    buyer: OrganizationId,
    seller: OrganizationId,
    document: Document,
}

fn document_in(kind: DocumentKind, status: DocumentStatus) -> Fixture {
    let buyer = OrganizationId::new();
    let seller = OrganizationId::new();
    let mut document = Document::new(
        kind,
        PartySnapshot::new(buyer, "Buyer Co").with_address("1 Buyer Way"),
        PartySnapshot::new(seller, "Seller Co").with_address("2 Seller Rd"),
    );
    document
        .items_mut()
        .expect("new documents are editable")
        .add_line(
            LineItem::new("Valve", dec!(4))
                .with_unit_price(dec!(25))
                .with_unit_of_measure("pcs"),
        )
        .expect("valid line");
    assert!(document.body.set_status(status));
    Fixture {
        buyer,
        seller,
        document,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Triples outside the table are rejected with InvalidTransition, whoever acts.
    #[test]
    fn prop_untabled_triples_are_invalid(
        (kind, status) in arb_kind_and_status(),
        action in arb_action(),
        who in 0u8..3,
    ) {
        prop_assume!(action == Action::Settle || status.next(action).is_none());

        let Fixture { buyer, seller, document } = document_in(kind, status);
        let actor = match who {
            0 => buyer,
            1 => seller,
            _ => OrganizationId::new(),
        };
        let request = TransitionRequest::new(action, actor).with_reason("because");

        let result = WorkflowService::transition(document, &request);
        let is_invalid_transition = matches!(result, Err(EngineError::InvalidTransition { .. }));
        prop_assert!(is_invalid_transition);
    }

    /// Tabled triples succeed for the entitled side and land on the table's target.
    #[test]
    fn prop_tabled_triples_reach_target(
        (kind, status) in arb_kind_and_status(),
        action in arb_action(),
    ) {
        prop_assume!(action != Action::Settle && action != Action::MarkOverdue);
        let Some((target, party)) = status.next(action) else {
            return Ok(());
        };

        let Fixture { buyer, seller, document } = document_in(kind, status);
        let issuer = match kind.issuer_side() {
            crate::document::Side::Buyer => buyer,
            crate::document::Side::Seller => seller,
        };
        let recipient = if issuer == buyer { seller } else { buyer };
        let actor = match party {
            crate::workflow::types::Party::Issuer => issuer,
            _ => recipient,
        };
        let request = TransitionRequest::new(action, actor).with_reason("because");

        let updated = WorkflowService::transition(document, &request).expect("tabled transition");
        prop_assert_eq!(updated.status(), target);
        prop_assert_eq!(updated.history().len(), 1);
        if target.freezes_totals() {
            prop_assert!(updated.body().frozen_totals().is_some());
        }
    }

    /// Terminal states offer no actions.
    #[test]
    fn prop_terminal_states_have_no_exits((_kind, status) in arb_kind_and_status()) {
        if status.is_terminal() {
            prop_assert!(status.available_actions().is_empty());
        }
    }
}
