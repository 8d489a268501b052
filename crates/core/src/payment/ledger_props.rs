//! Property-based tests for PaymentLedger.

use proptest::prelude::*;
use procura_shared::types::OrganizationId;
use rust_decimal::Decimal;

use super::ledger::PaymentLedger;
use super::types::{PaymentRequest, PaymentState};
use crate::document::{Document, DocumentBody, DocumentKind, PartySnapshot};
use crate::line_items::LineItem;
use crate::workflow::{Action, InvoiceStatus, TransitionRequest, WorkflowService};

/// Invoice totals from 1.00 to 100,000.00.
fn total_cents() -> impl Strategy<Value = i64> {
    100i64..10_000_000i64
}

fn pending_invoice(total: Decimal) -> Document {
    let seller = OrganizationId::new();
    let mut invoice = Document::new(
        DocumentKind::Invoice,
        PartySnapshot::new(OrganizationId::new(), "Buyer Co"),
        PartySnapshot::new(seller, "Seller Co"),
    );
    invoice
        .items_mut()
        .expect("draft is editable")
        .add_line(
            LineItem::new("Service", Decimal::ONE)
                .with_unit_price(total)
                .with_unit_of_measure("lot"),
        )
        .expect("valid line");
    WorkflowService::transition(invoice, &TransitionRequest::new(Action::Submit, seller))
        .expect("complete invoice submits")
}

fn payment(doc: &Document) -> &PaymentState {
    match doc.body() {
        DocumentBody::Invoice(body) => body.payment(),
        _ => unreachable!("fixture is an invoice"),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// paid + remaining equals the frozen total after any accepted sequence of partial payments.
    #[test]
    fn prop_paid_plus_remaining_is_total(
        cents in total_cents(),
        fractions in prop::collection::vec(1u32..50u32, 0..6),
    ) {
        let total = Decimal::new(cents, 2);
        let mut invoice = pending_invoice(total);

        for (i, percent) in fractions.into_iter().enumerate() {
            let remaining = payment(&invoice).remaining_amount;
            let amount = (remaining * Decimal::from(percent) / Decimal::ONE_HUNDRED).round_dp(2);
            let request = PaymentRequest::partial(amount, format!("RCPT-{i}"));
            match PaymentLedger::apply_payment(invoice.clone(), &request) {
                Ok(next) => invoice = next,
                Err(_) => prop_assert!(amount <= Decimal::ZERO || amount >= remaining),
            }
            let state = payment(&invoice);
            prop_assert_eq!(state.paid_amount + state.remaining_amount, total);
        }

        let paid = PaymentLedger::apply_payment(invoice, &PaymentRequest::full()).expect("full payment settles");
        prop_assert_eq!(paid.status(), InvoiceStatus::Paid.into());
        prop_assert_eq!(payment(&paid).paid_amount, total);
        prop_assert_eq!(payment(&paid).remaining_amount, Decimal::ZERO);
    }

    /// A partial payment one cent short of the balance leaves exactly 0.01 owed.
    #[test]
    fn prop_one_cent_short_leaves_one_cent(cents in 2i64..10_000_000i64) {
        let total = Decimal::new(cents, 2);
        let invoice = pending_invoice(total);
        let amount = total - Decimal::new(1, 2);

        let invoice = PaymentLedger::apply_payment(invoice, &PaymentRequest::partial(amount, "RCPT"))
            .expect("less than the balance");
        prop_assert_eq!(payment(&invoice).remaining_amount, Decimal::new(1, 2));
        prop_assert_eq!(invoice.status(), InvoiceStatus::Pending.into());
    }
}
