//! Per-type document bodies.
//!
//! Each variant of [`DocumentBody`] carries its type's status and the fields
//! only that type has. Status, frozen totals and payment state are written
//! by the engine alone; the rest is editable while the document is.

use chrono::NaiveDate;
use procura_shared::types::DocumentId;
use serde::{Deserialize, Serialize};

use super::kind::DocumentKind;
use crate::payment::PaymentState;
use crate::totals::{FinancialAdjustments, Totals};
use crate::workflow::{
    ContractStatus, DeliveryNoteStatus, DocumentStatus, InvoiceStatus, PackingListStatus,
    PurchaseOrderStatus, QuotationStatus, RfqStatus,
};

/// RFQ fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RfqBody {
    pub(crate) status: RfqStatus,
    /// Date the buyer needs the goods by.
    pub required_by: Option<NaiveDate>,
}

/// Quotation fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotationBody {
    pub(crate) status: QuotationStatus,
    /// RFQ this quotation answers.
    pub rfq_id: Option<DocumentId>,
    /// Last day the offer holds.
    pub valid_until: Option<NaiveDate>,
    /// Discount, charges and tax.
    pub adjustments: FinancialAdjustments,
    pub(crate) totals: Option<Totals>,
}

/// Contract fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractBody {
    pub(crate) status: ContractStatus,
    /// Quotation this contract was drawn from.
    pub quotation_id: Option<DocumentId>,
    /// Contract terms.
    pub terms: Option<String>,
    /// Discount, charges and tax.
    pub adjustments: FinancialAdjustments,
    pub(crate) totals: Option<Totals>,
    pub(crate) signature: Option<String>,
    pub(crate) change_request: Option<String>,
}

/// Purchase order fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrderBody {
    pub(crate) status: PurchaseOrderStatus,
    /// Contract this order was placed against. Exclusive with `quotation_id`.
    pub contract_id: Option<DocumentId>,
    /// Quotation this order was placed against. Exclusive with `contract_id`.
    pub quotation_id: Option<DocumentId>,
    /// Expected delivery date.
    pub expected_delivery: Option<NaiveDate>,
    /// Discount, charges and tax.
    pub adjustments: FinancialAdjustments,
    pub(crate) totals: Option<Totals>,
}

/// Delivery note fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryNoteBody {
    pub(crate) status: DeliveryNoteStatus,
    /// Purchase order being delivered.
    pub purchase_order_id: Option<DocumentId>,
    /// Carrier name.
    pub carrier: Option<String>,
    /// Carrier tracking number.
    pub tracking_number: Option<String>,
    pub(crate) dispute_reason: Option<String>,
}

/// Packing list fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackingListBody {
    pub(crate) status: PackingListStatus,
    /// Purchase order being packed.
    pub purchase_order_id: Option<DocumentId>,
    /// Marks printed on the whole shipment.
    pub shipment_marks: Option<String>,
}

/// Invoice fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceBody {
    pub(crate) status: InvoiceStatus,
    /// Purchase order being billed.
    pub purchase_order_id: Option<DocumentId>,
    /// Payment due date.
    pub due_date: Option<NaiveDate>,
    /// Discount, charges and tax.
    pub adjustments: FinancialAdjustments,
    pub(crate) totals: Option<Totals>,
    pub(crate) payment: PaymentState,
}

impl RfqBody {
    /// Current status.
    #[must_use]
    pub fn status(&self) -> RfqStatus {
        self.status
    }
}

impl QuotationBody {
    /// Current status.
    #[must_use]
    pub fn status(&self) -> QuotationStatus {
        self.status
    }
}

impl ContractBody {
    /// Current status.
    #[must_use]
    pub fn status(&self) -> ContractStatus {
        self.status
    }

    /// Reference of the stored signature, once signed.
    #[must_use]
    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    /// Changes the buyer asked for, while in `PENDING_CHANGES`.
    #[must_use]
    pub fn change_request(&self) -> Option<&str> {
        self.change_request.as_deref()
    }
}

impl PurchaseOrderBody {
    /// Current status.
    #[must_use]
    pub fn status(&self) -> PurchaseOrderStatus {
        self.status
    }
}

impl DeliveryNoteBody {
    /// Current status.
    #[must_use]
    pub fn status(&self) -> DeliveryNoteStatus {
        self.status
    }

    /// Reason given when the delivery was disputed.
    #[must_use]
    pub fn dispute_reason(&self) -> Option<&str> {
        self.dispute_reason.as_deref()
    }
}

impl PackingListBody {
    /// Current status.
    #[must_use]
    pub fn status(&self) -> PackingListStatus {
        self.status
    }
}

impl InvoiceBody {
    /// Current status.
    #[must_use]
    pub fn status(&self) -> InvoiceStatus {
        self.status
    }

    /// Payment progress.
    #[must_use]
    pub fn payment(&self) -> &PaymentState {
        &self.payment
    }
}

/// Type-specific part of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentBody {
    /// Request for quotation.
    Rfq(RfqBody),
    /// Quotation.
    Quotation(QuotationBody),
    /// Contract.
    Contract(ContractBody),
    /// Purchase order.
    PurchaseOrder(PurchaseOrderBody),
    /// Delivery note.
    DeliveryNote(DeliveryNoteBody),
    /// Packing list.
    PackingList(PackingListBody),
    /// Invoice.
    Invoice(InvoiceBody),
}

impl DocumentBody {
    /// An empty body of the given type in its initial state.
    #[must_use]
    pub fn initial(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::Rfq => Self::Rfq(RfqBody::default()),
            DocumentKind::Quotation => Self::Quotation(QuotationBody::default()),
            DocumentKind::Contract => Self::Contract(ContractBody::default()),
            DocumentKind::PurchaseOrder => Self::PurchaseOrder(PurchaseOrderBody::default()),
            DocumentKind::DeliveryNote => Self::DeliveryNote(DeliveryNoteBody::default()),
            DocumentKind::PackingList => Self::PackingList(PackingListBody::default()),
            DocumentKind::Invoice => Self::Invoice(InvoiceBody::default()),
        }
    }

    /// The document type.
    #[must_use]
    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::Rfq(_) => DocumentKind::Rfq,
            Self::Quotation(_) => DocumentKind::Quotation,
            Self::Contract(_) => DocumentKind::Contract,
            Self::PurchaseOrder(_) => DocumentKind::PurchaseOrder,
            Self::DeliveryNote(_) => DocumentKind::DeliveryNote,
            Self::PackingList(_) => DocumentKind::PackingList,
            Self::Invoice(_) => DocumentKind::Invoice,
        }
    }

    /// Current status, tagged with the document type.
    #[must_use]
    pub fn status(&self) -> DocumentStatus {
        match self {
            Self::Rfq(b) => b.status.into(),
            Self::Quotation(b) => b.status.into(),
            Self::Contract(b) => b.status.into(),
            Self::PurchaseOrder(b) => b.status.into(),
            Self::DeliveryNote(b) => b.status.into(),
            Self::PackingList(b) => b.status.into(),
            Self::Invoice(b) => b.status.into(),
        }
    }

    /// Adjustments, for priced types.
    #[must_use]
    pub fn adjustments(&self) -> Option<&FinancialAdjustments> {
        match self {
            Self::Quotation(b) => Some(&b.adjustments),
            Self::Contract(b) => Some(&b.adjustments),
            Self::PurchaseOrder(b) => Some(&b.adjustments),
            Self::Invoice(b) => Some(&b.adjustments),
            Self::Rfq(_) | Self::DeliveryNote(_) | Self::PackingList(_) => None,
        }
    }

    pub(crate) fn adjustments_mut(&mut self) -> Option<&mut FinancialAdjustments> {
        match self {
            Self::Quotation(b) => Some(&mut b.adjustments),
            Self::Contract(b) => Some(&mut b.adjustments),
            Self::PurchaseOrder(b) => Some(&mut b.adjustments),
            Self::Invoice(b) => Some(&mut b.adjustments),
            Self::Rfq(_) | Self::DeliveryNote(_) | Self::PackingList(_) => None,
        }
    }

    /// Totals frozen at issuance, if any.
    #[must_use]
    pub fn frozen_totals(&self) -> Option<&Totals> {
        match self {
            Self::Quotation(b) => b.totals.as_ref(),
            Self::Contract(b) => b.totals.as_ref(),
            Self::PurchaseOrder(b) => b.totals.as_ref(),
            Self::Invoice(b) => b.totals.as_ref(),
            Self::Rfq(_) | Self::DeliveryNote(_) | Self::PackingList(_) => None,
        }
    }

    pub(crate) fn set_frozen_totals(&mut self, totals: Totals) {
        match self {
            Self::Quotation(b) => b.totals = Some(totals),
            Self::Contract(b) => b.totals = Some(totals),
            Self::PurchaseOrder(b) => b.totals = Some(totals),
            Self::Invoice(b) => {
                b.totals = Some(totals);
                b.payment.initialize(totals.total_amount);
            }
            Self::Rfq(_) | Self::DeliveryNote(_) | Self::PackingList(_) => {}
        }
    }

    /// Writes a status of the same type. Returns false on a type mismatch.
    pub(crate) fn set_status(&mut self, status: DocumentStatus) -> bool {
        match (self, status) {
            (Self::Rfq(b), DocumentStatus::Rfq(s)) => b.status = s,
            (Self::Quotation(b), DocumentStatus::Quotation(s)) => b.status = s,
            (Self::Contract(b), DocumentStatus::Contract(s)) => b.status = s,
            (Self::PurchaseOrder(b), DocumentStatus::PurchaseOrder(s)) => b.status = s,
            (Self::DeliveryNote(b), DocumentStatus::DeliveryNote(s)) => b.status = s,
            (Self::PackingList(b), DocumentStatus::PackingList(s)) => b.status = s,
            (Self::Invoice(b), DocumentStatus::Invoice(s)) => b.status = s,
            _ => return false,
        }
        true
    }

    /// Copies the caller-editable fields of `edited` onto this body.
    ///
    /// Status, frozen totals, payment state, signature, change request and
    /// dispute reason keep their current values. A body of another type is ignored.
    pub(crate) fn merge_editable(&mut self, edited: DocumentBody) {
        match (self, edited) {
            (Self::Rfq(b), Self::Rfq(e)) => b.required_by = e.required_by,
            (Self::Quotation(b), Self::Quotation(e)) => {
                b.rfq_id = e.rfq_id;
                b.valid_until = e.valid_until;
                b.adjustments = e.adjustments;
            }
            (Self::Contract(b), Self::Contract(e)) => {
                b.quotation_id = e.quotation_id;
                b.terms = e.terms;
                b.adjustments = e.adjustments;
            }
            (Self::PurchaseOrder(b), Self::PurchaseOrder(e)) => {
                b.contract_id = e.contract_id;
                b.quotation_id = e.quotation_id;
                b.expected_delivery = e.expected_delivery;
                b.adjustments = e.adjustments;
            }
            (Self::DeliveryNote(b), Self::DeliveryNote(e)) => {
                b.purchase_order_id = e.purchase_order_id;
                b.carrier = e.carrier;
                b.tracking_number = e.tracking_number;
            }
            (Self::PackingList(b), Self::PackingList(e)) => {
                b.purchase_order_id = e.purchase_order_id;
                b.shipment_marks = e.shipment_marks;
            }
            (Self::Invoice(b), Self::Invoice(e)) => {
                b.purchase_order_id = e.purchase_order_id;
                b.due_date = e.due_date;
                b.adjustments = e.adjustments;
            }
            _ => {}
        }
    }

    /// First engine-written field that is not at its initial value.
    pub(crate) fn engine_state_field(&self) -> Option<&'static str> {
        if self.frozen_totals().is_some() {
            return Some("totals");
        }
        match self {
            Self::Contract(b) if b.signature.is_some() => Some("signature"),
            Self::Contract(b) if b.change_request.is_some() => Some("change_request"),
            Self::DeliveryNote(b) if b.dispute_reason.is_some() => Some("dispute_reason"),
            Self::Invoice(b) if b.payment != PaymentState::default() => Some("payment"),
            _ => None,
        }
    }

    /// Ids of the documents this one was derived from.
    #[must_use]
    pub fn linked_sources(&self) -> Vec<DocumentId> {
        match self {
            Self::Rfq(_) => Vec::new(),
            Self::Quotation(b) => b.rfq_id.into_iter().collect(),
            Self::Contract(b) => b.quotation_id.into_iter().collect(),
            Self::PurchaseOrder(b) => b
                .contract_id
                .into_iter()
                .chain(b.quotation_id)
                .collect(),
            Self::DeliveryNote(b) => b.purchase_order_id.into_iter().collect(),
            Self::PackingList(b) => b.purchase_order_id.into_iter().collect(),
            Self::Invoice(b) => b.purchase_order_id.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_initial_bodies() {
        for kind in DocumentKind::ALL {
            let body = DocumentBody::initial(kind);
            assert_eq!(body.kind(), kind);
            assert!(body.status().is_initial());
            assert_eq!(body.adjustments().is_some(), kind.is_priced());
            assert!(body.frozen_totals().is_none());
        }
    }

    #[test]
    fn test_set_status_rejects_other_kind() {
        let mut body = DocumentBody::initial(DocumentKind::Invoice);
        assert!(!body.set_status(RfqStatus::Pending.into()));
        assert!(body.set_status(InvoiceStatus::Pending.into()));
        assert_eq!(body.status(), InvoiceStatus::Pending.into());
    }

    #[test]
    fn test_freezing_invoice_initializes_payment() {
        let mut body = DocumentBody::initial(DocumentKind::Invoice);
        body.set_frozen_totals(Totals {
            subtotal: dec!(900.00),
            discount_amount: dec!(0.00),
            after_discount: dec!(900.00),
            tax_amount: dec!(45.00),
            additional_charges: dec!(0.00),
            total_amount: dec!(945.00),
        });
        let DocumentBody::Invoice(invoice) = &body else {
            panic!("expected invoice body");
        };
        assert_eq!(invoice.payment().remaining_amount, dec!(945.00));
        assert_eq!(invoice.payment().paid_amount, dec!(0));
    }

    #[test]
    fn test_linked_sources() {
        let contract_id = DocumentId::new();
        let body = DocumentBody::PurchaseOrder(PurchaseOrderBody {
            contract_id: Some(contract_id),
            ..PurchaseOrderBody::default()
        });
        assert_eq!(body.linked_sources(), vec![contract_id]);
        assert!(DocumentBody::initial(DocumentKind::Rfq)
            .linked_sources()
            .is_empty());
    }

    #[test]
    fn test_serde_tags_kind() {
        let body = DocumentBody::initial(DocumentKind::DeliveryNote);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["kind"], "delivery_note");
        assert_eq!(json["status"], "PENDING");
        let back: DocumentBody = serde_json::from_value(json).unwrap();
        assert_eq!(back, body);
    }
}
