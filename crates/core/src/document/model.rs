//! The document header shared by all seven types.

use chrono::{DateTime, Utc};
use procura_shared::types::{CurrencyCode, DocumentId, OrganizationId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::body::DocumentBody;
use super::kind::{DocumentKind, Side};
use super::party::PartySnapshot;
use crate::attachment::AttachmentRef;
use crate::error::{EngineError, EngineResult};
use crate::line_items::LineItemSet;
use crate::totals::{FinancialAdjustments, Totals, TotalsService};
use crate::workflow::{Action, DocumentStatus, TransitionRecord};

/// A procurement document.
///
/// Fields are read through accessors. Edits go through the `*_mut` and
/// `set_*` helpers, which refuse once the document has left its editable
/// state; status, history and frozen totals change only through the
/// workflow and payment services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub(crate) id: DocumentId,
    pub(crate) reference: Option<String>,
    pub(crate) version: u64,
    pub(crate) buyer: PartySnapshot,
    pub(crate) seller: PartySnapshot,
    pub(crate) currency: CurrencyCode,
    pub(crate) items: LineItemSet,
    pub(crate) notes: Option<String>,
    pub(crate) attachments: Vec<AttachmentRef>,
    pub(crate) history: Vec<TransitionRecord>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
    pub(crate) body: DocumentBody,
}

impl Document {
    /// Creates an unsaved document of the given type in its initial state.
    #[must_use]
    pub fn new(kind: DocumentKind, buyer: PartySnapshot, seller: PartySnapshot) -> Self {
        let now = Utc::now();
        Self {
            id: DocumentId::new(),
            reference: None,
            version: 0,
            buyer,
            seller,
            currency: CurrencyCode::default(),
            items: LineItemSet::new(),
            notes: None,
            attachments: Vec::new(),
            history: Vec::new(),
            created_at: now,
            updated_at: now,
            body: DocumentBody::initial(kind),
        }
    }

    // ========== Accessors ==========

    /// Unique id.
    #[must_use]
    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// Human-readable reference, assigned on first save.
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    /// Optimistic concurrency counter. Zero until first saved.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Buyer snapshot.
    #[must_use]
    pub fn buyer(&self) -> &PartySnapshot {
        &self.buyer
    }

    /// Seller snapshot.
    #[must_use]
    pub fn seller(&self) -> &PartySnapshot {
        &self.seller
    }

    /// Currency label.
    #[must_use]
    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// Line items.
    #[must_use]
    pub fn items(&self) -> &LineItemSet {
        &self.items
    }

    /// Free-text notes.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Stored file references.
    #[must_use]
    pub fn attachments(&self) -> &[AttachmentRef] {
        &self.attachments
    }

    /// Transition history, oldest first.
    #[must_use]
    pub fn history(&self) -> &[TransitionRecord] {
        &self.history
    }

    /// Creation time.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last modification time.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Type-specific fields.
    #[must_use]
    pub fn body(&self) -> &DocumentBody {
        &self.body
    }

    /// Document type.
    #[must_use]
    pub fn kind(&self) -> DocumentKind {
        self.body.kind()
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> DocumentStatus {
        self.body.status()
    }

    /// Actions legal from the current status.
    #[must_use]
    pub fn available_actions(&self) -> Vec<Action> {
        self.status().available_actions()
    }

    // ========== Parties ==========

    /// Snapshot of the given side.
    #[must_use]
    pub fn party(&self, side: Side) -> &PartySnapshot {
        match side {
            Side::Buyer => &self.buyer,
            Side::Seller => &self.seller,
        }
    }

    /// The side that authored this document.
    #[must_use]
    pub fn issuer(&self) -> &PartySnapshot {
        self.party(self.kind().issuer_side())
    }

    /// The counterparty.
    #[must_use]
    pub fn recipient(&self) -> &PartySnapshot {
        self.party(self.kind().issuer_side().opposite())
    }

    /// Which side `actor` is on, if any. The issuer side wins when both match.
    #[must_use]
    pub fn side_of(&self, actor: OrganizationId) -> Option<Side> {
        let issuer_side = self.kind().issuer_side();
        if self.party(issuer_side).organization_id == actor {
            Some(issuer_side)
        } else if self.party(issuer_side.opposite()).organization_id == actor {
            Some(issuer_side.opposite())
        } else {
            None
        }
    }

    // ========== Money ==========

    /// Line-item subtotal. Zero for unpriced types.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        if self.kind().is_priced() {
            self.items.subtotal()
        } else {
            Decimal::ZERO
        }
    }

    /// Totals computed from the current items and adjustments. `None` for unpriced types.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the adjustments are out of range.
    pub fn compute_totals(&self) -> EngineResult<Option<Totals>> {
        self.body
            .adjustments()
            .map(|adjustments| TotalsService::compute_for_items(&self.items, adjustments))
            .transpose()
    }

    /// Frozen totals if the document has been issued, otherwise freshly computed ones.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if totals must be computed and the adjustments are out of range.
    pub fn resolved_totals(&self) -> EngineResult<Option<Totals>> {
        match self.body.frozen_totals() {
            Some(totals) => Ok(Some(*totals)),
            None => self.compute_totals(),
        }
    }

    // ========== Editing ==========

    /// Fails unless the document is in an editable state.
    ///
    /// # Errors
    ///
    /// Returns `NotEditable` with the current status.
    pub fn ensure_editable(&self) -> EngineResult<()> {
        let status = self.status();
        if status.is_editable() {
            Ok(())
        } else {
            Err(EngineError::NotEditable {
                document_id: self.id,
                status,
            })
        }
    }

    /// Mutable line items.
    ///
    /// # Errors
    ///
    /// Returns `NotEditable` outside editable states.
    pub fn items_mut(&mut self) -> EngineResult<&mut LineItemSet> {
        self.ensure_editable()?;
        Ok(&mut self.items)
    }

    /// Mutable type-specific fields.
    ///
    /// # Errors
    ///
    /// Returns `NotEditable` outside editable states.
    pub fn body_mut(&mut self) -> EngineResult<&mut DocumentBody> {
        self.ensure_editable()?;
        Ok(&mut self.body)
    }

    /// Replaces the adjustments of a priced document.
    ///
    /// # Errors
    ///
    /// Returns `NotEditable` outside editable states, or `Validation` if the
    /// type has no adjustments or a value is out of range.
    pub fn set_adjustments(&mut self, adjustments: FinancialAdjustments) -> EngineResult<()> {
        self.ensure_editable()?;
        adjustments.validate()?;
        let kind = self.kind();
        let slot = self.body.adjustments_mut().ok_or_else(|| {
            EngineError::validation("adjustments", format!("{kind} documents carry no pricing"))
        })?;
        *slot = adjustments;
        Ok(())
    }

    /// Replaces the currency label.
    ///
    /// # Errors
    ///
    /// Returns `NotEditable` outside editable states.
    pub fn set_currency(&mut self, currency: CurrencyCode) -> EngineResult<()> {
        self.ensure_editable()?;
        self.currency = currency;
        Ok(())
    }

    /// Replaces the notes.
    ///
    /// # Errors
    ///
    /// Returns `NotEditable` outside editable states.
    pub fn set_notes(&mut self, notes: Option<String>) -> EngineResult<()> {
        self.ensure_editable()?;
        self.notes = notes;
        Ok(())
    }

    /// Copies the caller-editable parts of `edited` onto this document.
    ///
    /// Lines, notes, currency and the body's links, dates, terms and
    /// adjustments come from `edited`. Identity, parties, attachments,
    /// history, status, frozen totals and payment state stay as they are.
    ///
    /// # Errors
    ///
    /// * `NotEditable` outside editable states
    /// * `Validation` for out-of-range adjustments or negative line values
    pub(crate) fn apply_edits(&mut self, edited: Document) -> EngineResult<()> {
        self.ensure_editable()?;
        if let Some(adjustments) = edited.body.adjustments() {
            adjustments.validate()?;
        }
        self.items = LineItemSet::from_lines(edited.items.lines().iter().cloned())?;
        self.notes = edited.notes;
        self.currency = edited.currency;
        self.body.merge_editable(edited.body);
        Ok(())
    }

    /// First engine-written field that a document never saved cannot hold.
    pub(crate) fn engine_state_field(&self) -> Option<&'static str> {
        if !self.history.is_empty() {
            Some("history")
        } else if !self.attachments.is_empty() {
            Some("attachments")
        } else {
            self.body.engine_state_field()
        }
    }

    // ========== Persistence ==========

    /// Records a successful write. Called by repository adapters.
    ///
    /// The reference is only taken the first time; an assigned reference never changes.
    pub fn mark_persisted(&mut self, reference: String, version: u64) {
        if self.reference.is_none() {
            self.reference = Some(reference);
        }
        self.version = version;
    }

    // ========== Engine internals ==========

    pub(crate) fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }

    /// Snapshots totals from the document's own items and adjustments.
    pub(crate) fn freeze_totals(&mut self) -> EngineResult<()> {
        if let Some(totals) = self.compute_totals()? {
            self.body.set_frozen_totals(totals);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_items::LineItem;
    use crate::workflow::{ContractStatus, InvoiceStatus};
    use rust_decimal_macros::dec;

    fn parties() -> (PartySnapshot, PartySnapshot) {
        (
            PartySnapshot::new(OrganizationId::new(), "Buyer Co").with_address("1 Buyer Way"),
            PartySnapshot::new(OrganizationId::new(), "Seller Co").with_address("2 Seller Rd"),
        )
    }

    #[test]
    fn test_new_document_is_initial_and_unsaved() {
        let (buyer, seller) = parties();
        let doc = Document::new(DocumentKind::Invoice, buyer, seller);
        assert_eq!(doc.kind(), DocumentKind::Invoice);
        assert_eq!(doc.status(), InvoiceStatus::Draft.into());
        assert_eq!(doc.version(), 0);
        assert!(doc.reference().is_none());
        assert!(doc.history().is_empty());
        assert_eq!(doc.currency().as_str(), "USD");
    }

    #[test]
    fn test_side_of() {
        let (buyer, seller) = parties();
        let buyer_id = buyer.organization_id;
        let seller_id = seller.organization_id;
        let doc = Document::new(DocumentKind::PurchaseOrder, buyer, seller);

        assert_eq!(doc.side_of(buyer_id), Some(Side::Buyer));
        assert_eq!(doc.side_of(seller_id), Some(Side::Seller));
        assert_eq!(doc.side_of(OrganizationId::new()), None);
        assert_eq!(doc.issuer().organization_id, buyer_id);
        assert_eq!(doc.recipient().organization_id, seller_id);
    }

    #[test]
    fn test_side_of_prefers_issuer_when_both_match() {
        let org = OrganizationId::new();
        let doc = Document::new(
            DocumentKind::Invoice,
            PartySnapshot::new(org, "Same"),
            PartySnapshot::new(org, "Same"),
        );
        assert_eq!(doc.side_of(org), Some(Side::Seller));
    }

    #[test]
    fn test_subtotal_zero_for_unpriced() {
        let (buyer, seller) = parties();
        let mut doc = Document::new(DocumentKind::DeliveryNote, buyer, seller);
        doc.items_mut()
            .unwrap()
            .add_line(LineItem::new("Crate", dec!(2)).with_unit_price(dec!(10)))
            .unwrap();
        assert_eq!(doc.subtotal(), Decimal::ZERO);
        assert_eq!(doc.compute_totals().unwrap(), None);
    }

    #[test]
    fn test_compute_totals_for_priced() {
        let (buyer, seller) = parties();
        let mut doc = Document::new(DocumentKind::Quotation, buyer, seller);
        doc.items_mut()
            .unwrap()
            .add_line(LineItem::new("Valve", dec!(10)).with_unit_price(dec!(100)))
            .unwrap();
        doc.set_adjustments(FinancialAdjustments::new(dec!(10), dec!(50), dec!(5)))
            .unwrap();

        let totals = doc.compute_totals().unwrap().unwrap();
        assert_eq!(totals.total_amount, dec!(995.00));
        assert_eq!(doc.resolved_totals().unwrap(), Some(totals));
    }

    #[test]
    fn test_set_adjustments_rejects_unpriced_and_invalid() {
        let (buyer, seller) = parties();
        let mut rfq = Document::new(DocumentKind::Rfq, buyer.clone(), seller.clone());
        assert!(matches!(
            rfq.set_adjustments(FinancialAdjustments::default()),
            Err(EngineError::Validation { .. })
        ));

        let mut invoice = Document::new(DocumentKind::Invoice, buyer, seller);
        assert!(matches!(
            invoice.set_adjustments(FinancialAdjustments::new(dec!(0), dec!(0), dec!(120))),
            Err(EngineError::Validation { ref field, .. }) if field == "tax_percentage"
        ));
    }

    #[test]
    fn test_edits_refused_outside_editable_state() {
        let (buyer, seller) = parties();
        let mut doc = Document::new(DocumentKind::Contract, buyer, seller);
        doc.body.set_status(ContractStatus::Sent.into());

        assert!(matches!(
            doc.items_mut(),
            Err(EngineError::NotEditable { .. })
        ));
        assert!(matches!(
            doc.set_notes(Some("late edit".to_string())),
            Err(EngineError::NotEditable { .. })
        ));

        doc.body.set_status(ContractStatus::PendingChanges.into());
        assert!(doc.items_mut().is_ok());
    }

    #[test]
    fn test_mark_persisted_keeps_first_reference() {
        let (buyer, seller) = parties();
        let mut doc = Document::new(DocumentKind::Rfq, buyer, seller);
        doc.mark_persisted("RFQ-2026-000001".to_string(), 1);
        doc.mark_persisted("RFQ-2026-000099".to_string(), 2);
        assert_eq!(doc.reference(), Some("RFQ-2026-000001"));
        assert_eq!(doc.version(), 2);
    }

    #[test]
    fn test_serde_roundtrip_preserves_document() {
        let (buyer, seller) = parties();
        let mut doc = Document::new(DocumentKind::PurchaseOrder, buyer, seller);
        doc.items_mut()
            .unwrap()
            .add_line(
                LineItem::new("Pump", dec!(3))
                    .with_unit_price(dec!(120.50))
                    .with_unit_of_measure("pcs"),
            )
            .unwrap();
        let json = serde_json::to_string(&doc).unwrap();
        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_apply_edits_keeps_engine_state() {
        let (buyer, seller) = parties();
        let mut stored = Document::new(DocumentKind::Invoice, buyer, seller);
        stored
            .items_mut()
            .unwrap()
            .add_line(LineItem::new("Pump", dec!(1)).with_unit_price(dec!(10)))
            .unwrap();

        let mut edited = stored.clone();
        edited
            .items_mut()
            .unwrap()
            .add_line(LineItem::new("Hose", dec!(2)).with_unit_price(dec!(5)))
            .unwrap();
        edited.set_notes(Some("net 30".to_string())).unwrap();
        edited
            .set_adjustments(FinancialAdjustments::new(dec!(0), dec!(0), dec!(5)))
            .unwrap();
        if let DocumentBody::Invoice(body) = &mut edited.body {
            body.payment.paid_amount = dec!(1000);
            body.totals = Some(TotalsService::compute(dec!(10), &FinancialAdjustments::default()).unwrap());
        }
        edited.buyer.name = "Someone Else".to_string();
        edited.history.push(TransitionRecord {
            from: InvoiceStatus::Draft.into(),
            to: InvoiceStatus::Paid.into(),
            action: Action::Settle,
            actor: None,
            reason: None,
            at: Utc::now(),
        });

        stored.apply_edits(edited).unwrap();
        assert_eq!(stored.items().len(), 2);
        assert_eq!(stored.notes(), Some("net 30"));
        assert_eq!(stored.body().adjustments().unwrap().tax_percentage, dec!(5));
        assert_eq!(stored.buyer().name, "Buyer Co");
        assert!(stored.history().is_empty());
        assert_eq!(stored.body().frozen_totals(), None);
        assert_eq!(stored.engine_state_field(), None);
    }

    #[test]
    fn test_apply_edits_rejects_bad_adjustments() {
        let (buyer, seller) = parties();
        let mut stored = Document::new(DocumentKind::Quotation, buyer, seller);
        let mut edited = stored.clone();
        if let DocumentBody::Quotation(body) = &mut edited.body {
            body.adjustments.discount_percentage = dec!(150);
        }
        assert!(matches!(
            stored.apply_edits(edited),
            Err(EngineError::Validation { .. })
        ));
    }

    #[test]
    fn test_engine_state_field() {
        let (buyer, seller) = parties();
        let fresh = Document::new(DocumentKind::Contract, buyer, seller);
        assert_eq!(fresh.engine_state_field(), None);

        let mut signed = fresh.clone();
        if let DocumentBody::Contract(body) = &mut signed.body {
            body.signature = Some("memory://sig.png".to_string());
        }
        assert_eq!(signed.engine_state_field(), Some("signature"));

        let mut frozen = fresh.clone();
        frozen
            .body
            .set_frozen_totals(TotalsService::compute(dec!(10), &FinancialAdjustments::default()).unwrap());
        assert_eq!(frozen.engine_state_field(), Some("totals"));
    }
}
