//! The procurement engine facade.

use std::sync::Arc;

use procura_shared::types::{AttachmentId, CurrencyCode, DocumentId, OrganizationId};
use tracing::{error, info, warn};

use super::types::{PaymentCommand, TransitionCommand};
use crate::attachment::{AttachmentRef, AttachmentService, FileUpload};
use crate::derivation::DerivationService;
use crate::document::{Document, DocumentKind, PartySnapshot, Side};
use crate::error::{EngineError, EngineResult};
use crate::line_items::LineItemSet;
use crate::payment::{PaymentLedger, PaymentRequest};
use crate::render::DocumentRenderer;
use crate::repository::{DocumentFilter, DocumentRepository};
use crate::storage::FileStore;
use crate::totals::{FinancialAdjustments, Totals, TotalsService};
use crate::workflow::{Action, TransitionRequest, WorkflowService};

/// Receipt placeholder used to validate a payment before its file is stored.
const PENDING_RECEIPT: &str = "pending-upload";

/// Inbound operations over a repository, a file store and a renderer.
///
/// The engine never retries. A `Conflict` means another writer saved the
/// document first; callers reload and try again.
pub struct ProcurementEngine<R, F, D>
where
    R: DocumentRepository,
    F: FileStore,
    D: DocumentRenderer,
{
    repository: Arc<R>,
    attachments: AttachmentService<F>,
    renderer: Arc<D>,
    default_currency: CurrencyCode,
}

impl<R, F, D> Clone for ProcurementEngine<R, F, D>
where
    R: DocumentRepository,
    F: FileStore,
    D: DocumentRenderer,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            attachments: self.attachments.clone(),
            renderer: Arc::clone(&self.renderer),
            default_currency: self.default_currency.clone(),
        }
    }
}

impl<R, F, D> ProcurementEngine<R, F, D>
where
    R: DocumentRepository,
    F: FileStore,
    D: DocumentRenderer,
{
    /// Creates an engine over the given collaborators.
    #[must_use]
    pub fn new(repository: Arc<R>, store: Arc<F>, renderer: Arc<D>) -> Self {
        Self {
            repository,
            attachments: AttachmentService::new(store),
            renderer,
            default_currency: CurrencyCode::default(),
        }
    }

    /// Set the currency given to documents built with [`new_document`](Self::new_document).
    #[must_use]
    pub fn with_default_currency(mut self, currency: CurrencyCode) -> Self {
        self.default_currency = currency;
        self
    }

    /// The repository this engine writes to.
    #[must_use]
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Builds an unsaved draft in the engine's default currency.
    #[must_use]
    pub fn new_document(
        &self,
        kind: DocumentKind,
        buyer: PartySnapshot,
        seller: PartySnapshot,
    ) -> Document {
        let mut document = Document::new(kind, buyer, seller);
        document.currency = self.default_currency.clone();
        document
    }

    /// Persists a new document issued by `actor`.
    ///
    /// # Errors
    ///
    /// * `UnauthorizedAction` unless `actor` is the issuing organization
    /// * `Validation` if the document is not new, not in its initial state,
    ///   has the same organization on both sides, or carries state only the
    ///   engine writes (history, attachments, frozen totals, payments)
    /// * `AmbiguousSource` if a purchase order links to both a contract and a quotation
    /// * repository errors
    pub async fn create(&self, actor: OrganizationId, document: Document) -> EngineResult<Document> {
        if document.version() != 0 || document.reference().is_some() {
            return Err(EngineError::validation(
                "version",
                "document has already been saved",
            ));
        }
        if !document.status().is_initial() {
            return Err(EngineError::validation(
                "status",
                format!(
                    "new {} documents must start in {}, got {}",
                    document.kind(),
                    crate::workflow::DocumentStatus::initial(document.kind()),
                    document.status()
                ),
            ));
        }
        if document.buyer().organization_id == document.seller().organization_id {
            return Err(EngineError::validation(
                "seller.organization_id",
                "buyer and seller must be different organizations",
            ));
        }
        ensure_issuer(&document, actor)?;
        if let Some(field) = document.engine_state_field() {
            warn!(document_id = %document.id(), actor = %actor, field, "Rejected new document with engine state");
            return Err(EngineError::validation(
                field,
                "new documents cannot carry engine-written state",
            ));
        }
        if let Some(adjustments) = document.body().adjustments() {
            adjustments.validate()?;
        }
        let mut document = document;
        document.items = LineItemSet::from_lines(document.items.lines().iter().cloned())?;
        DerivationService::check_links(&document)?;

        let saved = self.repository.save(document).await?;
        info!(
            document_id = %saved.id(),
            kind = %saved.kind(),
            actor = %actor,
            reference = saved.reference().unwrap_or_default(),
            "Document created"
        );
        Ok(saved)
    }

    /// Saves edits made by the issuer to a document in an editable state.
    ///
    /// Only lines, notes, currency and the body's links, dates, terms and
    /// adjustments are taken from `document`; everything else keeps its
    /// stored value.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the document does not exist
    /// * `UnauthorizedAction` unless `actor` is the issuing organization
    /// * `NotEditable` if the stored document has left its editable state
    /// * `Validation` for out-of-range adjustments or negative line values
    /// * `AmbiguousSource` for a purchase order linked to both a contract and a quotation
    /// * `Conflict` if the document changed since it was loaded
    pub async fn update_draft(
        &self,
        actor: OrganizationId,
        document: Document,
    ) -> EngineResult<Document> {
        let mut stored = self.repository.load(document.kind(), document.id()).await?;
        ensure_issuer(&stored, actor)?;
        stored.ensure_editable()?;
        if stored.version() != document.version() || stored.status() != document.status() {
            return Err(EngineError::Conflict {
                document_id: document.id(),
                expected: document.version(),
                actual: stored.version(),
            });
        }
        stored.apply_edits(document)?;
        DerivationService::check_links(&stored)?;
        stored.touch(chrono::Utc::now());
        self.repository.save(stored).await
    }

    /// Loads a document.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if absent.
    pub async fn load(&self, kind: DocumentKind, id: DocumentId) -> EngineResult<Document> {
        self.repository.load(kind, id).await
    }

    /// Applies a lifecycle action and saves the result.
    ///
    /// A file in the command is only stored once the action is known to be legal.
    ///
    /// # Errors
    ///
    /// Everything [`WorkflowService::transition`] returns, plus storage and
    /// repository errors.
    pub async fn transition(
        &self,
        kind: DocumentKind,
        id: DocumentId,
        command: TransitionCommand,
    ) -> EngineResult<Document> {
        let document = self.repository.load(kind, id).await?;
        let from = document.status();

        let mut request = TransitionRequest::new(command.action, command.actor).at(command.at);
        request.reason = command.reason;

        if let Some(upload) = command.attachment {
            WorkflowService::transition(document.clone(), &request)?;
            let attachment = self.store(command.actor, id, upload).await?;
            request = request.with_attachment(attachment);
        }

        let updated = match WorkflowService::transition(document, &request) {
            Ok(updated) => updated,
            Err(e) => {
                warn!(
                    document_id = %id,
                    kind = %kind,
                    from = %from,
                    action = %command.action,
                    actor = %command.actor,
                    error = %e,
                    "Transition rejected"
                );
                if let Some(attachment) = &request.attachment {
                    self.discard(attachment).await;
                }
                return Err(e);
            }
        };

        let saved = self.save_or_discard(updated, request.attachment.as_ref()).await?;
        info!(
            document_id = %id,
            kind = %kind,
            from = %from,
            to = %saved.status(),
            action = %command.action,
            actor = %command.actor,
            "Document transitioned"
        );
        Ok(saved)
    }

    /// Builds an unsaved draft of type `target` from a stored source.
    ///
    /// # Errors
    ///
    /// `NotFound` for a missing source, plus everything
    /// [`DerivationService::derive_from`] returns.
    pub async fn derive_from(
        &self,
        source_kind: DocumentKind,
        source_id: DocumentId,
        target: DocumentKind,
    ) -> EngineResult<Document> {
        let source = self.repository.load(source_kind, source_id).await?;
        let derived = DerivationService::derive_from(&source, target)?;
        info!(
            source_id = %source_id,
            source_kind = %source_kind,
            document_id = %derived.id(),
            kind = %target,
            "Document derived"
        );
        Ok(derived)
    }

    /// Builds an unsaved purchase order from exactly one of a contract or a quotation.
    ///
    /// # Errors
    ///
    /// * `AmbiguousSource` if both are given
    /// * `Validation` if neither is given
    /// * everything [`derive_from`](Self::derive_from) returns
    pub async fn derive_purchase_order(
        &self,
        contract_id: Option<DocumentId>,
        quotation_id: Option<DocumentId>,
    ) -> EngineResult<Document> {
        match (contract_id, quotation_id) {
            (Some(contract_id), Some(quotation_id)) => Err(EngineError::AmbiguousSource {
                sources: vec![contract_id, quotation_id],
            }),
            (Some(contract_id), None) => {
                self.derive_from(DocumentKind::Contract, contract_id, DocumentKind::PurchaseOrder)
                    .await
            }
            (None, Some(quotation_id)) => {
                self.derive_from(
                    DocumentKind::Quotation,
                    quotation_id,
                    DocumentKind::PurchaseOrder,
                )
                .await
            }
            (None, None) => Err(EngineError::validation(
                "sources",
                "a contract or a quotation is required",
            )),
        }
    }

    /// Applies a payment from the invoice's buyer and saves the result.
    ///
    /// # Errors
    ///
    /// * `UnauthorizedAction` if the actor is not the buyer
    /// * everything [`PaymentLedger::apply_payment`] returns
    /// * storage and repository errors
    pub async fn apply_payment(
        &self,
        invoice_id: DocumentId,
        command: PaymentCommand,
    ) -> EngineResult<Document> {
        let invoice = self.repository.load(DocumentKind::Invoice, invoice_id).await?;
        if invoice.side_of(command.actor) != Some(Side::Buyer) {
            warn!(document_id = %invoice_id, actor = %command.actor, "Payment rejected: actor is not the buyer");
            return Err(EngineError::UnauthorizedAction {
                document_id: invoice_id,
                action: Action::Settle,
                actor: command.actor,
            });
        }

        let mut request = PaymentRequest {
            kind: command.kind,
            amount: command.amount,
            receipt_reference: command.receipt_reference,
            paid_at: command.paid_at,
        };

        let mut receipt = None;
        if let Some(upload) = command.receipt {
            let dry_run = PaymentRequest {
                receipt_reference: Some(PENDING_RECEIPT.to_string()),
                ..request.clone()
            };
            PaymentLedger::apply_payment(invoice.clone(), &dry_run)?;
            let attachment = self.store(command.actor, invoice_id, upload).await?;
            request.receipt_reference = Some(attachment.reference.clone());
            receipt = Some(attachment);
        }

        let mut updated = match PaymentLedger::apply_payment(invoice, &request) {
            Ok(updated) => updated,
            Err(e) => {
                warn!(document_id = %invoice_id, kind = %request.kind, error = %e, "Payment rejected");
                if let Some(attachment) = &receipt {
                    self.discard(attachment).await;
                }
                return Err(e);
            }
        };
        if let Some(attachment) = &receipt {
            updated.attachments.push(attachment.clone());
        }

        let saved = self.save_or_discard(updated, receipt.as_ref()).await?;
        info!(
            document_id = %invoice_id,
            kind = %request.kind,
            status = %saved.status(),
            actor = %command.actor,
            "Payment applied"
        );
        Ok(saved)
    }

    /// Marks a PENDING invoice whose due date has passed as OVERDUE.
    ///
    /// # Errors
    ///
    /// Same as [`transition`](Self::transition) with `mark_overdue`.
    pub async fn mark_overdue(
        &self,
        invoice_id: DocumentId,
        actor: OrganizationId,
        at: chrono::DateTime<chrono::Utc>,
    ) -> EngineResult<Document> {
        let invoice = self.repository.load(DocumentKind::Invoice, invoice_id).await?;
        let updated = PaymentLedger::mark_overdue(invoice, actor, at)?;
        let saved = self.repository.save(updated).await?;
        info!(document_id = %invoice_id, actor = %actor, "Invoice marked overdue");
        Ok(saved)
    }

    /// Computes totals for a set of lines and adjustments.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for out-of-range adjustments.
    pub fn compute_totals(
        &self,
        items: &LineItemSet,
        adjustments: &FinancialAdjustments,
    ) -> EngineResult<Totals> {
        TotalsService::compute_for_items(items, adjustments)
    }

    /// Renders a stored document.
    ///
    /// # Errors
    ///
    /// `NotFound`, or `Render` from the renderer.
    pub async fn render(&self, kind: DocumentKind, id: DocumentId) -> EngineResult<Vec<u8>> {
        let document = self.repository.load(kind, id).await?;
        self.renderer.render(&document)
    }

    /// Lists stored documents matching `filter`.
    ///
    /// # Errors
    ///
    /// Repository errors.
    pub async fn query(&self, filter: DocumentFilter) -> EngineResult<Vec<Document>> {
        self.repository.query(filter).await
    }

    /// Reads back the bytes of an attachment recorded on a document.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the document does not exist
    /// * `Validation` if the document has no such attachment
    /// * storage errors, including a file missing from the store
    pub async fn download_attachment(
        &self,
        kind: DocumentKind,
        id: DocumentId,
        attachment_id: AttachmentId,
    ) -> EngineResult<Vec<u8>> {
        let document = self.repository.load(kind, id).await?;
        let attachment = document
            .attachments()
            .iter()
            .find(|a| a.id == attachment_id)
            .ok_or_else(|| {
                EngineError::validation(
                    "attachment_id",
                    format!("document {id} has no attachment {attachment_id}"),
                )
            })?;
        Ok(self.attachments.download(attachment).await?)
    }

    /// Saves `document`, removing a freshly stored file if the save fails.
    async fn save_or_discard(
        &self,
        document: Document,
        uploaded: Option<&AttachmentRef>,
    ) -> EngineResult<Document> {
        let document_id = document.id();
        match self.repository.save(document).await {
            Ok(saved) => Ok(saved),
            Err(e) => {
                warn!(document_id = %document_id, error = %e, "Save failed");
                if let Some(attachment) = uploaded {
                    self.discard(attachment).await;
                }
                Err(e)
            }
        }
    }

    async fn discard(&self, attachment: &AttachmentRef) {
        if let Err(e) = self.attachments.discard(attachment).await {
            error!(
                storage_key = %attachment.storage_key,
                error = %e,
                "Failed to remove orphaned attachment"
            );
        }
    }

    async fn store(
        &self,
        actor: OrganizationId,
        document_id: DocumentId,
        upload: FileUpload,
    ) -> EngineResult<AttachmentRef> {
        Ok(self
            .attachments
            .upload(actor, Some(document_id), upload)
            .await?)
    }
}

fn ensure_issuer(document: &Document, actor: OrganizationId) -> EngineResult<()> {
    if document.side_of(actor) == Some(document.kind().issuer_side()) {
        Ok(())
    } else {
        warn!(document_id = %document.id(), actor = %actor, "Edit rejected: actor is not the issuer");
        Err(EngineError::UnauthorizedAction {
            document_id: document.id(),
            action: Action::Edit,
            actor,
        })
    }
}
