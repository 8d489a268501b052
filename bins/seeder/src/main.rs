//! Procura seeder.
//!
//! Runs a complete RFQ → Quotation → Contract → Purchase Order → Invoice
//! chain through the engine using the in-memory repository, the configured
//! file store and the JSON renderer, then prints the paid invoice.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use anyhow::Context;
use chrono::{Duration, Utc};
use rust_decimal_macros::dec;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use procura_core::attachment::{AttachmentPurpose, FileUpload};
use procura_core::document::{Document, DocumentBody, DocumentKind, PartySnapshot};
use procura_core::line_items::LineItem;
use procura_core::render::JsonRenderer;
use procura_core::repository::InMemoryDocumentRepository;
use procura_core::storage::{StorageConfig, StorageService};
use procura_core::totals::FinancialAdjustments;
use procura_core::workflow::Action;
use procura_core::{PaymentCommand, ProcurementEngine, TransitionCommand};
use procura_shared::AppConfig;
use procura_shared::config::LoggingConfig;
use procura_shared::types::{CurrencyCode, OrganizationId};

type Engine = ProcurementEngine<InMemoryDocumentRepository, StorageService, JsonRenderer>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    let store = StorageService::from_config(StorageConfig::from_settings(&config.storage))
        .context("Failed to initialize file store")?;
    info!(provider = store.provider_name(), "File store ready");

    let currency: CurrencyCode = config
        .engine
        .default_currency
        .parse()
        .context("Invalid engine.default_currency")?;
    let engine = ProcurementEngine::new(
        Arc::new(InMemoryDocumentRepository::from_config(&config.engine)),
        Arc::new(store),
        Arc::new(JsonRenderer::pretty()),
    )
    .with_default_currency(currency);

    let buyer = PartySnapshot::new(OrganizationId::new(), "Acme Manufacturing")
        .with_contact_person("Dana Buyer")
        .with_email("purchasing@acme.test")
        .with_address("12 Industrial Park, Pune");
    let seller = PartySnapshot::new(OrganizationId::new(), "Globex Valves")
        .with_contact_person("Sam Seller")
        .with_email("sales@globex.test")
        .with_address("4 Harbour Road, Chennai");

    let invoice = run_chain(&engine, buyer, seller).await?;

    let rendered = engine
        .render(DocumentKind::Invoice, invoice.id())
        .await
        .context("Failed to render invoice")?;
    println!("{}", String::from_utf8_lossy(&rendered));

    info!("Seeding complete");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| logging.filter.clone().into());
    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn run_chain(
    engine: &Engine,
    buyer: PartySnapshot,
    seller: PartySnapshot,
) -> anyhow::Result<Document> {
    let buyer_id = buyer.organization_id;
    let seller_id = seller.organization_id;

    // RFQ
    let mut rfq = engine.new_document(DocumentKind::Rfq, buyer, seller);
    rfq.items_mut()?.add_line(
        LineItem::new("Gate valve DN50", dec!(10))
            .with_unit_of_measure("pcs")
            .with_sku("GV-50"),
    )?;
    if let DocumentBody::Rfq(body) = rfq.body_mut()? {
        body.required_by = Some((Utc::now() + Duration::days(30)).date_naive());
    }
    let rfq = engine.create(buyer_id, rfq).await?;
    engine
        .transition(DocumentKind::Rfq, rfq.id(), TransitionCommand::new(Action::Submit, buyer_id))
        .await?;

    // Quotation
    let mut quotation = engine
        .derive_from(DocumentKind::Rfq, rfq.id(), DocumentKind::Quotation)
        .await?;
    if let Some(line) = quotation.items_mut()?.line_mut(0) {
        line.unit_price = Some(dec!(90));
    }
    let quotation = engine.create(seller_id, quotation).await?;
    engine
        .transition(
            DocumentKind::Quotation,
            quotation.id(),
            TransitionCommand::new(Action::Submit, seller_id),
        )
        .await?;
    engine
        .transition(
            DocumentKind::Quotation,
            quotation.id(),
            TransitionCommand::new(Action::Accept, buyer_id),
        )
        .await?;

    // Contract, signed by the buyer
    let mut contract = engine
        .derive_from(DocumentKind::Quotation, quotation.id(), DocumentKind::Contract)
        .await?;
    if let DocumentBody::Contract(body) = contract.body_mut()? {
        body.terms = Some("Net 30. Delivery within 3 weeks of order.".to_string());
    }
    let contract = engine.create(seller_id, contract).await?;
    engine
        .transition(
            DocumentKind::Contract,
            contract.id(),
            TransitionCommand::new(Action::Submit, seller_id),
        )
        .await?;
    let signature = FileUpload::new(
        "signature.png",
        "image/png",
        b"\x89PNG\r\n\x1a\n".to_vec(),
        AttachmentPurpose::Signature,
    );
    engine
        .transition(
            DocumentKind::Contract,
            contract.id(),
            TransitionCommand::new(Action::Sign, buyer_id).with_attachment(signature),
        )
        .await?;

    // Purchase order
    let purchase_order = engine.derive_purchase_order(Some(contract.id()), None).await?;
    let purchase_order = engine.create(buyer_id, purchase_order).await?;
    for (action, actor) in [(Action::Submit, buyer_id), (Action::Approve, seller_id)] {
        engine
            .transition(
                DocumentKind::PurchaseOrder,
                purchase_order.id(),
                TransitionCommand::new(action, actor),
            )
            .await?;
    }

    // Delivery note and packing list
    let delivery_note = engine
        .derive_from(DocumentKind::PurchaseOrder, purchase_order.id(), DocumentKind::DeliveryNote)
        .await?;
    let delivery_note = engine.create(seller_id, delivery_note).await?;
    for (action, actor) in [(Action::Dispatch, seller_id), (Action::Acknowledge, buyer_id)] {
        engine
            .transition(
                DocumentKind::DeliveryNote,
                delivery_note.id(),
                TransitionCommand::new(action, actor),
            )
            .await?;
    }
    let packing_list = engine
        .derive_from(DocumentKind::PurchaseOrder, purchase_order.id(), DocumentKind::PackingList)
        .await?;
    engine.create(seller_id, packing_list).await?;

    // Invoice with 5% tax
    let mut invoice = engine
        .derive_from(DocumentKind::PurchaseOrder, purchase_order.id(), DocumentKind::Invoice)
        .await?;
    invoice.set_adjustments(FinancialAdjustments::new(dec!(0), dec!(0), dec!(5)))?;
    if let DocumentBody::Invoice(body) = invoice.body_mut()? {
        body.due_date = Some((Utc::now() + Duration::days(30)).date_naive());
    }
    let invoice = engine.create(seller_id, invoice).await?;
    engine
        .transition(
            DocumentKind::Invoice,
            invoice.id(),
            TransitionCommand::new(Action::Submit, seller_id),
        )
        .await?;

    engine
        .transition(
            DocumentKind::PurchaseOrder,
            purchase_order.id(),
            TransitionCommand::new(Action::Complete, buyer_id),
        )
        .await?;

    let paid = engine
        .apply_payment(invoice.id(), PaymentCommand::full(buyer_id).with_receipt_reference("BANK-TRX-0001"))
        .await?;
    info!(
        reference = paid.reference().unwrap_or_default(),
        status = %paid.status(),
        "Invoice settled"
    );
    Ok(paid)
}
