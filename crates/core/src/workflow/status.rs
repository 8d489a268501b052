//! Per-type status enumerations.
//!
//! Each document type has its own closed status enum. [`DocumentStatus`]
//! wraps them so a status always carries the type it belongs to.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::document::DocumentKind;

/// Generates a status enum with its wire name and display label per variant.
macro_rules! document_status {
    (
        $(#[$meta:meta])*
        $name:ident => $kind:ident {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = ($wire:literal, $label:literal)
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $name {
            /// All states of this type.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Returns the stable wire name of the status.
            #[must_use]
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }

            /// Returns the label shown to users.
            #[must_use]
            pub fn label(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }

            /// Parses a status from its wire name, ignoring case.
            pub fn parse(s: &str) -> Option<Self> {
                let s = s.trim().to_uppercase();
                Self::ALL.iter().copied().find(|status| status.as_str() == s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl From<$name> for DocumentStatus {
            fn from(status: $name) -> Self {
                Self::$kind(status)
            }
        }
    };
}

document_status! {
    /// RFQ lifecycle.
    RfqStatus => Rfq {
        /// Being drafted by the buyer.
        #[default]
        Draft = ("DRAFT", "Draft"),
        /// Sent to the seller.
        Pending = ("PENDING", "Pending"),
        /// Seller agreed to quote.
        Approved = ("APPROVED", "Approved"),
        /// Seller declined.
        Rejected = ("REJECTED", "Rejected"),
        /// Buyer closed the RFQ.
        Completed = ("COMPLETED", "Completed"),
    }
}

document_status! {
    /// Quotation lifecycle.
    QuotationStatus => Quotation {
        /// Being drafted by the seller.
        #[default]
        Draft = ("DRAFT", "Draft"),
        /// Issued to the buyer.
        Sent = ("SENT", "Pending"),
        /// Awaiting the buyer's decision.
        Pending = ("PENDING", "Pending"),
        /// Buyer accepted.
        Accepted = ("ACCEPTED", "Accepted"),
        /// Approved.
        Approved = ("APPROVED", "Approved"),
        /// Buyer rejected.
        Rejected = ("REJECTED", "Rejected"),
    }
}

document_status! {
    /// Contract lifecycle.
    ContractStatus => Contract {
        /// Being drafted by the seller.
        #[default]
        Draft = ("DRAFT", "Draft"),
        /// Issued to the buyer for signature.
        Sent = ("SENT", "Sent"),
        /// Buyer signed.
        Signed = ("SIGNED", "Signed"),
        /// Approved.
        Approved = ("APPROVED", "Approved"),
        /// Buyer rejected.
        Rejected = ("REJECTED", "Rejected"),
        /// Buyer asked for changes; editable again.
        PendingChanges = ("PENDING_CHANGES", "Pending Changes"),
    }
}

document_status! {
    /// Purchase order lifecycle.
    PurchaseOrderStatus => PurchaseOrder {
        /// Being drafted by the buyer.
        #[default]
        Draft = ("DRAFT", "Draft"),
        /// Issued to the seller.
        Pending = ("PENDING", "Pending"),
        /// Seller approved.
        Approved = ("APPROVED", "Approved"),
        /// Seller rejected.
        Rejected = ("REJECTED", "Rejected"),
        /// Fulfilled.
        Completed = ("COMPLETED", "Completed"),
    }
}

document_status! {
    /// Delivery note lifecycle.
    DeliveryNoteStatus => DeliveryNote {
        /// Prepared by the seller.
        #[default]
        Pending = ("PENDING", "Pending"),
        /// Goods are on their way.
        InTransit = ("IN_TRANSIT", "In Transit"),
        /// Buyer confirmed receipt.
        Acknowledged = ("ACKNOWLEDGED", "Acknowledged"),
        /// Buyer disputed the delivery.
        Disputed = ("DISPUTED", "Disputed"),
    }
}

document_status! {
    /// Packing list lifecycle.
    PackingListStatus => PackingList {
        /// Prepared by the seller.
        #[default]
        Pending = ("PENDING", "Pending"),
        /// Received by the buyer.
        Received = ("RECEIVED", "Received"),
        /// Approved.
        Approved = ("APPROVED", "Approved"),
        /// Buyer confirmed the contents.
        Acknowledged = ("ACKNOWLEDGED", "Acknowledged"),
        /// Rejected.
        Rejected = ("REJECTED", "Rejected"),
    }
}

document_status! {
    /// Invoice lifecycle.
    InvoiceStatus => Invoice {
        /// Being drafted by the seller.
        #[default]
        Draft = ("DRAFT", "Draft"),
        /// Issued and awaiting payment.
        Pending = ("PENDING", "Pending"),
        /// Buyer accepted.
        Accepted = ("ACCEPTED", "Accepted"),
        /// Buyer rejected.
        Rejected = ("REJECTED", "Rejected"),
        /// Due date passed without full payment.
        Overdue = ("OVERDUE", "Overdue"),
        /// Fully settled.
        Paid = ("PAID", "Paid"),
    }
}

/// A status tagged with the document type it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "status", rename_all = "snake_case")]
pub enum DocumentStatus {
    /// RFQ status.
    Rfq(RfqStatus),
    /// Quotation status.
    Quotation(QuotationStatus),
    /// Contract status.
    Contract(ContractStatus),
    /// Purchase order status.
    PurchaseOrder(PurchaseOrderStatus),
    /// Delivery note status.
    DeliveryNote(DeliveryNoteStatus),
    /// Packing list status.
    PackingList(PackingListStatus),
    /// Invoice status.
    Invoice(InvoiceStatus),
}

impl DocumentStatus {
    /// Returns the document type this status belongs to.
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

    /// Returns the stable wire name of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rfq(s) => s.as_str(),
            Self::Quotation(s) => s.as_str(),
            Self::Contract(s) => s.as_str(),
            Self::PurchaseOrder(s) => s.as_str(),
            Self::DeliveryNote(s) => s.as_str(),
            Self::PackingList(s) => s.as_str(),
            Self::Invoice(s) => s.as_str(),
        }
    }

    /// Returns the label shown to users.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Rfq(s) => s.label(),
            Self::Quotation(s) => s.label(),
            Self::Contract(s) => s.label(),
            Self::PurchaseOrder(s) => s.label(),
            Self::DeliveryNote(s) => s.label(),
            Self::PackingList(s) => s.label(),
            Self::Invoice(s) => s.label(),
        }
    }

    /// Parses a wire name as a status of the given document type.
    pub fn parse(kind: DocumentKind, s: &str) -> Option<Self> {
        match kind {
            DocumentKind::Rfq => RfqStatus::parse(s).map(Self::from),
            DocumentKind::Quotation => QuotationStatus::parse(s).map(Self::from),
            DocumentKind::Contract => ContractStatus::parse(s).map(Self::from),
            DocumentKind::PurchaseOrder => PurchaseOrderStatus::parse(s).map(Self::from),
            DocumentKind::DeliveryNote => DeliveryNoteStatus::parse(s).map(Self::from),
            DocumentKind::PackingList => PackingListStatus::parse(s).map(Self::from),
            DocumentKind::Invoice => InvoiceStatus::parse(s).map(Self::from),
        }
    }

    /// All states of the given document type.
    #[must_use]
    pub fn all_for(kind: DocumentKind) -> Vec<Self> {
        match kind {
            DocumentKind::Rfq => RfqStatus::ALL.iter().copied().map(Self::from).collect(),
            DocumentKind::Quotation => QuotationStatus::ALL.iter().copied().map(Self::from).collect(),
            DocumentKind::Contract => ContractStatus::ALL.iter().copied().map(Self::from).collect(),
            DocumentKind::PurchaseOrder => PurchaseOrderStatus::ALL
                .iter()
                .copied()
                .map(Self::from)
                .collect(),
            DocumentKind::DeliveryNote => DeliveryNoteStatus::ALL
                .iter()
                .copied()
                .map(Self::from)
                .collect(),
            DocumentKind::PackingList => PackingListStatus::ALL
                .iter()
                .copied()
                .map(Self::from)
                .collect(),
            DocumentKind::Invoice => InvoiceStatus::ALL.iter().copied().map(Self::from).collect(),
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
