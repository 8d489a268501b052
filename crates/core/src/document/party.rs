//! Counterparty snapshots.

use procura_shared::types::OrganizationId;
use serde::{Deserialize, Serialize};

/// Buyer or seller details copied into a document at creation time.
///
/// This is a value copy, not a reference to the organization's profile:
/// later profile edits never alter an already-issued document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartySnapshot {
    /// The organization this snapshot was taken from.
    pub organization_id: OrganizationId,
    /// Registered name.
    pub name: String,
    /// Contact person.
    pub contact_person: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
}

impl PartySnapshot {
    /// Creates a snapshot with only the organization and name set.
    #[must_use]
    pub fn new(organization_id: OrganizationId, name: impl Into<String>) -> Self {
        Self {
            organization_id,
            name: name.into(),
            contact_person: None,
            email: None,
            phone: None,
            address: None,
        }
    }

    /// Set the contact person.
    #[must_use]
    pub fn with_contact_person(mut self, contact_person: impl Into<String>) -> Self {
        self.contact_person = Some(contact_person.into());
        self
    }

    /// Set the email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the phone.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Set the address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Returns the first required field that is blank, if any.
    pub(crate) fn first_missing_field(&self, require_address: bool) -> Option<&'static str> {
        if self.name.trim().is_empty() {
            return Some("name");
        }
        if require_address && self.address.as_deref().is_none_or(|a| a.trim().is_empty()) {
            return Some("address");
        }
        None
    }
}
