//! Client record value type

use serde::{Deserialize, Serialize};

/// Numeric client identifier
pub type ClientId = i64;

/// One customer entry.
///
/// Every attribute is optional. A record without an `id` has no stable
/// identity and is never stored by the index. The email doubles as a
/// case-insensitive secondary key.
///
/// Field names serialize in camelCase. The French names emitted by older
/// pipeline exports (`nom`, `prenom`, `telephone`, `adresse`, `ville`,
/// `codePostal`) are accepted on input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecord {
    #[serde(default)]
    pub id: Option<ClientId>,

    /// Family name
    #[serde(default, alias = "nom", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, alias = "prenom", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, alias = "telephone", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, alias = "adresse", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, alias = "ville", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(default, alias = "codePostal", skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

impl ClientRecord {
    /// Create an empty record carrying only an id
    pub fn with_id(id: ClientId) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }

    /// Builder-style email setter
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Builder-style name setter
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder-style city setter
    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// The secondary lookup key: lowercased email, or `None` when the
    /// email is absent or empty.
    pub fn normalized_email(&self) -> Option<String> {
        self.email
            .as_deref()
            .filter(|e| !e.is_empty())
            .map(str::to_lowercase)
    }

    /// Overwrite every mutable attribute with the values from `other`.
    ///
    /// The id is never touched. Absent values in `other` clear the
    /// corresponding field, so a partial body behaves as a full replace
    /// of the mutable attributes.
    pub fn apply_update(&mut self, other: &ClientRecord) {
        self.name = other.name.clone();
        self.first_name = other.first_name.clone();
        self.email = other.email.clone();
        self.phone = other.phone.clone();
        self.address = other.address.clone();
        self.city = other.city.clone();
        self.postal_code = other.postal_code.clone();
    }

    /// Case-insensitive substring match of `filter` against `field`.
    ///
    /// An empty filter matches everything; a non-empty filter never
    /// matches an absent field.
    pub(crate) fn field_contains(field: Option<&str>, filter: &str) -> bool {
        if filter.is_empty() {
            return true;
        }
        field
            .map(|value| value.to_lowercase().contains(&filter.to_lowercase()))
            .unwrap_or(false)
    }
}
