//! Allow-list entries and the email matching rules.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

/// A ClearPass role a technician may assign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedRole {
    /// Display name of the role.
    #[serde(default)]
    pub name: String,
    /// Role id, written as a string or a number in the file.
    #[serde(deserialize_with = "role_id_as_string")]
    pub role_id: String,
}

/// One allow-list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowListEntry {
    /// Full email address or bare domain.
    pub email: String,
    /// Roles granted to matching users. Empty means no restriction.
    #[serde(default)]
    pub roles: Vec<AllowedRole>,
}

impl AllowListEntry {
    /// Whether this entry names a whole domain rather than one address.
    pub fn is_domain(&self) -> bool {
        !self.email.contains('@')
    }
}

/// The parsed allow-list file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowList {
    entries: Vec<AllowListEntry>,
}

impl AllowList {
    /// Build an allow-list from entries.
    pub fn new(entries: Vec<AllowListEntry>) -> Self {
        Self { entries }
    }

    /// All entries in file order.
    pub fn entries(&self) -> &[AllowListEntry] {
        &self.entries
    }

    /// Check whether an email may request a login code.
    ///
    /// Approved when it equals an email entry, or when it has exactly one
    /// `@` and the part after it equals a domain entry. Case-insensitive.
    pub fn is_approved(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();

        let exact = self
            .entries
            .iter()
            .filter(|e| !e.is_domain())
            .any(|e| e.email.to_lowercase() == email);
        if exact {
            return true;
        }

        let Some(domain) = email_domain(&email) else {
            return false;
        };

        self.entries
            .iter()
            .filter(|e| e.is_domain())
            .any(|e| e.email.to_lowercase() == domain)
    }

    /// Find the entry that governs an email: an exact address match wins
    /// over a domain match.
    pub fn entry_for(&self, email: &str) -> Option<&AllowListEntry> {
        let email = email.trim().to_lowercase();

        self.entries
            .iter()
            .find(|e| e.email.to_lowercase() == email)
            .or_else(|| {
                self.entries.iter().find(|e| {
                    let suffix = format!("@{}", e.email.to_lowercase());
                    email.ends_with(&suffix)
                })
            })
    }

    /// Roles granted to an email. Empty when no entry matches.
    pub fn roles_for(&self, email: &str) -> &[AllowedRole] {
        self.entry_for(email)
            .map(|e| e.roles.as_slice())
            .unwrap_or_default()
    }

    /// Role ids granted to an email. An empty set means no filtering.
    pub fn allowed_role_ids(&self, email: &str) -> HashSet<String> {
        self.roles_for(email)
            .iter()
            .map(|r| r.role_id.clone())
            .collect()
    }
}

/// Extract the domain of an address with exactly one `@` and a non-empty
/// local part.
fn email_domain(email: &str) -> Option<&str> {
    let (local, domain) = email.split_once('@')?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return None;
    }
    Some(domain)
}

fn role_id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}
