use std::fmt;

/// Opaque key correlating a cached record to the listing currently on screen.
///
/// Identifiers are always re-derived from the page or from a network payload;
/// they are never persisted between navigations.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(transparent))]
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct EntityId(String);

impl EntityId {
    /// Normalise a raw identifier. Returns `None` when nothing is left after trimming.
    pub fn parse(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Point-in-time snapshot of the seller's contact details, recovered from a network response.
#[cfg_attr(feature = "serde-full", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-full", serde(rename_all = "camelCase"))]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SellerRecord {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal: Option<String>,
    pub phone: Option<String>,
    pub seller_id: Option<String>,
}

impl SellerRecord {
    /// First and last name joined by a space, skipping missing parts.
    pub fn full_name(&self) -> String {
        join_present(&[&self.first_name, &self.last_name], " ")
    }
}

fn join_present(parts: &[&Option<String>], separator: &str) -> String {
    parts
        .iter()
        .filter_map(|part| part.as_deref())
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_trims_and_rejects_blank() {
        assert_eq!(EntityId::parse("  L1 ").unwrap().as_str(), "L1");
        assert!(EntityId::parse("   ").is_none());
    }

    #[test]
    fn full_name_joins_present_parts() {
        let record = SellerRecord {
            first_name: Some("Ada".into()),
            ..SellerRecord::default()
        };
        assert_eq!(record.full_name(), "Ada");
        let blank_last = SellerRecord {
            first_name: Some("Ada".into()),
            last_name: Some("  ".into()),
            ..SellerRecord::default()
        };
        assert_eq!(blank_last.full_name(), "Ada");
        assert_eq!(SellerRecord::default().full_name(), "");
    }
}
