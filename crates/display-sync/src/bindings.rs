use consign_core_types::SellerRecord;
use serde::{Deserialize, Serialize};

const LABEL: &str = "Consignor: ";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayField {
    Name,
    Email,
    AddressLine1,
    AddressLine2,
    Phone,
}

/// A display node and the record field it shows
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayBinding {
    pub selector: String,
    pub field: DisplayField,
}

impl DisplayBinding {
    pub fn new(selector: impl Into<String>, field: DisplayField) -> Self {
        Self {
            selector: selector.into(),
            field,
        }
    }
}

pub fn default_bindings() -> Vec<DisplayBinding> {
    [
        ("seller-name", DisplayField::Name),
        ("seller-email", DisplayField::Email),
        ("seller-address-line-1", DisplayField::AddressLine1),
        ("seller-address-line-2", DisplayField::AddressLine2),
        ("seller-phone", DisplayField::Phone),
    ]
    .into_iter()
    .map(|(test_id, field)| DisplayBinding::new(format!("p[data-testid=\"{test_id}\"]"), field))
    .collect()
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn join_present(parts: &[Option<&str>], sep: &str) -> Option<String> {
    let joined = parts.iter().flatten().copied().collect::<Vec<_>>().join(sep);
    (!joined.is_empty()).then_some(joined)
}

/// Text a node bound to `field` should show for `record`.
///
/// `None` when the record has nothing for that field; the node is then left alone.
pub fn render(field: DisplayField, record: &SellerRecord) -> Option<String> {
    match field {
        DisplayField::Name => Some(record.full_name())
            .filter(|name| !name.is_empty())
            .map(|name| format!("{LABEL}{name}")),
        DisplayField::Email => present(&record.email).map(|email| format!("{LABEL}{email}")),
        DisplayField::AddressLine1 => {
            present(&record.address1).map(|line| format!("{LABEL}{line}"))
        }
        DisplayField::AddressLine2 => {
            let region = join_present(&[present(&record.state), present(&record.postal)], " ");
            let locality = join_present(&[present(&record.city), region.as_deref()], ", ");
            join_present(&[present(&record.address2), locality.as_deref()], " ")
        }
        DisplayField::Phone => present(&record.phone).map(|phone| format!("{LABEL}{phone}")),
    }
}
