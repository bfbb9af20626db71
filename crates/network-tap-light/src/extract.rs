//! Seller-record extraction from listing payloads.

use consign_core_types::{EntityId, SellerRecord};
use serde_json::Value;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// Body is not JSON or the listing history has an unexpected shape
    #[error("parse failure: {0}")]
    ParseFailure(String),
    /// Seller fields were present but no identifier could be derived
    #[error("seller data present but no identifier among {fields:?}")]
    MissingIdentifier { fields: Vec<String> },
}

/// Recognised `seller_info` keys, in record order.
const SELLER_FIELDS: [&str; 10] = [
    "seller_email",
    "seller_first_name",
    "seller_last_name",
    "seller_address_line1",
    "seller_address_line2",
    "seller_city",
    "seller_state",
    "seller_postal",
    "seller_phone",
    "seller_id",
];

/// Parse a raw response body and extract a record.
pub fn extract_from_body(
    body: &[u8],
    identifier_fields: &[String],
) -> Result<Option<(EntityId, SellerRecord)>, ExtractError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|err| ExtractError::ParseFailure(format!("invalid JSON body: {err}")))?;
    extract_seller_record(&value, identifier_fields)
}

/// Take the last `data.history.listings` entry and build a record from its `seller_info`.
///
/// `Ok(None)` means the payload simply carries no seller data.
pub fn extract_seller_record(
    payload: &Value,
    identifier_fields: &[String],
) -> Result<Option<(EntityId, SellerRecord)>, ExtractError> {
    let Some(listings) = payload.pointer("/data/history/listings") else {
        return Ok(None);
    };
    let listings = listings.as_array().ok_or_else(|| {
        ExtractError::ParseFailure("data.history.listings is not an array".to_string())
    })?;
    let Some(last) = listings.last() else {
        return Ok(None);
    };
    let Some(seller_info) = last.get("seller_info").and_then(Value::as_object) else {
        return Ok(None);
    };
    if !SELLER_FIELDS
        .iter()
        .any(|field| seller_info.get(*field).is_some_and(|v| !v.is_null()))
    {
        return Ok(None);
    }

    let id = identifier_fields
        .iter()
        .find_map(|field| last.get(field).and_then(coerce_identifier))
        .ok_or_else(|| ExtractError::MissingIdentifier {
            fields: identifier_fields.to_vec(),
        })?;

    let field = |key: &str| seller_info.get(key).and_then(coerce_text);
    let record = SellerRecord {
        email: field("seller_email"),
        first_name: field("seller_first_name"),
        last_name: field("seller_last_name"),
        address1: field("seller_address_line1"),
        address2: field("seller_address_line2"),
        city: field("seller_city"),
        state: field("seller_state"),
        postal: field("seller_postal"),
        phone: field("seller_phone"),
        seller_id: field("seller_id"),
    };
    Ok(Some((id, record)))
}

fn coerce_identifier(value: &Value) -> Option<EntityId> {
    match value {
        Value::String(raw) => EntityId::parse(raw),
        Value::Number(number) => EntityId::parse(number.to_string()),
        _ => None,
    }
}

fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
