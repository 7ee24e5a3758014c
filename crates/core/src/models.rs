//! Data model shared by the inventory source, the reconciler and the
//! marketplace clients.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Marketplace identifier of a product listing (seller SKU / offer id).
pub type OfferId = String;

/// A single spreadsheet cell as delivered by the inventory source.
///
/// Spreadsheet readers surface numbers as floats, so a product code typed as
/// `46864` usually arrives as `Float(46864.0)`. The [`Display`](fmt::Display)
/// form is what gets compared against offer ids and fed to the normalizers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum RawValue {
    Integer(i64),
    Float(f64),
    Text(String),
    #[default]
    Empty,
}

impl RawValue {
    pub fn is_empty(&self) -> bool {
        match self {
            RawValue::Empty => true,
            RawValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Integer(value) => write!(f, "{}", value),
            // Integral floats print like the integer the vendor typed.
            RawValue::Float(value)
                if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 =>
            {
                write!(f, "{}", *value as i64)
            }
            RawValue::Float(value) => write!(f, "{}", value),
            RawValue::Text(value) => f.write_str(value),
            RawValue::Empty => Ok(()),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Integer(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Float(value)
    }
}

/// One row of the vendor's inventory spreadsheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct VendorRecord {
    /// Vendor product code, matched against marketplace offer ids
    pub code: RawValue,
    /// Quantity cell, possibly a sentinel such as ">10"
    pub quantity: RawValue,
    /// Locale-formatted price cell, e.g. "5'990.00 руб."
    pub price: RawValue,
}

impl VendorRecord {
    pub fn new(
        code: impl Into<RawValue>,
        quantity: impl Into<RawValue>,
        price: impl Into<RawValue>,
    ) -> Self {
        Self {
            code: code.into(),
            quantity: quantity.into(),
            price: price.into(),
        }
    }

    /// The code in the form offer ids are compared against.
    pub fn offer_key(&self) -> String {
        self.code.to_string()
    }
}

/// Offer ids listed on a marketplace, in the order they were fetched.
///
/// Duplicates are dropped on insert; the first occurrence keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferIdSet {
    ids: Vec<OfferId>,
    index: HashSet<OfferId>,
}

impl OfferIdSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an id, returning `false` if it was already present.
    pub fn insert(&mut self, id: impl Into<OfferId>) -> bool {
        let id = id.into();
        if self.index.contains(&id) {
            return false;
        }
        self.index.insert(id.clone());
        self.ids.push(id);
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OfferId> {
        self.ids.iter()
    }
}

impl<S: Into<OfferId>> FromIterator<S> for OfferIdSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = OfferIdSet::new();
        set.extend(iter);
        set
    }
}

impl<S: Into<OfferId>> Extend<S> for OfferIdSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for id in iter {
            self.insert(id);
        }
    }
}

impl<'a> IntoIterator for &'a OfferIdSet {
    type Item = &'a OfferId;
    type IntoIter = std::slice::Iter<'a, OfferId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

/// Stock level to push for one offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockUpdate {
    pub offer_id: OfferId,
    pub quantity: u32,
    /// Target warehouse, required by platforms that track stock per warehouse
    pub warehouse_id: Option<String>,
    /// When the stock level was observed
    pub updated_at: Option<DateTime<Utc>>,
}

impl StockUpdate {
    pub fn new(offer_id: impl Into<OfferId>, quantity: u32) -> Self {
        Self {
            offer_id: offer_id.into(),
            quantity,
            warehouse_id: None,
            updated_at: None,
        }
    }
}

/// Price to push for one offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceUpdate {
    pub offer_id: OfferId,
    /// Whole currency units
    pub amount: u64,
    /// Platform-specific currency code ("RUB", "RUR", ...)
    pub currency: String,
}
