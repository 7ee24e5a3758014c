//! Reconciliation of vendor records against a marketplace's offer ids.
//!
//! Only offers already listed on the marketplace receive updates. Vendor
//! records for unlisted products are skipped, and listed offers that the
//! vendor no longer carries are zeroed so they cannot be oversold.

use std::collections::HashSet;

use chrono::{DateTime, SubsecRound, Utc};
use log::{debug, warn};

use crate::errors::Result;
use crate::models::{OfferIdSet, PriceUpdate, StockUpdate, VendorRecord};
use crate::normalize::{normalize_price, normalize_quantity};

/// Builds one stock update per listed offer.
///
/// Matched offers come first, in vendor-record order, with the normalized
/// vendor quantity. Each offer id matches at most once, so a code repeated in
/// the feed only counts on its first row. Offers left unmatched follow in
/// `offer_ids` order with quantity 0.
///
/// `offer_ids` is not modified; matching works on a private copy. Every update
/// carries `warehouse_id` and `updated_at` (truncated to whole seconds).
pub fn reconcile_stocks(
    records: &[VendorRecord],
    offer_ids: &OfferIdSet,
    warehouse_id: Option<&str>,
    updated_at: Option<DateTime<Utc>>,
) -> Result<Vec<StockUpdate>> {
    let updated_at = updated_at.map(|at| at.trunc_subsecs(0));
    let make_update = |offer_id: String, quantity: u32| StockUpdate {
        offer_id,
        quantity,
        warehouse_id: warehouse_id.map(str::to_string),
        updated_at,
    };

    let mut remaining: HashSet<&str> = offer_ids.iter().map(String::as_str).collect();
    let mut updates = Vec::with_capacity(offer_ids.len());
    let mut skipped = 0usize;

    for record in records {
        let code = record.offer_key();
        if !remaining.remove(code.as_str()) {
            skipped += 1;
            continue;
        }
        let quantity = normalize_quantity(&record.quantity).map_err(|err| {
            warn!("Cannot build stock update for offer '{}': {}", code, err);
            err
        })?;
        updates.push(make_update(code, quantity));
    }

    let matched = updates.len();
    for offer_id in offer_ids {
        if remaining.contains(offer_id.as_str()) {
            updates.push(make_update(offer_id.clone(), 0));
        }
    }

    debug!(
        "Stock reconciliation: {} matched, {} zeroed, {} vendor rows skipped",
        matched,
        updates.len() - matched,
        skipped
    );
    Ok(updates)
}

/// Builds price updates for listed offers the vendor still carries.
///
/// Follows the same matching rules as [`reconcile_stocks`] but has no
/// fallback: listed offers missing from the feed keep their current price.
pub fn reconcile_prices(
    records: &[VendorRecord],
    offer_ids: &OfferIdSet,
    currency: &str,
) -> Result<Vec<PriceUpdate>> {
    let mut remaining: HashSet<&str> = offer_ids.iter().map(String::as_str).collect();
    let mut updates = Vec::new();

    for record in records {
        let code = record.offer_key();
        if !remaining.remove(code.as_str()) {
            continue;
        }
        let amount = normalize_price(&record.price).map_err(|err| {
            warn!("Cannot build price update for offer '{}': {}", code, err);
            err
        })?;
        updates.push(PriceUpdate {
            offer_id: code,
            amount,
            currency: currency.to_string(),
        });
    }

    debug!(
        "Price reconciliation: {} of {} listed offers priced",
        updates.len(),
        offer_ids.len()
    );
    Ok(updates)
}

/// Updates that leave the offer purchasable.
pub fn non_empty(stocks: &[StockUpdate]) -> Vec<StockUpdate> {
    stocks.iter().filter(|s| s.quantity != 0).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use chrono::TimeZone;

    fn offers(ids: &[&str]) -> OfferIdSet {
        ids.iter().copied().collect()
    }

    fn quantities(updates: &[StockUpdate]) -> Vec<(&str, u32)> {
        updates
            .iter()
            .map(|u| (u.offer_id.as_str(), u.quantity))
            .collect()
    }

    #[test]
    fn test_matched_then_zeroed_in_order() {
        let records = vec![
            VendorRecord::new("A", ">10", "1'000.00 руб."),
            VendorRecord::new("B", "1", "2'000.00 руб."),
        ];
        let offer_ids = offers(&["A", "B", "C"]);

        let updates = reconcile_stocks(&records, &offer_ids, None, None).unwrap();

        assert_eq!(quantities(&updates), vec![("A", 100), ("B", 0), ("C", 0)]);
    }

    #[test]
    fn test_matched_follow_vendor_order_and_zeroed_follow_offer_order() {
        let records = vec![
            VendorRecord::new("D", "5", ""),
            VendorRecord::new("B", "3", ""),
        ];
        let offer_ids = offers(&["A", "B", "C", "D"]);

        let updates = reconcile_stocks(&records, &offer_ids, None, None).unwrap();

        assert_eq!(
            quantities(&updates),
            vec![("D", 5), ("B", 3), ("A", 0), ("C", 0)]
        );
    }

    #[test]
    fn test_unlisted_vendor_records_are_ignored() {
        let records = vec![
            VendorRecord::new("X", "not a number", ""),
            VendorRecord::new("A", "2", ""),
        ];
        let offer_ids = offers(&["A"]);

        let updates = reconcile_stocks(&records, &offer_ids, None, None).unwrap();

        assert_eq!(quantities(&updates), vec![("A", 2)]);
    }

    #[test]
    fn test_duplicate_vendor_code_matches_once() {
        let records = vec![
            VendorRecord::new("A", "4", "10.00"),
            VendorRecord::new("A", "9", "20.00"),
        ];
        let offer_ids = offers(&["A"]);

        let stocks = reconcile_stocks(&records, &offer_ids, None, None).unwrap();
        assert_eq!(quantities(&stocks), vec![("A", 4)]);

        let prices = reconcile_prices(&records, &offer_ids, "RUB").unwrap();
        assert_eq!(prices.len(), 1);
        assert_eq!(prices[0].amount, 10);
    }

    #[test]
    fn test_numeric_codes_match_string_offer_ids() {
        let records = vec![VendorRecord::new(46864.0, 4.0, "3'000.00 руб.")];
        let offer_ids = offers(&["46864"]);

        let updates = reconcile_stocks(&records, &offer_ids, None, None).unwrap();

        assert_eq!(quantities(&updates), vec![("46864", 4)]);
    }

    #[test]
    fn test_caller_offer_ids_untouched() {
        let records = vec![VendorRecord::new("A", "2", "")];
        let offer_ids = offers(&["A", "B"]);
        let before = offer_ids.clone();

        reconcile_stocks(&records, &offer_ids, None, None).unwrap();

        assert_eq!(offer_ids, before);
    }

    #[test]
    fn test_warehouse_and_timestamp_stamped_on_every_update() {
        let records = vec![VendorRecord::new("A", "2", "")];
        let offer_ids = offers(&["A", "B"]);
        let at = Utc
            .with_ymd_and_hms(2023, 11, 25, 12, 30, 45)
            .unwrap()
            .checked_add_signed(chrono::Duration::milliseconds(750))
            .unwrap();

        let updates = reconcile_stocks(&records, &offer_ids, Some("W123"), Some(at)).unwrap();

        let expected_at = Utc.with_ymd_and_hms(2023, 11, 25, 12, 30, 45).unwrap();
        for update in &updates {
            assert_eq!(update.warehouse_id.as_deref(), Some("W123"));
            assert_eq!(update.updated_at, Some(expected_at));
        }
    }

    #[test]
    fn test_invalid_quantity_on_listed_offer_fails() {
        let records = vec![VendorRecord::new("A", "abc", "")];
        let offer_ids = offers(&["A"]);

        let err = reconcile_stocks(&records, &offer_ids, None, None).unwrap_err();

        assert_eq!(err, Error::InvalidQuantity("abc".to_string()));
    }

    #[test]
    fn test_prices_only_for_matched_offers() {
        let records = vec![
            VendorRecord::new("A", "2", "5'990.00 руб."),
            VendorRecord::new("Z", "2", "1.00"),
        ];
        let offer_ids = offers(&["A", "B"]);

        let prices = reconcile_prices(&records, &offer_ids, "RUR").unwrap();

        assert_eq!(
            prices,
            vec![PriceUpdate {
                offer_id: "A".to_string(),
                amount: 5990,
                currency: "RUR".to_string(),
            }]
        );
    }

    #[test]
    fn test_invalid_price_on_listed_offer_fails() {
        let records = vec![VendorRecord::new("A", "2", "")];
        let offer_ids = offers(&["A"]);

        let err = reconcile_prices(&records, &offer_ids, "RUB").unwrap_err();

        assert!(matches!(err, Error::InvalidPrice(_)));
    }

    #[test]
    fn test_non_empty_filters_zero_quantities() {
        let stocks = vec![
            StockUpdate::new("A", 100),
            StockUpdate::new("B", 0),
            StockUpdate::new("C", 3),
        ];

        let available = non_empty(&stocks);

        assert_eq!(quantities(&available), vec![("A", 100), ("C", 3)]);
    }
}
