//! Splitting update lists into request-sized batches.

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Splits `items` into consecutive chunks of at most `size` elements.
///
/// The returned iterator is lazy and borrows `items`; calling again yields a
/// fresh sequence. Every chunk has exactly `size` elements except possibly
/// the last.
pub fn batches<T>(items: &[T], size: usize) -> Result<std::slice::Chunks<'_, T>> {
    if size == 0 {
        return Err(Error::InvalidArgument(
            "batch size must be positive".to_string(),
        ));
    }
    Ok(items.chunks(size))
}

/// Maximum number of items a platform accepts per update request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchLimits {
    pub stock: usize,
    pub price: usize,
}

impl BatchLimits {
    pub fn new(stock: usize, price: usize) -> Self {
        Self { stock, price }
    }

    /// Returns a copy with the stock limit replaced when `stock` is set.
    pub fn with_stock(mut self, stock: Option<usize>) -> Self {
        if let Some(stock) = stock {
            self.stock = stock;
        }
        self
    }

    /// Returns a copy with the price limit replaced when `price` is set.
    pub fn with_price(mut self, price: Option<usize>) -> Self {
        if let Some(price) = price {
            self.price = price;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batches_exact_multiple() {
        let items = [1, 2, 3, 4, 5, 6];
        let chunks: Vec<&[i32]> = batches(&items, 3).unwrap().collect();
        assert_eq!(chunks, vec![&[1, 2, 3][..], &[4, 5, 6][..]]);
    }

    #[test]
    fn test_batches_with_remainder() {
        let items = [1, 2, 3, 4, 5];
        let chunks: Vec<&[i32]> = batches(&items, 2).unwrap().collect();
        assert_eq!(chunks, vec![&[1, 2][..], &[3, 4][..], &[5][..]]);
    }

    #[test]
    fn test_batches_larger_than_input() {
        let items = [1, 2];
        let chunks: Vec<&[i32]> = batches(&items, 100).unwrap().collect();
        assert_eq!(chunks, vec![&[1, 2][..]]);
    }

    #[test]
    fn test_batches_empty_input_yields_nothing() {
        let items: [i32; 0] = [];
        assert_eq!(batches(&items, 10).unwrap().count(), 0);
    }

    #[test]
    fn test_batches_zero_size_fails() {
        let items = [1, 2, 3];
        let err = batches(&items, 0).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_batches_restartable() {
        let items = vec!["a", "b", "c"];
        let first: Vec<_> = batches(&items, 2).unwrap().collect();
        let second: Vec<_> = batches(&items, 2).unwrap().collect();
        assert_eq!(first, second);
        assert_eq!(items, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_batch_limits_overrides() {
        let limits = BatchLimits::new(100, 1000)
            .with_stock(None)
            .with_price(Some(900));
        assert_eq!(limits, BatchLimits::new(100, 900));
    }
}
