//! Cart Models

use std::{collections::HashSet, num::NonZeroU32};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{
    carts::errors::CartDecodeError,
    products::models::{Product, Sku},
};

/// A product held in the cart together with how many units were added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: NonZeroU32,
}

impl CartLine {
    /// Start a line for `product` with a single unit.
    #[must_use]
    pub fn new(product: Product) -> Self {
        Self {
            product,
            quantity: NonZeroU32::MIN,
        }
    }

    #[must_use]
    pub fn sku(&self) -> &Sku {
        &self.product.sku
    }

    /// Unit price multiplied by quantity, or `None` when that does not fit a
    /// [`Decimal`].
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.product
            .price
            .checked_mul(Decimal::from(self.quantity.get()))
    }
}

/// Cart Model
///
/// Lines keep insertion order and there is never more than one line per SKU.
/// The total of the lines always fits a [`Decimal`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from already merged lines.
    ///
    /// # Errors
    ///
    /// Returns [`CartDecodeError::DuplicateSku`] when two lines share a SKU
    /// and [`CartDecodeError::TotalOverflow`] when the total does not fit a
    /// [`Decimal`].
    pub fn from_lines(lines: Vec<CartLine>) -> Result<Self, CartDecodeError> {
        let mut seen = HashSet::with_capacity(lines.len());

        for line in &lines {
            if !seen.insert(line.sku()) {
                return Err(CartDecodeError::DuplicateSku(line.sku().clone()));
            }
        }

        if checked_total(&lines).is_none() {
            return Err(CartDecodeError::TotalOverflow);
        }

        Ok(Self { lines })
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, sku: &Sku) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.sku() == sku)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Add one unit of `product`, returning the line's new quantity.
    ///
    /// Returns `None` and leaves the cart unchanged when the quantity or the
    /// resulting total would overflow.
    pub fn add(&mut self, product: &Product) -> Option<NonZeroU32> {
        let mut lines = self.lines.clone();

        let quantity = match lines.iter_mut().find(|line| line.sku() == &product.sku) {
            Some(line) => {
                line.quantity = line.quantity.checked_add(1)?;
                line.quantity
            }
            None => {
                lines.push(CartLine::new(product.clone()));
                NonZeroU32::MIN
            }
        };

        checked_total(&lines)?;

        self.lines = lines;

        Some(quantity)
    }

    /// Drop the line for `sku`. Returns `false` when there was none.
    pub fn remove(&mut self, sku: &Sku) -> bool {
        let before = self.lines.len();

        self.lines.retain(|line| line.sku() != sku);

        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of price × quantity, recomputed on every call.
    #[must_use]
    pub fn total(&self) -> Decimal {
        // Every constructor and mutation rejects lines whose total overflows.
        checked_total(&self.lines).unwrap_or(Decimal::MAX)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0_u32, |count, line| count.saturating_add(line.quantity.get()))
    }

    /// Serialize the lines into the persisted snapshot format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.lines)
    }

    /// Parse a persisted snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error when the snapshot is not a list of well-formed lines
    /// or repeats a SKU.
    pub fn decode(snapshot: &str) -> Result<Self, CartDecodeError> {
        let lines: Vec<CartLine> = serde_json::from_str(snapshot)?;

        Self::from_lines(lines)
    }
}

fn checked_total(lines: &[CartLine]) -> Option<Decimal> {
    lines
        .iter()
        .try_fold(Decimal::ZERO, |total, line| total.checked_add(line.line_total()?))
}
