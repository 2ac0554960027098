//! Money calculation utilities using rust_decimal for precision
//!
//! All stored amounts are `f64`; every calculation goes through `Decimal`
//! and is rounded half-up to 2 decimals after summation, not per line.

use rust_decimal::prelude::*;
use shared::error::{DomainError, DomainResult};
use shared::models::{Discount, DiscountKind, ItemModifier, OrderItem, OrderItemInput};

/// Rounding to 2 decimal places, half-up
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Maximum allowed payment amount
const MAX_PAYMENT_AMOUNT: f64 = 1_000_000.0;
/// Maximum allowed quantity per line
const MAX_QUANTITY: u32 = 9999;

/// Convert an `f64` amount to `Decimal`.
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// Convert a `Decimal` back to `f64`, rounded to 2 decimals.
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Effective unit price: list price plus the sum of selected modifier prices.
pub fn unit_price(list_price: f64, modifiers: &[ItemModifier]) -> f64 {
    let sum = modifiers
        .iter()
        .fold(to_decimal(list_price), |acc, m| acc + to_decimal(m.price));
    to_f64(sum)
}

/// Raw subtotal of a set of items: Σ(unit_price × qty) over non-cancelled
/// lines, as `Decimal` so rounding happens once at the end.
pub fn raw_subtotal(items: &[OrderItem]) -> Decimal {
    items
        .iter()
        .filter(|i| i.status != shared::models::ItemStatus::Cancelled)
        .fold(Decimal::ZERO, |acc, i| {
            acc + to_decimal(i.unit_price) * Decimal::from(i.quantity)
        })
}

/// Apply a discount to a subtotal.
///
/// Percentage is clamped to [0, 100]; an amount discount is clamped so the
/// result never goes below 0. The result is rounded to 2 decimals.
pub fn apply_discount(subtotal: Decimal, discount: Option<&Discount>) -> f64 {
    let discounted = match discount {
        None => subtotal,
        Some(d) => {
            let value = to_decimal(d.value).max(Decimal::ZERO);
            match d.kind {
                DiscountKind::Percentage => {
                    let pct = value.min(Decimal::from(100));
                    subtotal * (Decimal::from(100) - pct) / Decimal::from(100)
                }
                DiscountKind::Amount => (subtotal - value).max(Decimal::ZERO),
            }
        }
    };
    to_f64(discounted.max(Decimal::ZERO))
}

/// Discount-adjusted total of an item set with the order's existing discount
/// settings. This is the single retotal path for every item mutation.
pub fn order_total(items: &[OrderItem], discount: Option<&Discount>) -> f64 {
    apply_discount(raw_subtotal(items), discount)
}

#[inline]
fn require_finite(value: f64, field_name: &str) -> DomainResult<()> {
    if !value.is_finite() {
        return Err(DomainError::invalid_state(format!(
            "{field_name} must be a finite number, got {value}"
        )));
    }
    Ok(())
}

/// Validate an order line input before processing.
pub fn validate_item_input(input: &OrderItemInput) -> DomainResult<()> {
    if input.quantity == 0 {
        return Err(DomainError::invalid_state(
            "quantity must be positive".to_string(),
        ));
    }
    if input.quantity > MAX_QUANTITY {
        return Err(DomainError::invalid_state(format!(
            "quantity exceeds maximum allowed ({MAX_QUANTITY}), got {}",
            input.quantity
        )));
    }
    for modifier in &input.modifiers {
        require_finite(modifier.price, "modifier price")?;
    }
    Ok(())
}

/// Validate a discount's value (finite; range handling is by clamping).
pub fn validate_discount(discount: &Discount) -> DomainResult<()> {
    require_finite(discount.value, "discount value")
}

/// Validate a payment amount: finite, positive, within bounds.
pub fn validate_payment_amount(amount: f64) -> DomainResult<()> {
    require_finite(amount, "payment amount")?;
    if amount <= 0.0 {
        return Err(DomainError::invalid_state(format!(
            "payment amount must be positive, got {amount}"
        )));
    }
    if amount > MAX_PAYMENT_AMOUNT {
        return Err(DomainError::invalid_state(format!(
            "payment amount exceeds maximum allowed ({MAX_PAYMENT_AMOUNT})"
        )));
    }
    Ok(())
}
