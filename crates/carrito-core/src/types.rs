//! # Domain Types
//!
//! Core domain types for the mobile self-checkout module.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Register     │   │      Cart       │   │      Sale       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  id (i64)       │       │
//! │  │  qr_token       │──►│  register_id    │──►│  ticket_number  │       │
//! │  │  number         │   │  status         │   │  totals (cents) │       │
//! │  │  state          │   │  created_at     │   │  opening_id     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Product and Operator are read-only here: the catalog and identity     │
//! │  stores are owned by the wider POS system.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Row ids are `i64` AUTOINCREMENT values, matching the shared store the
//! module writes into. All monetary fields carry integer cents and expose
//! [`Money`] accessors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Status Enums
// =============================================================================

/// Lifecycle state of a checkout station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum RegisterState {
    /// Register may bind shopper sessions.
    Active,
    /// Register is retired or out of service; its token no longer resolves.
    Inactive,
}

/// Lifecycle state of a session cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum CartStatus {
    /// Accumulating items.
    Open,
    /// Checked out or abandoned; immutable.
    Closed,
}

impl Default for CartStatus {
    fn default() -> Self {
        CartStatus::Open
    }
}

/// Lifecycle state of a till opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    /// Accepting sales.
    Open,
    /// Reconciled and closed by the back office (never by this module).
    Closed,
}

/// The status of a durable sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Sale committed by checkout. The only status this module writes.
    Completed,
    /// Cancelled after the fact by the back office.
    Voided,
}

/// Payment method recorded on a sale.
///
/// Payment processing is out of scope; checkout records the default and
/// the wider POS system settles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment (the module default).
    Cash,
    /// Card payment on an external terminal.
    Card,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

// =============================================================================
// Operator
// =============================================================================

/// A human operator in the shared identity store.
///
/// The repositories resolve operators by bare id and never materialize
/// full rows; this struct is the row-shape contract for external callers
/// (seeding tools, the presentation layer's staff screens) that read the
/// `operators` table directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Operator {
    pub id: i64,
    pub username: String,
    pub full_name: Option<String>,
    pub active: bool,
}

// =============================================================================
// Register
// =============================================================================

/// A physical checkout station identified by a unique QR token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Register {
    pub id: i64,

    /// Human-facing station number, printed next to the QR plaque.
    /// Carried through the session so checkout can attribute the sale.
    pub number: i64,

    /// Display name shown in the session header.
    pub name: String,

    pub location: Option<String>,

    /// Opaque token a shopper scans to bind a session.
    pub qr_token: String,

    /// Operator responsible for this station.
    pub cashier_id: i64,

    pub state: RegisterState,

    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product, read-only from this module's perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,

    /// Display name shown in the cart and on the receipt.
    pub name: String,

    /// May contain non-numeric legacy values, hence TEXT end to end.
    pub barcode: String,

    /// Catalog unit price in cents.
    pub unit_price_cents: i64,

    /// Optional image reference for the product list.
    pub image_url: Option<String>,

    /// Soft-delete flag; inactive products never resolve from a scan.
    pub is_active: bool,
}

impl Product {
    /// Returns the catalog price as a Money value.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// A shopper session's cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Cart {
    pub id: i64,
    pub register_id: i64,
    pub status: CartStatus,
    pub created_at: DateTime<Utc>,
    /// Set exactly once, when the cart first transitions to closed.
    pub closed_at: Option<DateTime<Utc>>,
}

/// A stored cart line, exactly as the `cart_items` table keeps it.
///
/// The cart store reads lines only through [`CartLine`] (joined with
/// catalog data); this struct is the row-shape contract for external
/// callers that read `cart_items` without the join.
///
/// ## Price Freezing
/// `unit_price_cents` is the catalog price at the moment the product was
/// first added. Later merges only raise `quantity`; a catalog price change
/// does not retroactively reprice the line.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CartItem {
    pub id: i64,
    pub cart_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

/// A cart line joined with catalog display data, as returned by the cart
/// store's listing. Ordered by row id so display order and sale-line order
/// are both deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CartLine {
    pub id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub name: String,
    pub barcode: String,
}

impl CartLine {
    /// Returns the frozen unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line subtotal: quantity × frozen unit price.
    #[inline]
    pub fn subtotal(&self) -> Money {
        self.unit_price().times(self.quantity)
    }
}

/// Computes the cart subtotal over lines in listing order.
pub fn cart_subtotal(lines: &[CartLine]) -> Money {
    lines.iter().map(CartLine::subtotal).sum()
}

// =============================================================================
// Shift Opening
// =============================================================================

/// A till-opening record bounding a register's cash-handling period.
///
/// Checkout reads the most recent open one for its register or creates a
/// zero-float one; it never closes openings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ShiftOpening {
    pub id: i64,
    pub register_id: i64,
    pub operator_id: i64,
    pub starting_float_cents: i64,
    pub status: ShiftStatus,
    pub opened_at: DateTime<Utc>,
}

// =============================================================================
// Sale
// =============================================================================

/// A durable sale. Written exactly once per successful checkout and
/// immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: i64,

    /// Human-facing unique identifier (`M` + second-resolution timestamp).
    pub ticket_number: String,

    pub register_id: i64,
    pub operator_id: i64,
    pub opening_id: i64,

    pub subtotal_cents: i64,
    /// Always 0: pricing policy is out of scope for this module.
    pub discount_cents: i64,
    /// Always 0: tax computation is out of scope for this module.
    pub tax_cents: i64,
    pub total_cents: i64,

    pub payment_method: PaymentMethod,
    pub status: SaleStatus,
    pub created_at: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A line of a durable sale, inserted in the cart's listing order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleLine {
    pub id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub subtotal_cents: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: i64, quantity: i64, unit_price_cents: i64) -> CartLine {
        CartLine {
            id,
            product_id: id,
            quantity,
            unit_price_cents,
            name: format!("Product {}", id),
            barcode: format!("77501{:08}", id),
        }
    }

    #[test]
    fn line_subtotal_is_quantity_times_frozen_price() {
        let l = line(1, 2, 150);
        assert_eq!(l.subtotal().cents(), 300);
    }

    #[test]
    fn cart_subtotal_sums_lines_in_order() {
        let lines = vec![line(1, 2, 150), line(2, 1, 300)];
        assert_eq!(cart_subtotal(&lines).cents(), 600);
    }

    #[test]
    fn default_payment_method_is_cash() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::Cash);
    }

    #[test]
    fn new_carts_default_open() {
        assert_eq!(CartStatus::default(), CartStatus::Open);
    }
}
