//! # Checkout Engine
//!
//! Converts a cart's items into durable sale records inside one
//! transaction.
//!
//! ## Checkout Algorithm
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Checkout Transaction                                 │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │   1. Load cart lines (insertion order) ── empty ──► EmptyCart           │
//! │   2. subtotal = Σ quantity × frozen unit price                          │
//! │   3. Operator  = first active by id ──── none ────► NoActiveOperator    │
//! │   4. Register  = by scanned number, else first by id                    │
//! │                                 ──────── none ────► NoRegisterConfigured│
//! │   5. Opening   = latest open for register, else create zero-float one   │
//! │   6. Ticket    = "M" + second-resolution timestamp                      │
//! │   7. INSERT sale (subtotal == total, discount/tax 0, cash, completed)   │
//! │   8. INSERT one sale line per cart line, same order                     │
//! │   9. Close the cart                                                     │
//! │  COMMIT ──► sale id                                                     │
//! │                                                                         │
//! │  Any failure after step 1 rolls the whole attempt back: no partial      │
//! │  sale/line/opening rows are ever visible.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The zero-float auto-open in step 5 means checkout never blocks on an
//! operator forgetting to open a shift; the opening it creates carries no
//! explicit operator acknowledgment. Step 8's inserts may fire stock
//! triggers owned by the wider POS store; those side effects are the
//! store's responsibility, not this module's.

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use thiserror::Error;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use carrito_core::{cart_subtotal, CartLine, PaymentMethod, Sale, SaleLine, SaleStatus, TICKET_PREFIX};

// =============================================================================
// Checkout Error
// =============================================================================

/// Distinguishable checkout outcomes.
///
/// `EmptyCart` is a normal, expected outcome; the two configuration
/// variants are fatal until an operator fixes the store; `Persistence`
/// wraps everything else and always means the transaction rolled back.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no items. No sale is created.
    #[error("Cart {cart_id} is empty, no sale was created")]
    EmptyCart { cart_id: i64 },

    /// The identity store has no active operator to attribute the sale to.
    #[error("No active operator configured")]
    NoActiveOperator,

    /// No register exists to attribute the sale to.
    #[error("No register configured")]
    NoRegisterConfigured,

    /// Underlying storage failure; the whole attempt was rolled back.
    #[error("Checkout failed: {0}")]
    Persistence(#[from] DbError),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(err: sqlx::Error) -> Self {
        CheckoutError::Persistence(DbError::from(err))
    }
}

/// Result type for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

// =============================================================================
// Checkout Engine
// =============================================================================

/// Executes the checkout transaction.
#[derive(Debug, Clone)]
pub struct CheckoutEngine {
    pool: SqlitePool,
}

impl CheckoutEngine {
    /// Creates a new CheckoutEngine.
    pub fn new(pool: SqlitePool) -> Self {
        CheckoutEngine { pool }
    }

    /// Commits a cart as a durable sale.
    ///
    /// ## Arguments
    /// * `cart_id` - The session's open cart
    /// * `register_number` - The station number scanned at session start,
    ///   used to bias sale attribution toward the register the shopper
    ///   actually stood at; `None` (or an unknown number) falls back to
    ///   the first register by id
    ///
    /// ## Returns
    /// The id of the new sale row.
    pub async fn checkout(
        &self,
        cart_id: i64,
        register_number: Option<i64>,
    ) -> CheckoutResult<i64> {
        debug!(cart_id = %cart_id, register_number = ?register_number, "Starting checkout");

        let mut tx = self.pool.begin().await?;

        // 1. Load the cart's lines in insertion order.
        let lines = load_cart_lines(&mut tx, cart_id).await?;
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart { cart_id });
        }

        // 2. Totals. Exact integer arithmetic over frozen unit prices.
        let subtotal = cart_subtotal(&lines);

        // 3. Operator: first active by ascending id.
        let operator_id: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM operators WHERE active = 1 ORDER BY id LIMIT 1",
        )
        .fetch_optional(&mut *tx)
        .await?;
        let operator_id = operator_id.ok_or(CheckoutError::NoActiveOperator)?;

        // 4. Register: scanned number first, then first by id.
        let mut register_id: Option<i64> = None;
        if let Some(number) = register_number {
            register_id = sqlx::query_scalar(
                "SELECT id FROM registers WHERE number = ?1 ORDER BY id LIMIT 1",
            )
            .bind(number)
            .fetch_optional(&mut *tx)
            .await?;
        }
        if register_id.is_none() {
            register_id = sqlx::query_scalar("SELECT id FROM registers ORDER BY id LIMIT 1")
                .fetch_optional(&mut *tx)
                .await?;
        }
        let register_id = register_id.ok_or(CheckoutError::NoRegisterConfigured)?;

        // 5. Shift opening: latest open one, or a zero-float auto-open.
        let opening_id = resolve_shift_opening(&mut tx, register_id, operator_id).await?;

        // 6. Ticket number, one-second granularity. Two checkouts inside
        // the same second collide on the UNIQUE constraint and roll back.
        let now = Utc::now();
        let ticket_number = format!("{}{}", TICKET_PREFIX, now.format("%Y%m%d%H%M%S"));

        // 7. The sale row. Discount and tax are fixed at zero: pricing
        // policy is out of scope, so subtotal == total.
        let sale_result = sqlx::query(
            r#"
            INSERT INTO sales (
                ticket_number, register_id, operator_id, opening_id,
                subtotal_cents, discount_cents, tax_cents, total_cents,
                payment_method, status, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, 0, 0, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&ticket_number)
        .bind(register_id)
        .bind(operator_id)
        .bind(opening_id)
        .bind(subtotal.cents())
        .bind(subtotal.cents())
        .bind(PaymentMethod::Cash)
        .bind(SaleStatus::Completed)
        .bind(now)
        .execute(&mut *tx)
        .await?;
        let sale_id = sale_result.last_insert_rowid();

        // 8. One sale line per cart line, in cart order.
        for line in &lines {
            sqlx::query(
                r#"
                INSERT INTO sale_lines (sale_id, product_id, quantity, unit_price_cents, subtotal_cents)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(sale_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.unit_price_cents)
            .bind(line.subtotal().cents())
            .execute(&mut *tx)
            .await?;
        }

        // 9. Close the cart inside the same transaction.
        sqlx::query(
            "UPDATE carts SET status = 'closed', closed_at = ?2 WHERE id = ?1 AND status = 'open'",
        )
        .bind(cart_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            sale_id = %sale_id,
            ticket = %ticket_number,
            total_cents = %subtotal.cents(),
            lines = lines.len(),
            "Checkout committed"
        );

        Ok(sale_id)
    }

    /// Fetches a committed sale, e.g. for receipt display.
    pub async fn get_sale(&self, sale_id: i64) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, ticket_number, register_id, operator_id, opening_id,
                   subtotal_cents, discount_cents, tax_cents, total_cents,
                   payment_method, status, created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(sale_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Fetches a sale's lines in insertion order.
    pub async fn get_sale_lines(&self, sale_id: i64) -> DbResult<Vec<SaleLine>> {
        let lines = sqlx::query_as::<_, SaleLine>(
            r#"
            SELECT id, sale_id, product_id, quantity, unit_price_cents, subtotal_cents
            FROM sale_lines
            WHERE sale_id = ?1
            ORDER BY id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }
}

/// Loads cart lines inside the checkout transaction, verifying the cart
/// exists first.
async fn load_cart_lines(
    tx: &mut Transaction<'_, Sqlite>,
    cart_id: i64,
) -> CheckoutResult<Vec<CartLine>> {
    let cart_exists: Option<i64> = sqlx::query_scalar("SELECT id FROM carts WHERE id = ?1")
        .bind(cart_id)
        .fetch_optional(&mut **tx)
        .await?;
    if cart_exists.is_none() {
        return Err(CheckoutError::Persistence(DbError::not_found(
            "Cart", cart_id,
        )));
    }

    let lines = sqlx::query_as::<_, CartLine>(
        r#"
        SELECT ci.id, ci.product_id, ci.quantity, ci.unit_price_cents, p.name, p.barcode
        FROM cart_items ci
        JOIN products p ON p.id = ci.product_id
        WHERE ci.cart_id = ?1
        ORDER BY ci.id
        "#,
    )
    .bind(cart_id)
    .fetch_all(&mut **tx)
    .await?;

    Ok(lines)
}

/// Resolves the shift opening for a register: the most recent open one,
/// or a freshly created zero-float opening.
async fn resolve_shift_opening(
    tx: &mut Transaction<'_, Sqlite>,
    register_id: i64,
    operator_id: i64,
) -> CheckoutResult<i64> {
    let existing: Option<i64> = sqlx::query_scalar(
        r#"
        SELECT id FROM shift_openings
        WHERE register_id = ?1 AND status = 'open'
        ORDER BY opened_at DESC
        LIMIT 1
        "#,
    )
    .bind(register_id)
    .fetch_optional(&mut **tx)
    .await?;

    if let Some(opening_id) = existing {
        return Ok(opening_id);
    }

    debug!(register_id = %register_id, "No open shift, auto-opening with zero float");

    let result = sqlx::query(
        r#"
        INSERT INTO shift_openings (register_id, operator_id, starting_float_cents, status, opened_at)
        VALUES (?1, ?2, 0, 'open', ?3)
        "#,
    )
    .bind(register_id)
    .bind(operator_id)
    .bind(Utc::now())
    .execute(&mut **tx)
    .await?;

    Ok(result.last_insert_rowid())
}

// =============================================================================
// Unit Tests
// =============================================================================
