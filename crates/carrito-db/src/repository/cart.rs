//! # Cart Repository
//!
//! Owns the lifecycle of a session's cart and its line items.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Cart Lifecycle                                    │
//! │                                                                         │
//! │  1. BIND SESSION (register token resolved)                              │
//! │     └── open_cart(register_id) → cart_id { status: open }               │
//! │                                                                         │
//! │  2. ACCUMULATE                                                          │
//! │     └── add_item() → new row, or quantity merge for a repeat product    │
//! │     └── remove_item() → unconditional delete                            │
//! │     └── list_items() → lines joined with catalog data, by row id        │
//! │                                                                         │
//! │  3. CHECKOUT (see checkout.rs) or ABANDON                               │
//! │     └── close_cart() → status: closed, closed_at set once               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Merge Invariant
//! At most one cart_items row exists per (cart_id, product_id): adding a
//! product already in the cart raises its quantity and keeps the unit
//! price captured at first add. The schema backs this with a UNIQUE
//! constraint.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use carrito_core::validation::{validate_quantity, validate_unit_price};
use carrito_core::{Cart, CartLine};

/// Repository for cart database operations.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: SqlitePool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CartRepository { pool }
    }

    /// Opens a new cart for a bound session.
    ///
    /// ## Returns
    /// The id of the freshly created open cart.
    pub async fn open_cart(&self, register_id: i64) -> DbResult<i64> {
        self.ensure_register_exists(register_id).await?;

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO carts (register_id, status, created_at)
            VALUES (?1, 'open', ?2)
            "#,
        )
        .bind(register_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let cart_id = result.last_insert_rowid();
        debug!(cart_id = %cart_id, register_id = %register_id, "Cart opened");
        Ok(cart_id)
    }

    /// Adds a product to a cart, merging with an existing line.
    ///
    /// ## Merge Semantics
    /// - Product already in the cart: quantity becomes existing + quantity;
    ///   the stored unit price is NOT re-read, the price frozen at first
    ///   add stays authoritative for the whole line.
    /// - Product not in the cart: a new line is inserted with the given
    ///   quantity and unit price.
    ///
    /// ## Returns
    /// The id of the created or merged cart_items row.
    pub async fn add_item(
        &self,
        cart_id: i64,
        product_id: i64,
        quantity: i64,
        unit_price_cents: i64,
    ) -> DbResult<i64> {
        validate_quantity(quantity)?;
        validate_unit_price(unit_price_cents)?;
        self.ensure_cart_exists(cart_id).await?;

        let existing = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT id, quantity FROM cart_items
            WHERE cart_id = ?1 AND product_id = ?2
            "#,
        )
        .bind(cart_id)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        let item_id = match existing {
            Some((item_id, current_quantity)) => {
                let merged = current_quantity + quantity;
                sqlx::query("UPDATE cart_items SET quantity = ?1 WHERE id = ?2")
                    .bind(merged)
                    .bind(item_id)
                    .execute(&self.pool)
                    .await?;

                debug!(cart_id = %cart_id, product_id = %product_id, quantity = %merged, "Cart line merged");
                item_id
            }
            None => {
                let result = sqlx::query(
                    r#"
                    INSERT INTO cart_items (cart_id, product_id, quantity, unit_price_cents)
                    VALUES (?1, ?2, ?3, ?4)
                    "#,
                )
                .bind(cart_id)
                .bind(product_id)
                .bind(quantity)
                .bind(unit_price_cents)
                .execute(&self.pool)
                .await?;

                debug!(cart_id = %cart_id, product_id = %product_id, quantity = %quantity, "Cart line added");
                result.last_insert_rowid()
            }
        };

        Ok(item_id)
    }

    /// Deletes a cart line unconditionally.
    ///
    /// Removing an id that no longer exists is a no-op, not an error:
    /// the shopper may tap delete twice before the list refreshes.
    pub async fn remove_item(&self, cart_item_id: i64) -> DbResult<()> {
        sqlx::query("DELETE FROM cart_items WHERE id = ?1")
            .bind(cart_item_id)
            .execute(&self.pool)
            .await?;

        debug!(cart_item_id = %cart_item_id, "Cart line removed");
        Ok(())
    }

    /// Lists a cart's lines joined with catalog display data.
    ///
    /// Ordered by row id: display order and checkout's sale-line order are
    /// both insertion order.
    pub async fn list_items(&self, cart_id: i64) -> DbResult<Vec<CartLine>> {
        self.ensure_cart_exists(cart_id).await?;

        let lines = sqlx::query_as::<_, CartLine>(
            r#"
            SELECT
                ci.id,
                ci.product_id,
                ci.quantity,
                ci.unit_price_cents,
                p.name,
                p.barcode
            FROM cart_items ci
            JOIN products p ON p.id = ci.product_id
            WHERE ci.cart_id = ?1
            ORDER BY ci.id
            "#,
        )
        .bind(cart_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Closes a cart, recording the closing timestamp exactly once.
    ///
    /// Idempotent: closing an already-closed cart is a no-op and leaves
    /// the original `closed_at` untouched.
    pub async fn close_cart(&self, cart_id: i64) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE carts
            SET status = 'closed', closed_at = ?2
            WHERE id = ?1 AND status = 'open'
            "#,
        )
        .bind(cart_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Either already closed (fine) or the cart never existed.
            self.ensure_cart_exists(cart_id).await?;
        } else {
            debug!(cart_id = %cart_id, "Cart closed");
        }

        Ok(())
    }

    /// Fetches a cart by id.
    pub async fn get_cart(&self, cart_id: i64) -> DbResult<Option<Cart>> {
        let cart = sqlx::query_as::<_, Cart>(
            r#"
            SELECT id, register_id, status, created_at, closed_at
            FROM carts
            WHERE id = ?1
            "#,
        )
        .bind(cart_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(cart)
    }

    async fn ensure_cart_exists(&self, cart_id: i64) -> DbResult<()> {
        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM carts WHERE id = ?1")
            .bind(cart_id)
            .fetch_optional(&self.pool)
            .await?;

        match exists {
            Some(_) => Ok(()),
            None => Err(DbError::not_found("Cart", cart_id)),
        }
    }

    async fn ensure_register_exists(&self, register_id: i64) -> DbResult<()> {
        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM registers WHERE id = ?1")
            .bind(register_id)
            .fetch_optional(&self.pool)
            .await?;

        match exists {
            Some(_) => Ok(()),
            None => Err(DbError::not_found("Register", register_id)),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use carrito_core::{cart_subtotal, CartStatus};

    /// In-memory store with one operator, one register and two products.
    async fn test_db() -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        sqlx::query("INSERT INTO operators (username, full_name, active) VALUES ('caja1', 'Caja Principal', 1)")
            .execute(db.pool())
            .await
            .unwrap();

        let register = db
            .catalog()
            .create_register(1, "Caja Móvil 1", None, 1)
            .await
            .unwrap();

        sqlx::query(
            "INSERT INTO products (name, barcode, unit_price_cents, is_active) VALUES \
             ('Producto A', '7750100000001', 150, 1), ('Producto B', '7750100000002', 300, 1)",
        )
        .execute(db.pool())
        .await
        .unwrap();

        (db, register.id)
    }

    #[tokio::test]
    async fn adding_same_product_merges_quantities() {
        let (db, register_id) = test_db().await;
        let cart_id = db.carts().open_cart(register_id).await.unwrap();

        let first = db.carts().add_item(cart_id, 1, 2, 150).await.unwrap();
        let second = db.carts().add_item(cart_id, 1, 3, 150).await.unwrap();
        assert_eq!(first, second);

        let lines = db.carts().list_items(cart_id).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 5);
    }

    #[tokio::test]
    async fn merge_keeps_price_frozen_at_first_add() {
        let (db, register_id) = test_db().await;
        let cart_id = db.carts().open_cart(register_id).await.unwrap();

        db.carts().add_item(cart_id, 1, 1, 150).await.unwrap();
        // Catalog price changed between adds; the line keeps 150.
        db.carts().add_item(cart_id, 1, 1, 175).await.unwrap();

        let lines = db.carts().list_items(cart_id).await.unwrap();
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[0].unit_price_cents, 150);
    }

    #[tokio::test]
    async fn distinct_products_get_distinct_lines_in_insertion_order() {
        let (db, register_id) = test_db().await;
        let cart_id = db.carts().open_cart(register_id).await.unwrap();

        db.carts().add_item(cart_id, 2, 1, 300).await.unwrap();
        db.carts().add_item(cart_id, 1, 2, 150).await.unwrap();

        let lines = db.carts().list_items(cart_id).await.unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].product_id, 2);
        assert_eq!(lines[0].name, "Producto B");
        assert_eq!(lines[1].product_id, 1);
        assert_eq!(cart_subtotal(&lines).cents(), 600);
    }

    #[tokio::test]
    async fn removing_missing_item_is_a_no_op() {
        let (db, register_id) = test_db().await;
        let cart_id = db.carts().open_cart(register_id).await.unwrap();

        let item_id = db.carts().add_item(cart_id, 1, 1, 150).await.unwrap();
        db.carts().remove_item(item_id).await.unwrap();
        // Second delete of the same id succeeds silently.
        db.carts().remove_item(item_id).await.unwrap();

        assert!(db.carts().list_items(cart_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn close_is_idempotent_and_keeps_first_closed_at() {
        let (db, register_id) = test_db().await;
        let cart_id = db.carts().open_cart(register_id).await.unwrap();

        db.carts().close_cart(cart_id).await.unwrap();
        let first = db.carts().get_cart(cart_id).await.unwrap().unwrap();
        assert_eq!(first.status, CartStatus::Closed);
        let first_closed_at = first.closed_at.unwrap();

        db.carts().close_cart(cart_id).await.unwrap();
        let second = db.carts().get_cart(cart_id).await.unwrap().unwrap();
        assert_eq!(second.closed_at.unwrap(), first_closed_at);
    }

    #[tokio::test]
    async fn operations_on_missing_cart_return_not_found() {
        let (db, _register_id) = test_db().await;

        let err = db.carts().add_item(9999, 1, 1, 150).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { entity: "Cart", .. }));

        let err = db.carts().list_items(9999).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { entity: "Cart", .. }));

        let err = db.carts().close_cart(9999).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { entity: "Cart", .. }));
    }

    #[tokio::test]
    async fn raw_cart_items_rows_decode_as_cart_item() {
        let (db, register_id) = test_db().await;
        let cart_id = db.carts().open_cart(register_id).await.unwrap();
        let item_id = db.carts().add_item(cart_id, 1, 2, 150).await.unwrap();

        // External callers read cart_items without the catalog join.
        let item = sqlx::query_as::<_, carrito_core::CartItem>(
            "SELECT id, cart_id, product_id, quantity, unit_price_cents FROM cart_items WHERE id = ?1",
        )
        .bind(item_id)
        .fetch_one(db.pool())
        .await
        .unwrap();

        assert_eq!(item.cart_id, cart_id);
        assert_eq!(item.product_id, 1);
        assert_eq!(item.quantity, 2);
        assert_eq!(item.unit_price_cents, 150);
    }

    #[tokio::test]
    async fn non_positive_quantity_is_rejected_before_any_write() {
        let (db, register_id) = test_db().await;
        let cart_id = db.carts().open_cart(register_id).await.unwrap();

        let err = db.carts().add_item(cart_id, 1, 0, 150).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidInput(_)));
        assert!(db.carts().list_items(cart_id).await.unwrap().is_empty());
    }
}
