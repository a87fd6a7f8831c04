//! # Catalog Repository
//!
//! Read-only lookups against the shared catalog and register tables, plus
//! register provisioning for the back office.
//!
//! ## Lookup Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Scan Resolution Paths                              │
//! │                                                                         │
//! │  Confirmed QR payload ──► find_register_by_token ──► bind session       │
//! │                           (active registers only)                       │
//! │                                                                         │
//! │  Confirmed barcode ─────► find_product_by_barcode ──► add to cart       │
//! │                           (active products only)                        │
//! │                                                                         │
//! │  Manual browsing ───────► list_products(search)                         │
//! │                           (substring on name/barcode, ordered by name)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use carrito_core::{Product, Register};

/// Repository for catalog and register lookups.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Resolves a scanned QR token to its register.
    ///
    /// Restricted to active registers: a retired station's plaque must
    /// stop binding sessions the moment it is deactivated.
    pub async fn find_register_by_token(&self, qr_token: &str) -> DbResult<Option<Register>> {
        let register = sqlx::query_as::<_, Register>(
            r#"
            SELECT id, number, name, location, qr_token, cashier_id, state, created_at
            FROM registers
            WHERE qr_token = ?1 AND state = 'active'
            "#,
        )
        .bind(qr_token)
        .fetch_optional(&self.pool)
        .await?;

        debug!(found = register.is_some(), "Register token lookup");
        Ok(register)
    }

    /// Resolves a scanned barcode to its product, active products only.
    pub async fn find_product_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, barcode, unit_price_cents, image_url, is_active
            FROM products
            WHERE barcode = ?1 AND is_active = 1
            "#,
        )
        .bind(barcode)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists active products for manual browsing.
    ///
    /// A non-empty `search` filters by case-insensitive substring on name
    /// or barcode; an empty one returns the whole active catalog. Always
    /// ordered by name for a stable listing.
    pub async fn list_products(&self, search: &str) -> DbResult<Vec<Product>> {
        let search = search.trim();

        debug!(search = %search, "Listing products");

        let products = if search.is_empty() {
            sqlx::query_as::<_, Product>(
                r#"
                SELECT id, name, barcode, unit_price_cents, image_url, is_active
                FROM products
                WHERE is_active = 1
                ORDER BY name
                "#,
            )
            .fetch_all(&self.pool)
            .await?
        } else {
            let pattern = format!("%{}%", search);
            sqlx::query_as::<_, Product>(
                r#"
                SELECT id, name, barcode, unit_price_cents, image_url, is_active
                FROM products
                WHERE (name LIKE ?1 OR barcode LIKE ?1) AND is_active = 1
                ORDER BY name
                "#,
            )
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?
        };

        Ok(products)
    }

    /// Provisions a new active register with a generated opaque QR token.
    ///
    /// The token is what gets printed on the station's QR plaque; its only
    /// property is uniqueness, which the schema enforces.
    pub async fn create_register(
        &self,
        number: i64,
        name: &str,
        location: Option<&str>,
        cashier_id: i64,
    ) -> DbResult<Register> {
        let qr_token = generate_qr_token(number);
        let now = chrono::Utc::now();

        debug!(number = %number, token = %qr_token, "Provisioning register");

        let result = sqlx::query(
            r#"
            INSERT INTO registers (number, name, location, qr_token, cashier_id, state, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, 'active', ?6)
            "#,
        )
        .bind(number)
        .bind(name)
        .bind(location)
        .bind(&qr_token)
        .bind(cashier_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Register {
            id: result.last_insert_rowid(),
            number,
            name: name.to_string(),
            location: location.map(str::to_string),
            qr_token,
            cashier_id,
            state: carrito_core::RegisterState::Active,
            created_at: now,
        })
    }
}

/// Generates an opaque register token: station number prefix for
/// operator legibility, UUID tail for uniqueness.
fn generate_qr_token(number: i64) -> String {
    format!("CAJA{}-{}", number, Uuid::new_v4().simple().to_string().to_uppercase())
}

// =============================================================================
// Unit Tests
// =============================================================================
