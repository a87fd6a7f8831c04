//! # carrito-db: Database Layer for the Mobile Checkout Core
//!
//! This crate provides database access for the mobile self-checkout
//! module. It uses SQLite for the shared POS store with sqlx for async
//! operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Mobile Checkout Data Flow                          │
//! │                                                                         │
//! │  Presentation call (scan resolved / item added / checkout pressed)     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     carrito-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  catalog.rs    │    │  (embedded)  │  │   │
//! │  │   │               │    │  cart.rs       │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│  checkout.rs   │    │ 001_init.sql │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │   SQLite store shared with the wider POS system                         │
//! │   (sales / sale_lines / shift_openings are externally owned)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Catalog lookup, cart store, checkout engine
//!
//! ## Usage
//!
//! ```rust,ignore
//! use carrito_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/supermarket.db")).await?;
//!
//! let register = db.catalog().find_register_by_token(token).await?;
//! let cart_id = db.carts().open_cart(register.id).await?;
//! db.carts().add_item(cart_id, product.id, 1, product.unit_price_cents).await?;
//! let sale_id = db.checkout().checkout(cart_id, Some(register.number)).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::cart::CartRepository;
pub use repository::catalog::CatalogRepository;
pub use repository::checkout::{CheckoutEngine, CheckoutError};
