//! # carrito-core: Pure Business Logic for the Mobile Checkout Core
//!
//! This crate is the **heart** of the mobile self-checkout module. It
//! contains all business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Mobile Checkout Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Presentation Layer (external, out of repo)         │   │
//! │  │    QR screen ──► Cart screen ──► Checkout confirmation          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ carrito-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ stabilizer │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │ ScanStab-  │  │   rules   │  │   │
//! │  │   │ Cart,Sale │  │  (cents)  │  │   ilizer   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CAMERA • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                 │                              │                        │
//! │  ┌──────────────▼──────────────┐  ┌────────────▼────────────────────┐  │
//! │  │   carrito-db (SQLite)       │  │   carrito-scan (frame worker)   │  │
//! │  └─────────────────────────────┘  └─────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Register, Cart, Sale, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`stabilizer`] - Detection-stabilization state machine for scanning
//! - [`session`] - Explicit session context (register binding + cart)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod session;
pub mod stabilizer;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use money::Money;
pub use session::SessionContext;
pub use stabilizer::{ScanStabilizer, StabilizerState};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Number of consecutive identical non-empty decoder readings required
/// before a scanned code is confirmed.
///
/// ## Business Reason
/// Hand-held cameras produce transient misreads; a code is only accepted
/// once it has been seen unchanged for this many frames in a row.
pub const STABLE_FRAME_THRESHOLD: u32 = 5;

/// Prefix of every generated ticket number, followed by a one-second
/// resolution timestamp (`M20260829143000`).
///
/// The "M" marks tickets originated by the mobile module inside the shared
/// sales table.
pub const TICKET_PREFIX: &str = "M";
