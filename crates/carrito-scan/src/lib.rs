//! # Carrito Scan - Scanning Engine
//!
//! Turns a blocking stream of camera frames into a single confirmed
//! barcode, with cooperative cancellation.
//!
//! ## Architecture
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        Scanning Engine                           │
//! │                                                                  │
//! │  ┌─────────────┐    ┌────────────────┐    ┌──────────────────┐   │
//! │  │ FrameSource │───►│ BarcodeDecoder │───►│  ScanStabilizer  │   │
//! │  │ (blocking   │    │ (raster ──►    │    │  (N identical    │   │
//! │  │  device)    │    │  payloads)     │    │  frames confirm) │   │
//! │  └─────────────┘    └────────────────┘    └──────────────────┘   │
//! │         ▲                                          │             │
//! │         │        spawn_blocking task               ▼             │
//! │  ┌──────┴──────────────────────────────────────────────────┐     │
//! │  │ ScanWorker ── cancel flag checked every frame ──► done  │     │
//! │  └─────────────────────────────────────────────────────────┘     │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The loop owns its source: whatever way the scan ends (confirmation,
//! cancellation, exhaustion, error), the source is dropped and the
//! capture device released.

pub mod source;
pub mod worker;

pub use source::{BarcodeDecoder, Frame, FrameError, FrameSource};
pub use worker::{run_scan_loop, ScanError, ScanHandle, ScanWorker};
