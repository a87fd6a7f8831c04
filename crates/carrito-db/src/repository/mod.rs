//! # Repository Layer
//!
//! One repository per concern:
//!
//! - [`catalog`] - read-only product/register lookup plus register
//!   provisioning
//! - [`cart`] - session cart lifecycle with merge-by-product semantics
//! - [`checkout`] - the transactional checkout engine

pub mod cart;
pub mod catalog;
pub mod checkout;
