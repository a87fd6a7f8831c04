//! # Session Context
//!
//! An explicit, owned value describing one shopper's bound session: which
//! register they scanned and which cart is accumulating their items.
//!
//! This is a plain value, not a process-wide singleton: the presentation
//! layer constructs it after a token resolves and threads it through every
//! call. The core holds no global state.

use serde::{Deserialize, Serialize};

use crate::types::Register;

/// A bound shopper session: register + open cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionContext {
    /// The register whose QR token bound this session.
    pub register: Register,

    /// The cart opened at binding time. Valid until checkout closes it.
    pub cart_id: i64,
}

impl SessionContext {
    /// Binds a session to a resolved register and its freshly opened cart.
    pub fn bind(register: Register, cart_id: i64) -> Self {
        SessionContext { register, cart_id }
    }

    /// The scanned station number, used by checkout to bias sale
    /// attribution toward the register the shopper actually stood at.
    pub fn register_number(&self) -> i64 {
        self.register.number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RegisterState;
    use chrono::Utc;

    #[test]
    fn session_exposes_scanned_register_number() {
        let register = Register {
            id: 7,
            number: 3,
            name: "Caja Móvil 3".to_string(),
            location: Some("Entrada Principal".to_string()),
            qr_token: "CAJA3-TOKEN".to_string(),
            cashier_id: 1,
            state: RegisterState::Active,
            created_at: Utc::now(),
        };

        let session = SessionContext::bind(register, 42);
        assert_eq!(session.cart_id, 42);
        assert_eq!(session.register_number(), 3);
    }
}
