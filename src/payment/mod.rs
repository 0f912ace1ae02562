//! Payment gateway seam.
//!
//! The orchestrators only need three capabilities from a gateway: open an
//! order for an amount, check a client-supplied payment proof, and refund a
//! captured payment. [`RazorpayGateway`] is the production implementation.

mod razorpay;

pub use razorpay::RazorpayGateway;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Order opened with the gateway. `amount` is in minor units (paise, cents).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
}

/// What the checkout widget hands back after the buyer pays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentProof {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),
    #[error("Malformed signature: {0}")]
    MalformedSignature(String),
    #[error("Payment gateway request failed: {0}")]
    Request(#[from] reqwest::Error),
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Opens an order for `amount` major currency units.
    async fn create_order(&self, amount: f64) -> Result<PaymentOrder, PaymentError>;

    /// `Ok(false)` means the proof is well-formed but does not verify.
    async fn verify_payment(&self, proof: &PaymentProof) -> Result<bool, PaymentError>;

    async fn refund(&self, payment_id: &str) -> Result<(), PaymentError>;
}

/// Converts major units to the integer minor units gateways expect.
pub fn to_minor_units(amount: f64) -> Result<i64, PaymentError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(PaymentError::InvalidAmount(amount));
    }
    Ok((amount * 100.0).round() as i64)
}
