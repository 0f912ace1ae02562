use thiserror::Error;

use crate::domain::ProductId;
use crate::product_actor::ProductError;

/// Outcome of a failed purchase, hardware sale, or payment-order request.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PurchaseError {
    #[error("Product not found: {0}")]
    NotFound(ProductId),
    #[error("Product out of stock: {0}")]
    OutOfStock(ProductId),
    #[error("Invalid payment: {0}")]
    InvalidPayment(String),
    #[error("Payment gateway error: {0}")]
    PaymentGateway(String),
    #[error("Ledger error: {0}")]
    Ledger(String),
}

impl From<ProductError> for PurchaseError {
    fn from(error: ProductError) -> Self {
        match error {
            ProductError::NotFound(id) => Self::NotFound(id),
            ProductError::OutOfStock(id) => Self::OutOfStock(id),
            other => Self::Ledger(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RestockError {
    #[error("Product not found: {0}")]
    NotFound(ProductId),
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),
    #[error("Ledger error: {0}")]
    Ledger(String),
}

impl From<ProductError> for RestockError {
    fn from(error: ProductError) -> Self {
        match error {
            ProductError::NotFound(id) => Self::NotFound(id),
            ProductError::InvalidQuantity(amount) => Self::InvalidQuantity(amount),
            other => Self::Ledger(other.to_string()),
        }
    }
}
