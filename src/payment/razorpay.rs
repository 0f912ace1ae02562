use async_trait::async_trait;
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use tracing::{debug, instrument};

use super::{to_minor_units, PaymentError, PaymentGateway, PaymentOrder, PaymentProof};

const DEFAULT_BASE_URL: &str = "https://api.razorpay.com";

/// Razorpay over its REST API (no SDK dependency).
pub struct RazorpayGateway {
    key_id: String,
    key_secret: String,
    currency: String,
    base_url: String,
    http: reqwest::Client,
}

impl RazorpayGateway {
    pub fn new(key_id: impl Into<String>, key_secret: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret: key_secret.into(),
            currency: currency.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Checkout signature: hex HMAC-SHA256 of `"{order_id}|{payment_id}"`
    /// keyed with the account secret. Compared in constant time.
    pub fn verify_signature(&self, proof: &PaymentProof) -> Result<bool, PaymentError> {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.key_secret.as_bytes())
            .map_err(|e| PaymentError::MalformedSignature(e.to_string()))?;
        mac.update(format!("{}|{}", proof.order_id, proof.payment_id).as_bytes());

        let expected = match hex::decode(proof.signature.trim()) {
            Ok(bytes) => bytes,
            Err(_) => return Ok(false),
        };
        Ok(mac.verify_slice(&expected).is_ok())
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    #[instrument(skip(self))]
    async fn create_order(&self, amount: f64) -> Result<PaymentOrder, PaymentError> {
        let minor = to_minor_units(amount)?;
        let order: PaymentOrder = self
            .http
            .post(format!("{}/v1/orders", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&json!({
                "amount": minor,
                "currency": self.currency,
                "payment_capture": 1,
            }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(order_id = %order.id, amount = order.amount, "Payment order created");
        Ok(order)
    }

    async fn verify_payment(&self, proof: &PaymentProof) -> Result<bool, PaymentError> {
        self.verify_signature(proof)
    }

    #[instrument(skip(self))]
    async fn refund(&self, payment_id: &str) -> Result<(), PaymentError> {
        self.http
            .post(format!("{}/v1/payments/{}/refund", self.base_url, payment_id))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&json!({}))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &str, order_id: &str, payment_id: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{order_id}|{payment_id}").as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    fn gateway() -> RazorpayGateway {
        RazorpayGateway::new("test_key_id", "test_key_secret", "INR")
    }

    #[tokio::test]
    async fn test_valid_signature_verifies() {
        let proof = PaymentProof {
            order_id: "order_1".into(),
            payment_id: "pay_1".into(),
            signature: sign("test_key_secret", "order_1", "pay_1"),
        };
        assert!(gateway().verify_payment(&proof).await.unwrap());
    }

    #[tokio::test]
    async fn test_tampered_proof_is_rejected() {
        let signature = sign("test_key_secret", "order_1", "pay_1");

        let other_payment = PaymentProof {
            order_id: "order_1".into(),
            payment_id: "pay_2".into(),
            signature: signature.clone(),
        };
        assert!(!gateway().verify_payment(&other_payment).await.unwrap());

        let wrong_secret = PaymentProof {
            order_id: "order_1".into(),
            payment_id: "pay_1".into(),
            signature: sign("other_secret", "order_1", "pay_1"),
        };
        assert!(!gateway().verify_payment(&wrong_secret).await.unwrap());

        let not_hex = PaymentProof {
            order_id: "order_1".into(),
            payment_id: "pay_1".into(),
            signature: "not-a-signature".into(),
        };
        assert!(!gateway().verify_payment(&not_hex).await.unwrap());
    }
}
