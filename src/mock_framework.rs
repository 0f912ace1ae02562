//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver, then helpers like
//! [`expect_action`] to answer each request by hand. The gateway doubles at the
//! bottom stand in for the payment provider and the push provider.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::actor_framework::{Entity, Filter, ResourceClient, ResourceRequest, Response};
use crate::notifications::{PushError, PushGateway, PushMessage};
use crate::payment::{to_minor_units, PaymentError, PaymentGateway, PaymentOrder, PaymentProof};

/// Creates a client whose requests arrive on the returned receiver instead of
/// a running actor, so a test can assert on them and script the replies.
pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Next message must be a Create request.
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreateParams, Response<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Next message must be a Get request.
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Response<Option<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Next message must be an Action request.
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, Response<T::ActionResult>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

/// Next message must be a Query. The filter is returned so the test can
/// apply it to its own fixtures.
pub async fn expect_query<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(Filter<T>, Response<Vec<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Query { filter, respond_to }) => Some((filter, respond_to)),
        _ => None,
    }
}

// =============================================================================
// GATEWAY DOUBLES
// =============================================================================

/// Push provider that records every message it is asked to send.
#[derive(Default)]
pub struct RecordingPush {
    sent: Mutex<Vec<PushMessage>>,
}

impl RecordingPush {
    pub fn sent(&self) -> Vec<PushMessage> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    /// Polls until at least `count` messages arrived or a second has passed.
    pub async fn wait_for(&self, count: usize) -> Vec<PushMessage> {
        for _ in 0..100 {
            let sent = self.sent();
            if sent.len() >= count {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.sent()
    }
}

#[async_trait]
impl PushGateway for RecordingPush {
    async fn send(&self, message: &PushMessage) -> Result<(), PushError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Push provider that rejects everything, counting attempts.
#[derive(Default)]
pub struct FailingPush {
    attempts: AtomicUsize,
}

impl FailingPush {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PushGateway for FailingPush {
    async fn send(&self, _message: &PushMessage) -> Result<(), PushError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(PushError::Rejected("InvalidRegistration".into()))
    }
}

/// Push provider that never answers within any sane timeout.
pub struct StallingPush;

#[async_trait]
impl PushGateway for StallingPush {
    async fn send(&self, _message: &PushMessage) -> Result<(), PushError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(())
    }
}

/// Payment provider with a fixed verdict. Records refund requests.
pub struct StubPaymentGateway {
    accept: bool,
    refunds: Mutex<Vec<String>>,
}

impl StubPaymentGateway {
    pub fn accepting() -> Self {
        Self {
            accept: true,
            refunds: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            accept: false,
            refunds: Mutex::new(Vec::new()),
        }
    }

    pub fn refunds(&self) -> Vec<String> {
        self.refunds.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Refunds run on a background task; poll for them.
    pub async fn wait_for_refunds(&self, count: usize) -> Vec<String> {
        for _ in 0..100 {
            let refunds = self.refunds();
            if refunds.len() >= count {
                return refunds;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.refunds()
    }
}

#[async_trait]
impl PaymentGateway for StubPaymentGateway {
    async fn create_order(&self, amount: f64) -> Result<PaymentOrder, PaymentError> {
        Ok(PaymentOrder {
            id: "order_stub".into(),
            amount: to_minor_units(amount)?,
            currency: "INR".into(),
        })
    }

    async fn verify_payment(&self, _proof: &PaymentProof) -> Result<bool, PaymentError> {
        Ok(self.accept)
    }

    async fn refund(&self, payment_id: &str) -> Result<(), PaymentError> {
        self.refunds.lock().unwrap().push(payment_id.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Product, ProductCreate};

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<Product>(10);

        // Create
        let create_client = client.clone();
        let create_task =
            tokio::spawn(async move { create_client.create(ProductCreate::new("Soda", 20.0, 3, Some(1))).await });

        let (params, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(params.name, "Soda");
        let product = Product::from_create_params(1, params).unwrap();
        responder.send(Ok(product.clone())).unwrap();
        assert_eq!(create_task.await.unwrap(), Ok(product.clone()));

        // Query
        let query_task = tokio::spawn(async move { client.query(|p: &Product| p.stock > 0).await });
        let (filter, responder) = expect_query(&mut receiver).await.expect("Expected Query request");
        let sold_out = Product { stock: 0, ..product.clone() };
        assert!(filter(&product));
        assert!(!filter(&sold_out));
        responder.send(Ok(vec![product.clone()])).unwrap();
        assert_eq!(query_task.await.unwrap(), Ok(vec![product]));
    }
}
