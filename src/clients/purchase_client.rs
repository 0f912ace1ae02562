use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, instrument, warn};

use crate::clients::{InventoryClient, UserClient};
use crate::config::Config;
use crate::domain::{EventSource, InventoryEvent, Product, ProductId, TransactionId, UserId, STATUS_COMPLETED};
use crate::error::PurchaseError;
use crate::notifications::NotificationDispatcher;
use crate::payment::{PaymentGateway, PaymentOrder, PaymentProof};

/// Knobs the purchase flow reads from [`Config`].
#[derive(Debug, Clone, Copy)]
pub struct PurchaseSettings {
    pub low_stock_threshold: u32,
    pub payment_timeout: Duration,
}

impl From<&Config> for PurchaseSettings {
    fn from(config: &Config) -> Self {
        Self {
            low_stock_threshold: config.low_stock_threshold,
            payment_timeout: config.payment_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseReceipt {
    /// Product as it stands after the sale.
    pub product: Product,
    pub transaction_id: TransactionId,
}

/// Orchestrates online purchases and hardware sale sync.
///
/// The order of effects is fixed: verify payment, take the unit, write the
/// ledger, then fan out notifications. Nothing is mutated before the payment
/// verifies, and nothing is announced before the unit is taken.
#[derive(Clone)]
pub struct PurchaseClient {
    inventory: InventoryClient,
    user_client: UserClient,
    payments: Arc<dyn PaymentGateway>,
    dispatcher: NotificationDispatcher,
    settings: PurchaseSettings,
}

impl PurchaseClient {
    pub fn new(
        inventory: InventoryClient,
        user_client: UserClient,
        payments: Arc<dyn PaymentGateway>,
        dispatcher: NotificationDispatcher,
        settings: PurchaseSettings,
    ) -> Self {
        Self {
            inventory,
            user_client,
            payments,
            dispatcher,
            settings,
        }
    }

    /// Opens a gateway order priced at the product's current price.
    #[instrument(skip(self))]
    pub async fn create_payment_order(&self, product_id: ProductId) -> Result<PaymentOrder, PurchaseError> {
        let product = self.inventory.require_product(product_id).await?;
        if product.stock == 0 {
            warn!("Refusing payment order for sold-out product");
            return Err(PurchaseError::OutOfStock(product_id));
        }

        match tokio::time::timeout(self.settings.payment_timeout, self.payments.create_order(product.price)).await {
            Ok(Ok(order)) => {
                info!(order_id = %order.id, amount = order.amount, "Payment order created");
                Ok(order)
            }
            Ok(Err(e)) => {
                error!(error = %e, "Payment order creation failed");
                Err(PurchaseError::PaymentGateway(e.to_string()))
            }
            Err(_) => {
                error!("Payment order creation timed out");
                Err(PurchaseError::PaymentGateway("timed out".into()))
            }
        }
    }

    /// Completes a paid online purchase.
    ///
    /// # Errors
    /// - [`PurchaseError::InvalidPayment`] if the proof does not verify; nothing changes
    /// - [`PurchaseError::NotFound`] / [`PurchaseError::OutOfStock`] if no unit could be
    ///   taken; a refund of the verified payment is attempted in the background
    /// - [`PurchaseError::Ledger`] if the unit was taken but the transaction could
    ///   not be written; the sale is still broadcast
    #[instrument(skip(self, proof), fields(order_id = %proof.order_id))]
    pub async fn purchase(
        &self,
        product_id: ProductId,
        proof: PaymentProof,
        user_id: UserId,
    ) -> Result<PurchaseReceipt, PurchaseError> {
        info!("Processing purchase");

        // Step 1: Verify payment
        self.verify(&proof).await?;
        debug!("Payment verified");

        // Step 2: Take one unit
        let product = match self.inventory.decrement_stock(product_id).await {
            Ok(product) => product,
            Err(e) => {
                error!(error = %e, "Stock decrement failed after payment");
                self.spawn_refund(proof.payment_id.clone());
                return Err(e.into());
            }
        };

        // Step 3: Ledger
        let recorded = self
            .inventory
            .record_transaction(user_id, product_id, product.price, STATUS_COMPLETED)
            .await;

        // Step 4: Side channels
        self.notify_buyer(user_id, &product).await;
        self.check_low_stock(&product);
        self.dispatcher
            .broadcast(InventoryEvent::deducted(&product, EventSource::Purchase));

        match recorded {
            Ok(transaction_id) => {
                info!(transaction_id, stock = product.stock, "Purchase completed");
                Ok(PurchaseReceipt { product, transaction_id })
            }
            Err(e) => {
                error!(error = %e, "Unit dispensed but transaction not recorded");
                Err(PurchaseError::Ledger(e.to_string()))
            }
        }
    }

    /// Applies a sale the machine completed without network access.
    ///
    /// No payment, transaction or push: the hardware already took the money.
    #[instrument(skip(self))]
    pub async fn sync_offline_sale(&self, product_id: ProductId) -> Result<Product, PurchaseError> {
        let product = self.inventory.decrement_stock(product_id).await?;
        info!(stock = product.stock, "Offline sale synced");
        self.check_low_stock(&product);
        self.dispatcher
            .broadcast(InventoryEvent::deducted(&product, EventSource::OfflineHardware));
        Ok(product)
    }

    async fn verify(&self, proof: &PaymentProof) -> Result<(), PurchaseError> {
        match tokio::time::timeout(self.settings.payment_timeout, self.payments.verify_payment(proof)).await {
            Ok(Ok(true)) => Ok(()),
            Ok(Ok(false)) => {
                warn!("Payment signature mismatch");
                Err(PurchaseError::InvalidPayment("signature mismatch".into()))
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Payment verification failed");
                Err(PurchaseError::InvalidPayment(e.to_string()))
            }
            Err(_) => {
                warn!("Payment verification timed out");
                Err(PurchaseError::InvalidPayment("verification timed out".into()))
            }
        }
    }

    fn spawn_refund(&self, payment_id: String) {
        let payments = self.payments.clone();
        let timeout = self.settings.payment_timeout;
        tokio::spawn(async move {
            match tokio::time::timeout(timeout, payments.refund(&payment_id)).await {
                Ok(Ok(())) => info!(%payment_id, "Payment refunded"),
                Ok(Err(e)) => error!(%payment_id, error = %e, "Refund failed, manual reconciliation needed"),
                Err(_) => error!(%payment_id, "Refund timed out, manual reconciliation needed"),
            }
        });
    }

    async fn notify_buyer(&self, user_id: UserId, product: &Product) {
        let token = match self.user_client.get_user(user_id).await {
            Ok(Some(user)) => user.notification_token().map(str::to_string),
            Ok(None) => {
                debug!(user_id, "Buyer not registered, skipping push");
                None
            }
            Err(e) => {
                warn!(user_id, error = %e, "Buyer lookup failed, skipping push");
                None
            }
        };

        if let Some(token) = token {
            let data = HashMap::from([
                ("type".to_string(), "purchase".to_string()),
                ("product_id".to_string(), product.id.to_string()),
            ]);
            self.dispatcher.notify_user(
                &token,
                "Purchase Successful",
                format!("Your {} is being dispensed. Enjoy!", product.name),
                data,
            );
        }
    }

    fn check_low_stock(&self, product: &Product) {
        if product.stock < self.settings.low_stock_threshold {
            warn!(
                product_id = product.id,
                machine_id = ?product.machine_id,
                stock = product.stock,
                "Low stock, vendor restock needed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::FrameworkError;
    use crate::domain::{Product, Transaction, User};
    use crate::mock_framework::{
        create_mock_client, expect_action, expect_create, expect_get, RecordingPush, StubPaymentGateway,
    };
    use crate::notifications::{LiveFeed, NotificationService};
    use crate::product_actor::{ProductAction, ProductActionResult};

    fn settings() -> PurchaseSettings {
        PurchaseSettings {
            low_stock_threshold: 5,
            payment_timeout: Duration::from_millis(200),
        }
    }

    fn proof() -> PaymentProof {
        PaymentProof {
            order_id: "order_1".into(),
            payment_id: "pay_1".into(),
            signature: "sig".into(),
        }
    }

    #[tokio::test]
    async fn test_purchase_interaction_sequence() {
        let (product_client, mut product_rx) = create_mock_client::<Product>(10);
        let (transaction_client, mut transaction_rx) = create_mock_client::<Transaction>(10);
        let (user_client, mut user_rx) = create_mock_client::<User>(10);
        let (service, dispatcher) = NotificationService::new(
            8,
            Arc::new(RecordingPush::default()),
            Duration::from_millis(50),
            LiveFeed::new(8),
        );
        drop(service);
        let mut feed = dispatcher.subscribe();

        let client = PurchaseClient::new(
            InventoryClient::new(product_client, transaction_client),
            UserClient::new(user_client),
            Arc::new(StubPaymentGateway::accepting()),
            dispatcher,
            settings(),
        );

        let task = tokio::spawn(async move { client.purchase(7, proof(), 3).await });

        let (id, action, respond_to) = expect_action(&mut product_rx).await.expect("Expected decrement");
        assert_eq!(id, 7);
        assert!(matches!(action, ProductAction::DecrementStock));
        let product = Product {
            id: 7,
            name: "Soda".into(),
            price: 20.0,
            stock: 4,
            machine_id: Some(2),
        };
        respond_to
            .send(Ok(ProductActionResult::Decremented(product.clone())))
            .unwrap();

        let (record, respond_to) = expect_create(&mut transaction_rx).await.expect("Expected transaction");
        assert_eq!(record.user_id, 3);
        assert_eq!(record.product_id, 7);
        assert_eq!(record.amount, 20.0);
        assert_eq!(record.status, STATUS_COMPLETED);
        respond_to
            .send(Ok(Transaction {
                id: 11,
                user_id: 3,
                product_id: 7,
                amount: 20.0,
                status: STATUS_COMPLETED.into(),
                created_at: chrono::Utc::now(),
            }))
            .unwrap();

        let (user_id, respond_to) = expect_get(&mut user_rx).await.expect("Expected buyer lookup");
        assert_eq!(user_id, 3);
        respond_to.send(Ok(None)).unwrap();

        let receipt = task.await.unwrap().unwrap();
        assert_eq!(receipt.transaction_id, 11);
        assert_eq!(receipt.product.stock, 4);

        let event = feed.try_next().expect("Expected broadcast");
        assert_eq!(event.product_id, 7);
        assert_eq!(event.machine_id, Some(2));
        assert_eq!(event.source, EventSource::Purchase);
    }

    #[tokio::test]
    async fn test_rejected_payment_touches_nothing() {
        let (product_client, mut product_rx) = create_mock_client::<Product>(10);
        let (transaction_client, _transaction_rx) = create_mock_client::<Transaction>(10);
        let (user_client, _user_rx) = create_mock_client::<User>(10);
        let (_service, dispatcher) = NotificationService::new(
            8,
            Arc::new(RecordingPush::default()),
            Duration::from_millis(50),
            LiveFeed::new(8),
        );

        let client = PurchaseClient::new(
            InventoryClient::new(product_client, transaction_client),
            UserClient::new(user_client),
            Arc::new(StubPaymentGateway::rejecting()),
            dispatcher,
            settings(),
        );

        let result = client.purchase(7, proof(), 3).await;
        assert!(matches!(result, Err(PurchaseError::InvalidPayment(_))));
        assert!(product_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_missing_product_maps_to_not_found() {
        let (product_client, mut product_rx) = create_mock_client::<Product>(10);
        let (transaction_client, _transaction_rx) = create_mock_client::<Transaction>(10);
        let (user_client, _user_rx) = create_mock_client::<User>(10);
        let (_service, dispatcher) = NotificationService::new(
            8,
            Arc::new(RecordingPush::default()),
            Duration::from_millis(50),
            LiveFeed::new(8),
        );
        let payments = Arc::new(StubPaymentGateway::accepting());

        let client = PurchaseClient::new(
            InventoryClient::new(product_client, transaction_client),
            UserClient::new(user_client),
            payments.clone(),
            dispatcher,
            settings(),
        );

        let task = tokio::spawn(async move { client.purchase(99, proof(), 3).await });
        let (_, _, respond_to) = expect_action(&mut product_rx).await.expect("Expected decrement");
        respond_to.send(Err(FrameworkError::NotFound("99".into()))).unwrap();

        assert_eq!(task.await.unwrap(), Err(PurchaseError::NotFound(99)));
        assert_eq!(payments.wait_for_refunds(1).await, vec!["pay_1".to_string()]);
    }
}
