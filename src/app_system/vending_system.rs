use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::actor_framework::ResourceActor;
use crate::clients::{
    DemandClient, InventoryClient, MachineClient, PurchaseClient, PurchaseSettings, RestockClient, UserClient,
};
use crate::config::Config;
use crate::domain::{DemandRequest, Machine, Product, Transaction, User};
use crate::notifications::{DisabledPush, FcmPush, LiveFeed, NotificationDispatcher, NotificationService, PushGateway};
use crate::payment::{PaymentGateway, RazorpayGateway};

/// Sequential ids starting at 1, one sequence per store.
fn id_sequence() -> impl Fn() -> u64 + Send + Sync + 'static {
    let counter = Arc::new(AtomicU64::new(1));
    move || counter.fetch_add(1, Ordering::SeqCst)
}

/// The running backend: every store actor, the notification worker, and the
/// clients wired over them.
pub struct VendingSystem {
    pub inventory_client: InventoryClient,
    pub user_client: UserClient,
    pub machine_client: MachineClient,
    pub demand_client: DemandClient,
    pub purchase_client: PurchaseClient,
    pub restock_client: RestockClient,
    pub dispatcher: NotificationDispatcher,
    handles: Vec<JoinHandle<()>>,
}

impl VendingSystem {
    /// Starts the system with explicit gateways. Must be called inside a
    /// tokio runtime.
    pub fn new(config: &Config, payments: Arc<dyn PaymentGateway>, push: Arc<dyn PushGateway>) -> Self {
        let buffer = config.actor_buffer_size.max(1);

        let (user_actor, users) = ResourceActor::<User>::new("users", buffer, id_sequence());
        let (product_actor, products) = ResourceActor::<Product>::new("products", buffer, id_sequence());
        let (machine_actor, machines) = ResourceActor::<Machine>::new("machines", buffer, id_sequence());
        let (transaction_actor, transactions) =
            ResourceActor::<Transaction>::new("transactions", buffer, id_sequence());
        let (demand_actor, demands) = ResourceActor::<DemandRequest>::new("demands", buffer, id_sequence());

        let (notification_service, dispatcher) = NotificationService::new(
            config.notification_queue_size,
            push,
            config.push_timeout(),
            LiveFeed::new(config.live_feed_capacity),
        );

        let handles = vec![
            tokio::spawn(user_actor.run()),
            tokio::spawn(product_actor.run()),
            tokio::spawn(machine_actor.run()),
            tokio::spawn(transaction_actor.run()),
            tokio::spawn(demand_actor.run()),
            tokio::spawn(notification_service.run()),
        ];

        let user_client = UserClient::new(users);
        let machine_client = MachineClient::new(machines);
        let inventory_client = InventoryClient::new(products, transactions);
        let demand_client = DemandClient::new(demands, user_client.clone());
        let purchase_client = PurchaseClient::new(
            inventory_client.clone(),
            user_client.clone(),
            payments,
            dispatcher.clone(),
            PurchaseSettings::from(config),
        );
        let restock_client = RestockClient::new(inventory_client.clone(), demand_client.clone(), dispatcher.clone());

        info!(?config, "Vending system started");

        Self {
            inventory_client,
            user_client,
            machine_client,
            demand_client,
            purchase_client,
            restock_client,
            dispatcher,
            handles,
        }
    }

    /// Starts the system with the production gateways. Without an FCM key
    /// pushes are logged and dropped.
    pub fn from_config(config: &Config) -> Self {
        let payments: Arc<dyn PaymentGateway> = Arc::new(RazorpayGateway::new(
            config.razorpay_key_id.clone(),
            config.razorpay_key_secret.clone(),
            config.payment_currency.clone(),
        ));
        let push: Arc<dyn PushGateway> = match &config.fcm_server_key {
            Some(key) => Arc::new(FcmPush::new(key.clone())),
            None => {
                warn!("FCM_SERVER_KEY not set, push notifications disabled");
                Arc::new(DisabledPush)
            }
        };
        Self::new(config, payments, push)
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        use crate::mock_framework::{RecordingPush, StubPaymentGateway};
        Self::new(
            &Config::default(),
            Arc::new(StubPaymentGateway::accepting()),
            Arc::new(RecordingPush::default()),
        )
    }

    /// Stops the notification worker, then closes every store by dropping
    /// the clients, and waits for all tasks to finish.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        let Self {
            inventory_client,
            user_client,
            machine_client,
            demand_client,
            purchase_client,
            restock_client,
            dispatcher,
            handles,
        } = self;

        if let Err(e) = dispatcher.shutdown().await {
            warn!(error = %e, "Notification service already stopped");
        }

        drop(purchase_client);
        drop(restock_client);
        drop(demand_client);
        drop(inventory_client);
        drop(machine_client);
        drop(user_client);
        drop(dispatcher);

        for handle in handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
