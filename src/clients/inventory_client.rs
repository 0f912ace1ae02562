use tracing::{debug, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::domain::{
    MachineId, Product, ProductCreate, ProductId, Transaction, TransactionCreate, TransactionId, UserId,
};
use crate::product_actor::{ProductAction, ProductActionResult, ProductError};
use crate::transaction_actor::TransactionError;

/// The inventory ledger: product stock counters and the transaction log.
///
/// Stock only moves through [`decrement_stock`](Self::decrement_stock) and
/// [`increment_stock`](Self::increment_stock), each of which is one message
/// to the product store and therefore one atomic conditional update.
#[derive(Clone)]
pub struct InventoryClient {
    products: ResourceClient<Product>,
    transactions: ResourceClient<Transaction>,
}

impl InventoryClient {
    pub fn new(products: ResourceClient<Product>, transactions: ResourceClient<Transaction>) -> Self {
        Self { products, transactions }
    }

    #[instrument(skip(self, product), fields(product_name = %product.name))]
    pub async fn create_product(&self, product: ProductCreate) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.products.create(product).await.map_err(ProductError::from)
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Result<Option<Product>, ProductError> {
        debug!("Sending request");
        self.products.get(id).await.map_err(ProductError::from)
    }

    /// Like [`get_product`](Self::get_product) but absence is an error.
    pub async fn require_product(&self, id: ProductId) -> Result<Product, ProductError> {
        self.get_product(id).await?.ok_or(ProductError::NotFound(id))
    }

    /// Products at one machine, or the whole catalog when `machine_id` is `None`.
    #[instrument(skip(self))]
    pub async fn list_products(&self, machine_id: Option<MachineId>) -> Result<Vec<Product>, ProductError> {
        debug!("Sending request");
        self.products
            .query(move |p: &Product| machine_id.is_none() || p.machine_id == machine_id)
            .await
            .map_err(ProductError::from)
    }

    /// Case-insensitive substring search over product names.
    #[instrument(skip(self))]
    pub async fn search_products(&self, name: String) -> Result<Vec<Product>, ProductError> {
        debug!("Sending request");
        let needle = name.trim().to_lowercase();
        self.products
            .query(move |p: &Product| p.name.to_lowercase().contains(&needle))
            .await
            .map_err(ProductError::from)
    }

    /// Removes one unit.
    ///
    /// # Errors
    /// - [`ProductError::NotFound`] if the product does not exist
    /// - [`ProductError::OutOfStock`] if no units remain; stock is untouched
    #[instrument(skip(self))]
    pub async fn decrement_stock(&self, id: ProductId) -> Result<Product, ProductError> {
        debug!("Sending request");
        match self.products.perform_action(id, ProductAction::DecrementStock).await {
            Ok(ProductActionResult::Decremented(product)) => {
                debug!(stock = product.stock, "Stock decremented");
                Ok(product)
            }
            Ok(ProductActionResult::OutOfStock) => {
                warn!("Product out of stock");
                Err(ProductError::OutOfStock(id))
            }
            Ok(other) => Err(ProductError::ActorCommunicationError(format!("Unexpected result: {:?}", other))),
            Err(e) => Err(ProductError::from_framework(id, e)),
        }
    }

    /// Adds `amount` units.
    ///
    /// # Errors
    /// - [`ProductError::InvalidQuantity`] for a zero amount
    /// - [`ProductError::NotFound`] if the product does not exist
    #[instrument(skip(self))]
    pub async fn increment_stock(&self, id: ProductId, amount: u32) -> Result<Product, ProductError> {
        debug!("Sending request");
        if amount == 0 {
            return Err(ProductError::InvalidQuantity(amount));
        }
        match self.products.perform_action(id, ProductAction::IncrementStock(amount)).await {
            Ok(ProductActionResult::Incremented(product)) => {
                info!(stock = product.stock, "Stock incremented");
                Ok(product)
            }
            Ok(other) => Err(ProductError::ActorCommunicationError(format!("Unexpected result: {:?}", other))),
            Err(e) => Err(ProductError::from_framework(id, e)),
        }
    }

    /// Appends a transaction record. There is no update or delete counterpart.
    #[instrument(skip(self))]
    pub async fn record_transaction(
        &self,
        user_id: UserId,
        product_id: ProductId,
        amount: f64,
        status: &str,
    ) -> Result<TransactionId, TransactionError> {
        debug!("Sending request");
        let record = TransactionCreate {
            user_id,
            product_id,
            amount,
            status: status.to_string(),
        };
        let transaction = self.transactions.create(record).await?;
        info!(transaction_id = transaction.id, "Transaction recorded");
        Ok(transaction.id)
    }

    /// Purchase history for one user, oldest first.
    #[instrument(skip(self))]
    pub async fn purchases_for_user(&self, user_id: UserId) -> Result<Vec<Transaction>, TransactionError> {
        debug!("Sending request");
        self.transactions
            .query(move |t: &Transaction| t.user_id == user_id)
            .await
            .map_err(TransactionError::from)
    }

    #[cfg(test)]
    pub async fn transaction_count(&self) -> usize {
        self.transactions.list().await.map(|all| all.len()).unwrap_or(0)
    }
}
