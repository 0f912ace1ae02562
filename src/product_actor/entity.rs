use crate::actor_framework::Entity;
use crate::domain::{Product, ProductCreate, ProductId};
use super::actions::{ProductAction, ProductActionResult};

impl Entity for Product {
    type Id = ProductId;
    type CreateParams = ProductCreate;
    type Patch = ();
    type Action = ProductAction;
    type ActionResult = ProductActionResult;

    fn from_create_params(id: ProductId, params: ProductCreate) -> Result<Self, String> {
        if !params.price.is_finite() || params.price < 0.0 {
            return Err(format!("Invalid price: {}", params.price));
        }
        Ok(Self {
            id,
            name: params.name,
            price: params.price,
            stock: params.stock,
            machine_id: params.machine_id,
        })
    }

    /// Catalog rows are fixed once created. Stock moves exclusively through actions.
    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Err("Products change only through stock actions".to_string())
    }

    /// # Errors
    /// Rejects a zero increment and an increment that would overflow the counter.
    fn handle_action(&mut self, action: ProductAction) -> Result<ProductActionResult, String> {
        match action {
            ProductAction::DecrementStock => match self.stock.checked_sub(1) {
                Some(remaining) => {
                    self.stock = remaining;
                    Ok(ProductActionResult::Decremented(self.clone()))
                }
                None => Ok(ProductActionResult::OutOfStock),
            },
            ProductAction::IncrementStock(0) => Err("Invalid quantity: 0".to_string()),
            ProductAction::IncrementStock(amount) => {
                self.stock = self
                    .stock
                    .checked_add(amount)
                    .ok_or_else(|| format!("Stock overflow: {} + {}", self.stock, amount))?;
                Ok(ProductActionResult::Incremented(self.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: u32) -> Product {
        Product::from_create_params(1, ProductCreate::new("Soda", 20.0, stock, Some(5))).unwrap()
    }

    #[test]
    fn test_decrement_at_zero_leaves_stock_untouched() {
        let mut p = product(0);
        for _ in 0..3 {
            let result = p.handle_action(ProductAction::DecrementStock).unwrap();
            assert!(matches!(result, ProductActionResult::OutOfStock));
        }
        assert_eq!(p.stock, 0);
    }

    #[test]
    fn test_decrement_returns_updated_product() {
        let mut p = product(2);
        match p.handle_action(ProductAction::DecrementStock).unwrap() {
            ProductActionResult::Decremented(updated) => assert_eq!(updated.stock, 1),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_increment_adds_exact_amount() {
        let mut p = product(3);
        match p.handle_action(ProductAction::IncrementStock(4)).unwrap() {
            ProductActionResult::Incremented(updated) => assert_eq!(updated.stock, 7),
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_increment_rejects_zero_and_overflow() {
        let mut p = product(u32::MAX - 1);
        assert!(p.handle_action(ProductAction::IncrementStock(0)).is_err());
        assert!(p.handle_action(ProductAction::IncrementStock(2)).is_err());
        assert_eq!(p.stock, u32::MAX - 1);
    }

    #[test]
    fn test_negative_price_rejected() {
        assert!(Product::from_create_params(1, ProductCreate::new("Bad", -1.0, 1, None)).is_err());
        assert!(Product::from_create_params(1, ProductCreate::new("Bad", f64::NAN, 1, None)).is_err());
    }

    #[test]
    fn test_updates_are_refused() {
        let mut p = product(3);
        assert!(p.on_update(()).is_err());
        assert_eq!(p, product(3));
    }
}
