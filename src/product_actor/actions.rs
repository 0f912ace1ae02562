use crate::domain::Product;

/// Custom actions for Product entities.
///
/// Each action is a single conditional update applied inside the product
/// store actor, so concurrent callers can never observe a torn count.
#[derive(Debug, Clone)]
pub enum ProductAction {
    /// Removes one unit if, and only if, at least one unit remains.
    DecrementStock,
    /// Adds a positive number of units.
    IncrementStock(u32),
}

#[derive(Debug, Clone)]
pub enum ProductActionResult {
    /// One unit was removed; carries the updated product.
    Decremented(Product),
    /// Stock was already zero. Nothing changed.
    OutOfStock,
    Incremented(Product),
}
