use shared::domain::ProductId;

/// Message raised when a cart mutation fails, on both the add and update paths.
pub const CART_FAILURE_ALERT: &str = "Failed to Add the Product.";

/// Page elements a cart action writes to. Implementations own the actual
/// rendering (DOM classes, terminal output, ...).
pub trait CartDisplay: Send + Sync {
    /// Makes the sticky notification banner visible.
    fn show_notification(&self);
    fn hide_notification(&self);
    /// Text of the badge inside the sticky notification.
    fn set_notification_badge(&self, text: &str);
    /// Text of the persistent cart counter.
    fn set_cart_counter(&self, text: &str);
    /// Flags the row of `product_id` as failed (`border-error` on a page).
    fn mark_row_error(&self, product_id: &ProductId);
    /// Blocking user-facing alert.
    fn alert(&self, message: &str);
}
