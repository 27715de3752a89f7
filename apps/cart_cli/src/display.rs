use cart_client::CartDisplay;
use shared::domain::ProductId;
use tracing::debug;

/// Renders cart display updates as terminal lines.
#[derive(Debug, Default)]
pub struct TerminalDisplay;

impl CartDisplay for TerminalDisplay {
    fn show_notification(&self) {
        println!("Product added to cart.");
    }

    fn hide_notification(&self) {
        debug!("cart: notification hidden");
    }

    fn set_notification_badge(&self, text: &str) {
        debug!(badge = text, "cart: notification badge updated");
    }

    fn set_cart_counter(&self, text: &str) {
        println!("Cart items: {text}");
    }

    fn mark_row_error(&self, product_id: &ProductId) {
        eprintln!("Row for product {product_id} marked as failed.");
    }

    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }
}
