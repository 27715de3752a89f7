use std::{sync::Arc, time::Duration};

use shared::{
    domain::{CartAction, EndpointUrl, ProductId},
    protocol::{CartMutationRequest, CartMutationResponse, RowSnapshot},
};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub mod csrf;
pub mod display;
pub mod error;
pub mod notification;
pub mod reconcile;
pub mod row;
pub mod transport;

pub use csrf::{extract_csrf_token, CookieString, CsrfTokenSource, JarTokenSource};
pub use display::{CartDisplay, CART_FAILURE_ALERT};
pub use error::TransportError;
pub use notification::{NotificationHandle, StickyNotification, DEFAULT_NOTIFICATION_HIDE_AFTER};
pub use reconcile::{CounterReconciler, Ticket};
pub use row::{read_line_input, CartRow, StaticRow};
pub use transport::{CartTransport, HttpCartTransport};

/// Result of one row interaction.
#[derive(Debug)]
pub enum CartOutcome {
    /// Add clicked with both quantity fields empty; nothing was sent.
    Skipped,
    /// The server accepted the mutation and the page now shows its cart size.
    /// Adds carry the handle of the notification they showed.
    Applied {
        ticket: Ticket,
        cart_length: i64,
        notification: Option<NotificationHandle>,
    },
    /// Accepted, but a more recently dispatched request had already updated
    /// the counter.
    Stale {
        ticket: Ticket,
        cart_length: i64,
        notification: Option<NotificationHandle>,
    },
    Failed { ticket: Ticket, error: TransportError },
}

impl CartOutcome {
    pub fn cart_length(&self) -> Option<i64> {
        match self {
            CartOutcome::Applied { cart_length, .. } | CartOutcome::Stale { cart_length, .. } => {
                Some(*cart_length)
            }
            CartOutcome::Skipped | CartOutcome::Failed { .. } => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, CartOutcome::Failed { .. })
    }

    /// Handle for the notification an accepted add showed.
    pub fn notification(&self) -> Option<&NotificationHandle> {
        match self {
            CartOutcome::Applied { notification, .. } | CartOutcome::Stale { notification, .. } => {
                notification.as_ref()
            }
            CartOutcome::Skipped | CartOutcome::Failed { .. } => None,
        }
    }
}

/// Add-to-cart and update-cart actions for product rows.
pub struct CartActionClient {
    transport: Arc<dyn CartTransport>,
    tokens: Arc<dyn CsrfTokenSource>,
    display: Arc<dyn CartDisplay>,
    notification: StickyNotification,
    counter: CounterReconciler,
}

impl CartActionClient {
    pub fn new(
        transport: Arc<dyn CartTransport>,
        tokens: Arc<dyn CsrfTokenSource>,
        display: Arc<dyn CartDisplay>,
    ) -> Self {
        Self::with_notification_delay(transport, tokens, display, DEFAULT_NOTIFICATION_HIDE_AFTER)
    }

    pub fn with_notification_delay(
        transport: Arc<dyn CartTransport>,
        tokens: Arc<dyn CsrfTokenSource>,
        display: Arc<dyn CartDisplay>,
        hide_after: Duration,
    ) -> Self {
        Self {
            notification: StickyNotification::new(Arc::clone(&display), hide_after),
            transport,
            tokens,
            display,
            counter: CounterReconciler::new(),
        }
    }

    /// Tracks which dispatched request the counter currently reflects.
    pub fn counter(&self) -> &CounterReconciler {
        &self.counter
    }

    /// Current CSRF token, read from cookie storage on every call.
    pub fn extract_csrf_token(&self) -> String {
        self.tokens.csrf_token()
    }

    /// POSTs one mutation. Display state is left untouched.
    pub async fn submit_cart_mutation(
        &self,
        endpoint: &EndpointUrl,
        payload: &CartMutationRequest,
        csrf_token: &str,
    ) -> Result<CartMutationResponse, TransportError> {
        self.transport
            .post_mutation(endpoint, payload, csrf_token)
            .await
    }

    /// Click on a row's add control. Sends nothing when both quantities are
    /// empty.
    pub async fn on_add_clicked<R: CartRow + ?Sized>(&self, row: &R) -> CartOutcome {
        let snapshot = read_line_input(row);
        if !snapshot.line.has_quantity() {
            debug!(
                product_id = %snapshot.line.product_id,
                "cart: add skipped, no quantity entered"
            );
            return CartOutcome::Skipped;
        }
        self.dispatch(CartAction::Add, snapshot).await
    }

    /// Any value change on a cart row. Always sends.
    pub async fn on_row_changed<R: CartRow + ?Sized>(&self, row: &R) -> CartOutcome {
        let snapshot = read_line_input(row);
        debug!(line = ?snapshot.line, "cart: row changed");
        self.dispatch(CartAction::Update, snapshot).await
    }

    /// Fire-and-forget variant of [`Self::on_add_clicked`].
    pub fn spawn_add<R>(self: &Arc<Self>, row: R) -> JoinHandle<CartOutcome>
    where
        R: CartRow + Send + Sync + 'static,
    {
        let client = Arc::clone(self);
        tokio::spawn(async move { client.on_add_clicked(&row).await })
    }

    /// Fire-and-forget variant of [`Self::on_row_changed`].
    pub fn spawn_update<R>(self: &Arc<Self>, row: R) -> JoinHandle<CartOutcome>
    where
        R: CartRow + Send + Sync + 'static,
    {
        let client = Arc::clone(self);
        tokio::spawn(async move { client.on_row_changed(&row).await })
    }

    async fn dispatch(&self, action: CartAction, snapshot: RowSnapshot) -> CartOutcome {
        let ticket = self.counter.issue();
        let csrf_token = self.extract_csrf_token();
        let result = self
            .submit_cart_mutation(&snapshot.endpoint_url, &snapshot.line, &csrf_token)
            .await;
        self.reconcile(action, ticket, &snapshot.line.product_id, result)
    }

    fn reconcile(
        &self,
        action: CartAction,
        ticket: Ticket,
        product_id: &ProductId,
        result: Result<CartMutationResponse, TransportError>,
    ) -> CartOutcome {
        match result {
            Ok(response) => {
                let cart_length = response.cart_length;
                let notification =
                    (action == CartAction::Add).then(|| self.notification.show());
                info!(%action, %product_id, cart_length, "cart: {cart_length} Product added");
                if self
                    .counter
                    .apply(self.display.as_ref(), action, ticket, cart_length)
                {
                    CartOutcome::Applied {
                        ticket,
                        cart_length,
                        notification,
                    }
                } else {
                    CartOutcome::Stale {
                        ticket,
                        cart_length,
                        notification,
                    }
                }
            }
            Err(error) => {
                if action == CartAction::Add {
                    self.display.mark_row_error(product_id);
                }
                warn!(
                    %action,
                    %product_id,
                    server_message = error.server_message().unwrap_or_default(),
                    "cart: Server Error: {error}"
                );
                self.display.alert(CART_FAILURE_ALERT);
                CartOutcome::Failed { ticket, error }
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
