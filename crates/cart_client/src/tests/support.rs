use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use shared::{
    domain::{EndpointUrl, ProductId},
    protocol::{CartMutationRequest, CartMutationResponse},
};
use tokio::sync::oneshot;

use crate::{display::CartDisplay, error::TransportError, transport::CartTransport};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayState {
    pub notification_visible: bool,
    pub shows: u32,
    pub hides: u32,
    pub badge: Option<String>,
    pub counter: Option<String>,
    pub error_rows: Vec<ProductId>,
    pub alerts: Vec<String>,
}

#[derive(Default)]
pub struct RecordingDisplay {
    state: Mutex<DisplayState>,
}

impl RecordingDisplay {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn snapshot(&self) -> DisplayState {
        self.state.lock().expect("display state").clone()
    }

    fn update(&self, f: impl FnOnce(&mut DisplayState)) {
        f(&mut self.state.lock().expect("display state"));
    }
}

impl CartDisplay for RecordingDisplay {
    fn show_notification(&self) {
        self.update(|s| {
            s.notification_visible = true;
            s.shows += 1;
        });
    }

    fn hide_notification(&self) {
        self.update(|s| {
            s.notification_visible = false;
            s.hides += 1;
        });
    }

    fn set_notification_badge(&self, text: &str) {
        self.update(|s| s.badge = Some(text.to_string()));
    }

    fn set_cart_counter(&self, text: &str) {
        self.update(|s| s.counter = Some(text.to_string()));
    }

    fn mark_row_error(&self, product_id: &ProductId) {
        self.update(|s| s.error_rows.push(product_id.clone()));
    }

    fn alert(&self, message: &str) {
        self.update(|s| s.alerts.push(message.to_string()));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub endpoint: EndpointUrl,
    pub body: serde_json::Value,
    pub csrf_token: String,
}

pub struct Reply {
    /// `None` makes the request fail.
    pub cart_length: Option<i64>,
    pub gate: Option<oneshot::Receiver<()>>,
}

/// In-memory transport. Replies are scripted per product id; unscripted
/// products succeed with `default_cart_length`.
pub struct ScriptedTransport {
    requests: Mutex<Vec<RecordedRequest>>,
    replies: Mutex<HashMap<ProductId, Reply>>,
    default_cart_length: i64,
}

impl ScriptedTransport {
    pub fn replying(default_cart_length: i64) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            replies: Mutex::new(HashMap::new()),
            default_cart_length,
        })
    }

    pub fn script(&self, product_id: &str, reply: Reply) {
        self.replies
            .lock()
            .expect("replies")
            .insert(ProductId::from(product_id), reply);
    }

    pub fn fail_for(&self, product_id: &str) {
        self.script(
            product_id,
            Reply {
                cart_length: None,
                gate: None,
            },
        );
    }

    /// Holds the reply for `product_id` until the returned sender fires.
    pub fn gate(&self, product_id: &str, cart_length: i64) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.script(
            product_id,
            Reply {
                cart_length: Some(cart_length),
                gate: Some(rx),
            },
        );
        tx
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("requests").clone()
    }

    pub async fn wait_for_requests(&self, count: usize) {
        for _ in 0..400 {
            if self.requests.lock().expect("requests").len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("timed out waiting for {count} requests");
    }
}

pub fn decode_failure() -> TransportError {
    let source = serde_json::from_str::<CartMutationResponse>("<html>Server Error</html>")
        .expect_err("html is not a cart response");
    TransportError::Decode {
        status: 500,
        api_error: None,
        source,
    }
}

#[async_trait]
impl CartTransport for ScriptedTransport {
    async fn post_mutation(
        &self,
        endpoint: &EndpointUrl,
        request: &CartMutationRequest,
        csrf_token: &str,
    ) -> Result<CartMutationResponse, TransportError> {
        self.requests.lock().expect("requests").push(RecordedRequest {
            endpoint: endpoint.clone(),
            body: serde_json::to_value(request).expect("serialize request"),
            csrf_token: csrf_token.to_string(),
        });

        let reply = self
            .replies
            .lock()
            .expect("replies")
            .remove(&request.product_id);
        let Some(reply) = reply else {
            return Ok(CartMutationResponse::new(self.default_cart_length));
        };
        if let Some(gate) = reply.gate {
            let _ = gate.await;
        }
        reply
            .cart_length
            .map(CartMutationResponse::new)
            .ok_or_else(decode_failure)
    }
}
