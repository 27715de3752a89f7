use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};

use crate::{
    domain::{EndpointUrl, ProductId},
    error::ResponseStatus,
};

/// Raw values of one product row. Quantities and prices are sent exactly as
/// typed into the row controls; the server performs any numeric parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineInput {
    pub product_id: ProductId,
    pub item_quantity: String,
    pub package_quantity: String,
    pub item_price: String,
    pub package_price: String,
}

impl CartLineInput {
    /// True when either quantity field holds any text at all.
    pub fn has_quantity(&self) -> bool {
        !self.item_quantity.is_empty() || !self.package_quantity.is_empty()
    }
}

/// JSON body POSTed to a row's endpoint.
pub type CartMutationRequest = CartLineInput;

/// Where a row posts its mutation, paired with the line read from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSnapshot {
    pub endpoint_url: EndpointUrl,
    pub line: CartLineInput,
}

/// Reply to a cart mutation. Only `cart_length` is required; `status` and
/// `message` are kept for logging and read as `None` when they carry an
/// unexpected type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartMutationResponse {
    pub cart_length: i64,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<ResponseStatus>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub message: Option<String>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl CartMutationResponse {
    pub fn new(cart_length: i64) -> Self {
        Self {
            cart_length,
            status: None,
            message: None,
        }
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
