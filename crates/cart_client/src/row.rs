//! Access to the values of one product row.

use shared::{
    domain::{EndpointUrl, ProductId},
    protocol::{CartLineInput, RowSnapshot},
};

/// One row of a product or cart table. Every control is required to exist,
/// so accessors return plain values.
pub trait CartRow {
    fn product_id(&self) -> ProductId;
    fn endpoint_url(&self) -> EndpointUrl;
    fn item_quantity(&self) -> String;
    fn package_quantity(&self) -> String;
    fn item_price(&self) -> String;
    fn package_price(&self) -> String;
}

/// Reads the current row values into a fresh line input.
pub fn read_line_input<R: CartRow + ?Sized>(row: &R) -> RowSnapshot {
    RowSnapshot {
        endpoint_url: row.endpoint_url(),
        line: CartLineInput {
            product_id: row.product_id(),
            item_quantity: row.item_quantity(),
            package_quantity: row.package_quantity(),
            item_price: row.item_price(),
            package_price: row.package_price(),
        },
    }
}

/// Owned row values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticRow {
    pub endpoint_url: EndpointUrl,
    pub line: CartLineInput,
}

impl StaticRow {
    pub fn new(endpoint_url: impl Into<EndpointUrl>, product_id: impl Into<ProductId>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            line: CartLineInput {
                product_id: product_id.into(),
                item_quantity: String::new(),
                package_quantity: String::new(),
                item_price: String::new(),
                package_price: String::new(),
            },
        }
    }

    pub fn with_quantities(
        mut self,
        item_quantity: impl Into<String>,
        package_quantity: impl Into<String>,
    ) -> Self {
        self.line.item_quantity = item_quantity.into();
        self.line.package_quantity = package_quantity.into();
        self
    }

    pub fn with_prices(
        mut self,
        item_price: impl Into<String>,
        package_price: impl Into<String>,
    ) -> Self {
        self.line.item_price = item_price.into();
        self.line.package_price = package_price.into();
        self
    }
}

impl CartRow for StaticRow {
    fn product_id(&self) -> ProductId {
        self.line.product_id.clone()
    }

    fn endpoint_url(&self) -> EndpointUrl {
        self.endpoint_url.clone()
    }

    fn item_quantity(&self) -> String {
        self.line.item_quantity.clone()
    }

    fn package_quantity(&self) -> String {
        self.line.package_quantity.clone()
    }

    fn item_price(&self) -> String {
        self.line.item_price.clone()
    }

    fn package_price(&self) -> String {
        self.line.package_price.clone()
    }
}
