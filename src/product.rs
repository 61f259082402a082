use fieldx::fxstruct;
use serde::Deserialize;
use serde::Serialize;

/// A catalog entry. Field order matches the column order of the catalog file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[fxstruct(no_new, builder, get)]
pub struct Product {
    product_id: String,
    #[serde(rename = "product_name")]
    name:       String,
    #[fieldx(get(copy))]
    price:      f64,
    #[fieldx(get(copy), get_mut)]
    quantity:   i64,
}

impl Product {
    pub fn new<S: ToString, N: ToString>(product_id: S, name: N, price: f64, quantity: i64) -> Self {
        Self {
            product_id: product_id.to_string(),
            name: name.to_string(),
            price,
            quantity,
        }
    }

    /// Price of `quantity` units at the current unit price.
    pub fn total_for(&self, quantity: i64) -> f64 {
        self.price * quantity as f64
    }

    pub fn has_stock_for(&self, quantity: i64) -> bool {
        quantity <= self.quantity
    }
}
