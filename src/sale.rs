use fieldx::fxstruct;
use serde::Deserialize;
use serde::Serialize;

use crate::product::Product;

/// One line item of a sale. Product name and total are captured at the moment of sale and never recomputed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[fxstruct(no_new, get)]
pub struct Sale {
    sale_id:       String,
    product_id:    String,
    name:          String,
    #[fieldx(get(copy))]
    quantity_sold: i64,
    #[fieldx(get(copy))]
    total_price:   f64,
}

impl Sale {
    pub fn new<S, P, N>(sale_id: S, product_id: P, name: N, quantity_sold: i64, total_price: f64) -> Self
    where
        S: ToString,
        P: ToString,
        N: ToString,
    {
        Self {
            sale_id: sale_id.to_string(),
            product_id: product_id.to_string(),
            name: name.to_string(),
            quantity_sold,
            total_price,
        }
    }

    /// Prices `quantity` units of `product` under `sale_id`.
    pub fn of_product<S: ToString>(sale_id: S, product: &Product, quantity: i64) -> Self {
        Self::new(
            sale_id,
            product.product_id(),
            product.name(),
            quantity,
            product.total_for(quantity),
        )
    }
}
