//! # shopkeep
//!
//! Point-of-sale and inventory tracker for a single operator of a small shop.
//!
//! # The Basics
//!
//! The shop keeps two flat CSV files:
//!
//! | File | Content | Written |
//! | ---- | ------- | ------- |
//! | `inventory.csv` | `product_id,product_name,price,quantity` | rewritten entirely after every change |
//! | `sales.csv` | `sale_id,product_id,name,quantity_sold,total_price` | one appended row per sold line item |
//!
//! The operator works through a numbered menu: view the catalog, add (or replace) a product, process a sale made of
//! any number of line items sharing one sale ID, view the sale log, or exit. A line item is only recorded when the
//! product exists and has enough stock; the sale row is appended first, then the stock is decremented.
//!
//! ```no_run
//! use shopkeep::prelude::*;
//!
//! let inventory = Inventory::load("inventory.csv")?;
//! let sales = SalesLedger::new("sales.csv");
//! let mut shop = ShopSystem::new(inventory, sales, false);
//!
//! match shop.sell("S1", "P1", 3)? {
//!     SaleOutcome::Recorded(sale) => println!("total: {}", sale.total_price()),
//!     SaleOutcome::InsufficientStock { available } => println!("only {available} left"),
//!     SaleOutcome::NotFound => println!("no such product"),
//! }
//! # Ok::<(), shopkeep::types::ShopError>(())
//! ```
//!
//! # Known Hazards
//!
//! Nothing guards the files against concurrent writers. Two instances running over the same files will race and the
//! last catalog rewrite wins.

pub mod app;
pub mod inventory;
pub mod product;
pub mod report;
pub mod sale;
pub mod sales;
pub mod shop;
pub mod types;

#[doc(inline)]
pub use inventory::Inventory;
#[doc(inline)]
pub use sales::SalesLedger;
#[doc(inline)]
pub use shop::ShopSystem;

pub mod prelude {
    pub use crate::inventory::Inventory;
    pub use crate::product::Product;
    pub use crate::sale::Sale;
    pub use crate::sales::SalesLedger;
    pub use crate::shop::SaleOutcome;
    pub use crate::shop::ShopSystem;
    pub use crate::types::*;
}
