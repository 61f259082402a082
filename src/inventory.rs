//! Catalog store: products kept in memory in insertion order and mirrored to a CSV file.
//!
//! The file is the catalog's only persistence. Every mutation rewrites it completely from the in-memory state; there
//! is no locking, so two processes sharing the same file will overwrite each other's changes.

use std::fs::File;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use fieldx::fxstruct;
use indexmap::IndexMap;
use tracing::debug;
use tracing::instrument;
use tracing::warn;

use crate::product::Product;
use crate::report;
use crate::shoperr;
use crate::types::Result;
use crate::types::ShopError;

pub const DEFAULT_INVENTORY_FILE: &str = "inventory.csv";
pub const INVENTORY_HEADER: [&str; 4] = ["product_id", "product_name", "price", "quantity"];

const DISPLAY_HEADER: [&str; 4] = ["Product ID", "Name", "Price", "Quantity"];

#[derive(Debug)]
#[fxstruct(no_new, get)]
pub struct Inventory {
    path:     PathBuf,
    products: IndexMap<String, Product>,
}

impl Inventory {
    /// Loads the catalog from `path`. A missing file yields an empty catalog; any malformed row fails the whole load.
    #[instrument(level = "debug", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut products = IndexMap::new();

        match File::open(&path) {
            Ok(file) => {
                let mut reader = csv::Reader::from_reader(file);
                for (idx, row) in reader.deserialize::<Product>().enumerate() {
                    let product = row.map_err(|source| ShopError::MalformedRow {
                        path: path.clone(),
                        // Header is line 1.
                        row: idx as u64 + 2,
                        source,
                    })?;
                    products.insert(product.product_id().clone(), product);
                }
                debug!("Loaded {} products", products.len());
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("No catalog file yet, starting empty");
            }
            Err(err) => return Err(ShopError::io(&path, err)),
        }

        Ok(Self { path, products })
    }

    pub fn get(&self, product_id: &str) -> Option<&Product> {
        self.products.get(product_id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Inserts or replaces the product under `product_id`, then persists the catalog. A replaced product keeps its
    /// original position.
    #[instrument(level = "debug", skip(self, name))]
    pub fn add_product<S: ToString>(&mut self, product_id: &str, name: S, price: f64, quantity: i64) -> Result<()> {
        let product = Product::new(product_id, name, price, quantity);
        if self.products.insert(product_id.to_string(), product).is_some() {
            debug!("Replaced existing product");
        }
        self.save()
    }

    /// Subtracts `quantity_sold` from the product's stock and persists the catalog. Stock is not floored at zero, but a
    /// result outside of `i64` range is an error and leaves the stock as it was.
    ///
    /// Unknown ids are ignored: nothing is written and `false` is returned.
    #[instrument(level = "debug", skip(self))]
    pub fn update_product(&mut self, product_id: &str, quantity_sold: i64) -> Result<bool> {
        let Some(product) = self.products.get_mut(product_id) else {
            warn!("Stock adjustment for unknown product ignored");
            return Ok(false);
        };

        let Some(remaining) = product.quantity().checked_sub(quantity_sold) else {
            return Err(shoperr!(
                "Stock of '{product_id}' would overflow: {} - {quantity_sold}",
                product.quantity()
            ));
        };
        *product.quantity_mut() = remaining;
        debug!("Stock is now {}", product.quantity());
        self.save()?;
        Ok(true)
    }

    /// Renders the catalog as a grid in insertion order.
    pub fn display(&self) -> String {
        let rows = self.products.values().map(|p| {
            vec![
                p.product_id().clone(),
                p.name().clone(),
                report::money(p.price()),
                p.quantity().to_string(),
            ]
        });

        report::grid(DISPLAY_HEADER, rows, &[2, 3]).to_string()
    }

    /// Rewrites the whole backing file from memory: header row, then one row per product.
    pub fn save(&self) -> Result<()> {
        let file = File::create(&self.path).map_err(|err| ShopError::io(&self.path, err))?;
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);

        writer.write_record(INVENTORY_HEADER)?;
        for product in self.products.values() {
            writer.serialize(product)?;
        }
        writer.flush().map_err(|err| ShopError::io(&self.path, err))?;

        debug!(path = %self.path.display(), "Catalog saved, {} products", self.products.len());
        Ok(())
    }
}
