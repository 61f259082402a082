//! Interactive shop controller.
//!
//! The controller owns the catalog and the sale log and drives them from a line-oriented operator session. Any
//! [`BufRead`] can serve as the operator input and any [`Write`] as the output, which is how the session is scripted
//! in tests.

use std::fmt::Display;
use std::io::BufRead;
use std::io::Write;

use console::Style;
use fieldx::fxstruct;
use tracing::debug;
use tracing::info;
use tracing::instrument;

use crate::inventory::Inventory;
use crate::sale::Sale;
use crate::sales::SalesLedger;
use crate::types::Result;
use crate::types::ShopError;

pub const DONE_SENTINEL: &str = "done";

const MENU: &str = "\n--- Small Shop Management System ---
1. View Inventory
2. Add Product to Inventory
3. Process a Sale
4. View Sales Report
5. Exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuChoice {
    ViewInventory,
    AddProduct,
    ProcessSale,
    ViewSales,
    Exit,
    Invalid(String),
}

impl From<&str> for MenuChoice {
    fn from(choice: &str) -> Self {
        match choice {
            "1" => Self::ViewInventory,
            "2" => Self::AddProduct,
            "3" => Self::ProcessSale,
            "4" => Self::ViewSales,
            "5" => Self::Exit,
            other => Self::Invalid(other.to_string()),
        }
    }
}

/// What became of one sale line item.
#[derive(Debug, Clone, PartialEq)]
pub enum SaleOutcome {
    Recorded(Sale),
    NotFound,
    InsufficientStock { available: i64 },
}

/// Line-oriented operator terminal.
pub struct Terminal<R, W> {
    input:  R,
    output: W,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prints `text` and reads one line without its line terminator. `None` means the input is exhausted.
    pub fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text}").map_err(ShopError::Terminal)?;
        self.output.flush().map_err(ShopError::Terminal)?;

        let mut line = String::new();
        if self.input.read_line(&mut line).map_err(ShopError::Terminal)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    pub fn require(&mut self, text: &str, what: &'static str) -> Result<String> {
        self.prompt(text)?.ok_or(ShopError::InputClosed(what))
    }

    pub fn say<T: Display>(&mut self, msg: T) -> Result<()> {
        writeln!(self.output, "{msg}").map_err(ShopError::Terminal)
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

fn parse_field<T>(field: &'static str, input: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: Display,
{
    input
        .trim()
        .parse::<T>()
        .map_err(|err| ShopError::invalid_input(field, input, err))
}

#[derive(Debug)]
#[fxstruct(no_new, get)]
pub struct ShopSystem {
    #[fieldx(get_mut)]
    inventory: Inventory,
    #[fieldx(get_mut)]
    sales:     SalesLedger,
    #[fieldx(get(copy))]
    color:     bool,
}

impl ShopSystem {
    pub fn new(inventory: Inventory, sales: SalesLedger, color: bool) -> Self {
        Self {
            inventory,
            sales,
            color,
        }
    }

    /// Sells `quantity` units of `product_id` under `sale_id`. Nothing is touched unless the product exists and has
    /// enough stock; on success the sale is appended to the log first and the stock is decremented after.
    ///
    /// A quantity below 1 is rejected as invalid input.
    #[instrument(level = "debug", skip(self))]
    pub fn sell(&mut self, sale_id: &str, product_id: &str, quantity: i64) -> Result<SaleOutcome> {
        if quantity < 1 {
            return Err(ShopError::invalid_input(
                "quantity",
                &quantity.to_string(),
                "must be a positive number",
            ));
        }

        let Some(product) = self.inventory.get(product_id)
        else {
            return Ok(SaleOutcome::NotFound);
        };

        if !product.has_stock_for(quantity) {
            debug!(available = product.quantity(), "Not enough stock");
            return Ok(SaleOutcome::InsufficientStock {
                available: product.quantity(),
            });
        }

        let sale = Sale::of_product(sale_id, product, quantity);
        self.sales.record_sale(sale.clone())?;
        self.inventory.update_product(product_id, quantity)?;

        info!(total = sale.total_price(), "Sale recorded");
        Ok(SaleOutcome::Recorded(sale))
    }

    /// Runs the menu loop until the operator exits or the input is exhausted.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, output: W) -> Result<W> {
        let mut term = Terminal::new(input, output);

        loop {
            term.say(MENU)?;
            let choice = match term.prompt("Enter your choice: ")? {
                Some(choice) => MenuChoice::from(choice.as_str()),
                None => MenuChoice::Exit,
            };
            debug!(?choice, "Menu");

            match choice {
                MenuChoice::ViewInventory => term.say(self.inventory.display())?,
                MenuChoice::AddProduct => self.add_product(&mut term)?,
                MenuChoice::ProcessSale => self.process_sale(&mut term)?,
                MenuChoice::ViewSales => self.view_sales(&mut term)?,
                MenuChoice::Exit => {
                    term.say("Exiting system.")?;
                    break;
                }
                MenuChoice::Invalid(_) => {
                    term.say(self.style(Style::new().red()).apply_to("Invalid choice! Please enter a valid option."))?
                }
            }
        }

        Ok(term.into_output())
    }

    fn add_product<R: BufRead, W: Write>(&mut self, term: &mut Terminal<R, W>) -> Result<()> {
        let product_id = term.require("Enter Product ID: ", "product ID")?;
        let name = term.require("Enter Product Name: ", "product name")?;
        let price = parse_field::<f64>("price", &term.require("Enter Price: ", "price")?)?;
        let quantity = parse_field::<i64>("quantity", &term.require("Enter Quantity: ", "quantity")?)?;

        self.inventory.add_product(&product_id, name, price, quantity)
    }

    fn process_sale<R: BufRead, W: Write>(&mut self, term: &mut Terminal<R, W>) -> Result<()> {
        let sale_id = term.require("Enter Sale ID: ", "sale ID")?;

        loop {
            let Some(product_id) = term.prompt(&format!(
                "Enter Product ID to sell (or '{DONE_SENTINEL}' to finish): "
            ))?
            else {
                break;
            };
            if product_id == DONE_SENTINEL {
                break;
            }

            let Some(name) = self.inventory.get(&product_id).map(|p| p.name().clone())
            else {
                term.say(self.style(Style::new().red()).apply_to("Product not found!"))?;
                continue;
            };

            let quantity = parse_field::<i64>(
                "quantity",
                &term.require(&format!("Enter quantity for {name}: "), "quantity")?,
            )?;

            match self.sell(&sale_id, &product_id, quantity)? {
                SaleOutcome::Recorded(_) => {
                    term.say(self.style(Style::new().green()).apply_to("Sale recorded successfully."))?
                }
                SaleOutcome::InsufficientStock { .. } => {
                    term.say(self.style(Style::new().yellow()).apply_to("Insufficient stock!"))?
                }
                SaleOutcome::NotFound => term.say(self.style(Style::new().red()).apply_to("Product not found!"))?,
            }
        }

        Ok(())
    }

    fn view_sales<R: BufRead, W: Write>(&self, term: &mut Terminal<R, W>) -> Result<()> {
        match self.sales.display()? {
            Some(table) => term.say(table),
            None => term.say("No sales records found."),
        }
    }

    fn style(&self, style: Style) -> Style {
        if self.color {
            style
        }
        else {
            style.force_styling(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::DEFAULT_INVENTORY_FILE;
    use crate::sales::DEFAULT_SALES_FILE;

    fn shop(dir: &tempfile::TempDir) -> ShopSystem {
        ShopSystem::new(
            Inventory::load(dir.path().join(DEFAULT_INVENTORY_FILE)).unwrap(),
            SalesLedger::new(dir.path().join(DEFAULT_SALES_FILE)),
            false,
        )
    }

    #[test]
    fn test_menu_choice() {
        assert_eq!(MenuChoice::from("1"), MenuChoice::ViewInventory);
        assert_eq!(MenuChoice::from("5"), MenuChoice::Exit);
        assert_eq!(MenuChoice::from(" 1"), MenuChoice::Invalid(" 1".to_string()));
        assert_eq!(MenuChoice::from(""), MenuChoice::Invalid(String::new()));
    }

    #[test]
    fn test_terminal_prompt() {
        let mut term = Terminal::new("first\r\nsecond\n".as_bytes(), Vec::new());
        assert_eq!(term.prompt("> ").unwrap().as_deref(), Some("first"));
        assert_eq!(term.prompt("> ").unwrap().as_deref(), Some("second"));
        assert_eq!(term.prompt("> ").unwrap(), None);
        assert!(matches!(term.require("> ", "anything"), Err(ShopError::InputClosed("anything"))));
        assert_eq!(String::from_utf8(term.into_output()).unwrap(), "> > > > ");
    }

    #[test]
    fn test_sell() {
        let dir = tempfile::tempdir().unwrap();
        let mut shop = shop(&dir);
        shop.inventory_mut().add_product("P1", "Widget", 2.5, 10).unwrap();

        let outcome = shop.sell("S1", "P1", 3).unwrap();
        assert_eq!(outcome, SaleOutcome::Recorded(Sale::new("S1", "P1", "Widget", 3, 7.5)));
        assert_eq!(shop.inventory().get("P1").unwrap().quantity(), 7);
        assert_eq!(shop.sales().history().unwrap(), vec![Sale::new("S1", "P1", "Widget", 3, 7.5)]);
        assert_eq!(shop.sales().session_sales().len(), 1);
    }

    #[test]
    fn test_sell_whole_stock() {
        let dir = tempfile::tempdir().unwrap();
        let mut shop = shop(&dir);
        shop.inventory_mut().add_product("P1", "Widget", 2.5, 4).unwrap();

        assert!(matches!(shop.sell("S1", "P1", 4).unwrap(), SaleOutcome::Recorded(_)));
        assert_eq!(shop.inventory().get("P1").unwrap().quantity(), 0);
        assert_eq!(
            shop.sell("S1", "P1", 1).unwrap(),
            SaleOutcome::InsufficientStock { available: 0 }
        );
    }

    #[test]
    fn test_sell_rejections_leave_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut shop = shop(&dir);
        shop.inventory_mut().add_product("P1", "Widget", 2.5, 5).unwrap();

        assert_eq!(
            shop.sell("S1", "P1", 9).unwrap(),
            SaleOutcome::InsufficientStock { available: 5 }
        );
        assert_eq!(shop.sell("S1", "P9", 1).unwrap(), SaleOutcome::NotFound);

        assert_eq!(shop.inventory().get("P1").unwrap().quantity(), 5);
        assert!(shop.sales().history().unwrap().is_empty());
        assert!(!dir.path().join(DEFAULT_SALES_FILE).exists());
    }

    #[test]
    fn test_sell_rejects_non_positive() {
        let dir = tempfile::tempdir().unwrap();
        let mut shop = shop(&dir);
        shop.inventory_mut().add_product("P1", "Widget", 2.5, 5).unwrap();

        for quantity in [0, -2, i64::MIN] {
            assert!(matches!(
                shop.sell("S1", "P1", quantity),
                Err(ShopError::InvalidInput { field: "quantity", .. })
            ));
        }
        assert_eq!(shop.inventory().get("P1").unwrap().quantity(), 5);
        assert!(!dir.path().join(DEFAULT_SALES_FILE).exists());
    }
}
