//! Append-only sale log backed by a CSV file.

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use fieldx::fxstruct;
use tracing::debug;
use tracing::instrument;

use crate::report;
use crate::sale::Sale;
use crate::types::Result;
use crate::types::ShopError;

pub const DEFAULT_SALES_FILE: &str = "sales.csv";
pub const SALES_HEADER: [&str; 5] = ["sale_id", "product_id", "name", "quantity_sold", "total_price"];

const DISPLAY_HEADER: [&str; 5] = ["Sale ID", "Product ID", "Name", "Quantity Sold", "Total Price"];

#[derive(Debug)]
#[fxstruct(no_new, get)]
pub struct SalesLedger {
    path:          PathBuf,
    /// Sales recorded by this process. Never reloaded from disk.
    session_sales: Vec<Sale>,
}

impl SalesLedger {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path:          path.as_ref().to_path_buf(),
            session_sales: Vec::new(),
        }
    }

    /// Appends one row to the log. The file is opened and closed within the call; the header is written only when
    /// the file is missing or empty.
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    pub fn record_sale(&mut self, sale: Sale) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|err| ShopError::io(&self.path, err))?;
        let is_new = file.metadata().map_err(|err| ShopError::io(&self.path, err))?.len() == 0;

        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        if is_new {
            writer.write_record(SALES_HEADER)?;
        }
        writer.serialize(&sale)?;
        writer.flush().map_err(|err| ShopError::io(&self.path, err))?;

        debug!("Sale appended");
        self.session_sales.push(sale);
        Ok(())
    }

    /// Renders the full log as read from disk, bypassing the in-session list. Returns `None` when there is no log
    /// file. Cells are shown exactly as stored.
    pub fn display(&self) -> Result<Option<String>> {
        let Some(mut reader) = self.open_reader()?
        else {
            return Ok(None);
        };

        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(str::to_string).collect::<Vec<_>>());
        }

        Ok(Some(report::grid(DISPLAY_HEADER, rows, &[3, 4]).to_string()))
    }

    /// Parses every sale stored on disk. A missing file yields an empty history.
    pub fn history(&self) -> Result<Vec<Sale>> {
        let Some(mut reader) = self.open_reader()?
        else {
            return Ok(Vec::new());
        };

        let mut sales = Vec::new();
        for (idx, row) in reader.deserialize::<Sale>().enumerate() {
            sales.push(row.map_err(|source| ShopError::MalformedRow {
                path: self.path.clone(),
                row: idx as u64 + 2,
                source,
            })?);
        }
        Ok(sales)
    }

    fn open_reader(&self) -> Result<Option<csv::Reader<File>>> {
        match File::open(&self.path) {
            Ok(file) => Ok(Some(csv::ReaderBuilder::new().flexible(true).from_reader(file))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(ShopError::io(&self.path, err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger(dir: &tempfile::TempDir) -> SalesLedger {
        SalesLedger::new(dir.path().join(DEFAULT_SALES_FILE))
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = ledger(&dir);

        assert!(ledger.display().unwrap().is_none());
        assert!(ledger.history().unwrap().is_empty());
    }

    #[test]
    fn test_header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = ledger(&dir);
        ledger.record_sale(Sale::new("S1", "P1", "Widget", 3, 7.5)).unwrap();
        ledger.record_sale(Sale::new("S1", "P2", "Gadget", 1, 4.0)).unwrap();

        let content = std::fs::read_to_string(ledger.path()).unwrap();
        assert_eq!(
            content.lines().collect::<Vec<_>>(),
            vec![
                "sale_id,product_id,name,quantity_sold,total_price",
                "S1,P1,Widget,3,7.5",
                "S1,P2,Gadget,1,4.0",
            ]
        );
    }

    #[test]
    fn test_header_for_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = ledger(&dir);
        std::fs::write(ledger.path(), "").unwrap();

        ledger.record_sale(Sale::new("S1", "P1", "Widget", 3, 7.5)).unwrap();
        assert_eq!(ledger.history().unwrap(), vec![Sale::new("S1", "P1", "Widget", 3, 7.5)]);
    }

    #[test]
    fn test_session_and_disk_are_separate() {
        let dir = tempfile::tempdir().unwrap();
        let mut first = ledger(&dir);
        first.record_sale(Sale::new("S1", "P1", "Widget", 3, 7.5)).unwrap();

        let mut second = ledger(&dir);
        second.record_sale(Sale::new("S2", "P1", "Widget", 1, 2.5)).unwrap();

        assert_eq!(second.session_sales().len(), 1);
        assert_eq!(second.history().unwrap().len(), 2);

        let table = second.display().unwrap().unwrap();
        assert!(table.contains("S1") && table.contains("S2"));
        assert!(table.contains("Quantity Sold"));
    }

    #[test]
    fn test_duplicate_sale_ids_kept() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = ledger(&dir);
        ledger.record_sale(Sale::new("S1", "P1", "Widget", 1, 2.5)).unwrap();
        ledger.record_sale(Sale::new("S1", "P1", "Widget", 1, 2.5)).unwrap();

        assert_eq!(ledger.history().unwrap().len(), 2);
    }

    #[test]
    fn test_display_does_not_mutate() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = ledger(&dir);
        ledger.record_sale(Sale::new("S1", "P1", "Widget", 3, 7.5)).unwrap();
        let before = std::fs::read_to_string(ledger.path()).unwrap();

        let first = ledger.display().unwrap();
        let second = ledger.display().unwrap();

        assert_eq!(first, second);
        assert_eq!(std::fs::read_to_string(ledger.path()).unwrap(), before);
        assert_eq!(ledger.session_sales().len(), 1);
    }
}
