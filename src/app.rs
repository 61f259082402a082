#![cfg(feature = "cli")]

use std::ffi::OsString;
use std::io;
use std::io::BufRead;
use std::io::Write;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::CommandFactory;
use clap::Parser;
use fieldx::fxstruct;
use garde::Validate;
use tracing::info;

use crate::inventory::Inventory;
use crate::inventory::DEFAULT_INVENTORY_FILE;
use crate::sales::SalesLedger;
use crate::sales::DEFAULT_SALES_FILE;
use crate::shoperr;
use crate::shop::ShopSystem;
use crate::types::Result;
use crate::types::ShopError;

#[derive(Debug, Clone, clap::Parser, Validate)]
#[fxstruct(no_new, get(copy))]
#[clap(about, version, name = "shopkeep")]
pub struct Cli {
    /// Product catalog file.
    #[fieldx(get(clone))]
    #[garde(custom(Self::distinct_from("sales-file", &self.sales_file)))]
    #[clap(long, env = "SHOPKEEP_INVENTORY_FILE", default_value = DEFAULT_INVENTORY_FILE)]
    inventory_file: PathBuf,

    /// Sale log file.
    #[fieldx(get(clone))]
    #[garde(skip)]
    #[clap(long, env = "SHOPKEEP_SALES_FILE", default_value = DEFAULT_SALES_FILE)]
    sales_file: PathBuf,

    /// File to send log into. Defaults to stderr.
    #[fieldx(get(clone))]
    #[garde(skip)]
    #[clap(long, env = "SHOPKEEP_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Don't colorize status messages.
    #[clap(long, env = "SHOPKEEP_NO_COLOR", default_value_t = false)]
    #[garde(skip)]
    no_color: bool,
}

impl Cli {
    fn distinct_from<'a>(
        other_name: &'static str,
        other: &'a PathBuf,
    ) -> impl FnOnce(&'a PathBuf, &()) -> garde::Result {
        move |value, _| {
            if value != other {
                Ok(())
            }
            else {
                Err(garde::Error::new(format!(
                    "'{}' is also used as {other_name}",
                    value.display()
                )))
            }
        }
    }
}

#[derive(Debug)]
#[fxstruct(no_new, get)]
pub struct ShopApp {
    cli: Cli,
}

impl ShopApp {
    /// Parses the process command line and environment.
    pub fn from_env() -> Result<Self> {
        Self::with_cli(Cli::try_parse()?)
    }

    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString> + Clone,
    {
        Self::with_cli(Cli::try_parse_from(args)?)
    }

    fn with_cli(cli: Cli) -> Result<Self> {
        if let Err(report) = cli.validate() {
            return Err(Cli::command().error(ErrorKind::InvalidValue, report).into());
        }
        Ok(Self { cli })
    }

    pub fn setup_tracing(&self) -> Result<()> {
        use std::sync::Mutex;
        use tracing_subscriber::layer::SubscriberExt;
        use tracing_subscriber::util::SubscriberInitExt;

        let (dest_writer, ansi) = if let Some(log_file) = self.cli.log_file() {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_file)
                .map_err(|err| ShopError::io(&log_file, err))?;
            (Box::new(file) as Box<dyn Write + Send>, false)
        }
        else {
            (Box::new(io::stderr()) as Box<dyn Write + Send>, stderr_ansi(self.cli.no_color()))
        };

        tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::from_default_env())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(Mutex::new(dest_writer))
                    .with_ansi(ansi),
            )
            .try_init()
            .map_err(|err| shoperr!("Can't initialize tracing: {err}"))?;

        info!("Tracing initialized");
        Ok(())
    }

    /// Opens both data files and runs an operator session over the given input and output.
    pub fn run_with<R: BufRead, W: Write>(&self, input: R, output: W) -> Result<W> {
        let inventory = Inventory::load(self.cli.inventory_file())?;
        let sales = SalesLedger::new(self.cli.sales_file());
        info!(
            inventory = %self.cli.inventory_file().display(),
            sales = %self.cli.sales_file().display(),
            products = inventory.len(),
            "Shop opened"
        );

        ShopSystem::new(inventory, sales, !self.cli.no_color()).run(input, output)
    }

    pub fn run() -> Result<()> {
        let app = Self::from_env()?;
        app.setup_tracing()?;
        app.run_with(io::stdin().lock(), io::stdout())?;
        Ok(())
    }
}

/// Log lines on stderr get ANSI colors only when the operator hasn't disabled them and stderr is a color terminal.
fn stderr_ansi(no_color: bool) -> bool {
    !no_color && console::Term::stderr().features().colors_supported()
}
