use shopkeep::app::ShopApp;
use shopkeep::types::ShopError;

fn main() -> anyhow::Result<()> {
    match ShopApp::run() {
        Err(ShopError::Cli(err)) => err.exit(),
        other => Ok(other?),
    }
}
