//! themeloom binary entry
use {color_eyre::Result, themeloom::app::ThemeApp, tracing::error};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let app = ThemeApp::init().await?;

    if let Err(e) = app.run().await {
        error!("themeloom failed: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}
