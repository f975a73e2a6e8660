use anyhow::Context;
use recipebox::{Store, ViewConfig};
use recipebox_rt::{run_session, Runtime};
use tokio::io::BufReader;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let runtime = Runtime::from_env()?.configure()?;
    let store = runtime
        .provider
        .get::<Store>()
        .context("Runtime doesn't provide a Store")?;
    let view = runtime
        .provider
        .get::<ViewConfig>()
        .context("Runtime doesn't provide a ViewConfig")?;

    let summary = runtime.run_until_finished(run_session(
        &store,
        view.format,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    ))?;
    info!(
        "Dispatched {} actions, skipped {} invalid lines",
        summary.dispatched, summary.skipped
    );
    Ok(())
}
