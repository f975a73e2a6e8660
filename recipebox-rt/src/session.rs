use std::sync::Arc;

use futures_util::{FutureExt, StreamExt};
use itertools::Itertools;
use recipebox::{recipe_card, Action, ApplicationState, Store, ViewFormat};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, trace, warn};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub dispatched: usize,
    pub skipped: usize,
}

/// Renders all saved recipes, one card after the other.
pub fn render_catalog(state: &ApplicationState, format: ViewFormat) -> String {
    let separator = match format {
        ViewFormat::Text => "\n\n",
        ViewFormat::Html => "\n",
    };
    state
        .recipes()
        .iter()
        .map(|recipe| format.render(&recipe_card(recipe)))
        .join(separator)
}

/// Feeds one JSON encoded action per input line into `store`.
///
/// The catalog is written once at the beginning and again whenever a dispatch changed what it
/// shows. Only lines which aren't JSON objects with a `kind` are logged and skipped.
pub async fn run_session(
    store: &Store,
    format: ViewFormat,
    input: impl AsyncBufRead + Unpin,
    mut output: impl AsyncWrite + Unpin,
) -> anyhow::Result<SessionSummary> {
    let mut changes = store.changes();
    let mut last_state = store.get_state();
    let mut last_render = render_catalog(&last_state, format);
    write_catalog(&mut output, &last_render).await?;

    let mut summary = SessionSummary::default();
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match Action::from_json(line) {
            Ok(action) => {
                debug!(kind = action.kind(), "Dispatch action");
                store.dispatch(action);
                summary.dispatched += 1;
            }
            Err(e) => {
                warn!("Skip invalid action '{line}': {e}");
                summary.skipped += 1;
                continue;
            }
        }

        // Snapshots of other handles to the same store are rendered as well
        while let Some(Some(state)) = changes.next().now_or_never() {
            if Arc::ptr_eq(&state, &last_state) {
                trace!("State is unchanged");
                continue;
            }
            let render = render_catalog(&state, format);
            if render != last_render {
                write_catalog(&mut output, &render).await?;
                last_render = render;
            }
            last_state = state;
        }
    }
    output.flush().await?;
    Ok(summary)
}

async fn write_catalog(
    output: &mut (impl AsyncWrite + Unpin),
    catalog: &str,
) -> std::io::Result<()> {
    output.write_all(catalog.as_bytes()).await?;
    output.write_all(b"\n\n").await
}
