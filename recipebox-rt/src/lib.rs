mod runtime;
mod session;
#[cfg(feature = "tracing")]
mod tracing;

pub use runtime::{ConfiguredRuntime, Runtime};
pub use session::{render_catalog, run_session, SessionSummary};
