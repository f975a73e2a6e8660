mod action;
mod card;
mod config;
mod error;
mod reducer;
mod state;
mod store;
mod tracing;

pub use crate::config::GenericConfig;
pub use crate::tracing::{TracingConfig, TracingFileConfig};
pub use action::*;
pub use card::*;
pub use error::*;
pub use reducer::reduce;
pub use state::*;
pub use store::*;
