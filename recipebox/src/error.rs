#[derive(thiserror::Error, Debug)]
pub enum ActionDecodeError {
    #[error("Invalid action: {0}")]
    Json(#[from] serde_json::Error),
}
