use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid id {0:?}: {1}")]
    InvalidId(String, String),
}
