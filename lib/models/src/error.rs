use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModelError>;

/// Model loading and inference errors
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Model load failed: {0}")]
    Load(String),

    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Shape error: {0}")]
    Shape(String),
}

impl From<ModelError> for sheetqa_core::Error {
    fn from(e: ModelError) -> Self {
        sheetqa_core::Error::Model(e.to_string())
    }
}
