/// Error type for cutting optimization
#[derive(Debug, thiserror::Error)]
pub enum CuttingError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Defect inside the packing engine, distinct from parts that simply do not fit
    #[error("Packing engine failure: {0}")]
    PackingEngine(String),
}

pub type Result<T> = std::result::Result<T, CuttingError>;
