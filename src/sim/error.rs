use thiserror::Error;

/// Fatal initialization failures. Frames requested before a successful
/// initialization are skipped silently and are not represented here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("configuration rejected: {0}")]
    Configuration(String),

    #[error("{label} buffer of {bytes} bytes exceeds the device budget of {budget} bytes")]
    Resource {
        label: &'static str,
        bytes: u64,
        budget: u64,
    },

    #[error("kernel program contract mismatch: {0}")]
    KernelResolution(String),
}
