use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors that stop a run before any title is scanned.
#[derive(Error, Debug)]
pub enum PickError {
    #[error("Invalid {name} threshold {value}: must be in the range (0, 1]")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("Secondary threshold {secondary} must be lower than primary threshold {primary}")]
    ThresholdOrder { primary: f64, secondary: f64 },

    #[error("{what} does not exist or is not accessible: '{}'", path.display())]
    MissingInput { what: &'static str, path: PathBuf },

    #[error("Failed to read {what} '{}': {source}", path.display())]
    UnreadableInput {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
