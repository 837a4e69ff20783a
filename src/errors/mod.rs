//! Centralized error handling module
//!
//! Typed errors for everything around a push: transport construction,
//! configuration and argument validation.

pub mod types;

pub use types::{AppError, AppResult};

/// Convert from anyhow::Error to AppError at the library boundary
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Other {
            message: format!("{err:#}"),
            source: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anyhow_conversion() {
        let anyhow_err = anyhow::anyhow!("test error");
        let app_err: AppError = anyhow_err.into();

        match app_err {
            AppError::Other { message, .. } => {
                assert_eq!(message, "test error");
            },
            _ => panic!("Expected AppError::Other, got {:?}", app_err),
        }
    }
}
