//! Trait-based conversions between external error types and `StrataError`.

use figment::Error as FigmentError;

use super::StrataError;

impl From<FigmentError> for StrataError {
    fn from(e: FigmentError) -> Self {
        Self::Settings(Box::new(e))
    }
}
