//! Error types for the stub services.
//!
//! Service streams fail through [`rivulet::StreamError`]; this module only
//! covers the synchronous checks that run before a stream is created, which
//! today means form validation.

use core::fmt;

pub type Result<T> = core::result::Result<T, Error>;

/// A field of the location edit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    Name,
    City,
}

impl FieldName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::City => "city",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified error type for the stub services.
#[derive(Clone, thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// A required form field was left empty.
    #[error("Field `{field}` is required")]
    Required { field: FieldName },
}
