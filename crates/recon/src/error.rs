use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// Edit label does not resolve to any canonical field.
    UnknownField(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownField(label) => write!(f, "unknown field: '{label}'"),
        }
    }
}

impl std::error::Error for ReconError {}
