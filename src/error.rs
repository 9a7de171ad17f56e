use std::fmt;
use std::io;

#[derive(Debug)]
pub enum CascadeError {
    FieldNotFound(String),
    FieldsNotFound(String),
    OptionNotFound { field: String, index: usize },
    AttributeNotFound { element: String, attribute: String },
    FormNotFound(String),
    Selector(String),
    Cache(String),
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for CascadeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CascadeError::FieldNotFound(name) => write!(f, "field {name} not found"),
            CascadeError::FieldsNotFound(selector) => {
                write!(f, "no select element matches {selector}")
            }
            CascadeError::OptionNotFound { field, index } => {
                write!(f, "option #{index} not found in field {field}")
            }
            CascadeError::AttributeNotFound { element, attribute } => {
                write!(f, "attribute {attribute} not found on {element}")
            }
            CascadeError::FormNotFound(id) => write!(f, "form #{id} not found"),
            CascadeError::Selector(selector) => write!(f, "invalid selector {selector}"),
            CascadeError::Cache(message) => write!(f, "cache failure, {message}"),
            CascadeError::Io(error) => write!(f, "{error}"),
            CascadeError::Json(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for CascadeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CascadeError::Io(error) => Some(error),
            CascadeError::Json(error) => Some(error),
            _ => None,
        }
    }
}

impl From<io::Error> for CascadeError {
    fn from(error: io::Error) -> Self {
        CascadeError::Io(error)
    }
}

impl From<serde_json::Error> for CascadeError {
    fn from(error: serde_json::Error) -> Self {
        CascadeError::Json(error)
    }
}
