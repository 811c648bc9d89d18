use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Another run holds the lock at {0}")]
    Locked(String),
}

/// Shape problems found while turning a decoded JSON body into a [`crate::Payload`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PayloadError {
    #[error("expected a JSON array or object at top level, got {0}")]
    UnexpectedShape(&'static str),

    #[error("element {index} is {found}, expected a JSON object")]
    NonObjectElement { index: usize, found: &'static str },

    #[error("value for key '{key}' is {found}, expected a JSON object")]
    NonObjectValue { key: String, found: &'static str },
}
