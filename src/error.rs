use thiserror::Error;

#[derive(Error, Debug)]
pub enum TiltError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Trace parse error on line {line}: {message}")]
    TraceParse { line: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Motion permission unavailable: {0}")]
    PermissionUnavailable(String),
}

pub type Result<T> = std::result::Result<T, TiltError>;
