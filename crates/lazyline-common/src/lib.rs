pub mod errors;

pub use errors::{ConfigError, LazylineError};

pub type Result<T> = std::result::Result<T, LazylineError>;
