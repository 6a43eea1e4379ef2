mod types;

pub use types::{ReflowError, Result};
