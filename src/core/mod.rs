pub mod error;

pub use error::{DeskError, ErrorKind, Result};
