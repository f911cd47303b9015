pub mod errors;

pub use errors::{ArmatureError, Result};
