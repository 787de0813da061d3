mod error;
mod file;
mod options;

pub use error::*;
pub use file::*;
pub use options::*;
