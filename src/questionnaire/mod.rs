pub mod artifact;
pub mod check;
pub mod conversion;
pub mod definition;

pub use artifact::*;
pub use check::*;
pub use conversion::*;
pub use definition::*;
