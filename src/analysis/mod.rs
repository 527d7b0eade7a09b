pub mod spectrum;
pub mod transient;

pub use spectrum::*;
pub use transient::*;
