pub mod artifact;
pub mod generation;

pub use artifact::*;
pub use generation::*;
