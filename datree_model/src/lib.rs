pub mod component;
pub mod context;
pub mod error;
pub mod field;
pub mod scalar;
pub mod tree;
mod value;

pub use component::*;
pub use context::*;
pub use error::*;
pub use field::*;
pub use scalar::*;
pub use tree::*;
