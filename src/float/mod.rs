pub mod arithmetic;
pub mod boolean;
pub mod constants;
pub mod core;
pub mod model;
pub mod value;

pub use boolean::Truth;
pub use model::{FloatError, Model, ModelBuilder};
pub use value::{AbstractFloat, SignClass, classify};
