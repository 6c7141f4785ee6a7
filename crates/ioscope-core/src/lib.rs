pub mod backend;
pub mod config;
pub mod dtype;
pub mod error;
pub mod handle;
pub mod shape;
pub mod spec;

pub use backend::*;
pub use config::*;
pub use dtype::*;
pub use error::*;
pub use handle::*;
pub use shape::*;
pub use spec::*;
