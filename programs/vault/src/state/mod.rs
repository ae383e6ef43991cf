pub mod book;
pub mod registry;
pub mod scheme;
pub mod vault;

pub use book::*;
pub use registry::*;
pub use scheme::*;
pub use vault::*;
