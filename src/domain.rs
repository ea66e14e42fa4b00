mod account;
mod functions;
mod registry;

pub use account::*;
pub use functions::*;
pub use registry::*;
