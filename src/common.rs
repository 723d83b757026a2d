mod body;
mod charset;
mod id;
mod scheme;

pub use body::*;
pub use charset::*;
pub use id::*;
pub use scheme::*;
