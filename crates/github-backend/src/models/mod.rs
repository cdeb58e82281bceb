pub mod comment;
pub mod discussion;

pub use comment::*;
pub use discussion::*;
