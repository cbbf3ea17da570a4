pub mod completion;
pub mod time;


pub use completion::*;
