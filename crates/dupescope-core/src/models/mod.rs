pub mod contact;
pub mod matching;

pub use contact::*;
pub use matching::*;
