pub mod board;
pub mod order;
pub mod select;

pub use board::*;
pub use order::*;
pub use select::*;
