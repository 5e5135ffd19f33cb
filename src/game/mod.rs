pub mod types;
pub mod cell;
pub mod board;
pub mod rules;

pub use types::*;
pub use cell::*;
pub use board::*;
pub use rules::*;
