pub mod chat;
pub mod common;

pub use chat::*;
pub use common::*;
