pub mod interface;
pub mod range;
pub mod subnet;
