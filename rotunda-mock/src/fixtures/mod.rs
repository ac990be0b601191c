pub mod chain;
pub mod trades;
