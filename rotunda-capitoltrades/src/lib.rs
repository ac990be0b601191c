#![doc = include_str!("../README.md")]

mod bff;
mod client;
mod html;
mod model;

pub use bff::CapitolBffConnector;
pub use html::CapitolHtmlConnector;
