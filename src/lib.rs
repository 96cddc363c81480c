pub mod binning;
pub mod cli;
pub mod color;
pub mod config;
pub mod data;
pub mod map;
pub mod render;
pub mod types;
