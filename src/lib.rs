//! Convert raster images into multi-size Windows `.ico` files.
//!
//! [`ico`] is the pure container writer; [`raster`] produces the PNG
//! payloads it embeds and [`export`] names and writes the result.

pub mod config;
pub mod export;
pub mod ico;
pub mod raster;
