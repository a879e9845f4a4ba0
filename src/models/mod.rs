pub mod common;
pub mod image;
pub mod poll;

pub use common::*;
pub use image::*;
pub use poll::*;
