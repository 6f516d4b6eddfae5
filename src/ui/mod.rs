pub mod color;

pub use color::{BlueChannel, Color, ColorError, border_color, text_color};
