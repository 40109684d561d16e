pub mod ansi;
pub mod color;
pub mod html;
