//! Reusable widgets

mod input;
mod sparkline;

pub use input::TextInput;
pub use sparkline::{sparkline_text, MiniSparkline};
