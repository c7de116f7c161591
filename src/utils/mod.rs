pub mod logs;
pub mod openweather;

pub use logs::*;
