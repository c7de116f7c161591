pub mod errors;
pub mod forecast;
pub mod scoring;
pub mod session;
pub mod settings;
pub mod utils;
