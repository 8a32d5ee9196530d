pub mod directory;
pub mod errors;
pub mod models;
pub mod ports;
