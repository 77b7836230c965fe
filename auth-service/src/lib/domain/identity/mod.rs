pub mod errors;
pub mod legacy;
pub mod models;
pub mod ports;
pub mod service;
