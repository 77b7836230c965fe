pub mod errors;
pub mod manager;

pub use errors::KeyError;
pub use manager::KeyManager;
pub use manager::KeyPaths;
