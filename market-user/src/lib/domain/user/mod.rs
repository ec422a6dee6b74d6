pub mod authenticator;
pub mod authorizer;
pub mod errors;
pub mod hashing;
pub mod models;
pub mod ports;
pub mod service;
