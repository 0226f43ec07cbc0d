pub mod connection;
pub mod upload;
