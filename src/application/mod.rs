pub mod decoder;
pub mod error;
pub mod pipeline;
pub mod services;
