pub mod encoding;
pub mod id_generator;
pub mod tracing;
