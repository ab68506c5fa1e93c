pub mod completion_port;
pub mod embedding_port;
