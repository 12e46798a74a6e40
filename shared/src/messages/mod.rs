pub mod constants;
pub mod error;
pub mod execution_mode;
pub mod message_reader;
pub mod message_writer;
pub mod operation;
pub mod payload;
