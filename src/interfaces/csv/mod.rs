pub mod command_reader;
pub mod receipt_writer;
pub mod script;
