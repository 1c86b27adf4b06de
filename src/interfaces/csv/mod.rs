pub mod operation_reader;
pub mod receipt_writer;
