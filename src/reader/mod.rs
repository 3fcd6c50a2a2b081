//! Feed Reader Module
//!
//! Drives the tokenizer from `std::io::Read` sources:
//! - BufferedReader: fixed-size chunk pulls
//! - tokenize_reader: read, decode and feed until end of input

pub mod buffered;

pub use buffered::{tokenize_reader, tokenize_reader_with_capacity, BufferedReader};
