//! Baseline JPEG (JFIF/SOF0) container parsing, entropy coding and
//! reassembly, plus the coefficient walker the JSteg engine rides on.

pub mod container;
pub mod decoder;
pub mod encoder;
pub mod header;
pub mod huffman;
pub mod marker;
pub mod mcu;
pub mod scanner;
pub mod tables;
pub mod walker;
pub mod writer;
