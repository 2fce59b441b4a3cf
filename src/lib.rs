//! # stegano
//!
//! A JSteg-style steganography tool that hides an arbitrary file inside the
//! AC coefficients of a baseline JPEG cover image, and later recovers it
//! from the resulting stego image.
//!
//! The crate is built from two tightly coupled halves:
//!
//! - [`jpeg`]: a baseline (SOF0) JPEG codec — marker scanning, a canonical
//!   Huffman table engine, an entropy decoder/encoder, and a coefficient
//!   walker that visits every AC coefficient in a deterministic order.
//! - [`steg`]: the JSteg embed/extract engine built on top of that walker.
//!
//! # Quick Start
//!
//! ```bash
//! cargo install --locked stegano
//! ```
//!
//! Hide a file inside a cover image:
//!
//! ```bash
//! $ stegano --embed cover.jpg secret.txt stego.jpg
//! embedded 42 bytes into stego.jpg
//! ```
//!
//! Recover it again:
//!
//! ```bash
//! $ stegano --retrieve stego.jpg
//! recovered 42 bytes as ./secret.txt
//! ```
//!
//! Dump the parsed header instead of (or alongside) an embed/retrieve:
//!
//! ```bash
//! $ stegano --meta-data cover.jpg
//! ```
//!
//! # GitHub Repository
//!
//! You can access the source code for this crate on [GitHub](https://github.com/wiseaidev/stegano).

pub mod bitio;
pub mod cli;
pub mod error;
pub mod io;
pub mod jpeg;
pub mod steg;
