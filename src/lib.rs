//! Benchmark of three ways to push a batch of images through
//! load → resize → grayscale → store: a staged pipeline with one task per
//! stage per image, a sequential loop, and one task per image.

pub mod bench;
pub mod bootstrap;
pub mod common;
pub mod config;
pub mod models;
pub mod operations;
pub mod strategies;
pub mod utils;
