//! # SMS Spam Detector
//!
//! Text normalization, TF-IDF features and a Multinomial Naive Bayes classifier for
//! short messages, with the training pipeline that produces the model artifact and the
//! inference service that serves it.
#![forbid(unsafe_code)]

/// Text normalization
pub mod normalizer;

/// Models
pub mod models;

/// Pipelines
pub mod pipelines;

/// Datasets
pub mod datasets;

/// HTTP API
pub mod server;

/// Utilities
pub mod utils;

/// Error macros
#[macro_use]
extern crate anyhow;
