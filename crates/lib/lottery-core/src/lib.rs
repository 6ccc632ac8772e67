#![forbid(unsafe_code)]

pub mod config;
pub mod desc;
pub mod error;
pub mod hparams;
pub mod platform;
pub mod shape;
pub mod step;
