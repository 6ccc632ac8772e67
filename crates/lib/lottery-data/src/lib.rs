#![forbid(unsafe_code)]

pub mod batcher;
pub mod dataset;
pub mod error;
pub mod hub;
pub mod layout;
pub mod mnist;
pub mod normalize;
pub mod registry;
pub mod svhn;
