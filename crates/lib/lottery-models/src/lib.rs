#![forbid(unsafe_code)]

pub mod error;
pub mod family;
pub mod init;
pub mod mnist_simplecnn;
pub mod plan;
pub mod registry;
pub mod simplecnn;
pub mod svhn_simplecnn;
