pub mod compare;
pub mod config;
pub mod error;
pub mod opa;
pub mod ordinal;
pub mod randomization;
pub mod scoring;
pub mod traits;
