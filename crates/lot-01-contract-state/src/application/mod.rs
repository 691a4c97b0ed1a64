//! # Application Module
//!
//! Application services orchestrating the decoders and outbound ports.

pub mod service;

pub use service::ContractStateService;
