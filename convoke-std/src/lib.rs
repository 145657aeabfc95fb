//! # convoke-std
//!
//! Standard implementations for the Convoke callback fan-out dispatcher.
//!
//! This crate provides:
//! - **Registry**: [`HandlerRegistry`], token-keyed handlers in registration order
//! - **Fan-out**: [`fan_out`], the invoke/filter/await/aggregate core
//! - **Dispatchers**: [`Dispatcher`], [`ServerDispatcher`], [`ClientDispatcher`]
//! - **Data sources**: [`DataSource`], [`NetworkDataSource`]
//! - **Codec**: [`JsonEnvelope`], a ready-made server encoder and client decoder
//!
//! [`HandlerRegistry`]: registry::HandlerRegistry
//! [`fan_out`]: fanout::fan_out
//! [`Dispatcher`]: dispatcher::Dispatcher
//! [`ServerDispatcher`]: server::ServerDispatcher
//! [`ClientDispatcher`]: client::ClientDispatcher
//! [`DataSource`]: data_source::DataSource
//! [`NetworkDataSource`]: data_source::NetworkDataSource
//! [`JsonEnvelope`]: codec::JsonEnvelope

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use convoke_core;

// Modules
pub mod client;
pub mod codec;
pub mod data_source;
pub mod dispatcher;
pub mod fanout;
pub mod network;
pub mod registry;
pub mod server;
pub mod testing;
