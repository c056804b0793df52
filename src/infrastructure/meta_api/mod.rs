//! HTTP access to the table schema API

mod client;

pub use client::MetaApiClient;
