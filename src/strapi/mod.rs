//! Strapi identity provider access
//!
//! This module owns every outbound call to the provider. It knows nothing about
//! local sessions or cookies; handlers and the session assembler consume it.
//!
//! - [`client`] - `StrapiClient`, one method per provider endpoint
//! - [`error`] - `ProviderError`, the failure taxonomy of a provider call

pub mod client;
pub mod error;

pub use client::StrapiClient;
pub use error::ProviderError;
