//! Session assembly and the sealed session cookie
//!
//! # Modules
//!
//! - [`assembler`] - Provider credentials to local `{ user, session }` pair
//! - [`field_map`] - Dotted-path field mapping table
//! - [`enrichment`] - Fetches the current provider user when mapped fields are missing
//! - [`normalize`] - Provider user to local user normalization
//! - [`hook`] - Pluggable transformation applied before sealing
//! - [`cookie`] - Cookie sealing and opening

pub mod assembler;
pub mod cookie;
pub mod enrichment;
pub mod field_map;
pub mod hook;
pub mod normalize;

// Re-export commonly used items for convenience
pub use assembler::{AssembledSession, SessionAssembler};
pub use cookie::{CookieFactory, CookieOptions, COOKIE_NAME, SESSION_TTL_SECONDS};
pub use field_map::{resolve_path, FieldMap};
pub use hook::{IdentityHook, SessionHook, StaticFieldsHook};
