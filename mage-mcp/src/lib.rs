//! Mage MCP
//!
//! Exposes the Mage.ai REST API as addressable resources and invokable tools
//! for an assistant-facing protocol layer.
//!
//! - [`session`]: one API client per session, passed explicitly everywhere
//! - [`resources`]: URI templates mapped to read-only views
//! - [`tools`]: named operations, some of which change remote state
//! - [`aggregate`]: reports spanning several API calls
//! - [`render`]: typed results to narrative text
//! - [`server`]: the session and both registries behind one handle

pub mod aggregate;
pub mod config;
pub mod render;
pub mod resources;
pub mod server;
pub mod session;
pub mod tools;

pub use config::Config;
pub use server::MageServer;
