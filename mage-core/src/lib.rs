//! Mage Core
//!
//! Core types shared by the Mage adapter, its HTTP client and the mock service.
//!
//! This crate contains:
//! - Domain types: entities owned by the remote service (Pipeline, Block, runs)
//! - DTOs: the JSON envelopes the Mage API wraps every object in

pub mod domain;
pub mod dto;
