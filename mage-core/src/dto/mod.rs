//! Data Transfer Objects for the Mage API
//!
//! The Mage API wraps every object in a named envelope (`{"pipeline": {...}}`,
//! `{"blocks": [...]}`, ...). These DTOs model both the request bodies the
//! adapter sends and the envelopes it receives. The mock service uses the
//! same types, so both sides agree on the wire format.

pub mod block;
pub mod pipeline;
pub mod run;
