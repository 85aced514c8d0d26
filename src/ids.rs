//! Opaque identifier generation for tasks and sessions.
//!
//! Ids are UUIDv4 strings (122 bits of randomness, comfortably over the
//! spec's 96-bit floor). Clients must treat them as opaque tokens.

use uuid::Uuid;

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
