//! SQL for each structure. Every function takes the connection (or a
//! transaction via Deref) and the clock reading for the current primitive.

pub mod counters;
pub mod hashes;
pub mod keyspace;
pub mod sets;
pub mod zsets;
