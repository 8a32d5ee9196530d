pub mod events;
pub mod hashing;
pub mod repositories;
pub mod revocation;
