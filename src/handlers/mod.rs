// handlers/mod.rs - two security tiers
//
// Public (no auth): health and API documentation
// Protected (basic auth + NOTES-USER role): notes and the login probe
pub mod protected;
pub mod public;
