// Public handlers: no authentication, no role check.
pub mod docs;
pub mod health;

pub use docs::api_docs;
pub use health::health;
