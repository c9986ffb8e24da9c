// Protected handlers: every route here sits behind `authenticate` and
// `require_role(NOTES-USER)`, and receives the caller as `Extension<Principal>`.
pub mod login;
pub mod notes;

pub use login::login;
