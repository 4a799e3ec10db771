//! # noponto-store
//!
//! Tab-scoped session storage for the No Ponto client.
//!
//! The store keeps the bearer token together with the instant it was issued,
//! plus the email shown in the account modal. It lives only as long as the
//! process that created it; nothing is written to disk. Expiry policy is not
//! applied here: the store hands back what it holds and the client's auth
//! manager decides whether it is still valid, using the injected [`Clock`].

pub mod clock;
pub mod session;

pub use clock::{Clock, ManualClock, SystemClock};
pub use session::{MemorySessionStore, Session, SessionStore, StoredToken};
