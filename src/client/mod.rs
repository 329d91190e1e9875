//! Client Module
//!
//! The caller side of the protocol. A `Clerk` owns one client session: it numbers
//! each logical operation and keeps resending it through a `KvTransport` until an
//! attempt is answered. Retrying is safe because the server deduplicates by
//! (client id, sequence number).
//!
//! ## Submodules
//! - **`clerk`**: session state, sequence numbering and the retry loop.
//! - **`transport`**: the single-attempt transport trait and its HTTP implementation.

pub mod clerk;
pub mod transport;
