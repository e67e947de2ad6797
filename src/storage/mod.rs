//! Storage is organized through [session_storage::FileSessionStorage].
//! The basic idea is:
//!  - There is a single application directory.
//!  - It has two slots: all closed sessions and the currently active session.
//!  - Each slot is a JSON file that is read and replaced as a whole under a file lock.

pub mod session_storage;
