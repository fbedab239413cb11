//! Database layer (Firestore, with an in-memory stand-in).

pub mod firestore;
pub mod memory;

pub use self::firestore::FirestoreDb;
pub use memory::MemoryStore;

/// Collection names as constants.
///
/// Everything a user owns lives under their `users/{uid}` document.
pub mod collections {
    /// Account documents, keyed by uid. Parent of the collections below.
    pub const USERS: &str = "users";
    /// Single-document collection holding the profile.
    pub const PROFILE: &str = "profile";
    /// Document ID of the profile inside `PROFILE`
    pub const PROFILE_DOC_ID: &str = "main";
    pub const HEALTH_LOGS: &str = "healthLogs";
    pub const GOALS: &str = "goals";
}
