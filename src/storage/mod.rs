// Shopfront local persistence
// One JSON document per fixed slot key, mirroring browser local storage.

pub mod local_store;

pub use local_store::LocalStore;
