// # Record Store Implementations
//
// In-process backends of the record store port. Network backends live in
// their own crates (see `contacts-store-redis`).

pub mod memory;

pub use memory::{MemoryRecordStore, MemoryRecordStoreFactory};
