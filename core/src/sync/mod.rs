//! Concurrency primitives for per-address serialization.

pub mod keyed_lock;

pub use keyed_lock::KeyedLock;
