/// Synchronous key-value boundary over durable client storage.
///
/// Implementations must never panic or propagate backend failures: reads
/// degrade to `None`, writes report `false`. Callers treat a failed write as
/// "not saved" and carry on.
pub trait KeyValueStorage {
    /// The raw string stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`. Returns `false` when the backend rejects
    /// the write (quota exceeded, storage unavailable).
    fn set(&self, key: &str, value: &str) -> bool;

    /// Remove `key` if present.
    fn remove(&self, key: &str);

    /// Every key currently stored, in no particular order.
    fn keys(&self) -> Vec<String>;
}
