use std::future::Future;

use crate::domain::common::entities::app_errors::CoreError;

/// Port for the local key-value store backing history and favorites
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`, if any
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, CoreError>> + Send;

    /// Replace the value stored under `key`
    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Delete `key`; deleting a missing key is not an error
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), CoreError>> + Send;
}
