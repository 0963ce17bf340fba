//! Storage backends for menu persistence
//!
//! Provides the trait handlers talk to and a file-backed implementation.

mod file;

pub use file::FileStore;

use crate::{Drink, Ingredient};
use async_trait::async_trait;
use thiserror::Error;

/// Storage-related errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Drink not found: {0}")]
    NotFound(i64),

    #[error("Drink already exists: {0}")]
    DuplicateTitle(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),
}

/// Trait for menu storage backends
///
/// Every mutation commits durably before returning.
#[async_trait]
pub trait DrinkStore: Send + Sync {
    /// List every drink on the menu, ordered by ID
    async fn list(&self) -> Result<Vec<Drink>, StorageError>;

    /// Retrieve a drink by ID
    async fn get(&self, id: i64) -> Result<Option<Drink>, StorageError>;

    /// Retrieve a drink by its unique title
    async fn find_by_title(&self, title: &str) -> Result<Option<Drink>, StorageError>;

    /// Insert a new drink, assigning its ID
    async fn insert(&self, title: String, recipe: Vec<Ingredient>) -> Result<Drink, StorageError>;

    /// Update a previously fetched drink
    async fn update(&self, drink: &Drink) -> Result<(), StorageError>;

    /// Delete a drink by ID
    async fn delete(&self, id: i64) -> Result<(), StorageError>;

    /// Check that the backend is available and healthy
    async fn health_check(&self) -> Result<(), StorageError>;
}
