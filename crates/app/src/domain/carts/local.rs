//! Anonymous cart persistence.
//!
//! The guest cart is one serialized array of line items under a fixed key,
//! overwritten wholesale on every mutation.

use std::io::ErrorKind;
use std::path::PathBuf;

use hamper::items::LineItem;

use super::errors::CartPersistenceError;

/// Key the serialized cart is stored under.
pub const CART_KEY: &str = "cart";

/// File-backed key-value area for the guest cart.
#[derive(Debug, Clone)]
pub struct LocalCartStore {
    dir: PathBuf,
}

impl LocalCartStore {
    /// Creates a store rooted at `dir`. The directory is created on first
    /// write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn key_path(&self) -> PathBuf {
        self.dir.join(CART_KEY).with_extension("json")
    }

    /// Reads the saved cart.
    ///
    /// Absence or unreadable content yields an empty collection, never an
    /// error.
    pub async fn read(&self) -> Vec<LineItem> {
        match tokio::fs::read(self.key_path()).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => Vec::new(),
        }
    }

    /// Overwrites the saved cart wholesale.
    ///
    /// # Errors
    ///
    /// Returns an error when serializing or writing the blob fails.
    pub async fn write(&self, items: &[LineItem]) -> Result<(), CartPersistenceError> {
        let bytes = serde_json::to_vec(items)?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(CartPersistenceError::Local)?;

        tokio::fs::write(self.key_path(), bytes)
            .await
            .map_err(CartPersistenceError::Local)
    }

    /// Deletes the saved cart. Deleting an absent cart succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error when removing the blob fails for any reason other
    /// than absence.
    pub async fn clear(&self) -> Result<(), CartPersistenceError> {
        match tokio::fs::remove_file(self.key_path()).await {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(CartPersistenceError::Local(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::helpers::line_item;

    use super::*;

    #[tokio::test]
    async fn a_missing_blob_reads_as_an_empty_cart() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let store = LocalCartStore::new(dir.path());

        assert!(store.read().await.is_empty());
    }

    #[tokio::test]
    async fn written_items_read_back_unchanged() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = LocalCartStore::new(dir.path());
        let items = vec![line_item("enamel-mug", 14_00, 2), line_item("oak-tray", 32_00, 1)];

        store.write(&items).await?;

        assert_eq!(store.read().await, items);

        Ok(())
    }

    #[tokio::test]
    async fn corrupt_content_degrades_to_an_empty_cart() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = LocalCartStore::new(dir.path());

        tokio::fs::write(dir.path().join("cart.json"), b"not json").await?;

        assert!(store.read().await.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn clear_removes_the_blob_and_tolerates_absence() -> TestResult {
        let dir = tempfile::tempdir()?;
        let store = LocalCartStore::new(dir.path());

        store.write(&[line_item("enamel-mug", 14_00, 2)]).await?;
        store.clear().await?;
        store.clear().await?;

        assert!(store.read().await.is_empty());

        Ok(())
    }
}
