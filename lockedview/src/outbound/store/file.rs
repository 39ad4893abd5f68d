//! File-backed key-value store.
//!
//! All keys live in one JSON object, `store.json`, inside the configured data
//! directory. Writes replace the whole document atomically. A missing file is
//! an empty store; a file that is not a JSON object of strings is reported as
//! a serialisation error rather than silently discarded.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use tracing::debug;

use super::atomic_io::write_atomic;
use crate::domain::ports::{KeyValueStore, KeyValueStoreError};

/// Name of the document holding every key.
pub const STORE_FILE_NAME: &str = "store.json";

type Document = BTreeMap<String, String>;

/// [`KeyValueStore`] persisted as a JSON document in a directory.
#[derive(Debug)]
pub struct FileKeyValueStore {
    root: PathBuf,
    dir: Dir,
    // Serialises read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileKeyValueStore {
    /// Open the store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`KeyValueStoreError::Backend`] when the directory cannot be
    /// created or opened.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, KeyValueStoreError> {
        let root = root.as_ref();
        Dir::create_ambient_dir_all(root, ambient_authority())
            .and_then(|()| Dir::open_ambient_dir(root, ambient_authority()))
            .map(|dir| Self {
                root: root.to_path_buf(),
                dir,
                write_lock: Mutex::new(()),
            })
            .map_err(|err| {
                KeyValueStoreError::backend(format!(
                    "failed to open store directory {}: {err}",
                    root.display()
                ))
            })
    }

    /// Directory the store lives in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read_document(&self) -> Result<Document, KeyValueStoreError> {
        let raw = match self.dir.read_to_string(STORE_FILE_NAME) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Document::new()),
            Err(err) => {
                return Err(KeyValueStoreError::backend(format!(
                    "failed to read {STORE_FILE_NAME}: {err}"
                )));
            }
        };
        serde_json::from_str(&raw).map_err(|err| {
            KeyValueStoreError::serialization(format!("{STORE_FILE_NAME} is not a string map: {err}"))
        })
    }

    fn write_document(&self, document: &Document) -> Result<(), KeyValueStoreError> {
        let payload = serde_json::to_string_pretty(document)
            .map_err(|err| KeyValueStoreError::serialization(err.to_string()))?;
        write_atomic(&self.dir, STORE_FILE_NAME, &payload)
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, KeyValueStoreError> {
        self.write_lock
            .lock()
            .map_err(|_| KeyValueStoreError::backend("file store lock poisoned"))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        let mut document = self.read_document()?;
        Ok(document.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        let _guard = self.lock()?;
        let mut document = self.read_document()?;
        document.insert(key.to_owned(), value.to_owned());
        self.write_document(&document)?;
        debug!(key, root = %self.root.display(), "store key written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
        let _guard = self.lock()?;
        let mut document = self.read_document()?;
        if document.remove(key).is_none() {
            return Ok(());
        }
        self.write_document(&document)?;
        debug!(key, root = %self.root.display(), "store key removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    use super::*;

    #[fixture]
    fn temp() -> TempDir {
        tempfile::tempdir().expect("temp dir")
    }

    #[rstest]
    #[tokio::test]
    async fn missing_file_reads_as_empty(temp: TempDir) {
        let store = FileKeyValueStore::open(temp.path()).expect("open store");

        assert!(store.get("anything").await.expect("get succeeds").is_none());
        assert!(!temp.path().join(STORE_FILE_NAME).exists());
    }

    #[rstest]
    #[tokio::test]
    async fn values_survive_reopening(temp: TempDir) {
        let first = FileKeyValueStore::open(temp.path()).expect("open store");
        first.set("greeting", "hello").await.expect("set succeeds");
        drop(first);

        let second = FileKeyValueStore::open(temp.path()).expect("reopen store");

        assert_eq!(
            second.get("greeting").await.expect("get succeeds").as_deref(),
            Some("hello")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn writes_a_flat_json_object(temp: TempDir) {
        let store = FileKeyValueStore::open(temp.path()).expect("open store");
        store.set("b", "2").await.expect("set b");
        store.set("a", "1").await.expect("set a");

        let raw = std::fs::read_to_string(temp.path().join(STORE_FILE_NAME)).expect("read file");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("valid json");

        assert_eq!(value, serde_json::json!({"a": "1", "b": "2"}));
    }

    #[rstest]
    #[tokio::test]
    async fn remove_keeps_other_keys(temp: TempDir) {
        let store = FileKeyValueStore::open(temp.path()).expect("open store");
        store.set("keep", "1").await.expect("set keep");
        store.set("drop", "2").await.expect("set drop");

        store.remove("drop").await.expect("remove succeeds");
        store.remove("drop").await.expect("second remove succeeds");

        assert!(store.get("drop").await.expect("get drop").is_none());
        assert_eq!(store.get("keep").await.expect("get keep").as_deref(), Some("1"));
    }

    #[rstest]
    #[tokio::test]
    async fn creates_nested_data_directories(temp: TempDir) {
        let root = temp.path().join("nested").join("data");
        let store = FileKeyValueStore::open(&root).expect("open store");
        store.set("k", "v").await.expect("set succeeds");

        assert_eq!(store.root(), root.as_path());
        assert!(root.join(STORE_FILE_NAME).is_file());
    }

    #[rstest]
    #[case("not json")]
    #[case("[1, 2, 3]")]
    #[case(r#"{"k": 7}"#)]
    #[tokio::test]
    async fn corrupt_document_is_a_serialisation_error(temp: TempDir, #[case] raw: &str) {
        std::fs::write(temp.path().join(STORE_FILE_NAME), raw).expect("seed corrupt file");
        let store = FileKeyValueStore::open(temp.path()).expect("open store");

        let read = store.get("k").await.expect_err("corrupt read");
        let write = store.set("k", "v").await.expect_err("corrupt write");

        assert!(matches!(read, KeyValueStoreError::Serialization { .. }));
        assert!(matches!(write, KeyValueStoreError::Serialization { .. }));
        assert_eq!(
            std::fs::read_to_string(temp.path().join(STORE_FILE_NAME)).expect("read file"),
            raw,
            "a failed write must not replace the document"
        );
    }

    #[rstest]
    fn open_fails_when_root_is_a_file(temp: TempDir) {
        let file = temp.path().join("occupied");
        std::fs::write(&file, "x").expect("seed file");

        let err = FileKeyValueStore::open(&file).expect_err("root is a file");

        assert!(matches!(err, KeyValueStoreError::Backend { .. }));
    }
}
