//! The collection store: encrypted read-modify-write over one file.
//!
//! Every operation is one full cycle: resolve paths, read the key, decrypt,
//! decode, mutate the in-memory sequence, encode, encrypt, overwrite. Cost
//! is linear in collection size per call; that is the intended tradeoff for
//! small collections.
//!
//! The data file and the key file are conceptually one unit but remain two
//! filesystem objects with no transactional linkage. A create that fails
//! between the two writes leaves an orphaned data file; a drop that fails
//! on the key file leaves an orphaned key file. Both windows are inherited
//! from the original design and are reported, not repaired.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::cipher::{self, ContentKey};
use crate::codec::{self, Record};
use crate::observability::Logger;
use crate::schema::{SchemaLayout, DATA_EXT};

use super::errors::{StoreError, StoreResult};
use super::locks::{self, LockRegistry};

/// Store over one root directory, namespaced by schema.
#[derive(Debug)]
pub struct CollectionStore {
    layout: SchemaLayout,
    locks: Option<LockRegistry>,
}

impl CollectionStore {
    /// A store with the original's concurrency behavior: simultaneous
    /// mutations on one collection race and the last write wins.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            layout: SchemaLayout::new(root),
            locks: None,
        }
    }

    /// A store that serializes operations per collection within this
    /// process. The external contract is unchanged.
    pub fn with_locking(root: impl Into<PathBuf>) -> Self {
        Self {
            layout: SchemaLayout::new(root),
            locks: Some(LockRegistry::new()),
        }
    }

    pub fn layout(&self) -> &SchemaLayout {
        &self.layout
    }

    /// Create a collection, optionally seeding it with one record.
    ///
    /// The initial content is `[]`, or `[stamp_new(fields)]` when `initial`
    /// carries a JSON object. Fails with `AlreadyExists` when the data file
    /// is present.
    pub fn create(
        &self,
        schema: &str,
        collection: &str,
        initial: Option<&str>,
    ) -> StoreResult<()> {
        let handle = self.lock_handle(schema, collection);
        let _guard = handle.as_ref().map(locks::acquire);
        self.create_locked(schema, collection, initial)
    }

    /// Load a collection's full record sequence in order.
    pub fn load(&self, schema: &str, collection: &str) -> StoreResult<Vec<Record>> {
        let handle = self.lock_handle(schema, collection);
        let _guard = handle.as_ref().map(locks::acquire);

        let (records, _key) = self.load_locked(schema, collection)?;
        Ok(records)
    }

    /// Append one new record, creating the collection on first insert.
    pub fn insert(&self, schema: &str, collection: &str, raw: &str) -> StoreResult<()> {
        let handle = self.lock_handle(schema, collection);
        let _guard = handle.as_ref().map(locks::acquire);

        self.layout.ensure_schema(schema)?;

        // First insert into a missing collection is a create, not an error.
        if !self.layout.data_path(schema, collection).exists() {
            return self.create_locked(schema, collection, Some(raw));
        }

        let fields = codec::parse_fields(raw)?;
        let (mut records, key) = self.load_locked(schema, collection)?;
        records.push(Record::stamp_new(fields));
        self.persist(schema, collection, &records, &key)?;

        Logger::info(
            "record_inserted",
            &[("collection", collection), ("schema", schema)],
        );
        Ok(())
    }

    /// Replace the record with the given `_id` via an edit stamp.
    pub fn update(
        &self,
        schema: &str,
        collection: &str,
        id: &str,
        raw: &str,
    ) -> StoreResult<()> {
        let handle = self.lock_handle(schema, collection);
        let _guard = handle.as_ref().map(locks::acquire);

        let fields = codec::parse_fields(raw)?;
        let (mut records, key) = self.load_locked(schema, collection)?;

        let position = records
            .iter()
            .position(|record| record.id() == Some(id))
            .ok_or_else(|| StoreError::RecordNotFound(id.to_string()))?;
        records[position] = records[position].stamp_edit(fields);

        self.persist(schema, collection, &records, &key)?;

        Logger::info(
            "record_updated",
            &[("collection", collection), ("id", id), ("schema", schema)],
        );
        Ok(())
    }

    /// Remove every record whose `_id` equals `id`.
    ///
    /// Ids are generated, so duplicates should not exist; if they somehow
    /// do, all of them go, matching the original's by-value filter.
    pub fn delete(&self, schema: &str, collection: &str, id: &str) -> StoreResult<()> {
        let handle = self.lock_handle(schema, collection);
        let _guard = handle.as_ref().map(locks::acquire);

        let (records, key) = self.load_locked(schema, collection)?;

        let retained: Vec<Record> = records
            .iter()
            .filter(|record| record.id() != Some(id))
            .cloned()
            .collect();
        if retained.len() == records.len() {
            return Err(StoreError::RecordNotFound(id.to_string()));
        }

        self.persist(schema, collection, &retained, &key)?;

        Logger::info(
            "record_deleted",
            &[("collection", collection), ("id", id), ("schema", schema)],
        );
        Ok(())
    }

    /// Remove a collection: data file first, then key file.
    pub fn drop_collection(&self, schema: &str, collection: &str) -> StoreResult<()> {
        let handle = self.lock_handle(schema, collection);
        let _guard = handle.as_ref().map(locks::acquire);

        let data_path = self.layout.data_path(schema, collection);
        let key_path = self.layout.key_path(schema, collection);

        if !data_path.exists() {
            return Err(StoreError::CollectionNotFound(collection.to_string()));
        }

        fs::remove_file(&data_path)
            .map_err(|e| StoreError::io("failed to delete collection file", e))?;
        // Past this point the data is gone; a key-file failure is reported
        // but leaves the orphaned key behind.
        fs::remove_file(&key_path).map_err(|e| StoreError::io("failed to delete key file", e))?;

        Logger::info(
            "collection_dropped",
            &[("collection", collection), ("schema", schema)],
        );
        Ok(())
    }

    /// Names of all collections in a schema, extension stripped, sorted.
    pub fn list(&self, schema: &str) -> StoreResult<Vec<String>> {
        let dir = self.layout.schema_dir(schema);
        let entries =
            fs::read_dir(&dir).map_err(|e| StoreError::io("failed to read schema directory", e))?;

        let mut collections = Vec::new();
        for entry in entries {
            let entry =
                entry.map_err(|e| StoreError::io("failed to read schema directory", e))?;
            let path = entry.path();
            if path.is_dir() || path.extension().and_then(|e| e.to_str()) != Some(DATA_EXT) {
                continue;
            }
            if let Some(name) = path.file_stem().and_then(|s| s.to_str()) {
                collections.push(name.to_string());
            }
        }
        collections.sort();
        Ok(collections)
    }

    // --- one full cycle, callers hold the collection lock ---

    fn create_locked(
        &self,
        schema: &str,
        collection: &str,
        initial: Option<&str>,
    ) -> StoreResult<()> {
        let dir = self.layout.ensure_schema(schema)?;

        let data_path = self.layout.data_path(schema, collection);
        if data_path.exists() {
            return Err(StoreError::AlreadyExists {
                collection: collection.to_string(),
                dir: dir.display().to_string(),
            });
        }

        let records = match initial {
            Some(raw) if !raw.trim().is_empty() => {
                vec![Record::stamp_new(codec::parse_fields(raw)?)]
            }
            _ => Vec::new(),
        };

        let key = ContentKey::generate();
        let envelope = cipher::encrypt(&codec::encode(&records)?, &key)?;

        write_restricted(&data_path, envelope.as_bytes(), "collection file")?;
        // If this write fails the encrypted data file above is orphaned and
        // unreadable forever; that gap is documented, not rolled back.
        write_restricted(
            &self.layout.key_path(schema, collection),
            key.as_bytes(),
            "key file",
        )?;

        Logger::info(
            "collection_created",
            &[("collection", collection), ("schema", schema)],
        );
        Ok(())
    }

    fn load_locked(&self, schema: &str, collection: &str) -> StoreResult<(Vec<Record>, ContentKey)> {
        let data_path = self.layout.data_path(schema, collection);
        let key_path = self.layout.key_path(schema, collection);

        if !data_path.exists() || !key_path.exists() {
            return Err(StoreError::CollectionNotFound(collection.to_string()));
        }

        let envelope = fs::read_to_string(&data_path)
            .map_err(|e| StoreError::io("failed to read collection file", e))?;
        let key_bytes =
            fs::read(&key_path).map_err(|e| StoreError::io("failed to read key file", e))?;

        let key = ContentKey::from_bytes(&key_bytes)?;
        let plaintext = cipher::decrypt(&envelope, &key)?;
        let records = codec::decode(&plaintext)?;

        Ok((records, key))
    }

    fn persist(
        &self,
        schema: &str,
        collection: &str,
        records: &[Record],
        key: &ContentKey,
    ) -> StoreResult<()> {
        let envelope = cipher::encrypt(&codec::encode(records)?, key)?;
        write_restricted(
            &self.layout.data_path(schema, collection),
            envelope.as_bytes(),
            "collection file",
        )
    }

    fn lock_handle(&self, schema: &str, collection: &str) -> Option<Arc<Mutex<()>>> {
        self.locks
            .as_ref()
            .map(|registry| registry.handle(&self.layout.data_path(schema, collection)))
    }
}

/// Write a file and restrict it to owner read/write.
fn write_restricted(path: &Path, bytes: &[u8], what: &str) -> StoreResult<()> {
    fs::write(path, bytes).map_err(|e| StoreError::io(format!("failed to write {}", what), e))?;
    restrict_file(path, what)
}

#[cfg(unix)]
fn restrict_file(path: &Path, what: &str) -> StoreResult<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .map_err(|e| StoreError::io(format!("failed to set permissions on {}", what), e))
}

#[cfg(not(unix))]
fn restrict_file(_path: &Path, _what: &str) -> StoreResult<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store(tmp: &TempDir) -> CollectionStore {
        CollectionStore::new(tmp.path().join("db"))
    }

    #[test]
    fn test_create_empty_collection_writes_both_files() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        store.create("public", "users", None).unwrap();

        assert!(store.layout().data_path("public", "users").exists());
        assert!(store.layout().key_path("public", "users").exists());
        assert!(store.load("public", "users").unwrap().is_empty());
    }

    #[test]
    fn test_create_with_initial_record() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        store
            .create("public", "users", Some(r#"{"name":"nun","age":20}"#))
            .unwrap();

        let records = store.load("public", "users").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("name"), Some(&json!("nun")));
        assert_eq!(records[0].version(), 0);
    }

    #[test]
    fn test_duplicate_create_fails() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        store.create("public", "users", None).unwrap();
        let err = store.create("public", "users", None).unwrap_err();

        assert!(matches!(err, StoreError::AlreadyExists { .. }));
    }

    #[test]
    fn test_data_file_is_not_plaintext() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        store
            .create("public", "users", Some(r#"{"name":"confidential-bob"}"#))
            .unwrap();

        let on_disk = fs::read_to_string(store.layout().data_path("public", "users")).unwrap();
        assert!(!on_disk.contains("confidential-bob"));
        assert!(!on_disk.contains("name"));
    }

    #[test]
    fn test_insert_auto_creates_missing_collection() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        store
            .insert("public", "users", r#"{"name":"bob","level":5}"#)
            .unwrap();

        let records = store.load("public", "users").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("level"), Some(&json!(5)));
    }

    #[test]
    fn test_insert_appends_in_order() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        store.create("public", "users", None).unwrap();
        store.insert("public", "users", r#"{"n":1}"#).unwrap();
        store.insert("public", "users", r#"{"n":2}"#).unwrap();
        store.insert("public", "users", r#"{"n":3}"#).unwrap();

        let records = store.load("public", "users").unwrap();
        let ns: Vec<_> = records.iter().map(|r| r.get("n").cloned()).collect();
        assert_eq!(ns, vec![Some(json!(1)), Some(json!(2)), Some(json!(3))]);
    }

    #[test]
    fn test_insert_reuses_existing_key() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        store.create("public", "users", None).unwrap();
        let key_before = fs::read(store.layout().key_path("public", "users")).unwrap();

        store.insert("public", "users", r#"{"n":1}"#).unwrap();
        let key_after = fs::read(store.layout().key_path("public", "users")).unwrap();

        assert_eq!(key_before, key_after);
    }

    #[test]
    fn test_update_replaces_in_place() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        store.insert("public", "users", r#"{"n":1}"#).unwrap();
        store.insert("public", "users", r#"{"n":2}"#).unwrap();
        let id = store.load("public", "users").unwrap()[0]
            .id()
            .unwrap()
            .to_string();

        store
            .update("public", "users", &id, r#"{"n":10}"#)
            .unwrap();

        let records = store.load("public", "users").unwrap();
        assert_eq!(records[0].get("n"), Some(&json!(10)));
        assert_eq!(records[0].version(), 1);
        assert_eq!(records[1].get("n"), Some(&json!(2)));
    }

    #[test]
    fn test_update_missing_id_fails() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        store.insert("public", "users", r#"{"n":1}"#).unwrap();
        let err = store
            .update("public", "users", "no-such-id", r#"{"n":2}"#)
            .unwrap_err();

        assert!(matches!(err, StoreError::RecordNotFound(_)));
    }

    #[test]
    fn test_delete_removes_only_the_matching_record() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        store.insert("public", "users", r#"{"n":1}"#).unwrap();
        store.insert("public", "users", r#"{"n":2}"#).unwrap();
        let id = store.load("public", "users").unwrap()[0]
            .id()
            .unwrap()
            .to_string();

        store.delete("public", "users", &id).unwrap();

        let records = store.load("public", "users").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("n"), Some(&json!(2)));
    }

    #[test]
    fn test_delete_missing_id_fails() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        store.insert("public", "users", r#"{"n":1}"#).unwrap();
        let err = store.delete("public", "users", "no-such-id").unwrap_err();

        assert!(matches!(err, StoreError::RecordNotFound(_)));
    }

    #[test]
    fn test_drop_removes_both_files() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        store.create("public", "users", None).unwrap();
        store.drop_collection("public", "users").unwrap();

        assert!(!store.layout().data_path("public", "users").exists());
        assert!(!store.layout().key_path("public", "users").exists());
        assert!(matches!(
            store.load("public", "users").unwrap_err(),
            StoreError::CollectionNotFound(_)
        ));
    }

    #[test]
    fn test_drop_missing_collection_fails() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);
        store.layout().ensure_schema("public").unwrap();

        let err = store.drop_collection("public", "ghost").unwrap_err();
        assert!(matches!(err, StoreError::CollectionNotFound(_)));
    }

    #[test]
    fn test_load_without_key_file_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        store.create("public", "users", None).unwrap();
        fs::remove_file(store.layout().key_path("public", "users")).unwrap();

        assert!(matches!(
            store.load("public", "users").unwrap_err(),
            StoreError::CollectionNotFound(_)
        ));
    }

    #[test]
    fn test_load_with_truncated_key_file_is_invalid_key() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        store.create("public", "users", None).unwrap();
        fs::write(store.layout().key_path("public", "users"), [0u8; 5]).unwrap();

        let err = store.load("public", "users").unwrap_err();
        assert!(matches!(
            err,
            StoreError::Cipher(crate::cipher::CipherError::InvalidKey { .. })
        ));
    }

    #[test]
    fn test_load_with_foreign_key_is_authentication_failure() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        store.create("public", "users", None).unwrap();
        store.create("public", "orders", None).unwrap();

        // Swap in the other collection's key.
        let foreign = fs::read(store.layout().key_path("public", "orders")).unwrap();
        fs::write(store.layout().key_path("public", "users"), foreign).unwrap();

        let err = store.load("public", "users").unwrap_err();
        assert!(matches!(
            err,
            StoreError::Cipher(crate::cipher::CipherError::AuthenticationFailure)
        ));
    }

    #[test]
    fn test_list_returns_sorted_names_without_extension() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        store.create("public", "users", None).unwrap();
        store.create("public", "orders", None).unwrap();

        let names = store.list("public").unwrap();
        assert_eq!(names, vec!["orders".to_string(), "users".to_string()]);
    }

    #[test]
    fn test_list_uninitialized_schema_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        let err = store.list("never-created").unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn test_empty_schema_name_uses_root() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp);

        store.insert("", "users", r#"{"n":1}"#).unwrap();

        assert!(store.layout().data_path("", "users").exists());
        assert_eq!(store.list("").unwrap(), vec!["users".to_string()]);
    }

    #[test]
    fn test_locking_store_behaves_identically() {
        let tmp = TempDir::new().unwrap();
        let store = CollectionStore::with_locking(tmp.path().join("db"));

        store.insert("public", "users", r#"{"n":1}"#).unwrap();
        let id = store.load("public", "users").unwrap()[0]
            .id()
            .unwrap()
            .to_string();
        store.update("public", "users", &id, r#"{"n":2}"#).unwrap();
        store.delete("public", "users", &id).unwrap();

        assert!(store.load("public", "users").unwrap().is_empty());
    }
}
