use std::sync::Arc;

use objattrs::{
    derive_attributes, file_key_of_directory, file_key_of_object, read_attributes, AclEntity,
    AclEntry, AclRole, AttributesError, CloudPath, FileAttributes, MemoryStore, WriteOptions,
};

const HAPPY: &str = "(✿◕ ‿◕ )ノ";

struct Fixture {
    store: MemoryStore,
    path: CloudPath,
    dir: CloudPath,
}

impl Fixture {
    fn new() -> Fixture {
        let _ = loggerv::init_with_verbosity(3);
        Fixture {
            store: MemoryStore::new(),
            path: CloudPath::parse("gs://bucket/randompath").unwrap(),
            dir: CloudPath::parse("gs://bucket/randompath/").unwrap(),
        }
    }

    fn write(&self, options: WriteOptions) {
        self.store.write(&self.path, HAPPY, &options).unwrap();
    }

    fn attributes(&self, path: &CloudPath) -> FileAttributes {
        derive_attributes(path, &self.store).unwrap()
    }
}

#[test]
fn test_cache_control() {
    let fx = Fixture::new();
    fx.write(WriteOptions::new().with_cache_control("potato"));
    assert_eq!(fx.attributes(&fx.path).cache_control(), Some("potato"));
}

#[test]
fn test_mime_type() {
    let fx = Fixture::new();
    fx.write(WriteOptions::new().with_mime_type("text/potato"));
    assert_eq!(fx.attributes(&fx.path).mime_type(), Some("text/potato"));
}

#[test]
fn test_acl() {
    let fx = Fixture::new();
    let acl = AclEntry::new(AclEntity::user("serf@example.com"), AclRole::Reader);
    fx.write(WriteOptions::new().with_acl(acl.clone()));

    let attributes = fx.attributes(&fx.path);
    let entries = attributes.acl().unwrap();
    assert!(entries.contains(&acl));
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_content_disposition() {
    let fx = Fixture::new();
    fx.write(WriteOptions::new().with_content_disposition("crash call"));
    assert_eq!(fx.attributes(&fx.path).content_disposition(), Some("crash call"));
}

#[test]
fn test_content_encoding() {
    let fx = Fixture::new();
    fx.write(WriteOptions::new().with_content_encoding("my content encoding"));
    assert_eq!(
        fx.attributes(&fx.path).content_encoding(),
        Some("my content encoding")
    );
}

#[test]
fn test_user_metadata() {
    let fx = Fixture::new();
    fx.write(WriteOptions::new().with_user_metadata("green", "bean"));
    let attributes = fx.attributes(&fx.path);
    assert_eq!(attributes.user_metadata_value("green"), Some("bean"));
    assert_eq!(attributes.user_metadata_value("red"), None);
}

#[test]
fn test_unset_attributes_are_absent() {
    let fx = Fixture::new();
    fx.write(WriteOptions::new().with_mime_type("text/plain"));
    let attributes = fx.attributes(&fx.path);
    assert_eq!(attributes.cache_control(), None);
    assert_eq!(attributes.content_disposition(), None);
    assert_eq!(attributes.content_encoding(), None);
    assert_eq!(attributes.acl(), None);
    assert!(attributes.user_metadata().is_empty());
}

#[test]
fn test_is_directory() {
    let fx = Fixture::new();
    fx.write(WriteOptions::new());
    assert!(!fx.attributes(&fx.path).is_directory());
    assert!(fx.attributes(&fx.dir).is_directory());
}

#[test]
fn test_is_regular_file() {
    let fx = Fixture::new();
    fx.write(WriteOptions::new());
    assert!(fx.attributes(&fx.path).is_regular_file());
    assert!(!fx.attributes(&fx.dir).is_regular_file());
}

#[test]
fn test_is_other() {
    let fx = Fixture::new();
    fx.write(WriteOptions::new());
    assert!(!fx.attributes(&fx.path).is_other());
    assert!(!fx.attributes(&fx.dir).is_other());
}

#[test]
fn test_is_symbolic_link() {
    let fx = Fixture::new();
    fx.write(WriteOptions::new());
    assert!(!fx.attributes(&fx.path).is_symbolic_link());
    assert!(!fx.attributes(&fx.dir).is_symbolic_link());
}

#[test]
fn test_directory_needs_no_object() {
    let fx = Fixture::new();
    assert!(fx.store.is_empty());
    assert!(fx.attributes(&fx.dir).is_directory());
}

#[test]
fn test_equality_groups() {
    let fx = Fixture::new();
    fx.write(WriteOptions::new().with_mime_type("text/plain"));
    let a1 = fx.attributes(&fx.path);
    let a2 = fx.attributes(&fx.path);
    fx.write(WriteOptions::new().with_mime_type("text/potato"));
    let b1 = fx.attributes(&fx.path);
    let b2 = fx.attributes(&fx.path);

    assert_eq!(a1, a2);
    assert_eq!(b1, b2);
    assert_ne!(a1, b1);
    assert_ne!(a2, b2);
    assert_eq!(a1.file_key(), a2.file_key());
    assert_ne!(a1.file_key(), b1.file_key());
}

#[test]
fn test_rewrite_with_same_options_changes_key() {
    let fx = Fixture::new();
    fx.write(WriteOptions::new().with_mime_type("text/plain"));
    let before = fx.attributes(&fx.path);
    fx.write(WriteOptions::new().with_mime_type("text/plain"));
    let after = fx.attributes(&fx.path);

    assert_eq!(before.mime_type(), after.mime_type());
    assert_ne!(before.file_key(), after.file_key());
    assert_ne!(before, after);
}

#[test]
fn test_directory_views_are_equal() {
    let fx = Fixture::new();
    assert_eq!(fx.attributes(&fx.dir), fx.attributes(&fx.dir));
    assert_eq!(
        fx.attributes(&fx.dir),
        fx.attributes(&CloudPath::parse("gs://bucket//randompath/./").unwrap())
    );
}

#[test]
fn test_file_key() {
    let fx = Fixture::new();
    fx.write(WriteOptions::new().with_mime_type("text/plain"));
    let path2 = CloudPath::parse("gs://bucket/anotherrandompath").unwrap();
    fx.store
        .write(&path2, HAPPY, &WriteOptions::new().with_mime_type("text/plain"))
        .unwrap();

    // diff files cannot have same filekey
    let a1 = fx.attributes(&fx.path);
    let a2 = fx.attributes(&path2);
    assert_ne!(a1.file_key(), a2.file_key());

    // same for directories
    let b1 = fx.attributes(&fx.dir);
    let b2 = fx.attributes(&CloudPath::parse("gs://bucket/jacket/").unwrap());
    assert_ne!(a1.file_key(), b1.file_key());
    assert_ne!(b1.file_key(), b2.file_key());

    let b3 = fx.attributes(&CloudPath::parse("gs://other/randompath/").unwrap());
    assert_ne!(b1.file_key(), b3.file_key());
}

#[test]
fn test_missing_object() {
    let fx = Fixture::new();
    assert_eq!(
        derive_attributes(&fx.path, &fx.store),
        Err(AttributesError::NotFound("bucket/randompath".to_string()))
    );
}

#[test]
fn test_deleted_object() {
    let fx = Fixture::new();
    fx.write(WriteOptions::new());
    assert!(fx.store.delete(&fx.path).unwrap());
    assert!(matches!(
        derive_attributes(&fx.path, &fx.store),
        Err(AttributesError::NotFound(_))
    ));
}

#[test]
fn test_store_unavailable() {
    let fx = Fixture::new();
    fx.write(WriteOptions::new());
    fx.store.set_unavailable(true);
    assert!(matches!(
        derive_attributes(&fx.path, &fx.store),
        Err(AttributesError::StoreUnavailable(_))
    ));
    // directories never reach the store
    assert!(derive_attributes(&fx.dir, &fx.store).is_ok());
}

#[test]
fn test_size_and_times() {
    let fx = Fixture::new();
    fx.write(WriteOptions::new());
    let file = fx.attributes(&fx.path);
    assert_eq!(file.size(), HAPPY.len() as u64);
    assert!(file.last_modified().is_some());
    assert!(file.generation().is_some());

    let dir = fx.attributes(&fx.dir);
    assert_eq!(dir.size(), 0);
    assert_eq!(dir.last_modified(), None);
    assert_eq!(dir.generation(), None);
}

fn is_invalid_argument<T: std::fmt::Debug>(result: Result<T, AttributesError>) -> bool {
    matches!(result, Err(AttributesError::InvalidArgument(_)))
}

#[test]
fn test_malformed_arguments() {
    let fx = Fixture::new();
    fx.write(WriteOptions::new());

    assert!(is_invalid_argument(read_attributes("", &fx.store)));
    assert!(is_invalid_argument(read_attributes("gs://", &fx.store)));
    assert!(is_invalid_argument(read_attributes("ftp://bucket/randompath", &fx.store)));
    assert!(is_invalid_argument(CloudPath::parse("")));
    assert!(is_invalid_argument(CloudPath::new("", "randompath")));
    assert!(is_invalid_argument(CloudPath::new("bu/cket", "randompath")));
    assert!(is_invalid_argument(file_key_of_directory(&fx.path)));
    assert!(is_invalid_argument(file_key_of_object(&fx.dir, "1")));
    assert!(is_invalid_argument(file_key_of_object(&fx.path, "")));
    assert!(is_invalid_argument(fx.store.write(&fx.dir, HAPPY, &WriteOptions::new())));
}

#[test]
fn test_accessors_on_both_kinds() {
    let fx = Fixture::new();
    fx.write(WriteOptions::new());
    for attributes in [fx.attributes(&fx.path), fx.attributes(&fx.dir)] {
        let _ = attributes.path();
        let _ = attributes.file_type();
        let _ = attributes.file_key().to_string();
        let _ = attributes.cache_control();
        let _ = attributes.mime_type();
        let _ = attributes.acl();
        let _ = attributes.content_disposition();
        let _ = attributes.content_encoding();
        let _ = attributes.user_metadata();
        assert_eq!(attributes.user_metadata_value(""), None);
        let _ = attributes.size();
        let _ = attributes.generation();
        let _ = attributes.etag();
        let _ = attributes.last_modified();
        assert_ne!(attributes.is_directory(), attributes.is_regular_file());
    }
}

#[test]
fn test_concurrent_derivation() {
    let fx = Fixture::new();
    fx.write(WriteOptions::new().with_cache_control("potato"));
    let store = Arc::new(fx.store);
    let expected = derive_attributes(&fx.path, &store).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = Arc::clone(&store);
            let path = fx.path.clone();
            std::thread::spawn(move || derive_attributes(&path, &store).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
