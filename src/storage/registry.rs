//! Bucket registry
//!
//! Holds the immutable bucket name to directory mapping and resolves object
//! keys against it. Resolution order matters:
//!
//! 1. bucket lookup
//! 2. canonical containment (symlinks resolved before comparing, dangling
//!    ones included)
//! 3. `.pdf` suffix, checked before existence so disallowed types never
//!    reveal whether a file is present
//! 4. existence / regular file, re-resolved strictly
//! 5. read

use crate::error::RegistryError;
use crate::logger;
use crate::storage::{FailureReason, ResolutionOutcome};
use std::collections::BTreeMap;
use soft_canonicalize::soft_canonicalize;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

const ALLOWED_EXTENSION: &str = "pdf";

/// Registered buckets keyed by name; roots are canonical directories
#[derive(Debug, Clone)]
pub struct BucketRegistry {
    buckets: BTreeMap<String, PathBuf>,
}

impl BucketRegistry {
    /// Build a registry from bucket name / directory pairs.
    ///
    /// Fails on the first entry whose directory is missing or not a directory;
    /// no partial registry is ever returned.
    pub fn new<I, N, P>(mapping: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (N, P)>,
        N: Into<String>,
        P: AsRef<Path>,
    {
        let mut buckets = BTreeMap::new();

        for (name, path) in mapping {
            let name = name.into();
            let path = path.as_ref();

            if name.is_empty() || name.contains('/') {
                return Err(RegistryError::InvalidBucketName(name));
            }

            let metadata = fs::metadata(path).map_err(|source| RegistryError::BucketNotFound {
                bucket: name.clone(),
                path: path.to_path_buf(),
                source,
            })?;
            if !metadata.is_dir() {
                return Err(RegistryError::NotADirectory {
                    bucket: name,
                    path: path.to_path_buf(),
                });
            }

            let root = path
                .canonicalize()
                .map_err(|source| RegistryError::BucketNotFound {
                    bucket: name.clone(),
                    path: path.to_path_buf(),
                    source,
                })?;

            buckets.insert(name, root);
        }

        Ok(Self { buckets })
    }

    /// Registered buckets in name order
    pub fn buckets(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.buckets
            .iter()
            .map(|(name, root)| (name.as_str(), root.as_path()))
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Resolve `key` inside `bucket` to the file's bytes.
    ///
    /// Blocking: performs synchronous filesystem calls.
    pub fn resolve(&self, bucket: &str, key: &str) -> ResolutionOutcome {
        let Some(root) = self.buckets.get(bucket) else {
            return ResolutionOutcome::failure(
                FailureReason::NoSuchBucket,
                format!("Bucket not found: {bucket}"),
            );
        };

        let candidate = root.join(relative_key_path(key));

        let canonical = match soft_canonicalize(&candidate) {
            Ok(canonical) => canonical,
            Err(e) => {
                logger::log_warning(&format!("Could not resolve {bucket}/{key}: {e}"));
                return path_escape(key);
            }
        };
        if !is_contained(root, &canonical) {
            logger::log_warning(&format!(
                "Path traversal attempt blocked: {bucket}/{key} -> {}",
                canonical.display()
            ));
            return path_escape(key);
        }

        let extension = candidate.extension().and_then(|e| e.to_str());
        if !extension.is_some_and(|e| e.eq_ignore_ascii_case(ALLOWED_EXTENSION)) {
            let suffix = extension.map(|e| format!(".{e}")).unwrap_or_default();
            return ResolutionOutcome::failure(
                FailureReason::UnsupportedType,
                format!("Invalid file type: only PDF files are allowed, got {suffix}"),
            );
        }

        // Re-resolve strictly so the bytes come from a fully resolved path,
        // not one whose symlinks may have changed since the check above
        let Ok(real) = fs::canonicalize(&canonical) else {
            return ResolutionOutcome::failure(
                FailureReason::NoSuchKey,
                format!("Object not found: {key}"),
            );
        };
        if !is_contained(root, &real) {
            logger::log_warning(&format!(
                "Path changed during resolution: {bucket}/{key} -> {}",
                real.display()
            ));
            return path_escape(key);
        }

        match fs::metadata(&real) {
            Ok(metadata) if metadata.is_file() => read_object(&real, key, |p| fs::read(p)),
            Ok(_) => ResolutionOutcome::failure(
                FailureReason::NoSuchKey,
                format!("Object is not a file: {key}"),
            ),
            Err(_) => ResolutionOutcome::failure(
                FailureReason::NoSuchKey,
                format!("Object not found: {key}"),
            ),
        }
    }
}

/// Strictly below `root`; the root itself is never an object
fn is_contained(root: &Path, path: &Path) -> bool {
    path != root && path.starts_with(root)
}

fn path_escape(key: &str) -> ResolutionOutcome {
    ResolutionOutcome::failure(
        FailureReason::PathEscape,
        format!("Access denied: path is outside bucket directory: {key}"),
    )
}

fn read_object<R>(path: &Path, key: &str, read: R) -> ResolutionOutcome
where
    R: FnOnce(&Path) -> io::Result<Vec<u8>>,
{
    match read(path) {
        Ok(data) => ResolutionOutcome::Success { data },
        Err(e) => {
            logger::log_error(&format!("Failed to read file '{}': {e}", path.display()));
            ResolutionOutcome::failure(
                FailureReason::ReadFailure,
                format!("Failed to read file: {key}"),
            )
        }
    }
}

/// Turn a key into a relative path. Root and prefix components are dropped
/// so a leading `/` cannot re-anchor the path; `.` and `..` are kept for
/// canonicalization to deal with.
fn relative_key_path(key: &str) -> PathBuf {
    Path::new(key)
        .components()
        .filter(|c| {
            matches!(
                c,
                Component::Normal(_) | Component::CurDir | Component::ParentDir
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Layout:
    /// ```text
    /// <tmp>/secret.pdf
    /// <tmp>/elsewhere/
    /// <tmp>/docs/report.pdf   (10 bytes)
    /// <tmp>/docs/report.txt
    /// <tmp>/docs/UPPER.PDF
    /// <tmp>/docs/folder.pdf/
    /// <tmp>/docs/sub/dir/file.pdf
    /// ```
    fn setup() -> (TempDir, BucketRegistry) {
        let tmp = TempDir::new().expect("Failed to create temp directory");
        let docs = tmp.path().join("docs");
        fs::create_dir_all(docs.join("sub/dir")).unwrap();
        fs::create_dir_all(docs.join("folder.pdf")).unwrap();
        fs::create_dir_all(tmp.path().join("elsewhere")).unwrap();
        fs::write(docs.join("report.pdf"), b"%PDF-1.4\n\n").unwrap();
        fs::write(docs.join("report.txt"), b"plain text").unwrap();
        fs::write(docs.join("UPPER.PDF"), b"upper").unwrap();
        fs::write(docs.join("sub/dir/file.pdf"), b"nested pdf bytes").unwrap();
        fs::write(tmp.path().join("secret.pdf"), b"outside").unwrap();

        let registry = BucketRegistry::new([("docs", docs)]).unwrap();
        (tmp, registry)
    }

    fn reason(registry: &BucketRegistry, bucket: &str, key: &str) -> Option<FailureReason> {
        registry.resolve(bucket, key).reason()
    }

    #[test]
    fn test_resolve_success() {
        let (_tmp, registry) = setup();
        let outcome = registry.resolve("docs", "report.pdf");
        assert_eq!(
            outcome,
            ResolutionOutcome::Success {
                data: b"%PDF-1.4\n\n".to_vec()
            }
        );
    }

    #[test]
    fn test_nested_key_round_trip() {
        let (tmp, registry) = setup();
        let on_disk = fs::read(tmp.path().join("docs/sub/dir/file.pdf")).unwrap();
        match registry.resolve("docs", "sub/dir/file.pdf") {
            ResolutionOutcome::Success { data } => assert_eq!(data, on_disk),
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let (_tmp, registry) = setup();
        let first = registry.resolve("docs", "sub/dir/file.pdf");
        let second = registry.resolve("docs", "sub/dir/file.pdf");
        assert!(first.reason().is_none());
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_bucket() {
        let (_tmp, registry) = setup();
        // A sibling directory exists on disk but was never registered
        assert_eq!(
            reason(&registry, "elsewhere", "report.pdf"),
            Some(FailureReason::NoSuchBucket)
        );
    }

    #[test]
    fn test_missing_key() {
        let (_tmp, registry) = setup();
        assert_eq!(
            reason(&registry, "docs", "missing.pdf"),
            Some(FailureReason::NoSuchKey)
        );
    }

    #[test]
    fn test_directory_with_pdf_suffix_is_not_an_object() {
        let (_tmp, registry) = setup();
        assert_eq!(
            reason(&registry, "docs", "folder.pdf"),
            Some(FailureReason::NoSuchKey)
        );
    }

    #[test]
    fn test_parent_traversal_is_denied() {
        let (_tmp, registry) = setup();
        for key in ["../secret.pdf", "..", "../..", "sub/../../secret.pdf", "../../etc/passwd"] {
            assert_eq!(
                reason(&registry, "docs", key),
                Some(FailureReason::PathEscape),
                "key {key:?} should be denied"
            );
        }
    }

    #[test]
    fn test_root_itself_is_denied() {
        let (_tmp, registry) = setup();
        for key in [".", "/", "sub/..", "sub/dir/../.."] {
            assert_eq!(
                reason(&registry, "docs", key),
                Some(FailureReason::PathEscape),
                "key {key:?} should be denied"
            );
        }
    }

    #[test]
    fn test_traversal_through_missing_directory_is_denied() {
        let (_tmp, registry) = setup();
        assert_eq!(
            reason(&registry, "docs", "nope/../../secret.pdf"),
            Some(FailureReason::PathEscape)
        );
        assert_eq!(
            reason(&registry, "docs", "../nowhere/file.pdf"),
            Some(FailureReason::PathEscape)
        );
    }

    #[test]
    fn test_leading_slash_stays_inside_bucket() {
        let (_tmp, registry) = setup();
        assert!(registry.resolve("docs", "/report.pdf").reason().is_none());
    }

    #[test]
    fn test_dot_segments_inside_bucket_are_allowed() {
        let (_tmp, registry) = setup();
        assert!(registry
            .resolve("docs", "sub/./dir/../dir/file.pdf")
            .reason()
            .is_none());
    }

    #[test]
    fn test_non_pdf_is_rejected_whether_or_not_it_exists() {
        let (_tmp, registry) = setup();
        for key in ["report.txt", "missing.txt", "noextension", "sub", ".pdf", "report.pdf.bak"] {
            assert_eq!(
                reason(&registry, "docs", key),
                Some(FailureReason::UnsupportedType),
                "key {key:?} should be rejected by type"
            );
        }
    }

    #[test]
    fn test_unsupported_type_message_names_suffix() {
        let (_tmp, registry) = setup();
        match registry.resolve("docs", "report.txt") {
            ResolutionOutcome::Failure { message, .. } => {
                assert!(message.ends_with("got .txt"), "message: {message}");
            }
            ResolutionOutcome::Success { .. } => panic!("expected failure"),
        }
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let (_tmp, registry) = setup();
        assert_eq!(
            registry.resolve("docs", "UPPER.PDF"),
            ResolutionOutcome::Success {
                data: b"upper".to_vec()
            }
        );
        // Type passes, existence fails
        assert_eq!(
            reason(&registry, "docs", "Missing.Pdf"),
            Some(FailureReason::NoSuchKey)
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_escaping_root_is_denied() {
        use std::os::unix::fs::symlink;

        let (tmp, registry) = setup();
        let docs = tmp.path().join("docs");
        symlink(tmp.path().join("secret.pdf"), docs.join("link.pdf")).unwrap();
        symlink(tmp.path(), docs.join("up")).unwrap();

        assert_eq!(
            reason(&registry, "docs", "link.pdf"),
            Some(FailureReason::PathEscape)
        );
        assert_eq!(
            reason(&registry, "docs", "up/secret.pdf"),
            Some(FailureReason::PathEscape)
        );
        assert_eq!(
            reason(&registry, "docs", "up/missing.pdf"),
            Some(FailureReason::PathEscape)
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_file_symlink_out_of_root_is_denied() {
        use std::os::unix::fs::symlink;

        let (tmp, registry) = setup();
        let outside = tmp.path().join("outside.pdf");
        symlink(&outside, tmp.path().join("docs/dangle.pdf")).unwrap();

        assert_eq!(
            reason(&registry, "docs", "dangle.pdf"),
            Some(FailureReason::PathEscape)
        );

        // Same answer once the target exists
        fs::write(&outside, b"outside").unwrap();
        assert_eq!(
            reason(&registry, "docs", "dangle.pdf"),
            Some(FailureReason::PathEscape)
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_directory_symlink_out_of_root_is_denied() {
        use std::os::unix::fs::symlink;

        let (tmp, registry) = setup();
        let outdir = tmp.path().join("outdir");
        symlink(&outdir, tmp.path().join("docs/dir")).unwrap();

        assert_eq!(
            reason(&registry, "docs", "dir/x.pdf"),
            Some(FailureReason::PathEscape)
        );

        fs::create_dir(&outdir).unwrap();
        fs::write(outdir.join("x.pdf"), b"outside").unwrap();
        assert_eq!(
            reason(&registry, "docs", "dir/x.pdf"),
            Some(FailureReason::PathEscape)
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_inside_root_is_missing_key() {
        use std::os::unix::fs::symlink;

        let (tmp, registry) = setup();
        let docs = tmp.path().join("docs");
        symlink(docs.join("later.pdf"), docs.join("alias.pdf")).unwrap();

        assert_eq!(
            reason(&registry, "docs", "alias.pdf"),
            Some(FailureReason::NoSuchKey)
        );
    }

    #[test]
    fn test_read_error_is_read_failure() {
        let (tmp, _registry) = setup();
        let path = tmp.path().join("docs/report.pdf");

        let outcome = read_object(&path, "report.pdf", |_| {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        });
        assert_eq!(
            outcome,
            ResolutionOutcome::failure(
                FailureReason::ReadFailure,
                "Failed to read file: report.pdf".to_string()
            )
        );
        assert_eq!(
            read_object(&path, "report.pdf", |p| fs::read(p)),
            ResolutionOutcome::Success {
                data: b"%PDF-1.4\n\n".to_vec()
            }
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_inside_root_is_followed() {
        use std::os::unix::fs::symlink;

        let (tmp, registry) = setup();
        let docs = tmp.path().join("docs");
        symlink(docs.join("sub/dir"), docs.join("shortcut")).unwrap();

        assert_eq!(
            registry.resolve("docs", "shortcut/file.pdf"),
            ResolutionOutcome::Success {
                data: b"nested pdf bytes".to_vec()
            }
        );
    }

    #[test]
    fn test_new_rejects_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let docs = tmp.path().join("docs");
        fs::create_dir(&docs).unwrap();

        let result = BucketRegistry::new([("docs", docs), ("gone", tmp.path().join("gone"))]);
        match result {
            Err(RegistryError::BucketNotFound { bucket, .. }) => assert_eq!(bucket, "gone"),
            other => panic!("expected BucketNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_new_rejects_regular_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("plain.pdf");
        fs::write(&file, b"x").unwrap();

        let err = BucketRegistry::new([("files", &file)]).unwrap_err();
        assert!(matches!(err, RegistryError::NotADirectory { .. }));
        assert!(err.to_string().contains("not a directory"));
    }

    #[test]
    fn test_new_rejects_invalid_bucket_names() {
        let tmp = TempDir::new().unwrap();
        for name in ["", "a/b"] {
            let err = BucketRegistry::new([(name, tmp.path())]).unwrap_err();
            assert!(matches!(err, RegistryError::InvalidBucketName(_)));
        }
    }

    #[test]
    fn test_new_canonicalizes_roots() {
        let tmp = TempDir::new().unwrap();
        let docs = tmp.path().join("docs");
        fs::create_dir(&docs).unwrap();

        let registry = BucketRegistry::new([("docs", docs.join("../docs"))]).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
        let canonical = docs.canonicalize().unwrap();
        assert_eq!(
            registry.buckets().collect::<Vec<_>>(),
            vec![("docs", canonical.as_path())]
        );
    }
}
