//! Test discovery - find test scripts in a directory tree

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A discovered test script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestScript {
    /// Path relative to the test directory, `/`-separated (e.g. "unit/test-math.sh")
    pub name: String,
    /// Absolute path to the script
    pub path: PathBuf,
}

/// A suite of discovered tests
#[derive(Debug, Default)]
pub struct TestSuite {
    /// All discovered test scripts, sorted by name
    pub tests: Vec<TestScript>,
    /// Entries that could not be read during the walk
    pub walk_errors: Vec<(PathBuf, String)>,
}

impl TestSuite {
    /// Discover all test scripts under `root`
    ///
    /// A file is a test when its name starts with `<prefix>-` or `<prefix>_`.
    pub fn discover(root: &Path, prefix: &str) -> Self {
        let mut suite = TestSuite::default();

        let root = match root.canonicalize() {
            Ok(root) => root,
            Err(e) => {
                suite.walk_errors.push((root.to_path_buf(), e.to_string()));
                return suite;
            }
        };

        let dash = format!("{}-", prefix);
        let underscore = format!("{}_", prefix);

        for entry in WalkDir::new(&root).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(root.as_path()).to_path_buf();
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable entry");
                    suite.walk_errors.push((path, e.to_string()));
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy();
            if !(file_name.starts_with(&dash) || file_name.starts_with(&underscore)) {
                continue;
            }

            if let Ok(relative) = entry.path().strip_prefix(&root) {
                suite.tests.push(TestScript {
                    name: script_name(relative),
                    path: entry.path().to_path_buf(),
                });
            }
        }

        // Sort by name for deterministic order
        suite.tests.sort_by(|a, b| a.name.cmp(&b.name));

        tracing::debug!(root = %root.display(), tests = suite.tests.len(), "discovered tests");
        suite
    }

    /// Filter tests by name pattern
    pub fn filter(&self, pattern: &str) -> Self {
        let filtered = self
            .tests
            .iter()
            .filter(|t| t.name.contains(pattern))
            .cloned()
            .collect();

        TestSuite {
            tests: filtered,
            walk_errors: Vec::new(),
        }
    }

    /// Check if suite has any tests
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Get count of tests
    pub fn len(&self) -> usize {
        self.tests.len()
    }
}

/// Relative path with `/` separators regardless of platform
fn script_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "exit 0\n").unwrap();
    }

    #[test]
    fn test_discover_matches_prefix() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "test-math.sh");
        touch(dir.path(), "test_strings.sh");
        touch(dir.path(), "helper.sh");
        touch(dir.path(), "testing.sh");

        let suite = TestSuite::discover(dir.path(), "test");
        let names: Vec<_> = suite.tests.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["test-math.sh", "test_strings.sh"]);
    }

    #[test]
    fn test_discover_nested_sorted() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "unit/test-b.sh");
        touch(dir.path(), "test-z.sh");
        touch(dir.path(), "integration/test-a.sh");

        let suite = TestSuite::discover(dir.path(), "test");
        let names: Vec<_> = suite.tests.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["integration/test-a.sh", "test-z.sh", "unit/test-b.sh"]
        );
        assert!(suite.tests.iter().all(|t| t.path.is_absolute()));
    }

    #[test]
    fn test_discover_custom_prefix() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "check-one.sh");
        touch(dir.path(), "test-two.sh");

        let suite = TestSuite::discover(dir.path(), "check");
        assert_eq!(suite.len(), 1);
        assert_eq!(suite.tests[0].name, "check-one.sh");
    }

    #[test]
    fn test_discover_missing_directory() {
        let suite = TestSuite::discover(Path::new("/nonexistent/tally/tests"), "test");
        assert!(suite.is_empty());
        assert_eq!(suite.walk_errors.len(), 1);
    }

    #[test]
    fn test_suite_filter() {
        let suite = TestSuite {
            tests: vec![
                TestScript {
                    name: "test-addition.sh".to_string(),
                    path: PathBuf::from("/t/test-addition.sh"),
                },
                TestScript {
                    name: "test-subtraction.sh".to_string(),
                    path: PathBuf::from("/t/test-subtraction.sh"),
                },
            ],
            walk_errors: Vec::new(),
        };

        let filtered = suite.filter("add");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.tests[0].name, "test-addition.sh");
    }
}
