//! Shared test utilities.
//!
//! Fixture setup, small file writers, and catalog lookups that panic with a
//! clear message on a miss.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let out = build(tmp.path(), &IndexConfig::default()).unwrap();
//! let record = find_article(&out.catalog, "triggers");
//! assert_eq!(article_ids(&out.catalog), vec!["adders", "flip-flop", "triggers"]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::types::{ArticleRecord, Catalog};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// The tree holds three articles across two areas plus one misplaced file:
///
/// ```text
/// articles/
/// ├── arithmetic/adders/ru/adders.md            "# Сумматоры"
/// └── digital-circuits/
///     ├── flip-flop/en/flip-flop.md             no heading
///     └── triggers/
///         ├── de/flipflops.md                   name mismatch
///         ├── en/triggers.md                    front matter title
///         └── ru/triggers.md                    "# Триггеры"
/// ```
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write a text file under `root`, creating parent directories.
pub fn write_fixture(root: &Path, rel: &str, content: &str) {
    write_bytes(root, rel, content.as_bytes());
}

pub fn write_bytes(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
}

// =========================================================================
// Catalogs
// =========================================================================

/// Two records in two areas, matching the fixture tree's `adders` and
/// `triggers` minus the English-only extras.
pub fn sample_catalog() -> Catalog {
    let mut adders = ArticleRecord::new("adders", "arithmetic");
    adders.title.insert("ru".into(), "Сумматоры".into());
    adders
        .file
        .insert("ru".into(), "/articles/arithmetic/adders/ru/adders.md".into());

    let mut triggers = ArticleRecord::new("triggers", "digital-circuits");
    for (lang, title) in [("en", "Triggers"), ("ru", "Триггеры")] {
        triggers.title.insert(lang.into(), title.into());
        triggers.file.insert(
            lang.into(),
            format!("/articles/digital-circuits/triggers/{lang}/triggers.md"),
        );
    }

    Catalog::from_records(vec![triggers, adders])
}

// =========================================================================
// Lookups, panic with a clear message on miss
// =========================================================================

/// Find a record by id. Panics if not found.
pub fn find_article<'a>(catalog: &'a Catalog, id: &str) -> &'a ArticleRecord {
    catalog.get(id).unwrap_or_else(|| {
        panic!("article '{id}' not found. Available: {:?}", article_ids(catalog))
    })
}

/// All ids in catalog order.
pub fn article_ids(catalog: &Catalog) -> Vec<&str> {
    catalog.iter().map(|a| a.id.as_str()).collect()
}
