use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Copy the static directory into `dst`, recreating its layout.
///
/// Returns the number of files copied. A missing static directory is not an
/// error; there is simply nothing to copy.
pub fn copy_static(src: &Path, dst: &Path) -> Result<usize> {
    if !src.exists() {
        tracing::debug!("no static directory at {}", src.display());
        return Ok(0);
    }

    fs::create_dir_all(dst).with_context(|| format!("Failed to create '{}'", dst.display()))?;

    let mut copied = 0;
    for entry in walkdir::WalkDir::new(src).min_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk '{}'", src.display()))?;
        let rel = entry.path().strip_prefix(src)?;
        let dest_path = dst.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest_path)
                .with_context(|| format!("Failed to create '{}'", dest_path.display()))?;
        } else {
            if let Some(parent) = dest_path.parent() {
                fs::create_dir_all(parent)?;
            }
            tracing::info!(" * {} -> {}", entry.path().display(), dest_path.display());
            fs::copy(entry.path(), &dest_path).with_context(|| {
                format!(
                    "Failed to copy '{}' to '{}'",
                    entry.path().display(),
                    dest_path.display()
                )
            })?;
            copied += 1;
        }
    }

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("mdsite-assets-test").join(name);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn copies_nested_tree() {
        let root = scratch("nested");
        let src = root.join("static");
        fs::create_dir_all(src.join("images/icons")).unwrap();
        fs::write(src.join("index.css"), "body {}").unwrap();
        fs::write(src.join("images/icons/star.svg"), "<svg/>").unwrap();
        fs::create_dir_all(src.join("empty")).unwrap();

        let dst = root.join("public");
        assert_eq!(copy_static(&src, &dst).unwrap(), 2);
        assert_eq!(fs::read_to_string(dst.join("index.css")).unwrap(), "body {}");
        assert!(dst.join("images/icons/star.svg").is_file());
        assert!(dst.join("empty").is_dir());

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn missing_source_copies_nothing() {
        let root = scratch("missing");
        assert_eq!(copy_static(&root.join("nope"), &root.join("public")).unwrap(), 0);
        let _ = fs::remove_dir_all(&root);
    }
}
