//! Guards against an output clobbering the lyrics or transcript it was made from.

use anyhow::{bail, Result};
use std::path::{Component, Path, PathBuf};

/// Validates that an output file is safe to write.
///
/// Checks:
/// - Output must carry `required_extension` (e.g. "json", "lrc"), so a
///   `.txt` lyric source can never be the target
/// - Output cannot be the same path as any of `source_paths`
pub fn validate_output_path(
    output: &Path,
    required_extension: &str,
    source_paths: &[&Path],
) -> Result<()> {
    let extension = output.extension().and_then(|e| e.to_str()).unwrap_or("");
    if !extension.eq_ignore_ascii_case(required_extension) {
        bail!(
            "Safety check failed: output file '{}' must have a .{} extension",
            output.display(),
            required_extension
        );
    }

    for source in source_paths {
        if same_file(output, source) {
            bail!(
                "Safety check failed: output '{}' cannot be the same as source '{}'",
                output.display(),
                source.display()
            );
        }
    }

    Ok(())
}

/// Validates that a batch output directory is not the input directory.
pub fn validate_output_dir(output_dir: &Path, input_dir: &Path) -> Result<()> {
    if same_file(output_dir, input_dir) {
        bail!(
            "Safety check failed: output directory '{}' cannot be the input directory",
            output_dir.display()
        );
    }
    Ok(())
}

/// Path equality, resolving symlinks and `..` when both paths exist.
fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => lexical(a) == lexical(b),
    }
}

/// Drop `.` components so `in`, `./in` and `in/` compare equal.
fn lexical(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_json_output() {
        let output = PathBuf::from("/tmp/song.timed.json");
        let lyrics = PathBuf::from("/data/song.txt");
        let transcript = PathBuf::from("/data/song.json");
        assert!(validate_output_path(&output, "json", &[&lyrics, &transcript]).is_ok());
    }

    #[test]
    fn test_wrong_extension() {
        let output = PathBuf::from("/tmp/song.txt");
        let result = validate_output_path(&output, "lrc", &[]);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("must have a .lrc extension"));
    }

    #[test]
    fn test_output_equals_source() {
        let path = PathBuf::from("/data/song.json");
        let result = validate_output_path(&path, "json", &[&path]);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("cannot be the same as source"));
    }

    #[test]
    fn test_output_equals_source_through_dot_dot() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("song.json");
        std::fs::write(&source, "[]").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let output = dir.path().join("sub").join("..").join("song.json");
        assert!(validate_output_path(&output, "json", &[&source]).is_err());
    }

    #[test]
    fn test_output_dir_must_differ() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_output_dir(dir.path(), dir.path()).is_err());
        let out = dir.path().join("out");
        assert!(validate_output_dir(&out, dir.path()).is_ok());
    }

    #[test]
    fn test_missing_paths_compare_without_dot_components() {
        assert!(validate_output_dir(Path::new("./no-such-in"), Path::new("no-such-in")).is_err());
        assert!(validate_output_dir(Path::new("no-such-in/"), Path::new("./no-such-in")).is_err());
        assert!(validate_output_dir(Path::new("no-such-out"), Path::new("no-such-in")).is_ok());

        let source = PathBuf::from("missing/./song.json");
        let output = PathBuf::from("./missing/song.json");
        assert!(validate_output_path(&output, "json", &[&source]).is_err());
    }
}
