use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::ProjectType;

/// Marker files checked in priority order; the first hit decides the type
const MARKERS: &[(&[&str], ProjectType)] = &[
    (&["package.json"], ProjectType::NodeJs),
    (&["go.mod"], ProjectType::Go),
    (&["Cargo.toml"], ProjectType::Cargo),
    (
        &["pyproject.toml", "requirements.txt", "setup.py"],
        ProjectType::Python,
    ),
    (&["Makefile", "makefile"], ProjectType::Makefile),
    (&[".git"], ProjectType::GitRepo),
];

/// Classify a directory by the names of its immediate entries.
///
/// Anything that cannot be listed (missing, not a directory, unreadable) is `Unknown`.
pub fn classify(path: &Path) -> ProjectType {
    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(_) => return ProjectType::Unknown,
    };

    let names: HashSet<String> = entries
        .flatten()
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();

    MARKERS
        .iter()
        .find(|(markers, _)| markers.iter().any(|m| names.contains(*m)))
        .map(|(_, project_type)| *project_type)
        .unwrap_or(ProjectType::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn dir_with(files: &[&str]) -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        for file in files {
            if *file == ".git" {
                fs::create_dir(tmp.path().join(file)).unwrap();
            } else {
                fs::write(tmp.path().join(file), "").unwrap();
            }
        }
        tmp
    }

    #[test]
    fn test_single_markers() {
        let cases = [
            ("package.json", ProjectType::NodeJs),
            ("go.mod", ProjectType::Go),
            ("Cargo.toml", ProjectType::Cargo),
            ("pyproject.toml", ProjectType::Python),
            ("requirements.txt", ProjectType::Python),
            ("setup.py", ProjectType::Python),
            ("Makefile", ProjectType::Makefile),
            ("makefile", ProjectType::Makefile),
            (".git", ProjectType::GitRepo),
        ];

        for (marker, expected) in cases {
            let tmp = dir_with(&[marker]);
            assert_eq!(classify(tmp.path()), expected, "marker {}", marker);
        }
    }

    #[test]
    fn test_priority_order() {
        let tmp = dir_with(&["go.mod", "package.json"]);
        assert_eq!(classify(tmp.path()), ProjectType::NodeJs);

        let tmp = dir_with(&["Cargo.toml", "go.mod"]);
        assert_eq!(classify(tmp.path()), ProjectType::Go);

        let tmp = dir_with(&["setup.py", "Cargo.toml", "Makefile"]);
        assert_eq!(classify(tmp.path()), ProjectType::Cargo);

        let tmp = dir_with(&[".git", "Makefile"]);
        assert_eq!(classify(tmp.path()), ProjectType::Makefile);
    }

    #[test]
    fn test_no_marker_is_unknown() {
        let tmp = dir_with(&["README.md", "notes.txt"]);
        assert_eq!(classify(tmp.path()), ProjectType::Unknown);
    }

    #[test]
    fn test_unlistable_paths_are_unknown() {
        let tmp = dir_with(&["Cargo.toml"]);
        assert_eq!(
            classify(&tmp.path().join("does-not-exist")),
            ProjectType::Unknown
        );
        assert_eq!(
            classify(&tmp.path().join("Cargo.toml")),
            ProjectType::Unknown
        );
    }
}
