mod classifier;
mod discovery;

pub use classifier::classify;
pub use discovery::Discoverer;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Toolchain detected for a project directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectType {
    /// No marker file matched
    Unknown,
    NodeJs,
    Go,
    /// Never produced by the classifier; kept distinct from `Cargo`
    #[allow(dead_code)]
    Rust,
    Python,
    Cargo,
    Makefile,
    GitRepo,
}

impl ProjectType {
    /// Human readable language name
    pub fn label(&self) -> &'static str {
        match self {
            ProjectType::NodeJs => "Node.js",
            ProjectType::Go => "Go",
            ProjectType::Rust | ProjectType::Cargo => "Rust",
            ProjectType::Python => "Python",
            ProjectType::Makefile => "Make",
            ProjectType::GitRepo => "Git",
            ProjectType::Unknown => "Unknown",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ProjectType::NodeJs => "🟢",
            ProjectType::Go => "🐹",
            ProjectType::Rust | ProjectType::Cargo => "🦀",
            ProjectType::Python => "🐍",
            ProjectType::Makefile => "⚙",
            ProjectType::GitRepo | ProjectType::Unknown => "📁",
        }
    }
}

/// Coarse state of a project directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectStatus {
    /// Has a label but [`ProjectStatus::derive`] never yields it
    #[allow(dead_code)]
    Clean,
    GitRepo,
    Active,
    Empty,
}

impl ProjectStatus {
    /// Git presence wins over the file count, independently of the project type
    pub fn derive(git_present: bool, file_count: usize) -> Self {
        if git_present {
            ProjectStatus::GitRepo
        } else if file_count > 0 {
            ProjectStatus::Active
        } else {
            ProjectStatus::Empty
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::Clean => "Clean",
            ProjectStatus::GitRepo => "Git Repo",
            ProjectStatus::Active => "Active",
            ProjectStatus::Empty => "Empty",
        }
    }
}

/// A discovered project directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescriptor {
    /// Final path segment
    pub name: String,
    /// Path the project was found at, unique within one discovery run
    pub path: PathBuf,
    pub project_type: ProjectType,
    /// Whether `<path>/.git` exists
    pub git_present: bool,
    pub status: ProjectStatus,
    /// Directory mtime, `UNIX_EPOCH` when it could not be read
    pub modified_at: SystemTime,
    /// Non-directory entries directly under `path`
    pub file_count: usize,
}

/// Build a descriptor for `path`.
///
/// Every field is gathered independently; a failing lookup only zeroes its own field.
pub fn describe(path: &Path) -> ProjectDescriptor {
    let name = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string());

    let modified_at = fs::metadata(path)
        .and_then(|meta| meta.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH);

    let file_count = fs::read_dir(path)
        .map(|entries| {
            entries
                .flatten()
                .filter(|entry| entry.file_type().map_or(false, |t| !t.is_dir()))
                .count()
        })
        .unwrap_or(0);

    let git_present = path.join(".git").exists();

    ProjectDescriptor {
        name,
        path: path.to_path_buf(),
        project_type: classify(path),
        git_present,
        status: ProjectStatus::derive(git_present, file_count),
        modified_at,
        file_count,
    }
}
