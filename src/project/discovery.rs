use std::fs;
use std::time::Instant;

use tokio::task::JoinError;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use super::{classify, describe, ProjectDescriptor, ProjectType};
use crate::config::DiscoveryConfig;

/// Walks the configured search roots looking for project directories
#[derive(Debug, Clone)]
pub struct Discoverer {
    config: DiscoveryConfig,
}

impl Discoverer {
    pub fn new(config: DiscoveryConfig) -> Self {
        Self { config }
    }

    /// Scan every search root and return the projects found, in walk order.
    ///
    /// Missing roots and unreadable subtrees are skipped silently. Overlapping
    /// roots are not deduplicated.
    pub fn discover(&self) -> Vec<ProjectDescriptor> {
        let started = Instant::now();
        let mut projects = Vec::new();

        for root in self.config.resolved_search_paths() {
            let root = match fs::canonicalize(&root) {
                Ok(path) if path.is_dir() => path,
                _ => {
                    debug!(root = %root.display(), "search root missing, skipping");
                    continue;
                }
            };

            let walker = WalkDir::new(&root)
                .max_depth(self.config.max_depth)
                .into_iter()
                .filter_entry(|entry| self.should_visit(entry));

            for entry in walker.flatten() {
                if classify(entry.path()) != ProjectType::Unknown {
                    projects.push(describe(entry.path()));
                }
            }
        }

        info!(
            count = projects.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "project discovery finished"
        );
        projects
    }

    /// Run [`Discoverer::discover`] on the blocking pool
    pub async fn discover_in_background(&self) -> Result<Vec<ProjectDescriptor>, JoinError> {
        let discoverer = self.clone();
        tokio::task::spawn_blocking(move || discoverer.discover()).await
    }

    /// Directories only; the root is always visited, everything below it is pruned by name
    fn should_visit(&self, entry: &DirEntry) -> bool {
        if !entry.file_type().is_dir() {
            return false;
        }
        if entry.depth() == 0 {
            return true;
        }

        let name = entry.file_name().to_string_lossy();
        let skipped = self
            .config
            .skip_dirs
            .iter()
            .any(|skip| skip.as_str() == &*name);
        !(name.starts_with('.') || skipped)
    }
}
