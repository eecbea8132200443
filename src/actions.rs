use crossterm::event::KeyEvent;
use std::path::PathBuf;

use crate::project::ProjectDescriptor;

/// Actions that can be dispatched through the application
#[derive(Debug, Clone)]
pub enum Action {
    /// A key was pressed
    KeyPress(KeyEvent),
    /// The terminal was resized to (width, height)
    Resize(u16, u16),
    /// A discovery run finished
    ProjectsLoaded(Vec<ProjectDescriptor>),
    /// Request a new discovery run
    RefreshProjects,
    /// A project row was activated
    ProjectSelected(ProjectDescriptor),
    /// Copy a project path to the clipboard
    CopyPath(PathBuf),
    /// A non-fatal message for the footer
    Notify(String),
    /// An unrecoverable error; replaces the normal view
    Fatal(String),
}
