use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::actions::Action;
use crate::project::ProjectDescriptor;

/// Top-level views, in cycling order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Projects,
    Git,
    Build,
    Tasks,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Projects, Tab::Git, Tab::Build, Tab::Tasks];

    pub fn index(self) -> usize {
        match self {
            Tab::Projects => 0,
            Tab::Git => 1,
            Tab::Build => 2,
            Tab::Tasks => 3,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Tab::Projects => "Projects",
            Tab::Git => "Git",
            Tab::Build => "Build",
            Tab::Tasks => "Tasks",
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Tab bound to the digit keys `1`..`4`
    fn from_digit(c: char) -> Option<Self> {
        let n = c.to_digit(10)? as usize;
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

/// Terminal dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
        }
    }
}

/// State owned by the Projects tab
#[derive(Debug, Clone)]
pub struct ProjectsTab {
    projects: Vec<ProjectDescriptor>,
    cursor: usize,
    selected: usize,
    loading: bool,
}

impl ProjectsTab {
    /// Starts in the loading state: the initial scan is already on its way
    pub fn new() -> Self {
        Self {
            projects: Vec::new(),
            cursor: 0,
            selected: 0,
            loading: true,
        }
    }

    pub fn projects(&self) -> &[ProjectDescriptor] {
        &self.projects
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Project under the cursor
    pub fn highlighted(&self) -> Option<&ProjectDescriptor> {
        self.projects.get(self.cursor)
    }

    fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn move_down(&mut self) {
        if self.cursor + 1 < self.projects.len() {
            self.cursor += 1;
        }
    }

    fn load(&mut self, projects: Vec<ProjectDescriptor>) {
        self.projects = projects;
        self.loading = false;
        self.cursor = 0;
        self.selected = 0;
    }
}

impl Default for ProjectsTab {
    fn default() -> Self {
        Self::new()
    }
}

/// Main application state.
///
/// Mutated one action at a time; side effects are queued as pending actions
/// for the driver instead of being run here.
pub struct App {
    active_tab: Tab,
    viewport: Viewport,
    quitting: bool,
    /// Unrecoverable error; replaces the normal view when set
    fatal_error: Option<String>,
    /// Current message to display (info or error), cleared on the next key
    pub status_message: Option<String>,
    projects: ProjectsTab,
    pending_actions: Vec<Action>,
}

impl App {
    pub fn new() -> Self {
        Self {
            active_tab: Tab::default(),
            viewport: Viewport::default(),
            quitting: false,
            fatal_error: None,
            status_message: None,
            projects: ProjectsTab::new(),
            pending_actions: Vec::new(),
        }
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    pub fn fatal_error(&self) -> Option<&str> {
        self.fatal_error.as_deref()
    }

    pub fn projects(&self) -> &ProjectsTab {
        &self.projects
    }

    /// Take pending actions (drains the queue)
    pub fn take_pending_actions(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.pending_actions)
    }

    /// Handle an action and return whether to quit
    pub fn handle_action(&mut self, action: Action) -> Result<bool> {
        if self.quitting {
            return Ok(true);
        }

        match action {
            Action::KeyPress(key) => self.handle_key(key),
            Action::Resize(width, height) => {
                self.viewport = Viewport { width, height };
            }
            Action::ProjectsLoaded(projects) => {
                debug!(count = projects.len(), "projects loaded");
                self.projects.load(projects);
            }
            Action::Notify(msg) => {
                self.status_message = Some(msg);
            }
            Action::Fatal(msg) => {
                self.fatal_error = Some(msg);
            }
            Action::RefreshProjects | Action::ProjectSelected(_) | Action::CopyPath(_) => {}
        }

        Ok(self.quitting)
    }

    fn handle_key(&mut self, key: KeyEvent) {
        // Clear status message on any key press
        self.status_message = None;

        let is_ctrl_c =
            key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
        if is_ctrl_c || key.code == KeyCode::Char('q') {
            self.quitting = true;
            return;
        }

        if self.fatal_error.is_some() {
            return;
        }

        match key.code {
            KeyCode::Tab | KeyCode::Char('l') => self.active_tab = self.active_tab.next(),
            KeyCode::BackTab | KeyCode::Char('h') => self.active_tab = self.active_tab.previous(),
            KeyCode::Char(c @ '1'..='4') => {
                if let Some(tab) = Tab::from_digit(c) {
                    self.active_tab = tab;
                }
            }
            _ if self.active_tab == Tab::Projects => self.handle_projects_key(key),
            _ => {}
        }
    }

    fn handle_projects_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('k') | KeyCode::Up => self.projects.move_up(),
            KeyCode::Char('j') | KeyCode::Down => self.projects.move_down(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.projects.selected = self.projects.cursor;
                if let Some(project) = self.projects.highlighted() {
                    self.pending_actions
                        .push(Action::ProjectSelected(project.clone()));
                }
            }
            KeyCode::Char('r') => {
                if self.projects.loading {
                    debug!("refresh ignored, scan already in flight");
                    return;
                }
                self.projects.loading = true;
                self.pending_actions.push(Action::RefreshProjects);
            }
            KeyCode::Char('y') => {
                if let Some(project) = self.projects.highlighted() {
                    self.pending_actions
                        .push(Action::CopyPath(project.path.clone()));
                }
            }
            _ => {}
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
