use chrono::{DateTime, Local};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};
use std::time::SystemTime;

use crate::app::{App, ProjectsTab, Tab};
use crate::project::ProjectDescriptor;

/// Narrower terminals show the project list without the detail pane
const MIN_DETAIL_WIDTH: u16 = 80;

/// Theme colors
pub struct Theme {
    pub fg: Color,
    pub accent: Color,
    pub secondary: Color,
    pub dim: Color,
    pub border: Color,
    pub highlight_bg: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: Color::Rgb(205, 214, 244),
            accent: Color::Rgb(0, 255, 200),
            secondary: Color::Rgb(180, 120, 255),
            dim: Color::Rgb(127, 132, 152),
            border: Color::Rgb(69, 71, 90),
            highlight_bg: Color::Rgb(49, 50, 68),
            success: Color::Rgb(80, 250, 123),
            warning: Color::Rgb(255, 184, 108),
            error: Color::Rgb(255, 85, 85),
        }
    }
}

/// Renders the application state; never mutates it
pub struct Ui {
    theme: Theme,
}

impl Ui {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    pub fn render(&self, app: &App, frame: &mut Frame) {
        if let Some(err) = app.fatal_error() {
            let error = Paragraph::new(Line::from(Span::styled(
                format!("Error: {}", err),
                Style::default()
                    .fg(self.theme.error)
                    .add_modifier(Modifier::BOLD),
            )))
            .wrap(Wrap { trim: false })
            .block(self.block(" DevFlow "));
            frame.render_widget(error, frame.area());
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(3), // Tabs
                Constraint::Min(0),    // Main content
                Constraint::Length(3), // Footer/status
            ])
            .split(frame.area());

        self.render_header(frame, chunks[0]);
        self.render_tabs(app, frame, chunks[1]);
        match app.active_tab() {
            Tab::Projects => self.render_projects(app, frame, chunks[2]),
            tab => self.render_placeholder(tab, frame, chunks[2]),
        }
        self.render_footer(app, frame, chunks[3]);
    }

    fn block<'a>(&self, title: &'a str) -> Block<'a> {
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border))
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                " DevFlow ",
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("│ Local project dashboard", Style::default().fg(self.theme.dim)),
        ]))
        .block(self.block(""));
        frame.render_widget(title, area);
    }

    fn render_tabs(&self, app: &App, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = Tab::ALL
            .iter()
            .enumerate()
            .map(|(i, tab)| Line::from(format!("[{}] {}", i + 1, tab.title())))
            .collect();

        let tabs = Tabs::new(titles)
            .select(app.active_tab().index())
            .style(Style::default().fg(self.theme.dim))
            .highlight_style(
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )
            .block(self.block(""));
        frame.render_widget(tabs, area);
    }

    fn render_projects(&self, app: &App, frame: &mut Frame, area: Rect) {
        let state = app.projects();
        if state.is_loading() {
            let loading = Paragraph::new(Line::from(Span::styled(
                "Scanning for projects...",
                Style::default()
                    .fg(self.theme.warning)
                    .add_modifier(Modifier::ITALIC),
            )))
            .block(self.block(" Projects "));
            frame.render_widget(loading, area);
            return;
        }

        if state.projects().is_empty() {
            let style = Style::default()
                .fg(self.theme.dim)
                .add_modifier(Modifier::ITALIC);
            let empty = Paragraph::new(vec![
                Line::from(Span::styled("No projects found.", style)),
                Line::from(""),
                Line::from(Span::styled("Press 'r' to scan again.", style)),
            ])
            .block(self.block(" Projects "));
            frame.render_widget(empty, area);
            return;
        }

        if app.viewport().width < MIN_DETAIL_WIDTH {
            self.render_project_list(state, frame, area);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(50), // Project list
                Constraint::Percentage(50), // Detail pane
            ])
            .split(area);

        self.render_project_list(state, frame, chunks[0]);
        self.render_detail_pane(state.highlighted(), frame, chunks[1]);
    }

    fn render_project_list(&self, state: &ProjectsTab, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = state
            .projects()
            .iter()
            .enumerate()
            .map(|(i, project)| {
                let name_style = if i == state.selected() {
                    Style::default()
                        .fg(self.theme.secondary)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(self.theme.fg)
                };

                ListItem::new(Line::from(vec![
                    Span::styled(&project.name, name_style),
                    Span::styled(
                        format!(
                            "  {} • {} • {}",
                            project.project_type.icon(),
                            project.project_type.label(),
                            project.status.label()
                        ),
                        Style::default()
                            .fg(self.theme.dim)
                            .add_modifier(Modifier::ITALIC),
                    ),
                ]))
            })
            .collect();

        let title = format!(" Projects ({}) ", state.projects().len());
        let list = List::new(items)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.border)),
            )
            .highlight_style(
                Style::default()
                    .bg(self.theme.highlight_bg)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("❯ ");

        let mut list_state = ListState::default().with_selected(Some(state.cursor()));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_detail_pane(
        &self,
        project: Option<&ProjectDescriptor>,
        frame: &mut Frame,
        area: Rect,
    ) {
        let Some(project) = project else {
            return;
        };

        let field = |label: &'static str, value: String| {
            Line::from(vec![
                Span::styled(label, Style::default().fg(self.theme.dim)),
                Span::styled(value, Style::default().fg(self.theme.fg)),
            ])
        };

        let content = vec![
            field("Name: ", project.name.clone()),
            field("Path: ", project.path.display().to_string()),
            field(
                "Type: ",
                format!(
                    "{} {}",
                    project.project_type.icon(),
                    project.project_type.label()
                ),
            ),
            field("Status: ", project.status.label().to_string()),
            field(
                "Git: ",
                if project.git_present { "yes" } else { "no" }.to_string(),
            ),
            field("Files: ", project.file_count.to_string()),
            field("Modified: ", format_modified(project.modified_at)),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter to select, 'y' to copy the path",
                Style::default().fg(self.theme.dim),
            )),
        ];

        let detail = Paragraph::new(content)
            .wrap(Wrap { trim: false })
            .block(self.block(" Details "));
        frame.render_widget(detail, area);
    }

    fn render_placeholder(&self, tab: Tab, frame: &mut Frame, area: Rect) {
        let text = match tab {
            Tab::Git => "Coming soon: git status and operations",
            Tab::Build => "Coming soon: build monitoring",
            Tab::Tasks => "Coming soon: task management",
            Tab::Projects => "",
        };
        let title = format!(" {} ", tab.title());
        let placeholder = Paragraph::new(Line::from(Span::styled(
            text,
            Style::default().fg(self.theme.dim),
        )))
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.border)),
        );
        frame.render_widget(placeholder, area);
    }

    fn render_footer(&self, app: &App, frame: &mut Frame, area: Rect) {
        let help_text = match app.active_tab() {
            Tab::Projects => {
                " q: Quit │ Tab/1-4: Switch │ j/k: Navigate │ Enter: Select │ r: Refresh │ y: Copy path "
            }
            _ => " q: Quit │ Tab/1-4: Switch ",
        };

        let content = if let Some(ref msg) = app.status_message {
            let style = if msg.starts_with("Failed") {
                Style::default().fg(self.theme.error)
            } else {
                Style::default().fg(self.theme.success)
            };
            Line::from(Span::styled(format!(" {} ", msg), style))
        } else {
            Line::from(Span::styled(help_text, Style::default().fg(self.theme.dim)))
        };

        let footer = Paragraph::new(content).block(self.block(""));
        frame.render_widget(footer, area);
    }
}

impl Default for Ui {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

/// Local time, or "unknown" when the mtime could not be read
fn format_modified(modified_at: SystemTime) -> String {
    if modified_at == SystemTime::UNIX_EPOCH {
        return "unknown".to_string();
    }
    DateTime::<Local>::from(modified_at)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}
