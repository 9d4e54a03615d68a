use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use gethelp_core::{CreateHelpRequest, HelpRequest, ImageUpload};
use gethelp_service::BlockingHttpService;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::components::request_list::RequestList;

/// What the app is currently doing
#[derive(Debug, Clone)]
pub enum Mode {
    /// Browsing the request list
    Normal,
    /// Filling in a new request
    Form(RequestForm),
}

/// Whether the list shows fetched data yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListView {
    Loading,
    Loaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Body,
    ImagePath,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            FormField::Title => FormField::Body,
            FormField::Body => FormField::ImagePath,
            FormField::ImagePath => FormField::Title,
        }
    }

    fn prev(self) -> Self {
        match self {
            FormField::Title => FormField::ImagePath,
            FormField::Body => FormField::Title,
            FormField::ImagePath => FormField::Body,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RequestForm {
    pub title: String,
    pub body: String,
    /// Local file to attach. Empty means no image.
    pub image_path: String,
    pub focus: FormField,
    pub submitting: bool,
}

impl RequestForm {
    fn new() -> Self {
        Self {
            title: String::new(),
            body: String::new(),
            image_path: String::new(),
            focus: FormField::Title,
            submitting: false,
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Title => &mut self.title,
            FormField::Body => &mut self.body,
            FormField::ImagePath => &mut self.image_path,
        }
    }
}

/// Network work requested by a key press. The event loop redraws first so
/// the loading or submitting state is visible, then calls
/// [`App::process_pending`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    Refresh,
    Submit,
}

pub struct App {
    service: BlockingHttpService,
    list: RequestList,
    view: ListView,
    mode: Mode,
    status_message: Option<String>,
    pending: Option<PendingAction>,
}

impl App {
    /// Starts in `Loading` with a refresh queued.
    pub fn new(service: BlockingHttpService) -> Self {
        Self {
            service,
            list: RequestList::new(Vec::new()),
            view: ListView::Loading,
            mode: Mode::Normal,
            status_message: None,
            pending: Some(PendingAction::Refresh),
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn view(&self) -> ListView {
        self.view
    }

    pub fn requests(&self) -> &[HelpRequest] {
        self.list.requests()
    }

    pub fn selected(&self) -> Option<&HelpRequest> {
        self.list.selected()
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_input_mode(&self) -> bool {
        matches!(self.mode, Mode::Form(_))
    }

    fn request_refresh(&mut self) {
        self.view = ListView::Loading;
        self.pending = Some(PendingAction::Refresh);
    }

    /// Run the queued network action, if any.
    pub fn process_pending(&mut self) {
        match self.pending.take() {
            Some(PendingAction::Refresh) => self.refresh(),
            Some(PendingAction::Submit) => self.submit(),
            None => {}
        }
    }

    fn refresh(&mut self) {
        match self.service.list_requests() {
            Ok(requests) => self.list.replace(requests),
            Err(e) => {
                self.list.clear();
                self.status_message = Some(format!("Error: {e}"));
            }
        }
        self.view = ListView::Loaded;
    }

    fn submit(&mut self) {
        let Mode::Form(mut form) = self.mode.clone() else {
            return;
        };

        let result = read_image(&form.image_path).and_then(|image| {
            let input = CreateHelpRequest {
                title: form.title.clone(),
                body: form.body.clone(),
            };
            self.service
                .create_request(&input, image)
                .map_err(|e| e.to_string())
        });

        match result {
            Ok(created) => {
                self.mode = Mode::Normal;
                self.status_message = Some(format!("Posted: {}", created.title));
                self.request_refresh();
            }
            Err(e) => {
                form.submitting = false;
                self.mode = Mode::Form(form);
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.status_message = None;

        match &self.mode.clone() {
            Mode::Normal => self.handle_normal(key),
            Mode::Form(form) => self.handle_form(key, form.clone()),
        }
    }

    fn handle_normal(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('n') => self.mode = Mode::Form(RequestForm::new()),
            KeyCode::Char('r') => self.request_refresh(),
            _ => self.list.handle_key(key),
        }
    }

    fn handle_form(&mut self, key: KeyEvent, mut form: RequestForm) {
        if form.submitting {
            return;
        }
        match key.code {
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Tab => {
                form.focus = form.focus.next();
                self.mode = Mode::Form(form);
            }
            KeyCode::BackTab => {
                form.focus = form.focus.prev();
                self.mode = Mode::Form(form);
            }
            // Alt+Enter or Ctrl+J breaks the body onto a new line.
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
                if form.focus == FormField::Body {
                    form.body.push('\n');
                }
                self.mode = Mode::Form(form);
            }
            KeyCode::Char('j') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if form.focus == FormField::Body {
                    form.body.push('\n');
                }
                self.mode = Mode::Form(form);
            }
            KeyCode::Enter => {
                if form.title.is_empty() || form.body.is_empty() {
                    self.status_message = Some("Title and body are required".into());
                } else {
                    form.submitting = true;
                    self.pending = Some(PendingAction::Submit);
                }
                self.mode = Mode::Form(form);
            }
            KeyCode::Backspace => {
                form.focused_mut().pop();
                self.mode = Mode::Form(form);
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                form.focused_mut().push(c);
                self.mode = Mode::Form(form);
            }
            _ => {}
        }
    }

    // -- Rendering --

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_title_bar(frame, layout[0]);
        self.list.render(
            frame,
            layout[1],
            self.view == ListView::Loading,
            |path| self.service.resolve_url(path),
        );
        self.render_status_bar(frame, layout[2]);

        if let Mode::Form(form) = &self.mode {
            self.render_form(frame, form, area);
        }
    }

    fn render_title_bar(&self, frame: &mut Frame, area: Rect) {
        let title = Line::from(vec![
            Span::styled(" gethelp ", Style::default().bold().fg(Color::Cyan)),
            Span::raw("| "),
            Span::styled(self.service.base_url(), Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(title, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        if let Some(ref msg) = self.status_message {
            let color = if msg.starts_with("Error") {
                Color::Red
            } else {
                Color::Green
            };
            let line = Line::from(Span::styled(format!(" {msg}"), Style::default().fg(color)));
            frame.render_widget(line, area);
            return;
        }

        let hints = match &self.mode {
            Mode::Normal => vec![
                ("q", "quit"),
                ("j/k", "scroll"),
                ("n", "new request"),
                ("r", "refresh"),
            ],
            Mode::Form(form) if form.submitting => vec![],
            Mode::Form(form) if form.focus == FormField::Body => vec![
                ("Tab", "next field"),
                ("Alt+Enter", "new line"),
                ("Enter", "submit"),
                ("Esc", "cancel"),
            ],
            Mode::Form(_) => vec![
                ("Tab", "next field"),
                ("Enter", "submit"),
                ("Esc", "cancel"),
            ],
        };

        let spans: Vec<Span> = hints
            .into_iter()
            .flat_map(|(key, desc)| {
                vec![
                    Span::styled(format!(" {key}"), Style::default().fg(Color::Yellow).bold()),
                    Span::raw(format!(" {desc} ")),
                ]
            })
            .collect();

        frame.render_widget(Line::from(spans), area);
    }

    fn render_form(&self, frame: &mut Frame, form: &RequestForm, area: Rect) {
        let popup = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" New Request ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta));

        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let label_style = |field: FormField| {
            if form.focus == field {
                Style::default().fg(Color::Cyan).bold()
            } else {
                Style::default()
            }
        };

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Title: ", label_style(FormField::Title)),
                Span::raw(form.title.as_str()),
            ]),
            Line::from(""),
        ];
        let mut body_lines = form.body.split('\n');
        lines.push(Line::from(vec![
            Span::styled("Body:  ", label_style(FormField::Body)),
            Span::raw(body_lines.next().unwrap_or_default()),
        ]));
        lines.extend(body_lines.map(|l| Line::from(format!("       {l}"))));
        lines.extend([
            Line::from(""),
            Line::from(vec![
                Span::styled("Image: ", label_style(FormField::ImagePath)),
                Span::raw(form.image_path.as_str()),
                Span::styled(
                    if form.image_path.is_empty() { "(optional file path)" } else { "" },
                    Style::default().fg(Color::DarkGray),
                ),
            ]),
        ]);
        if form.submitting {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Submitting…",
                Style::default().fg(Color::Yellow),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, inner);
    }
}

/// Load the file at `path` for upload. An empty path means no image.
fn read_image(path: &str) -> Result<Option<ImageUpload>, String> {
    if path.is_empty() {
        return Ok(None);
    }
    let data = std::fs::read(path).map_err(|e| format!("cannot read {path}: {e}"))?;
    let original_name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Some(ImageUpload {
        original_name,
        content_type: None,
        data,
    }))
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
