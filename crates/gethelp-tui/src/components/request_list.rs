use chrono::{DateTime, Local, Utc};
use crossterm::event::{KeyCode, KeyEvent};
use gethelp_core::HelpRequest;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

/// Newest-first list of request cards with a cursor.
pub struct RequestList {
    requests: Vec<HelpRequest>,
    list_state: ListState,
}

impl RequestList {
    pub fn new(requests: Vec<HelpRequest>) -> Self {
        let mut list_state = ListState::default();
        if !requests.is_empty() {
            list_state.select(Some(0));
        }
        Self {
            requests,
            list_state,
        }
    }

    pub fn requests(&self) -> &[HelpRequest] {
        &self.requests
    }

    pub fn selected(&self) -> Option<&HelpRequest> {
        self.requests.get(self.list_state.selected()?)
    }

    /// Swap in a freshly fetched list, keeping the cursor on the same
    /// request when it is still present.
    pub fn replace(&mut self, requests: Vec<HelpRequest>) {
        let selected_id = self.selected().map(|r| r.id.clone());
        *self = Self::new(requests);
        if let Some(id) = selected_id {
            if let Some(idx) = self.requests.iter().position(|r| r.id == id) {
                self.list_state.select(Some(idx));
            }
        }
    }

    pub fn clear(&mut self) {
        *self = Self::new(Vec::new());
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.requests.is_empty() {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0);
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if current + 1 < self.requests.len() {
                    self.list_state.select(Some(current + 1));
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if current > 0 {
                    self.list_state.select(Some(current - 1));
                }
            }
            KeyCode::Char('g') => self.list_state.select(Some(0)),
            KeyCode::Char('G') => self.list_state.select(Some(self.requests.len() - 1)),
            _ => {}
        }
    }

    /// Draw the cards. `resolve_url` turns a stored `/uploads/...` path into
    /// an absolute URL on the API origin.
    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        loading: bool,
        resolve_url: impl Fn(&str) -> String,
    ) {
        let block = Block::default()
            .title(format!(" Requests ({}) ", self.requests.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        if loading || self.requests.is_empty() {
            let text = if loading {
                "Loading…"
            } else {
                "No requests yet."
            };
            let paragraph = Paragraph::new(Line::from(Span::styled(
                text,
                Style::default().fg(Color::DarkGray),
            )))
            .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let items: Vec<ListItem> = self
            .requests
            .iter()
            .map(|r| card(r, &resolve_url))
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("> ");

        let mut state = self.list_state.clone();
        frame.render_stateful_widget(list, area, &mut state);
    }
}

fn card<'a>(request: &'a HelpRequest, resolve_url: &impl Fn(&str) -> String) -> ListItem<'a> {
    let mut lines = vec![Line::from(Span::styled(
        request.title.as_str(),
        Style::default().bold().fg(Color::Yellow),
    ))];
    lines.extend(request.body.lines().map(Line::from));
    if request.has_image() {
        lines.push(Line::from(vec![
            Span::styled("Image: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                resolve_url(&request.image_url),
                Style::default().fg(Color::Cyan).underlined(),
            ),
        ]));
    }
    lines.push(Line::from(Span::styled(
        format!("Posted {}", local_timestamp(request.created_at)),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));
    ListItem::new(lines)
}

pub fn local_timestamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}
