use crate::calendar::{iso_date, month_title, CalendarCursor, WEEKDAY_LABELS};
use crate::dialog::{DialogOutcome, FieldValue, NoteDialog};
use crate::model::{NoteId, NoteStore};
use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Alignment, Color, Modifier, Rect, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph};
use ratatui::Terminal;
use std::io::{stdout, Stdout};
use std::time::Duration;
use tracing::{debug, info, warn};

pub fn run(store: NoteStore, start: NaiveDate, today: NaiveDate) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let mut app = App::new(store, start, today);
    let result = app.event_loop(&mut terminal);
    teardown_terminal(&mut terminal)?;
    result
}

/// Root view. Sole owner of the note store; every mutation goes through
/// the store's command methods from here.
struct App {
    store: NoteStore,
    cursor: CalendarCursor,
    today: NaiveDate,
    status: String,
    mode: Mode,
}

enum Mode {
    Normal,
    Adding { date: NaiveDate, dialog: NoteDialog },
    Editing { note_id: NoteId, dialog: NoteDialog },
    Selecting { date: NaiveDate, selected: usize },
    Year(FieldValue),
}

impl App {
    fn new(store: NoteStore, start: NaiveDate, today: NaiveDate) -> Self {
        App {
            store,
            cursor: CalendarCursor::new(start),
            today,
            status: "Ready".into(),
            mode: Mode::Normal,
        }
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;
            if event::poll(Duration::from_millis(200))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key) {
                        break;
                    }
                }
            }
        }
        info!(notes = self.store.len(), "quitting");
        Ok(())
    }

    /// Returns true when the app should quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.mode {
            Mode::Normal => return self.handle_normal_key(key),
            Mode::Adding { .. } | Mode::Editing { .. } => self.handle_dialog_key(key),
            Mode::Selecting { .. } => self.handle_select_key(key),
            Mode::Year(_) => self.handle_year_key(key),
        }
        false
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Left | KeyCode::Char('h') => self.cursor.shift_days(-1),
            KeyCode::Right | KeyCode::Char('l') => self.cursor.shift_days(1),
            KeyCode::Up | KeyCode::Char('k') => self.cursor.shift_days(-7),
            KeyCode::Down | KeyCode::Char('j') => self.cursor.shift_days(7),
            KeyCode::Char('n') | KeyCode::PageDown => self.shift_month(1),
            KeyCode::Char('p') | KeyCode::PageUp => self.shift_month(-1),
            KeyCode::Char('t') => {
                self.cursor.jump_to(self.today);
                self.status = format!("Today is {}", iso_date(self.today));
            }
            KeyCode::Char('y') => {
                self.mode = Mode::Year(FieldValue::new(&self.cursor.year().to_string()));
                self.status = "Type a year (Enter/Esc to close)".into();
            }
            KeyCode::Char('a') | KeyCode::Char('+') => self.begin_add(),
            KeyCode::Char('e') | KeyCode::Enter => self.begin_edit(),
            _ => {}
        }
        false
    }

    fn handle_dialog_key(&mut self, key: KeyEvent) {
        let mut mode = std::mem::replace(&mut self.mode, Mode::Normal);
        let close = match &mut mode {
            Mode::Adding { date, dialog } => match dialog.handle_key(key) {
                DialogOutcome::Pending | DialogOutcome::Delete => false,
                DialogOutcome::Cancel => {
                    self.status = "Canceled".into();
                    true
                }
                DialogOutcome::Save(title) => {
                    self.add_note(*date, title);
                    true
                }
            },
            Mode::Editing { note_id, dialog } => match dialog.handle_key(key) {
                DialogOutcome::Pending => false,
                DialogOutcome::Cancel => {
                    self.status = "Canceled".into();
                    true
                }
                DialogOutcome::Save(title) => {
                    self.edit_note(note_id, title);
                    true
                }
                DialogOutcome::Delete => {
                    self.delete_note(note_id);
                    true
                }
            },
            _ => true,
        };
        self.mode = if close { Mode::Normal } else { mode };
    }

    fn handle_select_key(&mut self, key: KeyEvent) {
        let (date, selected) = match &self.mode {
            Mode::Selecting { date, selected } => (*date, *selected),
            _ => return,
        };
        let count = self.store.count_on(date);
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.status = "Canceled".into();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.mode = Mode::Selecting {
                    date,
                    selected: selected.saturating_sub(1),
                };
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.mode = Mode::Selecting {
                    date,
                    selected: (selected + 1).min(count.saturating_sub(1)),
                };
            }
            KeyCode::Enter => self.open_editor(date, selected),
            KeyCode::Char(c) => {
                if let Some(idx) = c.to_digit(10).and_then(|d| (d as usize).checked_sub(1)) {
                    if idx < count {
                        self.open_editor(date, idx);
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_year_key(&mut self, key: KeyEvent) {
        let mut mode = std::mem::replace(&mut self.mode, Mode::Normal);
        let close = match &mut mode {
            Mode::Year(field) => match key.code {
                KeyCode::Esc | KeyCode::Enter => true,
                code => {
                    if field.apply(code, key.modifiers) {
                        self.apply_year_input(&field.value);
                    }
                    false
                }
            },
            _ => true,
        };
        if close {
            self.status = format!("Showing {}", month_title(self.cursor.date()));
        }
        self.mode = if close { Mode::Normal } else { mode };
    }

    fn shift_month(&mut self, delta: i32) {
        self.cursor.shift_month(delta);
        debug!(date = %self.cursor.date(), "month changed");
        self.status = format!("Showing {}", month_title(self.cursor.date()));
    }

    fn apply_year_input(&mut self, input: &str) {
        match self.cursor.set_year_input(input) {
            Ok(year) => debug!(year, "year changed"),
            Err(err) => debug!(%err, "ignoring year input"),
        }
    }

    fn begin_add(&mut self) {
        let date = self.cursor.date();
        if !self.store.has_room(date) {
            self.status = format!(
                "{} already has {} notes",
                iso_date(date),
                self.store.capacity()
            );
            return;
        }
        let dialog = NoteDialog::new(format!("Add Note for {}", iso_date(date)), "", false);
        self.mode = Mode::Adding { date, dialog };
        self.status = "Adding note (Enter save, Esc cancel)".into();
    }

    fn begin_edit(&mut self) {
        let date = self.cursor.date();
        match self.store.count_on(date) {
            0 => self.status = format!("No notes on {}", iso_date(date)),
            1 => self.open_editor(date, 0),
            count => {
                self.mode = Mode::Selecting { date, selected: 0 };
                self.status = format!("{} notes on {}: pick one to edit", count, iso_date(date));
            }
        }
    }

    fn open_editor(&mut self, date: NaiveDate, index: usize) {
        let Some(note) = self.store.note_at(date, index) else {
            self.mode = Mode::Normal;
            return;
        };
        let dialog = NoteDialog::new(format!("Edit Note for {}", iso_date(date)), &note.title, true);
        self.mode = Mode::Editing {
            note_id: note.id.clone(),
            dialog,
        };
        self.status = "Editing note (Enter save, Ctrl+D delete, Esc cancel)".into();
    }

    fn add_note(&mut self, date: NaiveDate, title: String) {
        match self.store.add_note(date, title) {
            Ok(id) => {
                info!(%date, %id, "note added");
                self.status = format!("Added note to {}", iso_date(date));
            }
            Err(err) => {
                warn!(%err, "add rejected");
                self.status = format!("Could not add: {}", err);
            }
        }
    }

    fn edit_note(&mut self, id: &str, title: String) {
        match self.store.edit_note(id, title) {
            Ok(()) => {
                info!(%id, "note edited");
                self.status = "Note updated".into();
            }
            Err(err) => {
                warn!(%err, "edit rejected");
                self.status = format!("Could not edit: {}", err);
            }
        }
    }

    fn delete_note(&mut self, id: &str) {
        match self.store.delete_note(id) {
            Ok(note) => {
                info!(date = %note.date, %id, "note deleted");
                self.status = format!("Deleted \"{}\"", note.title);
            }
            Err(err) => {
                warn!(%err, "delete rejected");
                self.status = format!("Could not delete: {}", err);
            }
        }
    }

    fn draw(&self, f: &mut ratatui::Frame<'_>) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(8),
                Constraint::Length(3),
            ])
            .split(f.size());

        self.draw_header(f, layout[0]);
        self.draw_grid(f, layout[1]);
        self.draw_footer(f, layout[2]);

        match &self.mode {
            Mode::Adding { dialog, .. } | Mode::Editing { dialog, .. } => {
                self.draw_dialog(f, dialog)
            }
            Mode::Selecting { date, selected } => self.draw_select(f, *date, *selected),
            Mode::Normal | Mode::Year(_) => {}
        }
    }

    fn draw_header(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let month = self.cursor.date().format("%B").to_string();
        let year = match &self.mode {
            Mode::Year(field) => Span::styled(
                field.with_caret(),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            _ => Span::styled(
                self.cursor.year().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        };
        let title = Line::from(vec![
            Span::styled(
                "calnotes ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("◀ ", Style::default().fg(Color::Blue)),
            Span::styled(month + " ", Style::default().add_modifier(Modifier::BOLD)),
            year,
            Span::styled(" ▶", Style::default().fg(Color::Blue)),
            Span::raw("  •  "),
            Span::styled(
                match self.store.len() {
                    1 => "1 note".to_string(),
                    n => format!("{} notes", n),
                },
                Style::default().fg(Color::Magenta),
            ),
            Span::raw("  •  "),
            Span::styled(
                format!("today {}", iso_date(self.today)),
                Style::default().fg(Color::Green),
            ),
        ]);
        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray));
        let paragraph = Paragraph::new(title)
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(paragraph, area);
    }

    fn draw_grid(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let days = self.cursor.days();
        let weeks = (days.len() / 7).max(1);
        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);

        let heading = week_columns(sections[0]);
        for (idx, label) in WEEKDAY_LABELS.iter().enumerate() {
            let paragraph = Paragraph::new(Span::styled(
                *label,
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center);
            f.render_widget(paragraph, heading[idx]);
        }

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Ratio(1, weeks as u32); weeks])
            .split(sections[1]);
        for (week, row) in days.chunks(7).zip(rows.iter()) {
            let cells = week_columns(*row);
            for (date, cell) in week.iter().zip(cells.iter()) {
                self.draw_day(f, *cell, *date);
            }
        }
    }

    fn draw_day(&self, f: &mut ratatui::Frame<'_>, area: Rect, date: NaiveDate) {
        let in_month = self.cursor.in_month(date);
        let selected = date == self.cursor.date();
        let notes = self.store.notes_on(date);

        let mut title = vec![Span::styled(
            format!("{:>2}", date.day()),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if in_month {
            if !notes.is_empty() {
                title.push(Span::styled(" ✎", Style::default().fg(Color::Yellow)));
            }
            if self.store.has_room(date) {
                title.push(Span::styled(" +", Style::default().fg(Color::LightGreen)));
            }
        }

        let mut style = Style::default().fg(if in_month {
            Color::White
        } else {
            Color::DarkGray
        });
        if date == self.today {
            style = style.bg(Color::Green).fg(Color::White);
        }
        let border_style = if selected {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let lines: Vec<Line<'static>> = notes
            .iter()
            .map(|note| Line::from(note.title.clone()))
            .collect();
        let block = Block::default()
            .title(Line::from(title))
            .borders(Borders::ALL)
            .border_type(if selected {
                BorderType::Thick
            } else {
                BorderType::Plain
            })
            .border_style(border_style)
            .style(style);
        f.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn draw_footer(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Length(1)])
            .split(area);

        let help_bar = Paragraph::new(self.footer_help_line())
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        f.render_widget(help_bar, rows[0]);
        f.render_widget(
            Paragraph::new(Span::styled(
                self.status.clone(),
                Style::default().fg(Color::Gray),
            )),
            rows[1],
        );
    }

    fn footer_help_line(&self) -> Line<'static> {
        let key = |k: &'static str, color: Color| Span::styled(k, Style::default().fg(color));
        let spans = match self.mode {
            Mode::Normal => vec![
                key("←↑↓→ / h j k l", Color::LightCyan),
                Span::raw(" day  "),
                key("n/p", Color::LightCyan),
                Span::raw(" month  "),
                key("y", Color::LightCyan),
                Span::raw(" year  "),
                key("t", Color::LightCyan),
                Span::raw(" today  "),
                key("a", Color::LightMagenta),
                Span::raw(" add  "),
                key("e", Color::LightYellow),
                Span::raw(" edit  "),
                key("q", Color::LightRed),
                Span::raw(" quit"),
            ],
            Mode::Adding { .. } => vec![
                key("Enter", Color::LightGreen),
                Span::raw(" save  "),
                key("Esc", Color::LightRed),
                Span::raw(" cancel"),
            ],
            Mode::Editing { .. } => vec![
                key("Enter", Color::LightGreen),
                Span::raw(" save  "),
                key("Ctrl+D", Color::LightRed),
                Span::raw(" delete  "),
                key("Esc", Color::LightRed),
                Span::raw(" cancel"),
            ],
            Mode::Selecting { .. } => vec![
                key("↑↓", Color::LightCyan),
                Span::raw(" choose  "),
                key("Enter / 1-9", Color::LightGreen),
                Span::raw(" edit  "),
                key("Esc", Color::LightRed),
                Span::raw(" cancel"),
            ],
            Mode::Year(_) => vec![
                key("0-9", Color::LightCyan),
                Span::raw(" year  "),
                key("Enter/Esc", Color::LightGreen),
                Span::raw(" done"),
            ],
        };
        Line::from(spans)
    }

    fn draw_dialog(&self, f: &mut ratatui::Frame<'_>, dialog: &NoteDialog) {
        let area = centered_rect(60, 30, f.size());
        let mut hint = String::from("Enter to save • Esc to cancel");
        if dialog.allows_delete() {
            hint.push_str(" • Ctrl+D to delete");
        }
        let body = vec![
            Line::from(vec![
                Span::styled(
                    "Title: ",
                    Style::default()
                        .fg(Color::Gray)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(dialog.draft().with_caret(), Style::default().fg(Color::Cyan)),
            ]),
            Line::from(""),
            Line::from(Span::styled(hint, Style::default().fg(Color::Gray))),
        ];
        let paragraph = Paragraph::new(body).block(
            Block::default()
                .title(Span::styled(
                    dialog.heading().to_string(),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
        f.render_widget(Clear, area);
        f.render_widget(paragraph, area);
    }

    fn draw_select(&self, f: &mut ratatui::Frame<'_>, date: NaiveDate, selected: usize) {
        let area = centered_rect(50, 40, f.size());
        let items: Vec<ListItem<'static>> = self
            .store
            .notes_on(date)
            .iter()
            .enumerate()
            .map(|(idx, note)| ListItem::new(format!("{}. {}", idx + 1, note.title)))
            .collect();
        let mut state = ListState::default();
        state.select(Some(selected));
        let list = List::new(items)
            .block(
                Block::default()
                    .title(Span::styled(
                        format!("Select a Note to Edit ({})", iso_date(date)),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::LightCyan)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            );
        f.render_widget(Clear, area);
        f.render_stateful_widget(list, area, &mut state);
    }
}

fn week_columns(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 7); 7])
        .split(area)
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ratatui::backend::TestBackend;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn app() -> App {
        App::new(NoteStore::default(), day(2024, 6, 15), day(2024, 6, 15))
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    fn titles(app: &App, date: NaiveDate) -> Vec<String> {
        app.store
            .notes_on(date)
            .into_iter()
            .map(|n| n.title.clone())
            .collect()
    }

    fn render(app: &App) -> String {
        let backend = TestBackend::new(100, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        let buf = terminal.backend().buffer().clone();
        let width = buf.area.width as usize;
        buf.content
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn add_flow_commits_the_draft() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        assert!(matches!(app.mode, Mode::Adding { .. }));

        type_text(&mut app, "Dentist");
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(titles(&app, day(2024, 6, 15)), vec!["Dentist"]);
    }

    #[test]
    fn cancel_discards_the_draft() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "never");
        press(&mut app, KeyCode::Esc);

        assert!(matches!(app.mode, Mode::Normal));
        assert!(app.store.is_empty());
        assert_eq!(app.status, "Canceled");
    }

    #[test]
    fn add_is_unavailable_on_a_full_day() {
        let mut app = app();
        let date = day(2024, 6, 15);
        for title in ["a", "b", "c"] {
            app.store.add_note(date, title).unwrap();
        }

        press(&mut app, KeyCode::Char('a'));

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.status, "2024-06-15 already has 3 notes");
        assert_eq!(app.store.count_on(date), 3);
    }

    #[test]
    fn edit_with_one_note_opens_editor_directly() {
        let mut app = app();
        app.store.add_note(day(2024, 6, 15), "Dentist").unwrap();

        press(&mut app, KeyCode::Char('e'));

        match &app.mode {
            Mode::Editing { dialog, .. } => {
                assert_eq!(dialog.draft().value, "Dentist");
                assert!(dialog.allows_delete());
            }
            _ => panic!("expected editor"),
        }
        press(&mut app, KeyCode::Char('!'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(titles(&app, day(2024, 6, 15)), vec!["Dentist!"]);
    }

    #[test]
    fn edit_with_no_notes_stays_idle() {
        let mut app = app();
        press(&mut app, KeyCode::Char('e'));
        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.status, "No notes on 2024-06-15");
    }

    #[test]
    fn edit_with_many_notes_selects_first() {
        let mut app = app();
        let date = day(2024, 6, 15);
        app.store.add_note(date, "one").unwrap();
        app.store.add_note(date, "two").unwrap();
        app.store.add_note(date, "three").unwrap();

        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.mode, Mode::Selecting { selected: 0, .. }));

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert!(matches!(app.mode, Mode::Selecting { selected: 2, .. }));
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Enter);

        match &app.mode {
            Mode::Editing { dialog, .. } => assert_eq!(dialog.draft().value, "two"),
            _ => panic!("expected editor"),
        }
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        type_text(&mut app, "2");
        press(&mut app, KeyCode::Enter);

        assert_eq!(titles(&app, date), vec!["one", "2", "three"]);
    }

    #[test]
    fn digit_picks_note_from_selection() {
        let mut app = app();
        let date = day(2024, 6, 15);
        app.store.add_note(date, "one").unwrap();
        app.store.add_note(date, "two").unwrap();

        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Char('9'));
        assert!(matches!(app.mode, Mode::Selecting { .. }));
        press(&mut app, KeyCode::Char('2'));

        match &app.mode {
            Mode::Editing { dialog, .. } => assert_eq!(dialog.draft().value, "two"),
            _ => panic!("expected editor"),
        }
    }

    #[test]
    fn escape_leaves_selection() {
        let mut app = app();
        let date = day(2024, 6, 15);
        app.store.add_note(date, "one").unwrap();
        app.store.add_note(date, "two").unwrap();

        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Esc);

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(titles(&app, date), vec!["one", "two"]);
    }

    #[test]
    fn delete_from_editor_drops_empty_day() {
        let mut app = app();
        let date = day(2024, 6, 15);
        app.store.add_note(date, "Dentist").unwrap();

        press(&mut app, KeyCode::Char('e'));
        app.handle_key(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL));

        assert!(matches!(app.mode, Mode::Normal));
        assert!(!app.store.contains_date(date));
        assert_eq!(app.status, "Deleted \"Dentist\"");
    }

    #[test]
    fn year_field_ignores_non_numeric_text() {
        let mut app = app();
        press(&mut app, KeyCode::Char('y'));
        press(&mut app, KeyCode::Home);
        type_text(&mut app, "x");
        assert_eq!(app.cursor.year(), 2024);
        press(&mut app, KeyCode::Esc);
        assert!(matches!(app.mode, Mode::Normal));

        press(&mut app, KeyCode::Char('y'));
        for _ in 0..4 {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "1999");
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.cursor.date(), day(1999, 6, 15));
    }

    #[test]
    fn navigation_moves_month_and_day() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.cursor.date(), day(2024, 7, 15));
        press(&mut app, KeyCode::PageUp);
        press(&mut app, KeyCode::Char('p'));
        assert_eq!(app.cursor.date(), day(2024, 5, 15));

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.cursor.date(), day(2024, 6, 5));
        press(&mut app, KeyCode::Left);
        assert_eq!(app.cursor.date(), day(2024, 6, 4));

        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.cursor.date(), day(2024, 6, 15));
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn keys_go_to_the_dialog_not_the_grid() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        assert!(!press(&mut app, KeyCode::Char('q')));
        type_text(&mut app, "n");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.cursor.date(), day(2024, 6, 15));
        assert_eq!(titles(&app, day(2024, 6, 15)), vec!["qn"]);
    }

    #[test]
    fn renders_month_header_and_notes() {
        let mut app = app();
        app.store.add_note(day(2024, 6, 15), "Dentist").unwrap();
        let screen = render(&app);

        assert!(screen.contains("June 2024"));
        for label in WEEKDAY_LABELS {
            assert!(screen.contains(label), "missing {label}");
        }
        assert!(screen.contains("Dentist"));
        assert!(screen.contains("1 note "));
    }

    #[test]
    fn renders_open_dialogs() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Lunch");
        let screen = render(&app);
        assert!(screen.contains("Add Note for 2024-06-15"));
        assert!(screen.contains("Lunch▌"));

        let mut app = self::app();
        let date = day(2024, 6, 15);
        app.store.add_note(date, "one").unwrap();
        app.store.add_note(date, "two").unwrap();
        press(&mut app, KeyCode::Char('e'));
        let screen = render(&app);
        assert!(screen.contains("Select a Note to Edit"));
        assert!(screen.contains("2. two"));
    }
}
