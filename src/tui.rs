use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use std::io::stdout;

use crate::form::{FieldUpdate, FormState};
use crate::models::{Field, Position, Skill, Submission};
use crate::submit::{Outcome, SubmissionHandler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Input(Field),
    Submit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Continue,
    Quit,
}

struct AppState {
    form: FormState,
    handler: SubmissionHandler,
    focus: usize,
    skill_cursor: usize,
    accepted: Option<Submission>,
    last_accepted: Option<Submission>,
}

impl AppState {
    fn new(form: FormState, handler: SubmissionHandler) -> Self {
        Self {
            form,
            handler,
            focus: 0,
            skill_cursor: 0,
            accepted: None,
            last_accepted: None,
        }
    }

    fn targets(&self) -> Vec<Target> {
        let mut targets: Vec<Target> = self
            .form
            .visible_fields()
            .into_iter()
            .map(Target::Input)
            .collect();
        targets.push(Target::Submit);
        targets
    }

    fn current(&self) -> Target {
        let targets = self.targets();
        targets[self.focus.min(targets.len() - 1)]
    }

    fn next(&mut self) {
        let len = self.targets().len();
        self.focus = (self.focus + 1) % len;
    }

    fn prev(&mut self) {
        let len = self.targets().len();
        self.focus = (self.focus + len - 1) % len;
    }

    fn focus_field(&mut self, field: Field) {
        if let Some(idx) = self.targets().iter().position(|t| *t == Target::Input(field)) {
            self.focus = idx;
        }
    }

    fn submit(&mut self) {
        match self.handler.submit(&self.form) {
            Outcome::Accepted(submission) => {
                self.last_accepted = Some(submission.clone());
                self.accepted = Some(submission);
            }
            Outcome::Rejected => {
                let first = self.handler.errors().fields().next();
                if let Some(field) = first {
                    self.focus_field(field);
                }
            }
        }
    }

    fn edit_text(&mut self, field: Field, edit: impl FnOnce(&mut String)) {
        let mut value = self.form.record().text(field).unwrap_or_default().to_string();
        edit(&mut value);
        if let Some(update) = FieldUpdate::text(field, value) {
            self.form.set_field(update);
        }
    }

    fn cycle_position(&mut self, forward: bool) {
        let choices: Vec<Option<Position>> = std::iter::once(None)
            .chain(Position::ALL.into_iter().map(Some))
            .collect();
        let idx = choices
            .iter()
            .position(|p| *p == self.form.record().applying_for)
            .unwrap_or(0);
        let len = choices.len();
        let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
        self.form.set_field(FieldUpdate::ApplyingFor(choices[next]));
    }

    fn handle_key(&mut self, key: KeyEvent) -> Action {
        if self.accepted.is_some() {
            self.accepted = None;
            return Action::Continue;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Action::Quit,
            KeyCode::Char('c') if ctrl => return Action::Quit,
            KeyCode::Char('s') if ctrl => {
                self.submit();
                return Action::Continue;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.next();
                return Action::Continue;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.prev();
                return Action::Continue;
            }
            _ => {}
        }

        match self.current() {
            Target::Submit => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    self.submit();
                }
            }
            Target::Input(Field::ApplyingFor) => match key.code {
                KeyCode::Right | KeyCode::Char(' ') => self.cycle_position(true),
                KeyCode::Left => self.cycle_position(false),
                KeyCode::Enter => self.next(),
                _ => {}
            },
            Target::Input(Field::AdditionalSkills) => match key.code {
                KeyCode::Right => self.skill_cursor = (self.skill_cursor + 1) % Skill::ALL.len(),
                KeyCode::Left => {
                    let len = Skill::ALL.len();
                    self.skill_cursor = (self.skill_cursor + len - 1) % len;
                }
                KeyCode::Char(' ') => self.form.toggle_skill(Skill::ALL[self.skill_cursor]),
                KeyCode::Enter => self.next(),
                _ => {}
            },
            Target::Input(field) => match key.code {
                KeyCode::Char(c) if !ctrl => self.edit_text(field, |v| v.push(c)),
                KeyCode::Backspace => self.edit_text(field, |v| {
                    v.pop();
                }),
                KeyCode::Enter => self.next(),
                _ => {}
            },
        }
        Action::Continue
    }
}

/// Runs the interactive form. Returns the last accepted submission, if any.
pub fn run_form(form: FormState, handler: SubmissionHandler) -> Result<Option<Submission>> {
    let mut state = AppState::new(form, handler);

    enable_raw_mode()?;
    with_restore(
        || {
            stdout().execute(EnterAlternateScreen)?;
            let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
            run_loop(&mut terminal, &mut state)
        },
        restore_terminal,
    )?;

    Ok(state.last_accepted)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

// Restore runs whether or not the body fails; the body's error wins.
fn with_restore<T>(
    body: impl FnOnce() -> Result<T>,
    restore: impl FnOnce() -> Result<()>,
) -> Result<T> {
    let result = body();
    let restored = restore();
    let value = result?;
    restored?;
    Ok(value)
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, state))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if state.handle_key(key) == Action::Quit {
                break;
            }
        }
    }
    Ok(())
}

fn draw(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    let (lines, focus_line) = build_form(state);
    let visible_height = chunks[0].height.saturating_sub(2);
    let scroll = focus_line.saturating_sub(visible_height.saturating_sub(3));

    let form = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title(" Job Application Form "))
        .scroll((scroll, 0));
    frame.render_widget(form, chunks[0]);

    let help = Paragraph::new(concat!(
        " Tab/\u{2193}:next  Shift-Tab/\u{2191}:prev  \u{2190}/\u{2192}:choose",
        "  Space:toggle  Ctrl-S:submit  Esc:quit",
    ))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[1]);

    if let Some(submission) = &state.accepted {
        draw_accepted(frame, submission);
    }
}

fn build_form(state: &AppState) -> (Vec<Line<'static>>, u16) {
    let record = state.form.record();
    let errors = state.handler.errors();
    let current = state.current();

    let mut lines: Vec<Line> = Vec::new();
    let mut focus_line = 0u16;

    for target in state.targets() {
        let focused = target == current;
        if focused {
            focus_line = lines.len() as u16;
        }
        let marker = if focused { "> " } else { "  " };

        let Target::Input(field) = target else {
            let style = if focused {
                Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Cyan)
            };
            lines.push(Line::from(vec![Span::raw(marker), Span::styled("[ Submit ]", style)]));
            continue;
        };

        let label_style = if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(field.label(), label_style),
        ]));

        let border = if errors.contains(field) { Color::Red } else { Color::Gray };
        let value_line = match field {
            Field::ApplyingFor => {
                let choice = record.applying_for.map(|p| p.as_str()).unwrap_or("Select...");
                Line::from(vec![
                    Span::raw("    "),
                    Span::styled(
                        format!("\u{2039} {} \u{203a}", choice),
                        Style::default().fg(border),
                    ),
                ])
            }
            Field::AdditionalSkills => {
                let mut spans = vec![Span::raw("    ")];
                for (i, skill) in Skill::ALL.iter().enumerate() {
                    let checked = if record.additional_skills.contains(skill) { "x" } else { " " };
                    let mut style = Style::default().fg(border);
                    if focused && i == state.skill_cursor {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    spans.push(Span::styled(format!("[{}] {}", checked, skill.as_str()), style));
                    spans.push(Span::raw("  "));
                }
                Line::from(spans)
            }
            _ => {
                let value = record.text(field).unwrap_or_default();
                let cursor = if focused { "_" } else { "" };
                Line::from(vec![
                    Span::raw("    "),
                    Span::styled(format!("{}{}", value, cursor), Style::default().fg(border)),
                ])
            }
        };
        lines.push(value_line);

        if let Some(message) = errors.get(field) {
            lines.push(Line::from(Span::styled(
                format!("    {}", message),
                Style::default().fg(Color::Red),
            )));
        }
        lines.push(Line::from(""));
    }

    (lines, focus_line)
}

fn draw_accepted(frame: &mut Frame, submission: &Submission) {
    let area = centered(frame.area(), 70, 80);
    let body = submission
        .to_pretty_json()
        .unwrap_or_else(|e| format!("Failed to render submission: {}", e));

    let popup = Paragraph::new(body)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Application submitted (any key to close) ")
                .border_style(Style::default().fg(Color::Green)),
        )
        .wrap(Wrap { trim: false });

    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn app() -> AppState {
        AppState::new(FormState::new(), SubmissionHandler::new(None))
    }

    fn press(state: &mut AppState, code: KeyCode) -> Action {
        state.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(state: &mut AppState, text: &str) {
        for c in text.chars() {
            press(state, KeyCode::Char(c));
        }
    }

    fn screen(state: &AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 60)).unwrap();
        terminal.draw(|frame| draw(frame, state)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_typing_edits_focused_field() {
        let mut state = app();
        type_str(&mut state, "Ada");
        press(&mut state, KeyCode::Backspace);
        assert_eq!(state.form.record().full_name, "Ad");

        press(&mut state, KeyCode::Tab);
        type_str(&mut state, "ada@example.com");
        assert_eq!(state.form.record().email, "ada@example.com");
    }

    #[test]
    fn test_position_cycles_and_reveals_fields() {
        let mut state = app();
        state.focus_field(Field::ApplyingFor);
        assert!(!state.targets().contains(&Target::Input(Field::PortfolioUrl)));

        press(&mut state, KeyCode::Right);
        assert_eq!(state.form.record().applying_for, Some(Position::Developer));
        press(&mut state, KeyCode::Right);
        assert_eq!(state.form.record().applying_for, Some(Position::Designer));
        assert!(state.targets().contains(&Target::Input(Field::PortfolioUrl)));

        press(&mut state, KeyCode::Left);
        press(&mut state, KeyCode::Left);
        assert_eq!(state.form.record().applying_for, None);
        press(&mut state, KeyCode::Left);
        assert_eq!(state.form.record().applying_for, Some(Position::Manager));
    }

    #[test]
    fn test_space_toggles_skill_under_cursor() {
        let mut state = app();
        state.focus_field(Field::AdditionalSkills);
        press(&mut state, KeyCode::Right);
        press(&mut state, KeyCode::Char(' '));
        assert!(state.form.record().additional_skills.contains(&Skill::Css));
        press(&mut state, KeyCode::Char(' '));
        assert!(state.form.record().additional_skills.is_empty());
    }

    #[test]
    fn test_failed_submit_shows_errors_and_focuses_first() {
        let mut state = app();
        type_str(&mut state, "Ada");
        state.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));

        assert!(state.accepted.is_none());
        assert_eq!(state.current(), Target::Input(Field::Email));
        let text = screen(&state);
        assert!(text.contains("Email is required"));
        assert!(text.contains("Please select a position"));
        assert!(!text.contains("Full Name is required"));
    }

    #[test]
    fn test_successful_submit_shows_record() {
        let mut state = app();
        type_str(&mut state, "Ada");
        press(&mut state, KeyCode::Tab);
        type_str(&mut state, "ada@example.com");
        press(&mut state, KeyCode::Tab);
        type_str(&mut state, "5551234");
        press(&mut state, KeyCode::Tab);
        press(&mut state, KeyCode::Right);
        press(&mut state, KeyCode::Tab);
        type_str(&mut state, "3");
        press(&mut state, KeyCode::Tab);
        press(&mut state, KeyCode::Char(' '));
        press(&mut state, KeyCode::Tab);
        type_str(&mut state, "2026-11-02T10:30");
        press(&mut state, KeyCode::Tab);
        assert_eq!(state.current(), Target::Submit);
        press(&mut state, KeyCode::Enter);

        assert!(state.handler.errors().is_empty());
        assert!(state.accepted.is_some());
        assert!(screen(&state).contains("Application submitted"));

        // Any key dismisses the panel but the submission is remembered
        press(&mut state, KeyCode::Char('x'));
        assert!(state.accepted.is_none());
        assert!(state.last_accepted.is_some());
        assert_eq!(state.form.record().full_name, "Ada");
    }

    #[test]
    fn test_restore_runs_when_setup_fails() {
        let mut restored = false;
        let result: Result<()> = with_restore(
            || Err(anyhow::anyhow!("alternate screen unavailable")),
            || {
                restored = true;
                Ok(())
            },
        );
        assert!(result.is_err());
        assert!(restored);

        let mut restored = false;
        let value = with_restore(
            || Ok(7),
            || {
                restored = true;
                Ok(())
            },
        )
        .unwrap();
        assert_eq!(value, 7);
        assert!(restored);
    }

    #[test]
    fn test_escape_quits() {
        let mut state = app();
        assert_eq!(press(&mut state, KeyCode::Esc), Action::Quit);
    }
}
