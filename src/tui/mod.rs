//! TUI module - Terminal dashboard with ratatui

use anyhow::Result;
use chrono::Utc;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table},
};
use std::io::{stdout, Stdout};

use crate::app::GymGrowth;
use crate::db::Database;
use crate::exercises::BodyPart;
use crate::motivation::message_for_day;
use crate::xp::progress_to_next_level;

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// App state for TUI
pub struct App<'a> {
    db: &'a Database,
    state: GymGrowth<'a>,
    should_quit: bool,
}

impl<'a> App<'a> {
    pub fn new(db: &'a Database) -> Result<Self> {
        let state = GymGrowth::load(db)?;
        Ok(Self {
            db,
            state,
            should_quit: false,
        })
    }

    /// Run the TUI application
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = init_terminal()?;

        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_events()?;
        }

        restore_terminal()?;
        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(8),
                Constraint::Length(3),
            ])
            .split(area);

        self.render_header(frame, chunks[0]);
        self.render_level_gauge(frame, chunks[1]);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(chunks[2]);
        self.render_body_parts(frame, middle[0]);
        self.render_quests(frame, middle[1]);

        self.render_history(frame, chunks[3]);

        let footer = Paragraph::new("q: quit | r: refresh")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, chunks[4]);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let text = match self.state.current_user() {
            Some(user) => format!(
                "Gym Growth | {} | Level {} | {} XP | 🔥 {} days\n{}",
                user.name,
                user.level,
                user.xp,
                user.streak,
                message_for_day(Utc::now().date_naive())
            ),
            None => "Gym Growth | not logged in (run `gymgrowth login`)".to_string(),
        };

        let header = Paragraph::new(text)
            .style(Style::default().fg(Color::Cyan).bold())
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, area);
    }

    fn render_level_gauge(&self, frame: &mut Frame, area: Rect) {
        let (label, ratio) = match self.state.current_user() {
            Some(user) => {
                let p = progress_to_next_level(user.xp, user.level);
                (format!("{} / {} XP", p.current, p.required), p.percentage / 100.0)
            }
            None => ("-".to_string(), 0.0),
        };

        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Next level"))
            .gauge_style(Style::default().fg(Color::Magenta))
            .ratio(ratio.clamp(0.0, 1.0))
            .label(label);
        frame.render_widget(gauge, area);
    }

    fn render_body_parts(&self, frame: &mut Frame, area: Rect) {
        let rows: Vec<Row> = BodyPart::all()
            .iter()
            .map(|part| {
                let p = self.state.body_parts.progress(*part);
                Row::new(vec![
                    Cell::from(part.display_name()),
                    Cell::from(format!("Lv {}", p.level)),
                    Cell::from(format!("{} XP", p.total_xp)),
                    Cell::from(p.workout_count.to_string()),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(16),
                Constraint::Length(6),
                Constraint::Length(9),
                Constraint::Min(4),
            ],
        )
        .header(Row::new(vec!["Part", "Level", "XP", "Sets"]).style(Style::default().bold()))
        .block(Block::default().borders(Borders::ALL).title("Body parts"));

        frame.render_widget(table, area);
    }

    fn render_quests(&self, frame: &mut Frame, area: Rect) {
        let quests = &self.state.quests;
        let mut rows: Vec<Row> = quests
            .active_quests()
            .iter()
            .map(|q| {
                let progress = quests.progress(q.id).unwrap_or(0.0);
                Row::new(vec![
                    Cell::from(q.title),
                    Cell::from(q.difficulty.as_str()),
                    Cell::from(format!("{:.0}/{} {}", progress, q.target, q.unit)),
                    Cell::from(format!("+{}", q.reward_xp)),
                ])
            })
            .collect();

        for completed in quests.unclaimed_rewards() {
            if let Some(q) = completed.template() {
                rows.push(
                    Row::new(vec![
                        Cell::from(q.title),
                        Cell::from("done"),
                        Cell::from("claim me"),
                        Cell::from(format!("+{}", q.reward_xp)),
                    ])
                    .style(Style::default().fg(Color::Yellow)),
                );
            }
        }

        let table = Table::new(
            rows,
            [
                Constraint::Length(24),
                Constraint::Length(10),
                Constraint::Length(16),
                Constraint::Min(6),
            ],
        )
        .header(Row::new(vec!["Quest", "Difficulty", "Progress", "Reward"]).style(Style::default().bold()))
        .block(Block::default().borders(Borders::ALL).title("Quests"));

        frame.render_widget(table, area);
    }

    fn render_history(&self, frame: &mut Frame, area: Rect) {
        let rows: Vec<Row> = self
            .state
            .workouts
            .history()
            .iter()
            .map(|w| {
                let names: Vec<&str> = w.exercises.iter().map(|e| e.exercise_name.as_str()).collect();
                Row::new(vec![
                    Cell::from(w.date.format("%Y-%m-%d").to_string()),
                    Cell::from(names.join(", ")),
                    Cell::from(format!("{} XP", w.total_xp)),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [Constraint::Length(12), Constraint::Min(20), Constraint::Length(10)],
        )
        .header(Row::new(vec!["Date", "Exercises", "XP"]).style(Style::default().bold()))
        .block(Block::default().borders(Borders::ALL).title("Workouts"));

        frame.render_widget(table, area);
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(std::time::Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') => self.should_quit = true,
                        KeyCode::Char('r') => {
                            self.state = GymGrowth::load(self.db)?;
                        }
                        _ => {}
                    }
                }
        Ok(())
    }
}

fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}
