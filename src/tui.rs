use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use std::io::stdout;
use std::time::Duration;

use crate::browser;
use crate::feed::{FeedState, FeedView};
use crate::render::{self, Body, Card};

const TICK: Duration = Duration::from_millis(100);
const HELP: &str = " j/k:navigate  enter/o:open link  q:quit";

struct AppState {
    view: FeedView,
    selected: usize,
    notice: Option<String>,
}

impl AppState {
    fn new(view: FeedView) -> Self {
        Self {
            view,
            selected: 0,
            notice: None,
        }
    }

    fn len(&self) -> usize {
        self.view.state().count()
    }

    fn current_url(&self) -> Option<&str> {
        self.view
            .state()
            .postings()
            .get(self.selected)
            .map(|p| p.url.as_str())
    }

    fn next(&mut self) {
        if self.len() > 0 && self.selected < self.len() - 1 {
            self.selected += 1;
        }
    }

    fn prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn open_selected(&mut self) {
        let Some(url) = self.current_url().map(str::to_string) else {
            return;
        };
        self.notice = Some(match browser::open_detached(&url) {
            Ok(()) => format!("Opened {}", url),
            Err(err) => {
                tracing::warn!(error = %err, "could not open job link");
                format!("Could not open {}", url)
            }
        });
    }
}

/// Run the interactive feed until the user quits. Needs an entered Tokio runtime.
pub fn run_browse(view: FeedView) -> Result<()> {
    let mut state = AppState::new(view);
    state.view.mount();

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut state);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    state.view.unmount();
    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
) -> Result<()> {
    let mut list_state = ListState::default();

    loop {
        if state.view.poll() && state.len() > 0 {
            list_state.select(Some(0));
        }

        terminal.draw(|frame| {
            draw(frame, state.view.state(), state.notice.as_deref(), &mut list_state)
        })?;

        if !event::poll(TICK)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Down | KeyCode::Char('j') => state.next(),
                KeyCode::Up | KeyCode::Char('k') => state.prev(),
                KeyCode::Enter | KeyCode::Char('o') => state.open_selected(),
                _ => {}
            }
            if state.len() > 0 {
                list_state.select(Some(state.selected));
            }
        }
    }
    Ok(())
}

fn draw(frame: &mut Frame, feed: &FeedState, notice: Option<&str>, list_state: &mut ListState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    // Room for the borders and the highlight symbol
    let card_width = chunks[1].width.saturating_sub(4) as usize;
    let screen = render::screen(feed, card_width);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(screen.heading, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(
            format!(" {} ", screen.badge),
            Style::default().fg(Color::Blue).bg(Color::Gray),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    let body_block = Block::default().borders(Borders::ALL);
    match screen.body {
        Body::Scanning => {
            let scanning = Paragraph::new(render::SCANNING)
                .style(Style::default().fg(Color::DarkGray))
                .block(body_block);
            frame.render_widget(scanning, chunks[1]);
        }
        Body::Blank => frame.render_widget(body_block, chunks[1]),
        Body::Cards(cards) => {
            let items: Vec<ListItem> = cards.into_iter().map(card_item).collect();
            let list = List::new(items)
                .block(body_block)
                .highlight_style(Style::default().bg(Color::DarkGray))
                .highlight_symbol("> ");
            frame.render_stateful_widget(list, chunks[1], list_state);
        }
    }

    let footer = match notice {
        Some(notice) => format!("{}  | {}", HELP, notice),
        None => HELP.to_string(),
    };
    frame.render_widget(
        Paragraph::new(footer).style(Style::default().fg(Color::DarkGray)),
        chunks[2],
    );
}

fn card_item(card: Card) -> ListItem<'static> {
    let mut lines: Vec<Line> = card
        .title
        .into_iter()
        .map(|line| Line::from(Span::styled(line, Style::default().add_modifier(Modifier::BOLD))))
        .collect();

    lines.push(Line::from(Span::styled(card.company, Style::default().fg(Color::Blue))));
    lines.push(Line::from(format!("📍 {}", card.location)));
    lines.push(Line::from(format!("📅 {}", card.posted)));
    lines.push(Line::from(format!("🔗 {}", card.source)));
    if let Some(salary) = card.salary {
        lines.push(Line::from(format!("💰 {}", salary)));
    }
    lines.push(Line::from(""));

    ListItem::new(Text::from(lines))
}
