use chrono::DateTime;
use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::ui::App;

const ACCENT: Color = Color::Cyan;
const BANNER: Color = Color::Yellow;
const ERROR: Color = Color::Red;
const DIM: Color = Color::DarkGray;

pub(crate) fn render(f: &mut Frame, app: &App) {
    let columns = Layout::horizontal([Constraint::Min(40), Constraint::Length(28)]).split(f.area());

    render_feed(f, app, columns[0]);
    render_presence(f, app, columns[1]);
}

fn render_feed(f: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let reconciler = app.reconciler();

    let chunks = Layout::vertical([
        Constraint::Length(1), // banner
        Constraint::Min(0),    // items
        Constraint::Length(1), // footer
    ])
    .split(area);

    // "New items have arrived" banner, only while something is unseen.
    let banner = if reconciler.sub_error() {
        Line::from(Span::styled(
            " Live updates unavailable",
            Style::default().fg(ERROR),
        ))
    } else if reconciler.sub_loading() {
        Line::from(Span::styled(" Connecting...", Style::default().fg(DIM)))
    } else if reconciler.unseen_count() > 0 {
        Line::from(Span::styled(
            format!(
                " New items have arrived! ({}) - press n to show",
                reconciler.unseen_count()
            ),
            Style::default().fg(BANNER).add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from("")
    };
    f.render_widget(Paragraph::new(banner), chunks[0]);

    let items: Vec<ListItem> = reconciler
        .items()
        .iter()
        .map(|item| {
            let time = DateTime::from_timestamp(item.created_at as i64, 0)
                .map(|t| t.format("%H:%M:%S").to_string())
                .unwrap_or_default();
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:>5} ", item.id), Style::default().fg(DIM)),
                Span::raw(item.title.clone()),
                Span::styled(
                    format!("  {} @{}", time, item.author.name),
                    Style::default().fg(DIM),
                ),
            ]))
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Public feed ")
            .border_style(Style::default().fg(ACCENT)),
    );
    f.render_widget(list, chunks[1]);

    let footer = if reconciler.load_failed() {
        Span::styled(
            " Load failed - press o to retry",
            Style::default().fg(ERROR),
        )
    } else if reconciler.has_more() {
        Span::styled(" o: load older items   q: quit", Style::default().fg(DIM))
    } else {
        Span::styled(" No more public items!   q: quit", Style::default().fg(DIM))
    };
    f.render_widget(Paragraph::new(Line::from(footer)), chunks[2]);
}

fn render_presence(f: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let title = if app.presence.loading() {
        " Online users ".to_string()
    } else {
        format!(" Online users - {} ", app.presence.roster().len())
    };

    let users: Vec<ListItem> = if app.presence.error() {
        vec![ListItem::new(Span::styled(
            "Error...",
            Style::default().fg(ERROR),
        ))]
    } else if app.presence.loading() {
        vec![ListItem::new(Span::styled(
            "Loading...",
            Style::default().fg(DIM),
        ))]
    } else {
        app.presence
            .roster()
            .iter()
            .map(|user| ListItem::new(format!("* {}", user.user_name)))
            .collect()
    };

    let list = List::new(users).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(ACCENT)),
    );
    f.render_widget(list, area);
}
