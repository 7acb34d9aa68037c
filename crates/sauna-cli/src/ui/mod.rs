//! Frame layout: preference header, friends list beside the detail pane, and
//! a mode line.

pub mod friend_detail;
pub mod friends_list;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};
use sauna_core::{StatusClass, ViewPreferences};

use crate::app::{App, Screen};

// ─── Root draw ────────────────────────────────────────────────────────────────

pub fn draw(f: &mut Frame, app: &App) {
  let [header, body, mode_line] =
    Layout::vertical([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
      .areas(f.area());

  draw_header(f, header, &app.prefs);

  let [list, detail] =
    Layout::horizontal([Constraint::Percentage(35), Constraint::Percentage(65)]).areas(body);
  friends_list::draw(f, list, app);
  match app.selected {
    Some(_) => friend_detail::draw(f, detail, app),
    None => draw_placeholder(f, detail),
  }

  draw_mode_line(f, mode_line, app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, prefs: &ViewPreferences) {
  let base = Style::default().bg(Color::DarkGray);
  let clock = format!("{} ", Local::now().format("%H:%M"));
  let [left, right] = Layout::horizontal([
    Constraint::Min(0),
    Constraint::Length(clock.chars().count() as u16),
  ])
  .areas(area);

  let mut spans = vec![Span::styled(
    " sauna ",
    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
  )];
  spans.extend(pref_spans(prefs));

  f.render_widget(Paragraph::new(Line::from(spans)).style(base), left);
  f.render_widget(Paragraph::new(clock).style(base.fg(Color::Gray)), right);
}

/// One span per preference, dimmed when the filter hides something.
fn pref_spans(prefs: &ViewPreferences) -> Vec<Span<'static>> {
  let flag = |key: char, label: &str, shown: bool| {
    let color = if shown { Color::Gray } else { Color::Yellow };
    Span::styled(
      format!(" [{key}] {label} {}", if shown { "on" } else { "off" }),
      Style::default().fg(color),
    )
  };

  let mut spans = vec![
    flag('o', "offline", prefs.show_offline),
    flag('i', "inactive", prefs.show_inactive),
    Span::styled(
      format!(" [s] by {}", if prefs.sort_by_status { "status" } else { "name" }),
      Style::default().fg(Color::Gray),
    ),
  ];
  if !prefs.search_text.is_empty() {
    spans.push(Span::styled(
      format!(" /{}", prefs.search_text),
      Style::default().fg(Color::Yellow),
    ));
  }
  spans
}

// ─── Detail placeholder ───────────────────────────────────────────────────────

fn draw_placeholder(f: &mut Frame, area: Rect) {
  let block = Block::default()
    .title(" Detail ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let hint = Paragraph::new("Select a friend and press Enter.")
    .style(Style::default().fg(Color::DarkGray))
    .block(block);
  f.render_widget(hint, area);
}

// ─── Mode line ────────────────────────────────────────────────────────────────

fn draw_mode_line(f: &mut Frame, area: Rect, app: &App) {
  let (mode, color, hints) = match app.screen {
    Screen::FriendsList if app.search_active => {
      ("SEARCH", Color::Yellow, "type to filter  Esc clear  Enter keep")
    }
    Screen::FriendsList => (
      "LIST",
      Color::Cyan,
      "j/k move  Enter open/fold  Space fold  / search  o/i/s toggle  q quit",
    ),
    Screen::FriendDetail => ("DETAIL", Color::Green, "j/k or [ ] step  Esc back  q quit"),
  };
  let message = if app.status_msg.is_empty() { hints } else { app.status_msg.as_str() };

  let line = Line::from(vec![
    Span::styled(
      format!(" {mode} "),
      Style::default().fg(Color::Black).bg(color).add_modifier(Modifier::BOLD),
    ),
    Span::styled(format!("  {message}"), Style::default().fg(Color::DarkGray)),
  ]);
  f.render_widget(Paragraph::new(line).style(Style::default().bg(Color::Black)), area);
}

// ─── Shared styling ───────────────────────────────────────────────────────────

/// Foreground colour for a friend's status class.
pub fn class_color(class: StatusClass) -> Color {
  match class {
    StatusClass::InGame => Color::Green,
    StatusClass::Online => Color::Cyan,
    StatusClass::Inactive => Color::Yellow,
    StatusClass::Offline => Color::DarkGray,
  }
}
