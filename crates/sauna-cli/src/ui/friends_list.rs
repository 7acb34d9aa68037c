//! Friends list pane — left panel.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::class_color;
use crate::app::{App, Row};

/// Render the grouped friends list into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let rows = app.rows();
  let (shown, total) = app.contact_counts();

  let title = if shown == total {
    format!(" Friends ({total}) ")
  } else {
    format!(" Friends ({shown}/{total}) ")
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let items: Vec<ListItem> = rows.iter().map(row_item).collect();

  let mut inner_area = block.inner(area);
  f.render_widget(block, area);

  // Search bar along the bottom of the pane while a search is set.
  let searching = app.search_active || !app.prefs.search_text.is_empty();
  if searching && inner_area.height > 2 {
    let search_area = Rect {
      x:      inner_area.x,
      y:      inner_area.y + inner_area.height - 1,
      width:  inner_area.width,
      height: 1,
    };
    inner_area.height = inner_area.height.saturating_sub(1);

    let search_text = if app.search_active {
      format!("/{}_", app.prefs.search_text)
    } else {
      format!("/{}", app.prefs.search_text)
    };
    f.render_widget(
      Paragraph::new(search_text).style(Style::default().fg(Color::Yellow)),
      search_area,
    );
  }

  if rows.is_empty() {
    let hint = if total == 0 {
      "Waiting for friends…"
    } else {
      "No friends match the current view."
    };
    f.render_widget(
      Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
      inner_area,
    );
    return;
  }

  // Scrollable list with cursor tracking.
  let mut state = ListState::default();
  state.select(Some(app.list_cursor));

  f.render_stateful_widget(
    List::new(items)
      .highlight_style(
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol(""),
    inner_area,
    &mut state,
  );
}

fn row_item<'a>(row: &Row<'a>) -> ListItem<'a> {
  match row {
    Row::Header { label, count, collapsed, .. } => {
      let marker = if *collapsed { "▸ " } else { "▾ " };
      ListItem::new(Line::from(vec![
        Span::styled(marker, Style::default().fg(Color::DarkGray)),
        Span::styled(
          label.to_string(),
          Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" ({count})"), Style::default().fg(Color::DarkGray)),
      ]))
    }
    Row::Entry(entry) => {
      let color = class_color(entry.class);
      ListItem::new(Line::from(vec![
        Span::styled("  ● ", Style::default().fg(color)),
        Span::raw(entry.persona.display_name.clone()),
        Span::styled(
          format!("  {}", entry.persona.status_text()),
          Style::default().fg(color),
        ),
      ]))
    }
  }
}
