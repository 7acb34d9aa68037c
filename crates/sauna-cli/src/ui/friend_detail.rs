//! Friend detail pane — right panel.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use super::class_color;
use crate::app::App;

/// Render the detail pane into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let selected = app.selected_persona();
  let title = selected
    .map(|(_, p)| p.display_name.as_str())
    .unwrap_or("(unknown)");

  let block = Block::default()
    .title(format!(" {title} "))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let inner = block.inner(area);
  f.render_widget(block, area);

  // The persona may have been dropped by a roster update since selection.
  let Some((contact_id, persona)) = selected else {
    let gone = Paragraph::new("No presence information for this friend.")
      .style(Style::default().fg(Color::DarkGray));
    f.render_widget(gone, inner);
    return;
  };

  let class = persona.class();
  let state = persona
    .state
    .map(|s| s.to_string())
    .unwrap_or_else(|| "—".into());

  let mut lines = vec![
    field("status", persona.status_text(), class_color(class)),
    field("state", state, Color::Reset),
    field("id", contact_id.to_string(), Color::Reset),
  ];

  if let Some(activity) = persona.current_activity() {
    lines.push(field("playing", activity.to_string(), Color::Green));
  }
  if let Some(url) = &persona.avatar_url {
    lines.push(field("avatar", url.clone(), Color::DarkGray));
  }

  let groups: Vec<&str> = app
    .groups
    .iter()
    .filter(|g| g.members.contains(contact_id))
    .map(|g| g.label())
    .collect();
  if !groups.is_empty() {
    lines.push(field("groups", groups.join(", "), Color::Reset));
  }

  f.render_widget(Paragraph::new(lines), inner);
}

fn field(label: &str, value: String, color: Color) -> Line<'static> {
  Line::from(vec![
    Span::styled(
      format!("{label:<10}"),
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ),
    Span::styled(value, Style::default().fg(color)),
  ])
}
