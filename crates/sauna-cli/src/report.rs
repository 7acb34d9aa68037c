//! Plain-text rendering of the display list for `sauna render`.

use sauna_core::{DisplayGroup, StatusClass};

/// One block per group: a header line, then one indented line per friend
/// with a status marker, the display name and the status text.
pub fn text(view: &[DisplayGroup<'_>]) -> String {
  let mut out = String::new();
  for (i, group) in view.iter().enumerate() {
    if i > 0 {
      out.push('\n');
    }
    out.push_str(&format!("{} ({})\n", group.label(), group.entries.len()));

    let width = group
      .entries
      .iter()
      .map(|e| e.persona.display_name.chars().count())
      .max()
      .unwrap_or(0);

    for entry in &group.entries {
      out.push_str(&format!(
        "  {} {:<width$}  {}\n",
        marker(entry.class),
        entry.persona.display_name,
        entry.persona.status_text(),
      ));
    }
  }
  out
}

fn marker(class: StatusClass) -> char {
  match class {
    StatusClass::InGame => '*',
    StatusClass::Online => '+',
    StatusClass::Inactive => '~',
    StatusClass::Offline => '-',
  }
}
