//! Application state machine and event dispatcher.

use std::collections::HashSet;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use sauna_core::{
  ContactId, DisplayEntry, DisplayGroup, Group, Persona, PresenceEvent, RosterState,
  ViewPreferences,
};

use crate::prefs_store::PrefsStore;

fn distinct_contacts(view: &[DisplayGroup<'_>]) -> usize {
  view
    .iter()
    .flat_map(|g| &g.entries)
    .map(|e| e.contact_id)
    .collect::<HashSet<_>>()
    .len()
}

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
  /// Focus on the friends list; right pane shows the selected friend, if any.
  FriendsList,
  /// Focus on the friend detail pane.
  FriendDetail,
}

// ─── Rows ─────────────────────────────────────────────────────────────────────

/// One line of the friends pane: a group header or a contact under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row<'a> {
  Header {
    id:        Option<&'a str>,
    label:     &'a str,
    count:     usize,
    collapsed: bool,
  },
  Entry(DisplayEntry<'a>),
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  /// Current screen / keyboard focus.
  pub screen: Screen,

  /// Roster, friend groups and presence records as last delivered.
  pub roster: RosterState,

  /// Groups derived from `roster`; rebuilt whenever the roster changes.
  pub groups: Vec<Group>,

  /// Live view preferences, including the session-only search text.
  pub prefs: ViewPreferences,

  /// Where preference changes are persisted. `None` keeps them in memory.
  store: Option<PrefsStore>,

  /// Ids of groups the user has folded away (`None` is the ungrouped bucket).
  pub collapsed: HashSet<Option<String>>,

  /// Whether the user is typing a search query.
  pub search_active: bool,

  /// Cursor position within [`App::rows`].
  pub list_cursor: usize,

  /// Contact shown in the detail pane.
  pub selected: Option<ContactId>,

  /// One-line status message shown in the status bar.
  pub status_msg: String,
}

impl App {
  pub fn new(
    roster: RosterState,
    prefs: ViewPreferences,
    store: Option<PrefsStore>,
  ) -> Self {
    let groups = roster.groups();
    Self {
      screen: Screen::FriendsList,
      roster,
      groups,
      prefs,
      store,
      collapsed: HashSet::new(),
      search_active: false,
      list_cursor: 0,
      selected: None,
      status_msg: String::new(),
    }
  }

  // ── Presence updates ──────────────────────────────────────────────────────

  /// Fold one presence event into the state.
  pub fn apply_event(&mut self, event: PresenceEvent) {
    if self.roster.apply(event) {
      self.groups = self.roster.groups();
      self.clamp_cursor();
    }
  }

  // ── Derived view ──────────────────────────────────────────────────────────

  /// The friends pane, recomputed from scratch: group headers, each followed
  /// by its entries unless the group is collapsed.
  pub fn rows(&self) -> Vec<Row<'_>> {
    let mut rows = Vec::new();
    for group in self.roster.render(&self.groups, &self.prefs) {
      let collapsed = self.collapsed.contains(&group.id.map(str::to_owned));
      rows.push(Row::Header {
        id: group.id,
        label: group.label(),
        count: group.entries.len(),
        collapsed,
      });
      if !collapsed {
        rows.extend(group.entries.into_iter().map(Row::Entry));
      }
    }
    rows
  }

  /// Distinct contacts shown under the current preferences (collapsed or
  /// not), and distinct contacts shown with every filter off. A contact in
  /// several groups counts once; a friend without presence yet counts in
  /// neither.
  pub fn contact_counts(&self) -> (usize, usize) {
    let shown = distinct_contacts(&self.roster.render(&self.groups, &self.prefs));
    let listable =
      distinct_contacts(&self.roster.render(&self.groups, &ViewPreferences::default()));
    (shown, listable)
  }

  pub fn selected_persona(&self) -> Option<(&ContactId, &Persona)> {
    let id = self.selected.as_ref()?;
    self.roster.personas.get_key_value(id)
  }

  fn clamp_cursor(&mut self) {
    let len = self.rows().len();
    if self.list_cursor >= len {
      self.list_cursor = len.saturating_sub(1);
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    // Search input mode: all printable keys go into the search string.
    if self.search_active {
      self.handle_search_key(key);
      return true;
    }

    match self.screen {
      Screen::FriendsList => self.handle_list_key(key),
      Screen::FriendDetail => self.handle_detail_key(key),
    }
  }

  fn handle_search_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.search_active = false;
        self.prefs.search_text.clear();
      }
      KeyCode::Enter => {
        self.search_active = false;
      }
      KeyCode::Backspace => {
        self.prefs.search_text.pop();
      }
      KeyCode::Char(c) => {
        self.prefs.search_text.push(c);
      }
      _ => return,
    }
    self.list_cursor = 0;
  }

  fn handle_list_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      // Quit
      KeyCode::Char('q') => return false,

      // Navigation
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.rows().len();
        if len > 0 && self.list_cursor + 1 < len {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
      }

      // Collapse or open detail
      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
        self.activate_cursor(key.code == KeyCode::Char(' '));
      }

      // View toggles
      KeyCode::Char('o') => self.toggle(|p| &mut p.show_offline, "offline friends"),
      KeyCode::Char('i') => self.toggle(|p| &mut p.show_inactive, "inactive friends"),
      KeyCode::Char('s') => self.toggle(|p| &mut p.sort_by_status, "sort by status"),

      // Search
      KeyCode::Char('/') => {
        self.search_active = true;
        self.prefs.search_text.clear();
        self.list_cursor = 0;
      }
      KeyCode::Esc if !self.prefs.search_text.is_empty() => {
        self.prefs.search_text.clear();
        self.list_cursor = 0;
      }

      _ => {}
    }
    true
  }

  fn handle_detail_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      // Quit
      KeyCode::Char('q') => return false,

      // Back to list
      KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => {
        self.screen = Screen::FriendsList;
        self.selected = None;
      }

      // Step through contacts without leaving the detail pane.
      KeyCode::Char(']') | KeyCode::PageDown | KeyCode::Down | KeyCode::Char('j') => {
        self.step_selection(true);
      }
      KeyCode::Char('[') | KeyCode::PageUp | KeyCode::Up | KeyCode::Char('k') => {
        self.step_selection(false);
      }

      _ => {}
    }
    true
  }

  /// Enter/Space on a header folds it; Enter on a contact opens the detail
  /// pane.
  fn activate_cursor(&mut self, only_headers: bool) {
    enum Target {
      Group(Option<String>),
      Contact(ContactId),
    }

    let target = match self.rows().get(self.list_cursor) {
      Some(Row::Header { id, .. }) => Target::Group(id.map(str::to_owned)),
      Some(Row::Entry(entry)) => Target::Contact(entry.contact_id.clone()),
      None => return,
    };

    match target {
      Target::Group(group_id) => {
        if !self.collapsed.remove(&group_id) {
          self.collapsed.insert(group_id);
        }
        self.clamp_cursor();
      }
      Target::Contact(contact_id) if !only_headers => {
        tracing::debug!(%contact_id, "opening friend detail");
        self.selected = Some(contact_id);
        self.screen = Screen::FriendDetail;
      }
      Target::Contact(_) => {}
    }
  }

  /// Move the cursor to the next (or previous) contact row and select it.
  fn step_selection(&mut self, forward: bool) {
    let rows = self.rows();
    let found = if forward {
      (self.list_cursor + 1..rows.len())
        .find(|&i| matches!(rows[i], Row::Entry(_)))
    } else {
      (0..self.list_cursor)
        .rev()
        .find(|&i| matches!(rows[i], Row::Entry(_)))
    };

    let Some(i) = found else { return };
    let Row::Entry(entry) = &rows[i] else { return };
    let contact_id = entry.contact_id.clone();
    drop(rows);

    self.list_cursor = i;
    self.selected = Some(contact_id);
  }

  /// Flip one boolean preference and persist the result.
  fn toggle(
    &mut self,
    field: impl FnOnce(&mut ViewPreferences) -> &mut bool,
    what: &str,
  ) {
    let flag = field(&mut self.prefs);
    *flag = !*flag;
    let now = if *flag { "on" } else { "off" };
    self.status_msg = format!("{what}: {now}");

    if let Some(store) = &self.store {
      if let Err(e) = store.save(&self.prefs) {
        tracing::warn!(error = %e, "failed to save preferences");
        self.status_msg = format!("Error saving preferences: {e}");
      }
    }

    self.clamp_cursor();
  }
}
