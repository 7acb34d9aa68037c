//! Roster state — the caller-side holder for everything the view engine
//! consumes.
//!
//! The presence and roster sources deliver asynchronously and in any order.
//! [`RosterState::apply`] is the single point where those deliveries land,
//! so a caller that funnels every [`PresenceEvent`] through one loop gets
//! serialised updates for free.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  group::{FriendGroup, Group, Relationship, build_groups},
  persona::{ContactId, Persona},
  prefs::ViewPreferences,
  view::{self, DisplayGroup},
};

// ─── Events ──────────────────────────────────────────────────────────────────

/// One delivery from the presence or roster source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PresenceEvent {
  /// The full roster; replaces the previous one.
  Friends {
    friends: BTreeMap<ContactId, Relationship>,
  },
  /// All friend-group definitions, keyed by group id; replaces the previous
  /// set.
  FriendGroups {
    groups: BTreeMap<String, FriendGroup>,
  },
  /// A bulk persona snapshot. Each listed contact's record is replaced.
  Personas {
    personas: HashMap<ContactId, Persona>,
  },
  /// A fresh record for one contact.
  Persona {
    contact_id: ContactId,
    persona:    Persona,
  },
  /// A single relationship change. [`Relationship::None`] removes the entry.
  Relationship {
    contact_id:   ContactId,
    relationship: Relationship,
  },
}

impl PresenceEvent {
  /// Parse one line of a JSON-lines event feed.
  pub fn from_json(line: &str) -> Result<Self> {
    serde_json::from_str(line).map_err(Error::Event)
  }

  fn kind(&self) -> &'static str {
    match self {
      Self::Friends { .. } => "friends",
      Self::FriendGroups { .. } => "friend_groups",
      Self::Personas { .. } => "personas",
      Self::Persona { .. } => "persona",
      Self::Relationship { .. } => "relationship",
    }
  }
}

// ─── State ───────────────────────────────────────────────────────────────────

/// Current roster, friend groups and presence records.
///
/// Also the shape of a roster snapshot file: every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterState {
  pub friends:       BTreeMap<ContactId, Relationship>,
  pub friend_groups: BTreeMap<String, FriendGroup>,
  pub personas:      HashMap<ContactId, Persona>,
}

impl RosterState {
  pub fn new() -> Self { Self::default() }

  /// Load a roster snapshot from its JSON text.
  pub fn from_snapshot_json(json: &str) -> Result<Self> {
    serde_json::from_str(json).map_err(Error::Snapshot)
  }

  /// Apply one event. Returns `true` if the state changed and the view needs
  /// recomputing.
  pub fn apply(&mut self, event: PresenceEvent) -> bool {
    let kind = event.kind();
    let changed = match event {
      PresenceEvent::Friends { friends } => replace(&mut self.friends, friends),
      PresenceEvent::FriendGroups { groups } => {
        replace(&mut self.friend_groups, groups)
      }
      PresenceEvent::Personas { personas } => {
        let mut changed = false;
        for (id, persona) in personas {
          changed |= self.set_persona(id, persona);
        }
        changed
      }
      PresenceEvent::Persona { contact_id, persona } => {
        self.set_persona(contact_id, persona)
      }
      PresenceEvent::Relationship {
        contact_id,
        relationship: Relationship::None,
      } => self.friends.remove(&contact_id).is_some(),
      PresenceEvent::Relationship { contact_id, relationship } => {
        self.friends.insert(contact_id, relationship) != Some(relationship)
      }
    };

    tracing::debug!(kind, changed, "applied presence event");
    changed
  }

  fn set_persona(&mut self, id: ContactId, persona: Persona) -> bool {
    match self.personas.get(&id) {
      Some(current) if *current == persona => false,
      _ => {
        self.personas.insert(id, persona);
        true
      }
    }
  }

  /// Groups as the view engine consumes them, rebuilt from scratch.
  pub fn groups(&self) -> Vec<Group> {
    build_groups(&self.friends, &self.friend_groups)
  }

  /// Roster members that have no presence record yet, in id order.
  pub fn missing_personas(&self) -> Vec<&ContactId> {
    self
      .friends
      .keys()
      .filter(|id| !self.personas.contains_key(*id))
      .collect()
  }

  /// Run the view engine over the current state.
  ///
  /// Takes the caller's group list so the borrowed output can outlive this
  /// call; pass the result of [`RosterState::groups`].
  pub fn render<'a>(
    &'a self,
    groups: &'a [Group],
    prefs: &ViewPreferences,
  ) -> Vec<DisplayGroup<'a>> {
    view::render(groups, &self.personas, prefs)
  }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
  if *slot == value {
    false
  } else {
    *slot = value;
    true
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::persona::PersonaState;

  fn id(raw: &str) -> ContactId { ContactId::from(raw) }

  #[test]
  fn persona_events_replace_wholesale() {
    let mut state = RosterState::new();
    let first = Persona::new("Ann", Some(PersonaState::Online)).with_activity("Chess");
    assert!(state.apply(PresenceEvent::Persona {
      contact_id: id("1"),
      persona:    first,
    }));

    let second = Persona::new("Ann", Some(PersonaState::Away));
    assert!(state.apply(PresenceEvent::Persona {
      contact_id: id("1"),
      persona:    second.clone(),
    }));
    assert_eq!(state.personas[&id("1")], second);
    assert_eq!(state.personas[&id("1")].activity, None);
  }

  #[test]
  fn identical_persona_is_not_a_change() {
    let mut state = RosterState::new();
    let p = Persona::new("Ann", Some(PersonaState::Online));
    assert!(state.apply(PresenceEvent::Persona { contact_id: id("1"), persona: p.clone() }));
    assert!(!state.apply(PresenceEvent::Persona { contact_id: id("1"), persona: p }));
  }

  #[test]
  fn bulk_personas_merge_per_contact() {
    let mut state = RosterState::new();
    state.apply(PresenceEvent::Persona {
      contact_id: id("1"),
      persona:    Persona::new("Ann", None),
    });
    state.apply(PresenceEvent::Personas {
      personas: HashMap::from([(id("2"), Persona::new("Bob", None))]),
    });
    assert_eq!(state.personas.len(), 2);
  }

  #[test]
  fn relationship_none_removes_entry() {
    let mut state = RosterState::new();
    assert!(state.apply(PresenceEvent::Relationship {
      contact_id:   id("1"),
      relationship: Relationship::Friend,
    }));
    assert!(!state.apply(PresenceEvent::Relationship {
      contact_id:   id("1"),
      relationship: Relationship::Friend,
    }));
    assert!(state.apply(PresenceEvent::Relationship {
      contact_id:   id("1"),
      relationship: Relationship::None,
    }));
    assert!(state.friends.is_empty());
  }

  #[test]
  fn missing_personas_lists_roster_gaps() {
    let mut state = RosterState::new();
    state.apply(PresenceEvent::Friends {
      friends: BTreeMap::from([
        (id("1"), Relationship::Friend),
        (id("2"), Relationship::Friend),
        (id("3"), Relationship::Friend),
      ]),
    });
    state.apply(PresenceEvent::Persona {
      contact_id: id("2"),
      persona:    Persona::new("Bob", None),
    });
    assert_eq!(state.missing_personas(), vec![&id("1"), &id("3")]);
  }

  #[test]
  fn parses_event_lines() {
    let event = PresenceEvent::from_json(
      r#"{"type": "persona", "contact_id": 5, "persona": {"player_name": "Eve", "persona_state": 1}}"#,
    )
    .unwrap();
    assert_eq!(event, PresenceEvent::Persona {
      contact_id: id("5"),
      persona:    Persona::new("Eve", Some(PersonaState::Online)),
    });

    assert!(matches!(
      PresenceEvent::from_json(r#"{"type": "wave"}"#),
      Err(Error::Event(_))
    ));
  }

  #[test]
  fn snapshot_renders_through_engine() {
    let state = RosterState::from_snapshot_json(
      r#"{
        "friends": {"1": "friend", "2": "friend", "3": "friend"},
        "friend_groups": {"10": {"name": "Work", "members": ["1"]}},
        "personas": {
          "1": {"display_name": "Ann", "state": "Online"},
          "2": {"display_name": "Bob", "state": "Offline"}
        }
      }"#,
    )
    .unwrap();

    let groups = state.groups();
    let view = state.render(&groups, &ViewPreferences::default());
    let labels: Vec<_> = view.iter().map(|g| g.label()).collect();
    assert_eq!(labels, vec!["Work", "Friends"]);
    // Contact 3 has no persona yet and is left out.
    assert_eq!(view[1].entries.len(), 1);
    assert_eq!(view[1].entries[0].persona.display_name, "Bob");
  }

  #[test]
  fn bad_snapshot_is_an_error() {
    assert!(matches!(
      RosterState::from_snapshot_json("{\"friends\": 3}"),
      Err(Error::Snapshot(_))
    ));
  }
}
