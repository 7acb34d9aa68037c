//! Behavioural tests for the roster view engine.

use std::collections::HashMap;

use pretty_assertions::assert_eq;

use crate::{
  group::Group,
  persona::{ContactId, Persona, PersonaState, StatusClass},
  prefs::ViewPreferences,
  view::{DisplayGroup, collate, render},
};

// ─── Fixtures ────────────────────────────────────────────────────────────────

fn id(raw: &str) -> ContactId { ContactId::from(raw) }

fn ids(raw: &[&str]) -> Vec<ContactId> {
  raw.iter().copied().map(ContactId::from).collect()
}

fn persona(name: &str, state: PersonaState) -> Persona {
  Persona::new(name, Some(state))
}

fn all_visible() -> ViewPreferences { ViewPreferences::default() }

/// `(group label, [display names])` for compact assertions.
fn shape(view: &[DisplayGroup<'_>]) -> Vec<(String, Vec<String>)> {
  view
    .iter()
    .map(|g| {
      (
        g.label().to_string(),
        g.entries
          .iter()
          .map(|e| e.persona.display_name.clone())
          .collect(),
      )
    })
    .collect()
}

fn owned(shape: &[(&str, &[&str])]) -> Vec<(String, Vec<String>)> {
  shape
    .iter()
    .map(|(g, names)| {
      (g.to_string(), names.iter().map(|n| n.to_string()).collect())
    })
    .collect()
}

/// A mixed roster covering every status class, two named groups and the
/// ungrouped bucket.
fn mixed() -> (Vec<Group>, HashMap<ContactId, Persona>) {
  let groups = vec![
    Group::ungrouped(ids(&["u1", "u2"])),
    Group::new("g2", "work", ids(&["w1", "w2", "w3", "w4"])),
    Group::new("g1", "Gaming", ids(&["p1", "p2", "p3", "ghost"])),
  ];
  let presences = HashMap::from([
    (id("u1"), persona("zed", PersonaState::Offline)),
    (id("u2"), persona("Yan", PersonaState::Snooze)),
    (id("w1"), persona("Carol", PersonaState::Busy)),
    (id("w2"), persona("alice", PersonaState::Online)),
    (id("w3"), persona("Bob", PersonaState::LookingToTrade)),
    (id("w4"), Persona::new("dave", None)),
    (id("p1"), persona("Mia", PersonaState::Away).with_activity("SpaceGame")),
    (id("p2"), persona("Leo", PersonaState::Online)),
    (id("p3"), persona("kim", PersonaState::Away)),
  ]);
  (groups, presences)
}

// ─── Scenarios ───────────────────────────────────────────────────────────────

#[test]
fn scenario_online_before_offline() {
  let groups = vec![Group::new("g1", "Work", ids(&["A", "B"]))];
  let presences = HashMap::from([
    (id("A"), persona("Alice", PersonaState::Online)),
    (id("B"), persona("Bob", PersonaState::Offline)),
  ]);

  let view = render(&groups, &presences, &all_visible());
  assert_eq!(shape(&view), owned(&[("Work", &["Alice", "Bob"])]));
  assert_eq!(view[0].entries[0].class.rank(), 1);
  assert_eq!(view[0].entries[1].class.rank(), 3);
}

#[test]
fn scenario_hide_offline() {
  let groups = vec![Group::new("g1", "Work", ids(&["A", "B"]))];
  let presences = HashMap::from([
    (id("A"), persona("Alice", PersonaState::Online)),
    (id("B"), persona("Bob", PersonaState::Offline)),
  ]);
  let prefs = ViewPreferences {
    show_offline: false,
    ..all_visible()
  };

  let view = render(&groups, &presences, &prefs);
  assert_eq!(shape(&view), owned(&[("Work", &["Alice"])]));
}

#[test]
fn scenario_ungrouped_sorts_last() {
  let groups = vec![
    Group::ungrouped(ids(&["C"])),
    Group::new("g1", "Work", ids(&["A"])),
  ];
  let presences = HashMap::from([
    (id("A"), persona("Alice", PersonaState::Online)),
    (id("C"), persona("Cat", PersonaState::Online)),
  ]);

  let view = render(&groups, &presences, &all_visible());
  assert_eq!(view.len(), 2);
  assert_eq!(view[0].id, Some("g1"));
  assert_eq!(view[1].id, None);
}

#[test]
fn scenario_missing_presence_is_skipped() {
  let groups = vec![Group::new("g1", "Work", ids(&["A", "Z"]))];
  let presences =
    HashMap::from([(id("A"), persona("Alice", PersonaState::Online))]);

  for prefs in [
    all_visible(),
    ViewPreferences {
      sort_by_status: false,
      ..all_visible()
    },
  ] {
    let view = render(&groups, &presences, &prefs);
    assert!(
      view
        .iter()
        .flat_map(|g| &g.entries)
        .all(|e| e.contact_id != &id("Z"))
    );
  }
}

#[test]
fn scenario_in_game_beats_inactive_hiding() {
  let groups = vec![Group::new("g1", "Work", ids(&["A"]))];
  let presences = HashMap::from([(
    id("A"),
    persona("Alice", PersonaState::Away).with_activity("SpaceGame"),
  )]);
  let prefs = ViewPreferences {
    show_inactive: false,
    ..all_visible()
  };

  let view = render(&groups, &presences, &prefs);
  assert_eq!(view[0].entries.len(), 1);
  assert_eq!(view[0].entries[0].class, StatusClass::InGame);
  assert_eq!(view[0].entries[0].class.rank(), 0);
}

// ─── Ordering ────────────────────────────────────────────────────────────────

#[test]
fn sort_by_status_then_name() {
  let (groups, presences) = mixed();
  let view = render(&groups, &presences, &all_visible());

  assert_eq!(
    shape(&view),
    owned(&[
      ("Gaming", &["Mia", "Leo", "kim"]),
      ("work", &["alice", "Bob", "Carol", "dave"]),
      ("Friends", &["Yan", "zed"]),
    ])
  );
}

#[test]
fn sort_by_name_only() {
  let (groups, presences) = mixed();
  let prefs = ViewPreferences {
    sort_by_status: false,
    ..all_visible()
  };
  let view = render(&groups, &presences, &prefs);

  assert_eq!(
    shape(&view),
    owned(&[
      ("Gaming", &["kim", "Leo", "Mia"]),
      ("work", &["alice", "Bob", "Carol", "dave"]),
      ("Friends", &["Yan", "zed"]),
    ])
  );
}

#[test]
fn equal_names_break_ties_by_id() {
  let groups = vec![Group::new("g", "G", ids(&["9", "3", "5"]))];
  let presences = HashMap::from([
    (id("9"), persona("Sam", PersonaState::Online)),
    (id("3"), persona("Sam", PersonaState::Online)),
    (id("5"), persona("Sam", PersonaState::Online)),
  ]);

  let view = render(&groups, &presences, &all_visible());
  let order: Vec<_> = view[0].entries.iter().map(|e| e.contact_id.as_str()).collect();
  assert_eq!(order, vec!["3", "5", "9"]);
}

#[test]
fn duplicate_member_shown_once() {
  let groups = vec![Group::new("g", "G", ids(&["1", "1"]))];
  let presences = HashMap::from([(id("1"), persona("Sam", PersonaState::Online))]);

  let view = render(&groups, &presences, &all_visible());
  assert_eq!(view[0].entries.len(), 1);
}

#[test]
fn collation_ignores_case_but_stays_total() {
  use std::cmp::Ordering;

  assert_eq!(collate("alice", "Bob"), Ordering::Less);
  assert_eq!(collate("Bob", "alice"), Ordering::Greater);
  assert_ne!(collate("ann", "Ann"), Ordering::Equal);
  assert_eq!(collate("Ann", "Ann"), Ordering::Equal);
}

#[test]
fn accented_names_sort_with_their_base_letter() {
  let groups = vec![Group::new("g", "G", ids(&["1", "2", "3"]))];
  let presences = HashMap::from([
    (id("1"), persona("Zoe", PersonaState::Online)),
    (id("2"), persona("Émile", PersonaState::Online)),
    (id("3"), persona("adam", PersonaState::Online)),
  ]);

  let view = render(&groups, &presences, &all_visible());
  let names: Vec<_> = view[0]
    .entries
    .iter()
    .map(|e| e.persona.display_name.as_str())
    .collect();
  assert_eq!(names, vec!["adam", "Émile", "Zoe"]);
}

#[test]
fn accented_group_names_sort_with_their_base_letter() {
  let groups = vec![
    Group::new("1", "Zebras", ids(&["1"])),
    Group::new("2", "Équipe", ids(&["1"])),
    Group::new("3", "alpha", ids(&["1"])),
  ];
  let presences = HashMap::from([(id("1"), persona("Sam", PersonaState::Online))]);

  let view = render(&groups, &presences, &all_visible());
  let labels: Vec<_> = view.iter().map(|g| g.label()).collect();
  assert_eq!(labels, vec!["alpha", "Équipe", "Zebras"]);
}

// ─── Filtering ───────────────────────────────────────────────────────────────

#[test]
fn search_is_case_insensitive_substring() {
  let (groups, presences) = mixed();
  let prefs = ViewPreferences {
    search_text: "A".into(),
    ..all_visible()
  };
  let view = render(&groups, &presences, &prefs);

  assert_eq!(
    shape(&view),
    owned(&[
      ("Gaming", &["Mia"]),
      ("work", &["alice", "Carol", "dave"]),
      ("Friends", &["Yan"]),
    ])
  );
}

#[test]
fn hide_everything_drops_empty_groups() {
  let (groups, presences) = mixed();
  let prefs = ViewPreferences {
    show_offline: false,
    show_inactive: false,
    ..all_visible()
  };
  let view = render(&groups, &presences, &prefs);

  assert_eq!(
    shape(&view),
    owned(&[("Gaming", &["Mia", "Leo"]), ("work", &["alice", "Bob"])])
  );
}

#[test]
fn empty_inputs() {
  let presences = HashMap::new();
  assert!(render(&[], &presences, &all_visible()).is_empty());

  let groups = vec![Group::new("g", "G", [])];
  assert!(render(&groups, &presences, &all_visible()).is_empty());
}

// ─── Properties ──────────────────────────────────────────────────────────────

/// Every combination of the three boolean toggles, with and without a
/// search term.
fn all_prefs() -> Vec<ViewPreferences> {
  let mut out = Vec::new();
  for bits in 0u8..8 {
    for search in ["", "a", "ZE"] {
      out.push(ViewPreferences {
        show_offline:   bits & 1 != 0,
        show_inactive:  bits & 2 != 0,
        sort_by_status: bits & 4 != 0,
        search_text:    search.to_string(),
      });
    }
  }
  out
}

#[test]
fn properties_hold_for_every_preference_combination() {
  let (groups, presences) = mixed();

  for prefs in all_prefs() {
    let view = render(&groups, &presences, &prefs);

    // Idempotent.
    assert_eq!(view, render(&groups, &presences, &prefs), "{prefs:?}");

    // The ungrouped bucket, when present, is last.
    if let Some(pos) = view.iter().position(|g| g.id.is_none()) {
      assert_eq!(pos, view.len() - 1, "{prefs:?}");
    }

    for group in &view {
      // No empty groups.
      assert!(!group.entries.is_empty(), "{prefs:?}");

      for e in &group.entries {
        if !prefs.show_offline {
          assert_ne!(e.class, StatusClass::Offline, "{prefs:?}");
        }
        if !prefs.show_inactive {
          assert_ne!(e.class, StatusClass::Inactive, "{prefs:?}");
        }
        if !prefs.search_text.is_empty() {
          assert!(
            e.persona
              .display_name
              .to_lowercase()
              .contains(&prefs.search_text.to_lowercase()),
            "{prefs:?}"
          );
        }
        // Class is always the shared classification of the persona.
        assert_eq!(e.class, StatusClass::of(e.persona));
      }

      for pair in group.entries.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if prefs.sort_by_status {
          assert!(a.class.rank() <= b.class.rank(), "{prefs:?}");
          if a.class == b.class {
            assert!(
              collate(&a.persona.display_name, &b.persona.display_name).is_le(),
              "{prefs:?}"
            );
          }
        } else {
          assert!(
            collate(&a.persona.display_name, &b.persona.display_name).is_le(),
            "{prefs:?}"
          );
        }
      }
    }
  }
}

#[test]
fn inputs_are_not_mutated() {
  let (groups, presences) = mixed();
  let (groups_before, presences_before) = (groups.clone(), presences.clone());

  let prefs = ViewPreferences {
    show_offline: false,
    search_text: "o".into(),
    ..all_visible()
  };
  let _ = render(&groups, &presences, &prefs);

  assert_eq!(groups, groups_before);
  assert_eq!(presences, presences_before);
}
