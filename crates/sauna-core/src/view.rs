//! The roster view engine.
//!
//! [`render`] turns groups, presence records and view preferences into the
//! ordered, filtered, grouped list a friends pane displays. It is a pure
//! function: nothing is cached between calls and no input is mutated, so the
//! caller simply re-runs it whenever any input changes.

use std::{cmp::Ordering, collections::HashMap};

use icu_collator::{Collator, CollatorOptions, Strength};
use serde::Serialize;

use crate::{
  group::{DEFAULT_GROUP_LABEL, Group},
  persona::{ContactId, Persona, StatusClass},
  prefs::ViewPreferences,
};

// ─── Output ──────────────────────────────────────────────────────────────────

/// One contact ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayEntry<'a> {
  pub contact_id: &'a ContactId,
  pub persona:    &'a Persona,
  pub class:      StatusClass,
}

/// A non-empty group of display entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayGroup<'a> {
  pub id:      Option<&'a str>,
  pub name:    Option<&'a str>,
  pub entries: Vec<DisplayEntry<'a>>,
}

impl<'a> DisplayGroup<'a> {
  pub fn label(&self) -> &'a str { self.name.unwrap_or(DEFAULT_GROUP_LABEL) }
}

// ─── Engine ──────────────────────────────────────────────────────────────────

/// Compute the display list.
///
/// - Members without a presence record are skipped.
/// - Offline contacts are hidden unless `show_offline`; inactive contacts are
///   hidden unless `show_inactive` (in-game contacts are never inactive).
/// - A non-empty `search_text` keeps only display names containing it,
///   ignoring case.
/// - Entries sort by status rank then name when `sort_by_status`, by name
///   otherwise, with the contact id as the final tie-break.
/// - Groups sort by name with the ungrouped bucket last; empty groups are
///   dropped.
pub fn render<'a>(
  groups: &'a [Group],
  presences: &'a HashMap<ContactId, Persona>,
  prefs: &ViewPreferences,
) -> Vec<DisplayGroup<'a>> {
  let needle = prefs.search_text.to_lowercase();

  let mut out: Vec<DisplayGroup<'a>> = groups
    .iter()
    .filter_map(|group| {
      let mut entries: Vec<DisplayEntry<'a>> = group
        .members
        .iter()
        .filter_map(|id| {
          let persona = presences.get(id)?;
          let class = StatusClass::of(persona);
          is_visible(persona, class, prefs, &needle).then_some(DisplayEntry {
            contact_id: id,
            persona,
            class,
          })
        })
        .collect();

      if entries.is_empty() {
        return None;
      }

      entries.sort_by(|a, b| compare_entries(a, b, prefs.sort_by_status));
      // A contact listed twice in one group is shown once.
      entries.dedup_by(|a, b| a.contact_id == b.contact_id);

      Some(DisplayGroup {
        id: group.id.as_deref(),
        name: group.name.as_deref(),
        entries,
      })
    })
    .collect();

  out.sort_by(compare_groups);
  out
}

fn is_visible(
  persona: &Persona,
  class: StatusClass,
  prefs: &ViewPreferences,
  needle: &str,
) -> bool {
  if !prefs.show_offline && class == StatusClass::Offline {
    return false;
  }
  // InGame can never be Inactive, so the in-game override needs no branch.
  if !prefs.show_inactive && class == StatusClass::Inactive {
    return false;
  }
  needle.is_empty() || persona.display_name.to_lowercase().contains(needle)
}

fn compare_entries(
  a: &DisplayEntry<'_>,
  b: &DisplayEntry<'_>,
  by_status: bool,
) -> Ordering {
  let by_rank = if by_status {
    a.class.rank().cmp(&b.class.rank())
  } else {
    Ordering::Equal
  };

  by_rank
    .then_with(|| collate(&a.persona.display_name, &b.persona.display_name))
    .then_with(|| a.contact_id.cmp(b.contact_id))
}

fn compare_groups(a: &DisplayGroup<'_>, b: &DisplayGroup<'_>) -> Ordering {
  a.id
    .is_none()
    .cmp(&b.id.is_none())
    .then_with(|| collate(a.name.unwrap_or(""), b.name.unwrap_or("")))
    .then_with(|| a.id.cmp(&b.id))
}

thread_local! {
  static COLLATOR: Option<Collator> = root_collator();
}

/// Root-locale collator at secondary strength: accents count, case does not.
fn root_collator() -> Option<Collator> {
  let mut options = CollatorOptions::new();
  options.strength = Some(Strength::Secondary);
  Collator::try_new(&Default::default(), options)
    .inspect_err(|error| {
      tracing::warn!(?error, "collator unavailable, comparing names by code point")
    })
    .ok()
}

/// Locale-aware, case-insensitive name order. Names the collator treats as
/// equal fall back to byte order so that the order stays total.
pub fn collate(a: &str, b: &str) -> Ordering {
  COLLATOR
    .with(|collator| match collator {
      Some(collator) => collator.compare(a, b),
      None => {
        let lower_a = a.chars().flat_map(char::to_lowercase);
        let lower_b = b.chars().flat_map(char::to_lowercase);
        lower_a.cmp(lower_b)
      }
    })
    .then_with(|| a.cmp(b))
}
