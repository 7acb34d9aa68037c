//! Groups — named buckets that partition the roster.
//!
//! Groups are rebuilt wholesale from the roster and the user's friend-group
//! definitions every time either changes; they are never patched.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::persona::ContactId;

/// Header shown for a group without a name (including the ungrouped bucket).
pub const DEFAULT_GROUP_LABEL: &str = "Friends";

// ─── Relationship ────────────────────────────────────────────────────────────

/// What the local user's relationship with a roster entry is. Only the
/// presence of a roster key matters to the view; the value is informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
  /// No relationship; used by events to remove an entry.
  None,
  #[default]
  Friend,
  RequestRecipient,
  RequestInitiator,
  Blocked,
  Ignored,
}

// ─── Friend groups ───────────────────────────────────────────────────────────

/// A user-defined friend group as delivered by the roster source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendGroup {
  pub name:    String,
  #[serde(default)]
  pub members: Vec<ContactId>,
}

// ─── Group ───────────────────────────────────────────────────────────────────

/// A bucket of contacts as consumed by the view engine.
///
/// `id == None` marks the implicit "ungrouped" bucket, which always renders
/// last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
  pub id:      Option<String>,
  pub name:    Option<String>,
  pub members: Vec<ContactId>,
}

impl Group {
  pub fn new(
    id: impl Into<String>,
    name: impl Into<String>,
    members: impl IntoIterator<Item = ContactId>,
  ) -> Self {
    Self {
      id:      Some(id.into()),
      name:    Some(name.into()),
      members: members.into_iter().collect(),
    }
  }

  pub fn ungrouped(members: impl IntoIterator<Item = ContactId>) -> Self {
    Self {
      id:      None,
      name:    None,
      members: members.into_iter().collect(),
    }
  }

  pub fn is_ungrouped(&self) -> bool { self.id.is_none() }

  pub fn label(&self) -> &str {
    self.name.as_deref().unwrap_or(DEFAULT_GROUP_LABEL)
  }
}

/// Build the group list from the roster and the friend-group definitions.
///
/// One group per friend group, in id order, keeping each group's declared
/// member order. Roster entries that belong to no friend group are collected
/// into a trailing ungrouped bucket (in id order), which is omitted when
/// empty. Friend-group members missing from the roster are kept as-is.
pub fn build_groups<V>(
  roster: &BTreeMap<ContactId, V>,
  friend_groups: &BTreeMap<String, FriendGroup>,
) -> Vec<Group> {
  let mut ungrouped: BTreeSet<&ContactId> = roster.keys().collect();
  let mut groups = Vec::with_capacity(friend_groups.len() + 1);

  for (id, fg) in friend_groups {
    for member in &fg.members {
      ungrouped.remove(member);
    }
    groups.push(Group::new(id.clone(), fg.name.clone(), fg.members.iter().cloned()));
  }

  if !ungrouped.is_empty() {
    groups.push(Group::ungrouped(ungrouped.into_iter().cloned()));
  }

  groups
}
