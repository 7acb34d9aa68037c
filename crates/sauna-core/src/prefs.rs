//! View preferences — user-controlled filter and sort toggles.

use serde::{Deserialize, Serialize};

/// Display toggles applied by [`crate::view::render`].
///
/// `search_text` is session state: it is skipped when (de)serialising so a
/// persisted preference file never carries a stale search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewPreferences {
  pub show_offline:   bool,
  pub show_inactive:  bool,
  pub sort_by_status: bool,
  #[serde(skip)]
  pub search_text:    String,
}

impl Default for ViewPreferences {
  fn default() -> Self {
    Self {
      show_offline:   true,
      show_inactive:  true,
      sort_by_status: true,
      search_text:    String::new(),
    }
  }
}
