//! Contact identity and presence — the per-contact snapshot the roster view
//! is computed from.
//!
//! A [`Persona`] is replaced wholesale whenever a fresher snapshot arrives for
//! its [`ContactId`]; nothing in this crate patches one in place.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, de::IgnoredAny};
use strum::{Display, EnumString};

use crate::{Error, Result};

// ─── ContactId ───────────────────────────────────────────────────────────────

/// Opaque, stable identifier for a roster relationship.
///
/// The network hands these out as 64-bit integers; they are kept as strings
/// and ordered by string comparison. Deserialises from either a JSON string
/// or a JSON number.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ContactId(String);

impl ContactId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for ContactId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for ContactId {
  fn from(id: &str) -> Self { Self(id.to_owned()) }
}

impl From<String> for ContactId {
  fn from(id: String) -> Self { Self(id) }
}

impl From<u64> for ContactId {
  fn from(id: u64) -> Self { Self(id.to_string()) }
}

impl<'de> Deserialize<'de> for ContactId {
  fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
      Text(String),
      Number(u64),
    }

    Ok(match Repr::deserialize(d)? {
      Repr::Text(s) => Self(s),
      Repr::Number(n) => Self::from(n),
    })
  }
}

// ─── PersonaState ────────────────────────────────────────────────────────────

/// The status a contact has set for themselves.
///
/// Numeric codes follow the network's wire values (`Offline = 0` through
/// `LookingToPlay = 6`). `Display` yields the human-readable label.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum PersonaState {
  Offline,
  Online,
  Busy,
  Away,
  Snooze,
  #[strum(to_string = "Looking to Trade", serialize = "LookingToTrade")]
  LookingToTrade,
  #[strum(to_string = "Looking to Play", serialize = "LookingToPlay")]
  LookingToPlay,
}

impl PersonaState {
  /// Parse a state from its variant name or its display label.
  pub fn from_name(name: &str) -> Result<Self> {
    name
      .parse()
      .map_err(|_| Error::UnknownPersonaState(name.to_owned()))
  }
}

impl TryFrom<u64> for PersonaState {
  type Error = Error;

  fn try_from(code: u64) -> Result<Self> {
    Ok(match code {
      0 => Self::Offline,
      1 => Self::Online,
      2 => Self::Busy,
      3 => Self::Away,
      4 => Self::Snooze,
      5 => Self::LookingToTrade,
      6 => Self::LookingToPlay,
      other => return Err(Error::UnknownPersonaStateCode(other)),
    })
  }
}

/// Accepts a wire code, a state name, or null. Anything unrecognised is
/// logged and read as "no state", which classifies as offline.
fn lenient_state<'de, D>(d: D) -> Result<Option<PersonaState>, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Repr {
    Code(u64),
    Name(String),
    Other(IgnoredAny),
  }

  let parsed = match Option::<Repr>::deserialize(d)? {
    None => return Ok(None),
    Some(Repr::Code(code)) => PersonaState::try_from(code),
    Some(Repr::Name(name)) => PersonaState::from_name(&name),
    Some(Repr::Other(_)) => {
      Err(Error::UnknownPersonaState("<non-scalar>".to_owned()))
    }
  };

  Ok(match parsed {
    Ok(state) => Some(state),
    Err(e) => {
      tracing::warn!(error = %e, "treating unrecognised persona state as offline");
      None
    }
  })
}

// ─── Persona ─────────────────────────────────────────────────────────────────

/// Live presence snapshot for one contact.
///
/// Field aliases accept the network client's own naming so that raw persona
/// dumps load without translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
  #[serde(alias = "player_name")]
  pub display_name: String,
  #[serde(
    default,
    alias = "persona_state",
    deserialize_with = "lenient_state"
  )]
  pub state:        Option<PersonaState>,
  /// Name of the game or activity the contact is engaged in, if any.
  #[serde(default, alias = "game_name")]
  pub activity:     Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub avatar_url:   Option<String>,
}

impl Persona {
  pub fn new(display_name: impl Into<String>, state: Option<PersonaState>) -> Self {
    Self {
      display_name: display_name.into(),
      state,
      activity: None,
      avatar_url: None,
    }
  }

  pub fn with_activity(mut self, activity: impl Into<String>) -> Self {
    self.activity = Some(activity.into());
    self
  }

  /// The current activity, ignoring an empty string.
  pub fn current_activity(&self) -> Option<&str> {
    self.activity.as_deref().filter(|a| !a.is_empty())
  }

  pub fn class(&self) -> StatusClass { StatusClass::of(self) }

  /// Human-readable status line, e.g. `"Playing SpaceGame"` or `"Away"`.
  pub fn status_text(&self) -> String {
    match self.current_activity() {
      Some(activity) => format!("Playing {activity}"),
      None => self.state.unwrap_or(PersonaState::Offline).to_string(),
    }
  }
}

// ─── StatusClass ─────────────────────────────────────────────────────────────

/// Display classification of a contact. Variant order is sort order: in-game
/// contacts first, offline last.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StatusClass {
  InGame,
  Online,
  Inactive,
  Offline,
}

impl StatusClass {
  /// Classify a persona. This is the only place classification happens;
  /// filtering and ordering both go through it.
  pub fn of(persona: &Persona) -> Self {
    if persona.current_activity().is_some() {
      return Self::InGame;
    }
    match persona.state {
      Some(
        PersonaState::Online
        | PersonaState::LookingToTrade
        | PersonaState::LookingToPlay,
      ) => Self::Online,
      Some(PersonaState::Busy | PersonaState::Away | PersonaState::Snooze) => {
        Self::Inactive
      }
      Some(PersonaState::Offline) | None => Self::Offline,
    }
  }

  /// Sort rank, 0 (in-game) through 3 (offline).
  pub fn rank(self) -> u8 {
    match self {
      Self::InGame => 0,
      Self::Online => 1,
      Self::Inactive => 2,
      Self::Offline => 3,
    }
  }
}
