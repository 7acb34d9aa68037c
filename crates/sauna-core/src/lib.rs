//! Core types and the roster view engine for the Sauna friends client.
//!
//! This crate performs no I/O. Presence, roster and preference sources live
//! in the client; they hand their current values to [`view::render`] (usually
//! via [`roster::RosterState`]) and display what comes back.

pub mod error;
pub mod group;
pub mod persona;
pub mod prefs;
pub mod roster;
pub mod view;

pub use error::{Error, Result};
pub use group::{FriendGroup, Group, Relationship};
pub use persona::{ContactId, Persona, PersonaState, StatusClass};
pub use prefs::ViewPreferences;
pub use roster::{PresenceEvent, RosterState};
pub use view::{DisplayEntry, DisplayGroup, render};

#[cfg(test)]
mod tests;
