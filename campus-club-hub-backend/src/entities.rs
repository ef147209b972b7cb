//! Typed records for the documents the store holds. Optional fields carry
//! `#[serde(default)]` so documents written by earlier versions of the app
//! still decode; the only hard requirement is the event surrogate key,
//! which the startup migration backfills before anything reads events.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("Username may only contain letters, digits, '-', '_' and '.'")]
    UsernameCharset,
}

fn required(field: &'static str, value: String) -> Result<String, ValidationError> {
    let value = value.trim().to_owned();
    if value.is_empty() {
        Err(ValidationError::Empty(field))
    } else {
        Ok(value)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Club {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub leader: String,
    #[serde(default)]
    pub founded: String,
    #[serde(default)]
    pub created_by: String,
}

/// A validated club creation request; `founded` and `created_by` are
/// filled in by the registry.
#[derive(Debug)]
pub struct NewClub {
    pub name: String,
    pub description: String,
    pub leader: String,
}

impl NewClub {
    pub fn new(
        name: String,
        description: String,
        leader: String,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: required("Club name", name)?,
            description: required("Description", description)?,
            leader: required("Club leader", leader)?,
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Event {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub club_name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_by: String,
}

pub struct NewEvent {
    pub title: String,
    pub club_name: String,
    pub kind: String,
    pub date: String,
    pub location: String,
    pub description: String,
}

impl NewEvent {
    pub fn new(
        title: String,
        club_name: String,
        kind: String,
        date: String,
        location: String,
        description: String,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            title: required("Event title", title)?,
            club_name: required("Hosting club", club_name)?,
            kind: required("Event type", kind)?,
            date: required("Date", date)?,
            location: required("Location", location)?,
            description: required("Description", description)?,
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Registration {
    pub event_id: String,
    pub username: String,
    #[serde(default)]
    pub timestamp: String,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Student,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct User {
    pub username: String,
    pub password_hash: String,
    #[serde(default)]
    pub role: Role,
}

/// An authenticated requester, as handed out by the accounts lookup.
#[derive(Clone, Debug)]
pub struct Identity {
    pub username: String,
    pub role: Role,
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::Empty("Username"));
    }
    if username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        Ok(())
    } else {
        Err(ValidationError::UsernameCharset)
    }
}
