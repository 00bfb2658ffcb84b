// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wedding records as returned by `GET /weddings`.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Wedding identifier. The backend may encode it as a number or a string;
/// both normalize to the same textual id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct WeddingId(String);

impl WeddingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WeddingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WeddingId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for WeddingId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => WeddingId(text),
            RawId::Number(number) => WeddingId(number.to_string()),
        })
    }
}

/// Per-user, per-wedding capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    Edit,
    /// Unknown levels are treated as read-only.
    #[serde(other)]
    View,
}

impl PermissionLevel {
    pub fn label(self) -> &'static str {
        match self {
            PermissionLevel::Edit => "Edit",
            PermissionLevel::View => "View",
        }
    }
}

/// A wedding the current user can access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wedding {
    pub wedding_id: WeddingId,
    #[serde(default)]
    pub bride_name: String,
    #[serde(default)]
    pub groom_name: String,
    /// ISO 8601 date, when already decided
    #[serde(default)]
    pub wedding_date: Option<String>,
    /// Permission of the current user on this wedding
    pub permission_level: PermissionLevel,
    /// Remaining planning metadata (style, budget, locations, ...)
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

impl Wedding {
    pub fn can_edit(&self) -> bool {
        self.permission_level == PermissionLevel::Edit
    }
}

/// Payload for `POST /weddings`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewWedding {
    pub bride_name: String,
    pub groom_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wedding_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wedding_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_guests: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_budget: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub color_palette: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ceremony_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reception_location: Option<String>,
}
