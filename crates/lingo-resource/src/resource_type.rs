//! Supported resource file formats

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::codec::{JsonCodec, PropertiesCodec, ResourceCodec};

/// On-disk format of a project's resources
///
/// A project uses exactly one format for all of its locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    /// Nested JSON objects, one directory per locale
    Json,

    /// Java-style `.properties`, one file per locale plus a default file
    Properties,
}

impl ResourceType {
    /// All supported formats
    pub const ALL: [Self; 2] = [Self::Json, Self::Properties];

    /// File extension without the dot
    #[inline]
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Properties => "properties",
        }
    }

    /// Whether the format has a locale-less default store
    #[inline]
    #[must_use]
    pub fn has_default_store(self) -> bool {
        matches!(self, Self::Properties)
    }

    /// Codec for this format
    #[must_use]
    pub fn codec(self) -> &'static dyn ResourceCodec {
        match self {
            Self::Json => &JsonCodec,
            Self::Properties => &PropertiesCodec,
        }
    }
}

impl Display for ResourceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "JSON",
            Self::Properties => "Properties",
        })
    }
}

impl FromStr for ResourceType {
    type Err = UnknownResourceType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "properties" => Ok(Self::Properties),
            _ => Err(UnknownResourceType(s.to_string())),
        }
    }
}

/// Name that does not match any [`ResourceType`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource type: '{0}'")]
pub struct UnknownResourceType(pub String);
