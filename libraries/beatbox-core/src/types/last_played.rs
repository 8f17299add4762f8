/// Last-played hint shown at application start
use serde::{Deserialize, Serialize};

/// What the session store remembers about the last started track
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastPlayed {
    /// Display name of the track
    pub name: Option<String>,

    /// Artist of the track
    pub artist: Option<String>,
}

impl LastPlayed {
    /// Create a record with both fields set
    pub fn new(name: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            artist: Some(artist.into()),
        }
    }

    /// Whether nothing has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.artist.is_none()
    }
}
