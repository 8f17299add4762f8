//! Domain types for BeatBox

mod ids;
mod last_played;
mod track;

pub use ids::TrackId;
pub use last_played::LastPlayed;
pub use track::{ResourceHandle, TrackDescriptor, UNKNOWN_ARTIST};
