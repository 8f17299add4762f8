/// Tag reading using lofty
use lofty::{AudioFile, TaggedFileExt};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// The subset of tags the catalog cares about
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackTags {
    /// Track title
    pub title: Option<String>,

    /// Track artist
    pub artist: Option<String>,

    /// Playback duration, when the container reports one
    pub duration: Option<Duration>,
}

impl TrackTags {
    fn from_tag(tag: &lofty::Tag) -> Self {
        let mut tags = Self::default();

        // lofty 0.18 API - iterate through items
        for item in tag.items() {
            match item.key() {
                lofty::ItemKey::TrackTitle => tags.title = non_empty(item.value().text()),
                lofty::ItemKey::TrackArtist => tags.artist = non_empty(item.value().text()),
                _ => {}
            }
        }

        tags
    }
}

fn non_empty(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Read title, artist and duration from `path`
///
/// Never fails: a file lofty cannot parse yields empty tags, which the
/// catalog fills in from the file name.
pub fn read_tags(path: &Path) -> TrackTags {
    let tagged_file = match lofty::read_from_path(path) {
        Ok(file) => file,
        Err(e) => {
            debug!("No readable tags in {}: {}", path.display(), e);
            return TrackTags::default();
        }
    };

    let duration = Some(tagged_file.properties().duration()).filter(|d| !d.is_zero());

    let tag = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.tags().first());

    let mut tags = tag.map(TrackTags::from_tag).unwrap_or_default();
    tags.duration = duration;
    tags
}
