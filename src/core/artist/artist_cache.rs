//! Single-slot cache of the most recently resolved artist.

use tokio::sync::RwLock;

/// Author info captured from the last microblog post the bot expanded.
#[derive(Debug, Clone)]
pub struct ArtistProfile {
    pub id: u64,
    pub name: String,
    pub screen_name: String,
    pub avatar_url: Option<String>,
}

impl ArtistProfile {
    pub fn profile_url(&self) -> String {
        format!("https://twitter.com/{}", self.screen_name)
    }
}

/// Last-write-wins slot holding the artist behind the newest expanded link.
///
/// Written only from the message dispatch path, read by the `artist`
/// command. Two messages racing through the dispatcher can interleave at
/// network suspension points, so a read may observe the artist of whichever
/// resolution finished last rather than the one posted last; that staleness
/// window is accepted.
#[derive(Debug, Default)]
pub struct ArtistCache {
    slot: RwLock<Option<ArtistProfile>>,
}

impl ArtistCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, artist: ArtistProfile) {
        *self.slot.write().await = Some(artist);
    }

    pub async fn current(&self) -> Option<ArtistProfile> {
        self.slot.read().await.clone()
    }
}
