//! Twitter REST client: fetch one status with its extended media entities.

use async_trait::async_trait;
use serde::Deserialize;

use crate::core::gallery::service::{
    MicroblogAuthor, MicroblogClient, MicroblogMedia, MicroblogStatus,
};
use crate::core::gallery::GalleryError;
use crate::infra::http::{gallery_error, RequestSpec, Transport};

pub struct MicroblogApiClient {
    transport: Transport,
    base_url: String,
    bearer_token: Option<String>,
}

impl MicroblogApiClient {
    pub fn new(bearer_token: Option<String>, transport: Transport) -> Self {
        Self {
            transport,
            base_url: "https://api.twitter.com".to_string(),
            bearer_token,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    id: Option<u64>,
    user: ApiUser,
    extended_entities: Option<ApiEntities>,
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    id: Option<u64>,
    name: Option<String>,
    screen_name: Option<String>,
    profile_image_url_https: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiEntities {
    #[serde(default)]
    media: Vec<ApiMedia>,
}

#[derive(Debug, Deserialize)]
struct ApiMedia {
    #[serde(rename = "type")]
    kind: Option<String>,
    media_url_https: Option<String>,
}

fn map_status(api: ApiStatus) -> MicroblogStatus {
    let media = api
        .extended_entities
        .map(|entities| entities.media)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|m| {
            let url = m.media_url_https?;
            Some(MicroblogMedia {
                is_photo: m.kind.as_deref() == Some("photo"),
                url,
            })
        })
        .collect();

    MicroblogStatus {
        id: api.id.unwrap_or_default(),
        author: MicroblogAuthor {
            id: api.user.id.unwrap_or_default(),
            name: api.user.name.unwrap_or_default(),
            screen_name: api.user.screen_name.unwrap_or_default(),
            avatar_url: api.user.profile_image_url_https,
        },
        media,
    }
}

#[async_trait]
impl MicroblogClient for MicroblogApiClient {
    async fn fetch_status(&self, id: &str) -> Result<MicroblogStatus, GalleryError> {
        let url = format!("{}/1.1/statuses/show.json", self.base_url);
        let spec = RequestSpec {
            bearer: self.bearer_token.clone(),
            query: vec![
                ("id", id.to_string()),
                ("tweet_mode", "extended".to_string()),
            ],
            ..RequestSpec::default()
        };
        let api: ApiStatus = self
            .transport
            .get_json(&url, spec)
            .await
            .map_err(gallery_error)?;
        Ok(map_status(api))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_status_flattens_media() {
        let api: ApiStatus = serde_json::from_str(
            r#"{
                "id": 42,
                "user": {"id": 7, "name": "Artist", "screen_name": "artist", "profile_image_url_https": "https://pbs.example/a.jpg"},
                "extended_entities": {"media": [
                    {"type": "photo", "media_url_https": "https://pbs.example/1.jpg"},
                    {"type": "video", "media_url_https": "https://pbs.example/2.mp4"}
                ]}
            }"#,
        )
        .unwrap();

        let status = map_status(api);
        assert_eq!(status.media.len(), 2);
        assert!(status.media[0].is_photo);
        assert!(!status.media[1].is_photo);
        assert_eq!(status.author.screen_name, "artist");
    }

    #[test]
    fn test_map_status_without_entities_has_no_media() {
        let api: ApiStatus =
            serde_json::from_str(r#"{"id": 42, "user": {"screen_name": "artist"}}"#).unwrap();
        let status = map_status(api);
        assert!(status.media.is_empty());
        assert_eq!(status.author.name, "");
    }
}
