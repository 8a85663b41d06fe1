//! REST client for danbooru-style image boards. One instance per board
//! host; both boards speak close enough to the same JSON dialect that a
//! single client covers them.

use async_trait::async_trait;
use serde::Deserialize;

use crate::core::config::BoardCredentials;
use crate::core::gallery::service::{BoardClient, BoardPost, BoardQuery};
use crate::core::gallery::GalleryError;
use crate::infra::http::{gallery_error, RequestSpec, Transport};

pub struct BoardApiClient {
    transport: Transport,
    base_url: String,
    credentials: Option<BoardCredentials>,
}

impl BoardApiClient {
    pub fn new(
        base_url: impl Into<String>,
        credentials: Option<BoardCredentials>,
        transport: Transport,
    ) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            credentials,
        }
    }

    fn request_spec(&self) -> RequestSpec {
        RequestSpec {
            basic_auth: self
                .credentials
                .as_ref()
                .map(|c| (c.username.clone(), c.api_key.clone())),
            ..RequestSpec::default()
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiPost {
    id: Option<u64>,
    has_children: Option<bool>,
    parent_id: Option<u64>,
    file_url: Option<String>,
    source: Option<String>,
    tag_string_general: Option<String>,
    tag_string_character: Option<String>,
    tag_string_copyright: Option<String>,
    tag_string_artist: Option<String>,
}

fn map_post(api: ApiPost) -> BoardPost {
    BoardPost {
        id: api.id.unwrap_or_default(),
        has_children: api.has_children.unwrap_or(false),
        parent_id: api.parent_id,
        file_url: api.file_url.filter(|u| !u.is_empty()),
        source: api.source.filter(|u| !u.is_empty()),
        general_tags: api.tag_string_general.unwrap_or_default(),
        character_tags: api.tag_string_character.unwrap_or_default(),
        copyright_tags: api.tag_string_copyright.unwrap_or_default(),
        artist_tags: api.tag_string_artist.unwrap_or_default(),
    }
}

#[async_trait]
impl BoardClient for BoardApiClient {
    async fn fetch_post(&self, id: &str) -> Result<BoardPost, GalleryError> {
        let url = format!("{}/posts/{}.json", self.base_url, id);
        let api: ApiPost = self
            .transport
            .get_json(&url, self.request_spec())
            .await
            .map_err(gallery_error)?;
        Ok(map_post(api))
    }

    async fn search_posts(&self, query: &BoardQuery) -> Result<Vec<BoardPost>, GalleryError> {
        let url = format!("{}/posts.json", self.base_url);
        let mut spec = self.request_spec();
        spec.query = vec![
            ("tags", query.tags.clone()),
            ("limit", query.limit.to_string()),
            ("random", query.random.to_string()),
        ];
        let posts: Vec<ApiPost> = self
            .transport
            .get_json(&url, spec)
            .await
            .map_err(gallery_error)?;
        Ok(posts.into_iter().map(map_post).collect())
    }
}
