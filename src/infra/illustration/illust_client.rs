//! Pixiv app-API client. The platform hands out short-lived session tokens
//! for a username/password pair and refuses image downloads without its
//! referer header, so images come back as bytes for re-upload.

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::core::config::IllustCredentials;
use crate::core::gallery::service::{
    IllustClient, IllustDetail, IllustPage, IllustPages, IllustResponse,
};
use crate::core::gallery::GalleryError;
use crate::infra::http::{gallery_error, RequestSpec, Transport, TransportError};

const APP_BASE_URL: &str = "https://app-api.pixiv.net";
const AUTH_URL: &str = "https://oauth.secure.pixiv.net/auth/token";
const REFERER: &str = "https://app-api.pixiv.net/";
// Client pair the mobile app identifies itself with.
const CLIENT_ID: &str = "MOBrBDS8blbauoSck0ZfDbtuzpyT";
const CLIENT_SECRET: &str = "lsACyCD94FhDUtGTXi3QzcFE2uU1hqtDaKeqrdwj";

pub struct IllustApiClient {
    transport: Transport,
    credentials: Option<IllustCredentials>,
    session_token: RwLock<Option<String>>,
}

impl IllustApiClient {
    pub fn new(credentials: Option<IllustCredentials>, transport: Transport) -> Self {
        Self {
            transport,
            credentials,
            session_token: RwLock::new(None),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiAuthResponse {
    response: ApiAuthInner,
}

#[derive(Debug, Deserialize)]
struct ApiAuthInner {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct ApiIllustResponse {
    error: Option<ApiError>,
    illust: Option<ApiIllust>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    user_message: String,
}

#[derive(Debug, Deserialize)]
struct ApiIllust {
    id: Option<u64>,
    title: Option<String>,
    user: Option<ApiIllustUser>,
    image_urls: Option<ApiImageUrls>,
    meta_single_page: Option<ApiSinglePage>,
    #[serde(default)]
    meta_pages: Vec<ApiPage>,
}

#[derive(Debug, Deserialize)]
struct ApiIllustUser {
    id: Option<u64>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiImageUrls {
    medium: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiSinglePage {
    // Present only on single-page posts; its own fields are unused.
}

#[derive(Debug, Deserialize)]
struct ApiPage {
    image_urls: Option<ApiImageUrls>,
}

fn map_illust(api: ApiIllust, id_hint: &str) -> Result<IllustDetail, GalleryError> {
    // Decide the page shape once here; everything downstream matches on it.
    let pages = if !api.meta_pages.is_empty() {
        IllustPages::Multi(
            api.meta_pages
                .into_iter()
                .map(|page| IllustPage {
                    image_url: page.image_urls.and_then(|urls| urls.medium),
                })
                .collect(),
        )
    } else if api.meta_single_page.is_some() {
        IllustPages::Single(IllustPage { image_url: None })
    } else {
        return Err(GalleryError::NotFound(format!(
            "illustration {} has no page data",
            id_hint
        )));
    };

    let user = api.user.unwrap_or(ApiIllustUser {
        id: None,
        name: None,
    });
    Ok(IllustDetail {
        id: api.id.unwrap_or_default(),
        title: api.title.unwrap_or_default(),
        author_id: user.id.unwrap_or_default(),
        author_name: user.name.unwrap_or_default(),
        fallback_image_url: api.image_urls.and_then(|urls| urls.medium),
        pages,
    })
}

#[async_trait]
impl IllustClient for IllustApiClient {
    async fn has_session(&self) -> bool {
        self.session_token.read().await.is_some()
    }

    async fn login(&self) -> Result<(), GalleryError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or_else(|| GalleryError::Auth("no illustration credentials configured".into()))?;

        let form = [
            ("grant_type", "password".to_string()),
            ("client_id", CLIENT_ID.to_string()),
            ("client_secret", CLIENT_SECRET.to_string()),
            ("username", credentials.username.clone()),
            ("password", credentials.password.clone()),
            ("get_secure_url", "1".to_string()),
        ];
        let auth: ApiAuthResponse = self
            .transport
            .post_form_json(AUTH_URL, &form)
            .await
            .map_err(|err| GalleryError::Auth(err.to_string()))?;

        *self.session_token.write().await = Some(auth.response.access_token);
        Ok(())
    }

    async fn illust_detail(&self, id: &str) -> Result<IllustResponse, GalleryError> {
        let url = format!("{}/v1/illust/detail", APP_BASE_URL);
        let spec = RequestSpec {
            bearer: self.session_token.read().await.clone(),
            query: vec![("illust_id", id.to_string())],
            ..RequestSpec::default()
        };

        let api: ApiIllustResponse = match self.transport.get_json(&url, spec).await {
            Ok(api) => api,
            // Auth problems come back as client errors; report them in-band
            // so the service can re-login and retry once.
            Err(err @ TransportError::Status { .. })
                if err.status().map_or(false, |s| s.is_client_error()) =>
            {
                return Ok(IllustResponse::ErrorPayload(err.to_string()));
            }
            Err(err) => return Err(gallery_error(err)),
        };

        if let Some(error) = api.error {
            let message = if error.user_message.is_empty() {
                error.message
            } else {
                error.user_message
            };
            return Ok(IllustResponse::ErrorPayload(message));
        }
        let Some(illust) = api.illust else {
            return Err(GalleryError::NotFound(id.to_string()));
        };
        Ok(IllustResponse::Illust(map_illust(illust, id)?))
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, GalleryError> {
        let spec = RequestSpec {
            headers: vec![("Referer", REFERER.to_string())],
            ..RequestSpec::default()
        };
        self.transport
            .get_bytes(url, spec)
            .await
            .map_err(gallery_error)
    }
}
