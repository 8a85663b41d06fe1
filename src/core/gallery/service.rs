//! Turns resolved art-site links into normalized gallery runs.
//!
//! The service owns the per-site rules (sibling searches on the boards, the
//! first-attachment skip on the microblog, the one-shot re-login on the
//! illustration platform) and leaves all Discord specifics to the discord
//! layer. Upstream APIs are reached through the client traits below, which
//! the infra layer implements.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::artist::{ArtistCache, ArtistProfile};
use crate::core::config::{BotConfig, SiteConfig};

use super::links;
use super::resolver::{extract_identifier, SiteResolver};
use super::tags;
use super::{
    AuthorBlock, ExternalLink, GalleryError, GalleryFooter, GalleryItem, ImageSource, ProviderKind,
};

const TWITTER_USER_URL: &str = "https://twitter.com/";
const PIXIV_MEMBER_URL: &str = "https://www.pixiv.net/member.php?id=";

/// A single image-board post, as far as the bot cares about it.
#[derive(Debug, Clone, Default)]
pub struct BoardPost {
    pub id: u64,
    pub has_children: bool,
    pub parent_id: Option<u64>,
    pub file_url: Option<String>,
    pub source: Option<String>,
    pub general_tags: String,
    pub character_tags: String,
    pub copyright_tags: String,
    pub artist_tags: String,
}

/// Tag search parameters for the board API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardQuery {
    pub tags: String,
    pub limit: usize,
    pub random: bool,
}

#[async_trait]
pub trait BoardClient: Send + Sync {
    async fn fetch_post(&self, id: &str) -> Result<BoardPost, GalleryError>;
    async fn search_posts(&self, query: &BoardQuery) -> Result<Vec<BoardPost>, GalleryError>;
}

#[derive(Debug, Clone)]
pub struct MicroblogAuthor {
    pub id: u64,
    pub name: String,
    pub screen_name: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MicroblogMedia {
    pub is_photo: bool,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct MicroblogStatus {
    pub id: u64,
    pub author: MicroblogAuthor,
    pub media: Vec<MicroblogMedia>,
}

#[async_trait]
pub trait MicroblogClient: Send + Sync {
    async fn fetch_status(&self, id: &str) -> Result<MicroblogStatus, GalleryError>;
}

/// One page of an illustration. `image_url` may be absent for single-page
/// posts, which only carry an illustration-level URL.
#[derive(Debug, Clone)]
pub struct IllustPage {
    pub image_url: Option<String>,
}

/// Page layout, decided once when the response is parsed.
#[derive(Debug, Clone)]
pub enum IllustPages {
    Single(IllustPage),
    Multi(Vec<IllustPage>),
}

#[derive(Debug, Clone)]
pub struct IllustDetail {
    pub id: u64,
    pub title: String,
    pub author_id: u64,
    pub author_name: String,
    /// Illustration-level image, the fallback when a page has none.
    pub fallback_image_url: Option<String>,
    pub pages: IllustPages,
}

/// Outcome of one detail call: either data, or the platform's in-band error
/// payload (expired session, bad id). The service decides whether to re-login.
#[derive(Debug, Clone)]
pub enum IllustResponse {
    Illust(IllustDetail),
    ErrorPayload(String),
}

#[async_trait]
pub trait IllustClient: Send + Sync {
    async fn has_session(&self) -> bool;
    async fn login(&self) -> Result<(), GalleryError>;
    async fn illust_detail(&self, id: &str) -> Result<IllustResponse, GalleryError>;
    /// Download image bytes. The platform refuses requests without its
    /// referer header, so the bytes get re-uploaded as an attachment.
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, GalleryError>;
}

/// How one board search hit should be presented.
#[derive(Debug, Clone)]
pub enum BoardHit {
    Embed {
        title: String,
        image_url: String,
        post_url: String,
    },
    /// The post page link alone; the chat platform renders its own preview.
    Plain { url: String },
}

pub struct GalleryService<B, M, I> {
    config: Arc<BotConfig>,
    resolver: SiteResolver,
    boards: HashMap<ProviderKind, B>,
    microblog: M,
    illust: I,
    artists: Arc<ArtistCache>,
}

impl<B, M, I> GalleryService<B, M, I>
where
    B: BoardClient,
    M: MicroblogClient,
    I: IllustClient,
{
    pub fn new(
        config: Arc<BotConfig>,
        boards: HashMap<ProviderKind, B>,
        microblog: M,
        illust: I,
        artists: Arc<ArtistCache>,
    ) -> Self {
        let resolver = SiteResolver::from_config(&config);
        Self {
            config,
            resolver,
            boards,
            microblog,
            illust,
            artists,
        }
    }

    pub fn resolve(&self, domain: &str) -> Option<ProviderKind> {
        self.resolver.resolve(domain)
    }

    /// Expand one link into gallery items. An empty vec means "nothing to
    /// post" (unknown site, no identifier, single post with no gallery);
    /// errors mean the upstream misbehaved and are the caller's to log.
    pub async fn gallery_for(&self, link: &ExternalLink) -> Result<Vec<GalleryItem>, GalleryError> {
        let Some(kind) = self.resolve(&link.domain) else {
            return Ok(Vec::new());
        };
        let Some(site) = self.config.site(kind) else {
            return Ok(Vec::new());
        };
        let Some(post_id) = extract_identifier(&link.url, &site.id_rules) else {
            return Ok(Vec::new());
        };

        match kind {
            ProviderKind::Danbooru | ProviderKind::E621 => {
                self.board_gallery(kind, site, &post_id).await
            }
            ProviderKind::Twitter => self.microblog_gallery(site, &post_id).await,
            ProviderKind::Pixiv => self.illust_gallery(site, &post_id).await,
        }
    }

    /// A board post is a gallery when it has children (it is the parent) or
    /// a parent (it is one of the children). Siblings are searched with
    /// `parent:<root> order:id -id:<self>`; a lone post renders nothing.
    async fn board_gallery(
        &self,
        kind: ProviderKind,
        site: &SiteConfig,
        post_id: &str,
    ) -> Result<Vec<GalleryItem>, GalleryError> {
        let client = self.board_client(kind)?;
        let post = client.fetch_post(post_id).await?;

        let root = if post.has_children {
            post.id
        } else if let Some(parent_id) = post.parent_id {
            parent_id
        } else {
            return Ok(Vec::new());
        };
        let query = BoardQuery {
            tags: format!("parent:{} order:id -id:{}", root, post.id),
            limit: site.gallery_fetch_limit,
            random: false,
        };
        let siblings = client.search_posts(&query).await?;

        let total = siblings.len();
        let mut items = Vec::new();
        for sibling in siblings.into_iter().take(site.item_cap) {
            let Some(image_url) = sibling.file_url.clone().or_else(|| sibling.source.clone())
            else {
                continue;
            };
            let title = tags::board_post_title(
                &sibling.character_tags,
                &sibling.copyright_tags,
                &sibling.artist_tags,
                sibling.id,
                &site.name,
                site.max_title_len,
            );
            items.push(GalleryItem {
                title: Some(title),
                link: post_page_url(site, sibling.id),
                image: ImageSource::Url(image_url),
                author: None,
                footer: None,
            });
        }
        apply_footer(&mut items, total, site);
        Ok(items)
    }

    /// Galleries only exist for posts with more than one attachment, and the
    /// first one is skipped: the chat platform's own link preview already
    /// shows it. Resolving the status always records its author, gallery or
    /// not, so the `artist` command has something to talk about.
    async fn microblog_gallery(
        &self,
        site: &SiteConfig,
        post_id: &str,
    ) -> Result<Vec<GalleryItem>, GalleryError> {
        let status = self.microblog.fetch_status(post_id).await?;

        self.artists
            .record(ArtistProfile {
                id: status.author.id,
                name: status.author.name.clone(),
                screen_name: status.author.screen_name.clone(),
                avatar_url: status.author.avatar_url.clone(),
            })
            .await;

        if status.media.len() <= 1 {
            return Ok(Vec::new());
        }

        let suffix = site.image_quality_suffix.as_deref().unwrap_or("");
        let mut picture_urls = Vec::new();
        for media in &status.media[1..] {
            if !media.is_photo {
                // Mixed photo/video posts are left to the native preview.
                return Ok(Vec::new());
            }
            picture_urls.push(format!("{}{}", media.url, suffix));
        }

        let author = AuthorBlock {
            name: format!("{} (@{})", status.author.name, status.author.screen_name),
            url: Some(format!("{}{}", TWITTER_USER_URL, status.author.screen_name)),
            icon_url: status.author.avatar_url.clone(),
        };

        let total = picture_urls.len();
        let mut items: Vec<GalleryItem> = picture_urls
            .into_iter()
            .take(site.item_cap)
            .map(|url| GalleryItem {
                title: None,
                link: None,
                image: ImageSource::Url(url),
                author: Some(author.clone()),
                footer: None,
            })
            .collect();
        apply_footer(&mut items, total, site);
        Ok(items)
    }

    /// The illustration platform hands out session tokens that expire under
    /// us. Login is lazy, and an in-band error payload earns exactly one
    /// re-login and retry before the whole thing counts as an auth failure.
    async fn illust_gallery(
        &self,
        site: &SiteConfig,
        post_id: &str,
    ) -> Result<Vec<GalleryItem>, GalleryError> {
        if !self.illust.has_session().await {
            self.illust.login().await?;
        }

        let detail = match self.illust.illust_detail(post_id).await? {
            IllustResponse::Illust(detail) => detail,
            IllustResponse::ErrorPayload(_) => {
                self.illust.login().await?;
                match self.illust.illust_detail(post_id).await? {
                    IllustResponse::Illust(detail) => detail,
                    IllustResponse::ErrorPayload(message) => {
                        return Err(GalleryError::Auth(message));
                    }
                }
            }
        };

        let pages = match detail.pages {
            IllustPages::Single(page) => vec![page],
            IllustPages::Multi(pages) => pages,
        };
        let total = pages.len();

        let author = AuthorBlock {
            name: detail.author_name.clone(),
            url: Some(format!("{}{}", PIXIV_MEMBER_URL, detail.author_id)),
            icon_url: None,
        };

        let mut items = Vec::new();
        for page in pages.into_iter().take(site.item_cap) {
            let Some(image_url) = page
                .image_url
                .or_else(|| detail.fallback_image_url.clone())
            else {
                continue;
            };
            let bytes = self.illust.fetch_image(&image_url).await?;
            items.push(GalleryItem {
                title: None,
                link: None,
                image: ImageSource::Attachment {
                    filename: links::file_name_of(&image_url),
                    bytes,
                },
                author: Some(author.clone()),
                footer: None,
            });
        }
        apply_footer(&mut items, total, site);
        Ok(items)
    }

    /// Explicit tag search for the board commands: a few random hits, each
    /// rendered either as an image embed or as a bare link the platform can
    /// preview itself.
    pub async fn board_search(
        &self,
        kind: ProviderKind,
        tags_query: &str,
    ) -> Result<Vec<BoardHit>, GalleryError> {
        let Some(site) = self.config.site(kind) else {
            return Ok(Vec::new());
        };
        let client = self.board_client(kind)?;
        let query = BoardQuery {
            tags: tags_query.to_string(),
            limit: 3,
            random: true,
        };
        let posts = client.search_posts(&query).await?;

        let mut hits = Vec::new();
        for post in posts {
            let post_url = post_page_url(site, post.id).unwrap_or_default();
            // Posts tagged with a format the page won't preview get their
            // file linked directly; everything else links the post page.
            let chosen = if self.has_no_preview_tag(&post) {
                post.file_url
                    .clone()
                    .or_else(|| post.source.clone())
                    .unwrap_or_else(|| post_url.clone())
            } else {
                post_url.clone()
            };

            if is_direct_embed(&chosen) {
                hits.push(BoardHit::Embed {
                    title: tags::board_post_title(
                        &post.character_tags,
                        &post.copyright_tags,
                        &post.artist_tags,
                        post.id,
                        &site.name,
                        site.max_title_len,
                    ),
                    image_url: chosen,
                    post_url,
                });
            } else {
                hits.push(BoardHit::Plain { url: chosen });
            }
        }
        Ok(hits)
    }

    fn board_client(&self, kind: ProviderKind) -> Result<&B, GalleryError> {
        self.boards
            .get(&kind)
            .ok_or_else(|| GalleryError::Network(format!("no board client for {:?}", kind)))
    }

    fn has_no_preview_tag(&self, post: &BoardPost) -> bool {
        let tags: Vec<&str> = post.general_tags.split_whitespace().collect();
        self.config
            .rules
            .no_preview_tags
            .iter()
            .any(|no_preview| tags.iter().any(|t| t == no_preview))
    }
}

fn post_page_url(site: &SiteConfig, post_id: u64) -> Option<String> {
    site.post_page_base
        .as_ref()
        .map(|base| format!("{}{}", base, post_id))
}

/// Only direct file hosts render inside an embed; post pages do not.
fn is_direct_embed(url: &str) -> bool {
    url.contains("/data/") || url.contains("raikou")
}

/// Mark the last emitted item: a pagination footer when the source had more
/// items than we posted, the plain site attribution otherwise.
fn apply_footer(items: &mut [GalleryItem], total_available: usize, site: &SiteConfig) {
    let shown = items.len();
    let Some(last) = items.last_mut() else {
        return;
    };
    let text = if total_available > shown {
        format!("{}+ remaining", total_available - shown)
    } else {
        site.name.clone()
    };
    last.footer = Some(GalleryFooter {
        text,
        icon_url: site.favicon.clone(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeBoard {
        post: Option<BoardPost>,
        search_results: Vec<BoardPost>,
        searches: Mutex<Vec<BoardQuery>>,
    }

    #[async_trait]
    impl BoardClient for FakeBoard {
        async fn fetch_post(&self, id: &str) -> Result<BoardPost, GalleryError> {
            self.post
                .clone()
                .ok_or_else(|| GalleryError::NotFound(id.to_string()))
        }

        async fn search_posts(&self, query: &BoardQuery) -> Result<Vec<BoardPost>, GalleryError> {
            self.searches.lock().unwrap().push(query.clone());
            Ok(self.search_results.clone())
        }
    }

    #[derive(Default)]
    struct FakeMicroblog {
        status: Option<MicroblogStatus>,
    }

    #[async_trait]
    impl MicroblogClient for FakeMicroblog {
        async fn fetch_status(&self, id: &str) -> Result<MicroblogStatus, GalleryError> {
            self.status
                .clone()
                .ok_or_else(|| GalleryError::NotFound(id.to_string()))
        }
    }

    #[derive(Default)]
    struct FakeIllust {
        /// Successive detail responses, consumed front to back.
        responses: Mutex<Vec<IllustResponse>>,
        detail_calls: Mutex<usize>,
        login_calls: Mutex<usize>,
        logged_in: Mutex<bool>,
    }

    #[async_trait]
    impl IllustClient for FakeIllust {
        async fn has_session(&self) -> bool {
            *self.logged_in.lock().unwrap()
        }

        async fn login(&self) -> Result<(), GalleryError> {
            *self.login_calls.lock().unwrap() += 1;
            *self.logged_in.lock().unwrap() = true;
            Ok(())
        }

        async fn illust_detail(&self, id: &str) -> Result<IllustResponse, GalleryError> {
            *self.detail_calls.lock().unwrap() += 1;
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                return Err(GalleryError::NotFound(id.to_string()));
            }
            Ok(responses.remove(0))
        }

        async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, GalleryError> {
            Ok(url.as_bytes().to_vec())
        }
    }

    fn service(
        board: FakeBoard,
        microblog: FakeMicroblog,
        illust: FakeIllust,
    ) -> GalleryService<FakeBoard, FakeMicroblog, FakeIllust> {
        let config = Arc::new(BotConfig::default());
        let mut boards = HashMap::new();
        boards.insert(ProviderKind::Danbooru, board);
        GalleryService::new(
            config,
            boards,
            microblog,
            illust,
            Arc::new(ArtistCache::new()),
        )
    }

    fn board_link(id: u64) -> ExternalLink {
        let url = format!("https://danbooru.donmai.us/posts/{}?q=1", id);
        ExternalLink {
            domain: links::domain_of(&url),
            url,
        }
    }

    fn tweet_link(id: u64) -> ExternalLink {
        let url = format!("https://twitter.com/someone/status/{}", id);
        ExternalLink {
            domain: links::domain_of(&url),
            url,
        }
    }

    fn illust_link(id: u64) -> ExternalLink {
        let url = format!("https://www.pixiv.net/member_illust.php?mode=medium&illust_id={}", id);
        ExternalLink {
            domain: links::domain_of(&url),
            url,
        }
    }

    fn board_post(id: u64) -> BoardPost {
        BoardPost {
            id,
            file_url: Some(format!("https://cdn.example/data/{}.jpg", id)),
            ..BoardPost::default()
        }
    }

    fn photo(url: &str) -> MicroblogMedia {
        MicroblogMedia {
            is_photo: true,
            url: url.to_string(),
        }
    }

    fn status_with_media(media: Vec<MicroblogMedia>) -> MicroblogStatus {
        MicroblogStatus {
            id: 1,
            author: MicroblogAuthor {
                id: 42,
                name: "Some Artist".to_string(),
                screen_name: "someartist".to_string(),
                avatar_url: Some("https://pbs.example/avatar.jpg".to_string()),
            },
            media,
        }
    }

    fn illust_detail(pages: IllustPages) -> IllustDetail {
        IllustDetail {
            id: 9,
            title: "Untitled".to_string(),
            author_id: 77,
            author_name: "Painter".to_string(),
            fallback_image_url: Some("https://i.example/fallback.png".to_string()),
            pages,
        }
    }

    #[tokio::test]
    async fn test_parent_post_searches_its_children() {
        let board = FakeBoard {
            post: Some(BoardPost {
                has_children: true,
                ..board_post(100)
            }),
            search_results: vec![board_post(101), board_post(102)],
            ..FakeBoard::default()
        };
        let svc = service(board, FakeMicroblog::default(), FakeIllust::default());

        let items = svc.gallery_for(&board_link(100)).await.unwrap();
        assert_eq!(items.len(), 2);

        let board = svc.boards.get(&ProviderKind::Danbooru).unwrap();
        let searches = board.searches.lock().unwrap();
        assert_eq!(searches.len(), 1);
        assert!(searches[0].tags.contains("parent:100"));
        assert!(searches[0].tags.contains("-id:100"));
    }

    #[tokio::test]
    async fn test_child_post_searches_by_its_parent() {
        let board = FakeBoard {
            post: Some(BoardPost {
                parent_id: Some(90),
                ..board_post(100)
            }),
            search_results: vec![board_post(90)],
            ..FakeBoard::default()
        };
        let svc = service(board, FakeMicroblog::default(), FakeIllust::default());

        svc.gallery_for(&board_link(100)).await.unwrap();

        let board = svc.boards.get(&ProviderKind::Danbooru).unwrap();
        let searches = board.searches.lock().unwrap();
        assert!(searches[0].tags.contains("parent:90"));
        assert!(searches[0].tags.contains("-id:100"));
    }

    #[tokio::test]
    async fn test_lone_post_triggers_no_search() {
        let board = FakeBoard {
            post: Some(board_post(100)),
            ..FakeBoard::default()
        };
        let svc = service(board, FakeMicroblog::default(), FakeIllust::default());

        let items = svc.gallery_for(&board_link(100)).await.unwrap();
        assert!(items.is_empty());

        let board = svc.boards.get(&ProviderKind::Danbooru).unwrap();
        assert!(board.searches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_capping_marks_remaining_count_on_last_item() {
        let board = FakeBoard {
            post: Some(BoardPost {
                has_children: true,
                ..board_post(1)
            }),
            search_results: (2..8).map(board_post).collect(), // six siblings
            ..FakeBoard::default()
        };
        let svc = service(board, FakeMicroblog::default(), FakeIllust::default());

        let items = svc.gallery_for(&board_link(1)).await.unwrap();
        assert_eq!(items.len(), 4);
        assert!(items[..3].iter().all(|item| item.footer.is_none()));
        let footer = items[3].footer.as_ref().unwrap();
        assert_eq!(footer.text, "2+ remaining");
    }

    #[tokio::test]
    async fn test_exact_cap_gets_plain_attribution_footer() {
        let board = FakeBoard {
            post: Some(BoardPost {
                has_children: true,
                ..board_post(1)
            }),
            search_results: (2..6).map(board_post).collect(), // exactly four
            ..FakeBoard::default()
        };
        let svc = service(board, FakeMicroblog::default(), FakeIllust::default());

        let items = svc.gallery_for(&board_link(1)).await.unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[3].footer.as_ref().unwrap().text, "Danbooru");
    }

    #[tokio::test]
    async fn test_single_media_post_is_not_a_gallery_but_records_artist() {
        let microblog = FakeMicroblog {
            status: Some(status_with_media(vec![photo("https://pbs.example/1.jpg")])),
        };
        let svc = service(FakeBoard::default(), microblog, FakeIllust::default());

        let items = svc.gallery_for(&tweet_link(5)).await.unwrap();
        assert!(items.is_empty());

        let artist = svc.artists.current().await.unwrap();
        assert_eq!(artist.screen_name, "someartist");
    }

    #[tokio::test]
    async fn test_multi_photo_post_skips_first_and_appends_quality_suffix() {
        let microblog = FakeMicroblog {
            status: Some(status_with_media(vec![
                photo("https://pbs.example/1.jpg"),
                photo("https://pbs.example/2.jpg"),
                photo("https://pbs.example/3.jpg"),
            ])),
        };
        let svc = service(FakeBoard::default(), microblog, FakeIllust::default());

        let items = svc.gallery_for(&tweet_link(5)).await.unwrap();
        assert_eq!(items.len(), 2);
        match &items[0].image {
            ImageSource::Url(url) => assert_eq!(url, "https://pbs.example/2.jpg:orig"),
            other => panic!("expected a URL image, got {:?}", other),
        }
        assert!(items[0].footer.is_none());
        assert_eq!(items[1].footer.as_ref().unwrap().text, "Twitter");
        let author = items[0].author.as_ref().unwrap();
        assert_eq!(author.name, "Some Artist (@someartist)");
    }

    #[tokio::test]
    async fn test_non_photo_attachment_cancels_the_gallery() {
        let microblog = FakeMicroblog {
            status: Some(status_with_media(vec![
                photo("https://pbs.example/1.jpg"),
                MicroblogMedia {
                    is_photo: false,
                    url: "https://video.example/clip.mp4".to_string(),
                },
            ])),
        };
        let svc = service(FakeBoard::default(), microblog, FakeIllust::default());

        let items = svc.gallery_for(&tweet_link(5)).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_error_payload_relogs_in_once_and_retries() {
        let illust = FakeIllust {
            responses: Mutex::new(vec![
                IllustResponse::ErrorPayload("session expired".to_string()),
                IllustResponse::Illust(illust_detail(IllustPages::Multi(vec![
                    IllustPage {
                        image_url: Some("https://i.example/p0.png".to_string()),
                    },
                    IllustPage {
                        image_url: Some("https://i.example/p1.png".to_string()),
                    },
                ]))),
            ]),
            logged_in: Mutex::new(true),
            ..FakeIllust::default()
        };
        let svc = service(FakeBoard::default(), FakeMicroblog::default(), illust);

        let items = svc.gallery_for(&illust_link(9)).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(*svc.illust.detail_calls.lock().unwrap(), 2);
        assert_eq!(*svc.illust.login_calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_two_error_payloads_become_an_auth_failure() {
        let illust = FakeIllust {
            responses: Mutex::new(vec![
                IllustResponse::ErrorPayload("nope".to_string()),
                IllustResponse::ErrorPayload("still nope".to_string()),
            ]),
            logged_in: Mutex::new(true),
            ..FakeIllust::default()
        };
        let svc = service(FakeBoard::default(), FakeMicroblog::default(), illust);

        let err = svc.gallery_for(&illust_link(9)).await.unwrap_err();
        assert!(matches!(err, GalleryError::Auth(_)));
        assert_eq!(*svc.illust.detail_calls.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_lazy_login_happens_before_first_fetch() {
        let illust = FakeIllust {
            responses: Mutex::new(vec![IllustResponse::Illust(illust_detail(
                IllustPages::Single(IllustPage { image_url: None }),
            ))]),
            ..FakeIllust::default()
        };
        let svc = service(FakeBoard::default(), FakeMicroblog::default(), illust);

        let items = svc.gallery_for(&illust_link(9)).await.unwrap();
        assert_eq!(*svc.illust.login_calls.lock().unwrap(), 1);
        // Single-page posts fall back to the illustration-level image and
        // arrive as inline attachments.
        assert_eq!(items.len(), 1);
        match &items[0].image {
            ImageSource::Attachment { filename, .. } => assert_eq!(filename, "fallback.png"),
            other => panic!("expected an attachment, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_domain_renders_nothing() {
        let svc = service(
            FakeBoard::default(),
            FakeMicroblog::default(),
            FakeIllust::default(),
        );
        let link = ExternalLink {
            url: "https://example.com/posts/1".to_string(),
            domain: "example.com".to_string(),
        };
        assert!(svc.gallery_for(&link).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_board_search_prefers_file_for_no_preview_tags() {
        let board = FakeBoard {
            search_results: vec![BoardPost {
                general_tags: "flash animated".to_string(),
                file_url: Some("https://cdn.example/data/clip.swf".to_string()),
                ..board_post(55)
            }],
            ..FakeBoard::default()
        };
        let svc = service(board, FakeMicroblog::default(), FakeIllust::default());

        let hits = svc
            .board_search(ProviderKind::Danbooru, "some_tag")
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        match &hits[0] {
            BoardHit::Embed { image_url, .. } => {
                assert_eq!(image_url, "https://cdn.example/data/clip.swf");
            }
            other => panic!("expected an embed hit, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_board_search_links_the_page_for_normal_posts() {
        let board = FakeBoard {
            search_results: vec![board_post(56)],
            ..FakeBoard::default()
        };
        let svc = service(board, FakeMicroblog::default(), FakeIllust::default());

        let hits = svc
            .board_search(ProviderKind::Danbooru, "some_tag")
            .await
            .unwrap();
        match &hits[0] {
            BoardHit::Plain { url } => {
                assert_eq!(url, "https://danbooru.donmai.us/posts/56");
            }
            other => panic!("expected a plain hit, got {:?}", other),
        }
    }
}
