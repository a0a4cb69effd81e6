//! WordPress REST API publishing.
//!
//! Posts are upserted by slug: look the slug up, update the post when it
//! exists, create it otherwise. There is no idempotency token and no retry;
//! two runs racing on the same slug can both create.
//!
//! # Architecture
//!
//! - [`PostsApi`]: the four calls the publisher needs
//! - [`WordPressClient`]: `reqwest` implementation using basic auth with an
//!   application password
//! - [`publish_or_update`]: the upsert itself, generic over any [`PostsApi`]

use crate::models::Post;
use crate::utils::{slugify_title, truncate_for_log};
use clap::ValueEnum;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Post status sent with create and update calls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Publish,
    Draft,
}

/// Body of a create or update call.
#[derive(Debug, Serialize)]
pub struct PostPayload<'a> {
    pub title: &'a str,
    pub slug: &'a str,
    pub content: &'a str,
    pub excerpt: &'a str,
    pub status: PostStatus,
    pub categories: &'a [u64],
    pub tags: Vec<u64>,
}

/// Result of [`publish_or_update`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PublishOutcome {
    Created(u64),
    Updated(u64),
}

/// A non-success HTTP response from the CMS.
#[derive(Debug)]
pub struct ApiError {
    pub status: u16,
    pub url: String,
    pub body: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} returned HTTP {}: {}", self.url, self.status, self.body)
    }
}

impl std::error::Error for ApiError {}

/// The CMS calls needed to upsert a post.
pub trait PostsApi {
    /// Id of the post with `slug`, in any status.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<u64>, Box<dyn Error>>;
    async fn create(&self, payload: &PostPayload<'_>) -> Result<u64, Box<dyn Error>>;
    async fn update(&self, id: u64, payload: &PostPayload<'_>) -> Result<u64, Box<dyn Error>>;
    /// Tag ids for `names`, creating missing tags.
    async fn resolve_tags(&self, names: &[String]) -> Result<Vec<u64>, Box<dyn Error>>;
}

#[derive(Debug, Deserialize)]
struct IdOnly {
    id: u64,
}

/// WordPress client authenticated with an application password.
#[derive(Debug)]
pub struct WordPressClient {
    client: Client,
    base: Url,
    username: String,
    app_password: String,
}

impl WordPressClient {
    /// `site_url` is the site root, e.g. `https://blog.example.com`.
    pub fn new(site_url: &str, username: &str, app_password: &str) -> Result<Self, Box<dyn Error>> {
        let mut root = site_url.trim_end_matches('/').to_string();
        root.push('/');
        let base = Url::parse(&root)?.join("wp-json/wp/v2/")?;
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            base,
            username: username.to_string(),
            app_password: app_password.to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, Box<dyn Error>> {
        Ok(self.base.join(path)?)
    }

    /// Turn a non-2xx response into an [`ApiError`].
    async fn check(response: Response) -> Result<Response, Box<dyn Error>> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        warn!(%url, status = status.as_u16(), "CMS request failed");
        Err(Box::new(ApiError {
            status: status.as_u16(),
            url,
            body: truncate_for_log(&body, 300),
        }))
    }
}

impl PostsApi for WordPressClient {
    #[instrument(level = "info", skip_all, fields(%slug))]
    async fn find_by_slug(&self, slug: &str) -> Result<Option<u64>, Box<dyn Error>> {
        let response = self
            .client
            .get(self.endpoint("posts")?)
            .basic_auth(&self.username, Some(&self.app_password))
            .query(&[("slug", slug), ("status", "any"), ("_fields", "id")])
            .send()
            .await?;
        let found: Vec<IdOnly> = Self::check(response).await?.json().await?;
        debug!(matches = found.len(), "Looked up post by slug");
        Ok(found.first().map(|p| p.id))
    }

    #[instrument(level = "info", skip_all, fields(slug = %payload.slug))]
    async fn create(&self, payload: &PostPayload<'_>) -> Result<u64, Box<dyn Error>> {
        let response = self
            .client
            .post(self.endpoint("posts")?)
            .basic_auth(&self.username, Some(&self.app_password))
            .json(payload)
            .send()
            .await?;
        let created: IdOnly = Self::check(response).await?.json().await?;
        Ok(created.id)
    }

    #[instrument(level = "info", skip_all, fields(%id, slug = %payload.slug))]
    async fn update(&self, id: u64, payload: &PostPayload<'_>) -> Result<u64, Box<dyn Error>> {
        let response = self
            .client
            .post(self.endpoint(&format!("posts/{}", id))?)
            .basic_auth(&self.username, Some(&self.app_password))
            .json(payload)
            .send()
            .await?;
        let updated: IdOnly = Self::check(response).await?.json().await?;
        Ok(updated.id)
    }

    #[instrument(level = "info", skip_all, fields(count = names.len()))]
    async fn resolve_tags(&self, names: &[String]) -> Result<Vec<u64>, Box<dyn Error>> {
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            let slug = slugify_title(name);
            let response = self
                .client
                .get(self.endpoint("tags")?)
                .basic_auth(&self.username, Some(&self.app_password))
                .query(&[("slug", slug.as_str()), ("_fields", "id")])
                .send()
                .await?;
            let existing: Vec<IdOnly> = Self::check(response).await?.json().await?;

            let id = match existing.first() {
                Some(tag) => tag.id,
                None => {
                    let response = self
                        .client
                        .post(self.endpoint("tags")?)
                        .basic_auth(&self.username, Some(&self.app_password))
                        .json(&serde_json::json!({ "name": name, "slug": slug }))
                        .send()
                        .await?;
                    let created: IdOnly = Self::check(response).await?.json().await?;
                    info!(tag = %name, id = created.id, "Created tag");
                    created.id
                }
            };
            ids.push(id);
        }
        Ok(ids)
    }
}

/// Create `post`, or update the existing post with the same slug.
#[instrument(level = "info", skip_all, fields(slug = %post.slug))]
pub async fn publish_or_update<A: PostsApi>(
    api: &A,
    post: &Post,
    status: PostStatus,
) -> Result<PublishOutcome, Box<dyn Error>> {
    let t0 = Instant::now();
    let tags = api.resolve_tags(&post.tags).await?;
    let payload = PostPayload {
        title: &post.title,
        slug: &post.slug,
        content: &post.content,
        excerpt: &post.excerpt,
        status,
        categories: &post.categories,
        tags,
    };

    let outcome = match api.find_by_slug(&post.slug).await? {
        Some(id) => PublishOutcome::Updated(api.update(id, &payload).await?),
        None => PublishOutcome::Created(api.create(&payload).await?),
    };

    info!(
        ?outcome,
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Published post"
    );
    Ok(outcome)
}
