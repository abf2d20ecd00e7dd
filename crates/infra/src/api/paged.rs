//! Paginated list endpoints
//!
//! List calls carry `limit`/`page` query parameters and report the page count
//! in a `Total-Pages` response header. Each endpoint has a server-side page
//! size ceiling; requested limits above it are clamped.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::client::ApiClient;
use super::errors::ApiError;
use super::paths;
use super::request::RequestSpec;

const TOTAL_PAGES_HEADER: &str = "Total-Pages";

static APP_USERS_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/api/2/apps/[0-9]+/users$").expect("valid app users regex"));

/// Cursor for a paginated list call. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u32,
    pub page: u32,
}

impl Page {
    pub fn first(limit: u32) -> Self {
        Self { limit, page: 1 }
    }
}

/// Whether another page follows the one just fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    MorePages,
    NoMorePages,
}

/// Maximum page size per list path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSizeTable {
    ceilings: BTreeMap<String, u32>,
}

impl Default for PageSizeTable {
    fn default() -> Self {
        Self {
            ceilings: BTreeMap::from([
                (paths::ROLES.to_string(), 650),
                (paths::APPS.to_string(), 1000),
                (paths::USERS.to_string(), 50),
                (paths::CONNECTORS.to_string(), 1000),
            ]),
        }
    }
}

impl PageSizeTable {
    /// Ceiling for `path`; app-user listings share the apps ceiling
    pub fn ceiling_for(&self, path: &str) -> Option<u32> {
        if let Some(ceiling) = self.ceilings.get(path) {
            return Some(*ceiling);
        }
        if APP_USERS_PATH.is_match(path) {
            return self.ceilings.get(paths::APPS).copied();
        }
        None
    }

    pub fn with_ceiling(mut self, path: impl Into<String>, ceiling: u32) -> Self {
        self.ceilings.insert(path.into(), ceiling);
        self
    }
}

impl ApiClient {
    /// Fetch one page of `spec`, clamping `page.limit` to the path's ceiling.
    ///
    /// Exactly one request is sent; paged calls have no retry loop.
    ///
    /// # Errors
    /// [`ApiError::PageSizeNotConfigured`] for paths without a ceiling,
    /// [`ApiError::BadGateway`] on 502, [`ApiError::RateLimited`] on 429,
    /// [`ApiError::HttpStatus`] on other non-2xx,
    /// [`ApiError::MissingPaginationMetadata`] or
    /// [`ApiError::InvalidPaginationMetadata`] when `Total-Pages` is absent or
    /// not a number.
    pub async fn fetch_page<T: DeserializeOwned>(
        &self,
        spec: &RequestSpec,
        page: &mut Page,
        cancel: &CancellationToken,
    ) -> Result<(T, PageOutcome), ApiError> {
        let ceiling = self
            .page_sizes()
            .ceiling_for(&spec.path)
            .ok_or_else(|| ApiError::PageSizeNotConfigured(spec.path.clone()))?;
        page.limit = page.limit.min(ceiling);

        let spec = spec.clone().query("limit", page.limit).query("page", page.page);
        debug!(path = %spec.path, limit = page.limit, page = page.page, "fetching page");

        let response = self.send_once(&spec, cancel).await?;
        let status = response.status();
        let total_pages = response
            .headers()
            .get(TOTAL_PAGES_HEADER)
            .map(|value| value.to_str().map(str::to_string).unwrap_or_default());
        let body = self.read_body(response, cancel).await?;

        match status {
            StatusCode::BAD_GATEWAY => return Err(ApiError::BadGateway(body)),
            StatusCode::TOO_MANY_REQUESTS => return Err(ApiError::RateLimited),
            s if !s.is_success() => {
                return Err(ApiError::HttpStatus { status: s.as_u16(), body });
            }
            _ => {}
        }

        let items: T = serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))?;

        let raw = total_pages.ok_or(ApiError::MissingPaginationMetadata)?;
        let total: u32 =
            raw.trim().parse().map_err(|_| ApiError::InvalidPaginationMetadata(raw.clone()))?;

        let outcome =
            if page.page >= total { PageOutcome::NoMorePages } else { PageOutcome::MorePages };
        Ok((items, outcome))
    }

    /// Walk every page of `spec` from page 1 and concatenate the items.
    ///
    /// # Errors
    /// The first [`fetch_page`](Self::fetch_page) failure.
    pub async fn fetch_all<T: DeserializeOwned>(
        &self,
        spec: &RequestSpec,
        limit: u32,
        cancel: &CancellationToken,
    ) -> Result<Vec<T>, ApiError> {
        let mut page = Page::first(limit);
        let mut items = Vec::new();
        loop {
            let (batch, outcome): (Vec<T>, _) = self.fetch_page(spec, &mut page, cancel).await?;
            items.extend(batch);
            if outcome == PageOutcome::NoMorePages {
                return Ok(items);
            }
            page.page += 1;
        }
    }
}
