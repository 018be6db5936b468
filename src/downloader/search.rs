//! Board search operations

use super::BooruDownloader;
use crate::board::{Post, SearchPage, TagQuery};
use crate::error::Result;
use crate::types::ResourceRef;

impl BooruDownloader {
    /// Search the board for posts matching the query (first page)
    ///
    /// Fewer posts than `limit` means the board ran out of matches; the
    /// result is best effort and never padded from further pages.
    pub async fn search(&self, query: &TagQuery, limit: usize) -> Result<Vec<Post>> {
        Ok(self.search_page(query, limit, 0).await?.posts)
    }

    /// Fetch one page of search results (`page` is 0-based)
    pub async fn search_page(
        &self,
        query: &TagQuery,
        limit: usize,
        page: usize,
    ) -> Result<SearchPage> {
        self.board.search(query, limit, page).await
    }

    /// Filter posts into fetchable resources
    ///
    /// Posts without a parseable `file_url` are dropped and never scheduled.
    /// When `archive.tag_sidecars` is enabled, each resource carries its
    /// post's tag string, to be written as a `.txt` sidecar entry.
    pub fn resources_from_posts(&self, posts: &[Post]) -> Vec<ResourceRef> {
        ResourceRef::from_posts(posts, self.config.archive.tag_sidecars)
    }
}
