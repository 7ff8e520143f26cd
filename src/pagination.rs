//! pagination helpers
//!
//! page query options, cursors parsed from `Link` response headers, and a
//! paginator that walks numbered pages.

use crate::error::Result;
use crate::response::Response;
use std::future::Future;

/// page selection sent as `page` and `per_page` query parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOptions {
    /// 1-based page number
    pub page: u32,
    /// items per page
    pub per_page: u32,
}

impl PageOptions {
    /// create page options
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 30,
        }
    }
}

/// page cursors parsed from a response `Link` header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    /// next page number
    pub next: Option<u32>,
    /// previous page number
    pub prev: Option<u32>,
    /// first page number
    pub first: Option<u32>,
    /// last page number
    pub last: Option<u32>,
}

impl Page {
    /// parse a `Link` header of comma-separated `<url>; rel="..."` entries
    ///
    /// segments that fail to parse are skipped; a header yielding no
    /// usable segment at all produces `None`, never an error.
    pub(crate) fn from_link_header(header: &str) -> Option<Page> {
        let mut page = Page::default();
        let mut any = false;

        for segment in header.split(',') {
            let Some((rel, number)) = parse_segment(segment) else {
                continue;
            };
            let slot = match rel {
                "next" => &mut page.next,
                "prev" => &mut page.prev,
                "first" => &mut page.first,
                "last" => &mut page.last,
                _ => continue,
            };
            *slot = Some(number);
            any = true;
        }

        any.then_some(page)
    }
}

/// parse one `<url>; rel="..."` segment into its rel and `page` parameter
fn parse_segment(segment: &str) -> Option<(&str, u32)> {
    let (url_part, rel_part) = segment.split_once(';')?;
    let url_str = url_part.trim().strip_prefix('<')?.strip_suffix('>')?;
    let rel = rel_part
        .trim()
        .strip_prefix("rel=\"")?
        .strip_suffix('"')?;

    let url = url::Url::parse(url_str).ok()?;
    let number = url
        .query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse::<u32>().ok())?;

    Some((rel, number))
}

/// walks a paginated resource page by page, following `next` cursors
pub struct Paginator<T, Fetch, Fut>
where
    Fetch: FnMut(PageOptions) -> Fut,
    Fut: Future<Output = Result<Response<Vec<T>>>>,
{
    fetch: Fetch,
    options: PageOptions,
    done: bool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T, Fetch, Fut> Paginator<T, Fetch, Fut>
where
    Fetch: FnMut(PageOptions) -> Fut,
    Fut: Future<Output = Result<Response<Vec<T>>>>,
{
    /// create a paginator starting from `options`
    pub fn new(options: PageOptions, fetch: Fetch) -> Self {
        Self {
            fetch,
            options,
            done: false,
            _phantom: std::marker::PhantomData,
        }
    }

    /// fetch the next page of results
    pub async fn next_page(&mut self) -> Result<Option<Vec<T>>> {
        if self.done {
            return Ok(None);
        }

        let response = (self.fetch)(self.options).await?;
        match response.page.and_then(|page| page.next) {
            Some(next) => self.options.page = next,
            None => self.done = true,
        }

        Ok(Some(response.content))
    }

    /// fetch all remaining pages into a single collection
    pub async fn collect_all(mut self) -> Result<Vec<T>> {
        let mut items = Vec::new();
        while let Some(page) = self.next_page().await? {
            items.extend(page);
        }
        Ok(items)
    }
}
