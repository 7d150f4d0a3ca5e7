use std::collections::VecDeque;

use log::debug;

use crate::core::provider::{Cursor, Listing};
use crate::core::session::Session;
use crate::error::{Error, Result};

/// Forward-only walk over a paginated listing.
///
/// Pages are requested lazily, one at a time, in backend order. An empty
/// page or a strategy without a next cursor ends the walk; a failed page
/// request ends it too, after the error has been returned once. To start
/// over, build a new pager.
pub struct Pager<'s, T> {
    session: &'s mut Session,
    listing: Listing<T>,
    buffer: VecDeque<T>,
    cursor: Option<Cursor>,
    exhausted: bool,
    requests: usize,
}

impl<'s, T> Pager<'s, T> {
    pub(crate) fn new(session: &'s mut Session, listing: Listing<T>) -> Self {
        Self {
            session,
            listing,
            buffer: VecDeque::new(),
            cursor: None,
            exhausted: false,
            requests: 0,
        }
    }

    pub async fn has_next(&mut self) -> Result<bool> {
        if self.buffer.is_empty() && !self.exhausted {
            self.fetch_page().await?;
        }
        Ok(!self.buffer.is_empty())
    }

    pub async fn next(&mut self) -> Result<T> {
        if !self.has_next().await? {
            return Err(Error::NoSuchElement);
        }
        self.buffer.pop_front().ok_or(Error::NoSuchElement)
    }

    pub fn requests_issued(&self) -> usize {
        self.requests
    }

    pub async fn collect_all(mut self) -> Result<Vec<T>> {
        let mut items = Vec::new();
        while self.has_next().await? {
            items.push(self.next().await?);
        }
        Ok(items)
    }

    async fn fetch_page(&mut self) -> Result<()> {
        let request = self.listing.page_request(self.cursor.as_ref());
        debug!(
            "Requesting page {} of {} at {:?}",
            self.requests + 1,
            self.listing.path,
            self.cursor
        );
        self.requests += 1;

        let page = match self.session.execute(request).await {
            Ok(response) => (self.listing.decode)(&response.body).map(|items| (response, items)),
            Err(err) => Err(err),
        };
        let (response, items) = match page {
            Ok(page) => page,
            Err(err) => {
                self.exhausted = true;
                return Err(err);
            }
        };

        if items.is_empty() {
            self.exhausted = true;
            return Ok(());
        }
        match self
            .listing
            .pagination
            .next_cursor(&response, self.cursor.as_ref(), items.len())
        {
            Some(cursor) => self.cursor = Some(cursor),
            None => self.exhausted = true,
        }
        self.buffer.extend(items);
        Ok(())
    }
}
