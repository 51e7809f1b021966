use reqwest::header::HeaderMap;

use crate::error::{Error, Result};

pub const FIRST_PAGE: u32 = 1;
pub const PER_PAGE: u32 = 100;

/// Header carrying the number of the page after the current one.
pub const NEXT_PAGE_HEADER: &str = "x-next-page";

/// One page of a listing together with its pagination cursor.
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_page: Option<u32>,
}

/// Reads the pagination cursor. An empty, missing or zero value marks the
/// last page; anything else that is not a page number is an error.
pub fn next_page(headers: &HeaderMap) -> Result<Option<u32>> {
    let Some(value) = headers.get(NEXT_PAGE_HEADER) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| Error::RemoteApi(format!("{NEXT_PAGE_HEADER}: value is not text")))?
        .trim();
    if value.is_empty() {
        return Ok(None);
    }

    let page = value
        .parse::<u32>()
        .map_err(|e| Error::RemoteApi(format!("{NEXT_PAGE_HEADER}: invalid page {value:?}: {e}")))?;
    Ok(Some(page).filter(|&page| page > 0))
}

/// Requests pages starting at [`FIRST_PAGE`] until the cursor runs out and
/// concatenates their items in order.
pub fn collect_pages<T, F>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Result<Page<T>>,
{
    let mut items = Vec::new();
    let mut page = FIRST_PAGE;

    loop {
        let current = fetch(page)?;
        items.extend(current.items);

        match current.next_page {
            None => return Ok(items),
            Some(next) if next <= page => {
                return Err(Error::RemoteApi(format!(
                    "pagination cursor did not advance (page {page}, next {next})"
                )));
            }
            Some(next) => page = next,
        }
    }
}
