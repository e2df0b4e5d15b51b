use std::marker::PhantomData;
use std::time::Duration;

use log::trace;

use crate::error::{ApiError, Result};

/// One page of a listing, plus the cursor for the page after it
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_page_token: Option<String>,
}

/// Iterator over the pages of a cursor-chained listing.
///
/// Each call to `next` performs one request through `fetch`, handing it the
/// cursor from the previous page (`None` for the first). Iteration ends after
/// a page with no cursor, or after the first error.
pub struct Pages<T, F> {
    fetch: F,
    page_token: Option<String>,
    started: bool,
    complete: bool,
    delay: Option<Duration>,
    _item: PhantomData<T>,
}

impl<T, F> Pages<T, F>
where
    F: FnMut(Option<&str>) -> Result<Page<T>>,
{
    /// `delay` is slept before every request except the first
    pub fn new(fetch: F, delay: Option<Duration>) -> Self {
        Pages {
            fetch,
            page_token: None,
            started: false,
            complete: false,
            delay,
            _item: PhantomData,
        }
    }

    /// Fetch every page, returning all items in order
    pub fn collect_all(self) -> Result<Vec<T>> {
        let mut all = vec![];
        for page in self {
            all.extend(page?);
        }
        Ok(all)
    }
}

impl<T, F> Iterator for Pages<T, F>
where
    F: FnMut(Option<&str>) -> Result<Page<T>>,
{
    type Item = Result<Vec<T>, ApiError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.complete {
            return None;
        }

        if self.started {
            if let Some(delay) = self.delay {
                trace!("Waiting {:?} before next page", delay);
                std::thread::sleep(delay);
            }
        }
        self.started = true;

        match (self.fetch)(self.page_token.as_deref()) {
            Err(e) => {
                self.complete = true;
                Some(Err(e))
            }
            Ok(page) => {
                match page.next_page_token {
                    None => self.complete = true,
                    Some(token) => self.page_token = Some(token),
                }
                Some(Ok(page.items))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::time::Instant;

    /// Fake listing of `sizes.len()` pages, recording the cursor each request was given
    fn fake_listing(
        sizes: Vec<usize>,
        seen: &mut Vec<Option<String>>,
    ) -> impl FnMut(Option<&str>) -> Result<Page<usize>> + '_ {
        let mut n = 0;
        move |token| {
            seen.push(token.map(|t| t.to_string()));
            let items: Vec<usize> = (0..sizes[n]).collect();
            n += 1;
            let next_page_token = if n < sizes.len() {
                Some(format!("page{}", n + 1))
            } else {
                None
            };
            Ok(Page {
                items,
                next_page_token,
            })
        }
    }

    #[test]
    fn test_follows_cursor_until_absent() -> Result<()> {
        let mut seen = vec![];
        let all = Pages::new(fake_listing(vec![100, 100, 37], &mut seen), None).collect_all()?;
        assert_eq!(all.len(), 237);
        assert_eq!(
            seen,
            vec![None, Some("page2".to_string()), Some("page3".to_string())]
        );
        Ok(())
    }

    #[test]
    fn test_single_page() -> Result<()> {
        let mut seen = vec![];
        let mut pages = Pages::new(fake_listing(vec![3], &mut seen), None);
        assert_eq!(pages.next().unwrap()?, vec![0, 1, 2]);
        assert!(pages.next().is_none());
        drop(pages);
        assert_eq!(seen, vec![None]);
        Ok(())
    }

    #[test]
    fn test_empty_first_page() -> Result<()> {
        let mut seen = vec![];
        let all = Pages::new(fake_listing(vec![0], &mut seen), None).collect_all()?;
        assert!(all.is_empty());
        Ok(())
    }

    #[test]
    fn test_stops_after_error() {
        let mut calls = 0;
        let mut pages = Pages::new(
            |_token: Option<&str>| -> Result<Page<u32>> {
                calls += 1;
                Err(ApiError::Api {
                    endpoint: "commentThreads".into(),
                    status: 500,
                    message: "backend".into(),
                })
            },
            None,
        );
        assert!(pages.next().unwrap().is_err());
        assert!(pages.next().is_none());
        drop(pages);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_delay_only_between_pages() -> Result<()> {
        let delay = Duration::from_millis(40);
        let mut stamps: Vec<Instant> = vec![];
        let mut n = 0;
        let start = Instant::now();
        Pages::new(
            |_token: Option<&str>| {
                stamps.push(Instant::now());
                n += 1;
                Ok(Page {
                    items: vec![n],
                    next_page_token: if n < 3 { Some("more".into()) } else { None },
                })
            },
            Some(delay),
        )
        .collect_all()?;

        assert_eq!(stamps.len(), 3);
        assert!(stamps[0] - start < delay);
        assert!(stamps[1] - stamps[0] >= delay);
        assert!(stamps[2] - stamps[1] >= delay);
        Ok(())
    }
}
