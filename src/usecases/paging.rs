//! Lazy, finite, restartable sequence of remote result pages.
//!
//! A `Pages` value fetches nothing until it is iterated. Each step asks its
//! `PageSource` for the page behind the current cursor and moves to the
//! cursor the page points at. A page without a next cursor, a cursor already
//! visited in this pass or a failed fetch ends the sequence. `restart` rewinds to the first
//! page.

use std::collections::HashSet;

use super::contracts::GatewayError;

/// Opaque continuation handed back by the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageCursor(String);

impl PageCursor {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<PageCursor>,
}

pub trait PageSource<T> {
    /// Fetches the first page when `cursor` is `None`.
    fn fetch(&self, cursor: Option<&PageCursor>) -> Result<Page<T>, GatewayError>;
}

impl<T, S> PageSource<T> for &S
where
    S: PageSource<T> + ?Sized,
{
    fn fetch(&self, cursor: Option<&PageCursor>) -> Result<Page<T>, GatewayError> {
        (*self).fetch(cursor)
    }
}

enum Position {
    Start,
    At(PageCursor),
    Failed(GatewayError),
    Finished,
}

pub struct Pages<'a, T> {
    source: Option<Box<dyn PageSource<T> + 'a>>,
    position: Position,
    visited: HashSet<PageCursor>,
}

impl<'a, T> Pages<'a, T> {
    pub fn new(source: impl PageSource<T> + 'a) -> Self {
        Self {
            source: Some(Box::new(source)),
            position: Position::Start,
            visited: HashSet::new(),
        }
    }

    /// A sequence that yields `error` once and then ends.
    pub fn failed(error: GatewayError) -> Self {
        Self {
            source: None,
            position: Position::Failed(error),
            visited: HashSet::new(),
        }
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn restart(&mut self) {
        if self.source.is_some() {
            self.position = Position::Start;
            self.visited.clear();
        }
    }

    /// Drains every remaining page into one vector.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn collect_items(self) -> Result<Vec<T>, GatewayError> {
        let mut items = Vec::new();
        for page in self {
            items.extend(page?.items);
        }
        Ok(items)
    }
}

impl<T> Iterator for Pages<'_, T> {
    type Item = Result<Page<T>, GatewayError>;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = match std::mem::replace(&mut self.position, Position::Finished) {
            Position::Finished => return None,
            Position::Failed(error) => return Some(Err(error)),
            Position::Start => None,
            Position::At(cursor) => Some(cursor),
        };

        let source = self.source.as_ref()?;
        match source.fetch(cursor.as_ref()) {
            Ok(page) => {
                self.position = match &page.next {
                    Some(next) if self.visited.insert(next.clone()) => Position::At(next.clone()),
                    Some(next) => {
                        tracing::warn!(cursor = next.as_str(), "service repeated a page cursor");
                        Position::Finished
                    }
                    None => Position::Finished,
                };
                Some(Ok(page))
            }
            Err(error) => Some(Err(error)),
        }
    }
}
