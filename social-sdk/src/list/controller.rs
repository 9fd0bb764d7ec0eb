//! The list controller: page cursors, the single in-flight fetch and the view it projects.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use social_common::{Identified, Page, constants::FIRST_PAGE};

use super::source::{PageSource, RemoteDelete};
use crate::{
    Error, Result, cross_log,
    notify::{SharedNotifier, Toast},
};

/// What the controller is fetching right now.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// Nothing in flight.
    #[default]
    Idle,
    /// Fetching the first page, replacing the collection.
    Loading,
    /// Fetching a further page to append.
    LoadingMore,
}

/// How a call to [`PaginatedList::load`] or [`PaginatedList::load_more`] ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The page was fetched and applied.
    Applied {
        /// Page number that was applied.
        page: u32,
        /// Items the page carried.
        received: usize,
    },
    /// Nothing was requested: last page reached, a fetch already in flight,
    /// or the controller is detached.
    Skipped,
    /// The page arrived after being superseded or after `detach()`; it was
    /// thrown away.
    Discarded,
}

/// What a renderer should show for the collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListView<T> {
    /// First load in progress, nothing to show yet.
    Spinner,
    /// The first page could not be loaded; show the message and a retry.
    Blocking {
        /// User-facing reason.
        message: String,
    },
    /// Loaded, and the collection is empty.
    Empty,
    /// The items, in display order.
    Items {
        /// Local sequence.
        items: Vec<T>,
        /// Whether a "load more" control should be offered.
        can_load_more: bool,
        /// A further page is being fetched.
        loading_more: bool,
        /// Page 1 is being refetched behind the current items.
        refreshing: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Replace,
    Append,
}

#[derive(Debug)]
struct ListState<T> {
    items: Vec<T>,
    current_page: u32,
    total_pages: u32,
    total_count: u64,
    phase: Phase,
    error: Option<String>,
    loaded: bool,
    in_flight: Option<u64>,
    epoch: u64,
    detached: bool,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current_page: FIRST_PAGE,
            total_pages: FIRST_PAGE,
            total_count: 0,
            phase: Phase::Idle,
            error: None,
            loaded: false,
            in_flight: None,
            epoch: 0,
            detached: false,
        }
    }
}

/// Client-side view of one server-paginated collection.
///
/// Pages are fetched through a [`PageSource`]. At most one fetch is in
/// flight: `load_more` calls made meanwhile are dropped, while `load(1)`
/// supersedes the outstanding fetch and its late result is discarded.
/// After [`detach`](Self::detach) nothing is applied anymore.
///
/// Cheap to clone; clones share the state.
pub struct PaginatedList<S: PageSource> {
    source: Arc<S>,
    state: Arc<Mutex<ListState<S::Item>>>,
    notifier: SharedNotifier,
}

impl<S: PageSource> Clone for PaginatedList<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            state: Arc::clone(&self.state),
            notifier: Arc::clone(&self.notifier),
        }
    }
}

impl<S: PageSource> std::fmt::Debug for PaginatedList<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("PaginatedList")
            .field("source", &self.source)
            .field("items", &state.items.len())
            .field("current_page", &state.current_page)
            .field("total_pages", &state.total_pages)
            .field("phase", &state.phase)
            .finish()
    }
}

impl<S: PageSource> PaginatedList<S> {
    /// An empty, not yet loaded list.
    pub fn new(source: S, notifier: SharedNotifier) -> Self {
        Self {
            source: Arc::new(source),
            state: Arc::new(Mutex::new(ListState::default())),
            notifier,
        }
    }

    // === Getters ===

    /// The source pages come from.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Snapshot of the local sequence.
    pub fn items(&self) -> Vec<S::Item> {
        self.lock().items.clone()
    }

    /// Number of items held locally.
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    /// Whether no item is held locally.
    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Last page applied.
    pub fn current_page(&self) -> u32 {
        self.lock().current_page
    }

    /// Page count last reported by the server.
    pub fn total_pages(&self) -> u32 {
        self.lock().total_pages
    }

    /// Item count last reported by the server. Local deletes do not adjust it.
    pub fn total_count(&self) -> u64 {
        self.lock().total_count
    }

    /// Current fetch phase.
    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    /// Message of the blocking error, if the list is in that state.
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// Whether another page exists and nothing is in flight.
    pub fn can_load_more(&self) -> bool {
        let state = self.lock();
        state.in_flight.is_none() && state.current_page < state.total_pages
    }

    /// Whether [`detach`](Self::detach) was called.
    pub fn is_detached(&self) -> bool {
        self.lock().detached
    }

    /// What a renderer should show right now.
    pub fn view(&self) -> ListView<S::Item> {
        let state = self.lock();
        if let Some(message) = &state.error {
            return ListView::Blocking {
                message: message.clone(),
            };
        }
        if state.items.is_empty() {
            return match (state.loaded, state.phase) {
                (_, Phase::Loading) | (false, _) => ListView::Spinner,
                _ => ListView::Empty,
            };
        }
        ListView::Items {
            items: state.items.clone(),
            can_load_more: state.in_flight.is_none() && state.current_page < state.total_pages,
            loading_more: state.phase == Phase::LoadingMore,
            refreshing: state.phase == Phase::Loading,
        }
    }

    // === Loading ===

    /// Fetch page `page` and replace the local sequence with it.
    ///
    /// Supersedes any fetch still in flight.
    pub async fn load(&self, page: u32) -> Result<LoadOutcome> {
        let Some(ticket) = self.begin(page, Mode::Replace) else {
            return Ok(LoadOutcome::Skipped);
        };
        self.fetch(ticket, page, Mode::Replace).await
    }

    /// Fetch the page after the current one and append it.
    ///
    /// Issues no request on the last page or while a fetch is in flight.
    pub async fn load_more(&self) -> Result<LoadOutcome> {
        let (ticket, page) = {
            let mut state = self.lock();
            if state.detached
                || state.in_flight.is_some()
                || state.current_page >= state.total_pages
            {
                return Ok(LoadOutcome::Skipped);
            }
            let page = state.current_page + 1;
            (Self::claim(&mut state, Phase::LoadingMore), page)
        };
        self.fetch(ticket, page, Mode::Append).await
    }

    /// Fetch the first page again.
    pub async fn refresh(&self) -> Result<LoadOutcome> {
        self.load(FIRST_PAGE).await
    }

    /// Stop applying results. Any fetch still in flight is discarded on arrival.
    pub fn detach(&self) {
        let mut state = self.lock();
        state.detached = true;
        state.in_flight = None;
        state.phase = Phase::Idle;
    }

    // === Local mutation ===

    /// Remove the first item with `id` from the local sequence only.
    pub fn remove_local(&self, id: &str) -> Option<S::Item> {
        let mut state = self.lock();
        let position = state.items.iter().position(|item| item.id() == id)?;
        Some(state.items.remove(position))
    }

    // === Internals ===

    fn lock(&self) -> MutexGuard<'_, ListState<S::Item>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self, page: u32, mode: Mode) -> Option<u64> {
        let mut state = self.lock();
        if state.detached {
            return None;
        }
        if let Some(previous) = state.in_flight {
            cross_log!(debug, "Superseding fetch #{previous} with page {page}");
        }
        let phase = match (mode, page) {
            (Mode::Replace, FIRST_PAGE) => Phase::Loading,
            _ => Phase::LoadingMore,
        };
        state.error = None;
        Some(Self::claim(&mut state, phase))
    }

    fn claim(state: &mut ListState<S::Item>, phase: Phase) -> u64 {
        state.epoch += 1;
        state.in_flight = Some(state.epoch);
        state.phase = phase;
        state.epoch
    }

    async fn fetch(&self, ticket: u64, page: u32, mode: Mode) -> Result<LoadOutcome> {
        cross_log!(debug, "Fetching {} page {page}", self.source.noun());
        let result = self.source.fetch_page(page).await;

        let mut state = self.lock();
        if state.detached || state.in_flight != Some(ticket) {
            cross_log!(debug, "Discarding stale {} page {page}", self.source.noun());
            return Ok(LoadOutcome::Discarded);
        }
        state.in_flight = None;
        state.phase = Phase::Idle;

        match result {
            Ok(fetched) => Ok(Self::apply(&mut state, page, fetched, mode)),
            Err(error) => {
                let blocking = mode == Mode::Replace && state.items.is_empty();
                drop(state);
                self.fail(error, blocking)
            }
        }
    }

    // The requested page wins over the envelope's `page`, which some
    // endpoints omit.
    fn apply(
        state: &mut ListState<S::Item>,
        page: u32,
        fetched: Page<S::Item>,
        mode: Mode,
    ) -> LoadOutcome {
        let received = fetched.items.len();
        match mode {
            Mode::Replace => state.items = fetched.items,
            Mode::Append => state.items.extend(fetched.items),
        }
        state.current_page = page;
        state.total_pages = fetched.total_pages.max(page);
        state.total_count = fetched.total_count;
        state.error = None;
        state.loaded = true;
        LoadOutcome::Applied { page, received }
    }

    fn fail(&self, error: Error, blocking: bool) -> Result<LoadOutcome> {
        if blocking {
            cross_log!(warn, "Could not load {}: {error}", self.source.noun());
            let mut state = self.lock();
            state.error = Some(error.user_message());
            state.loaded = true;
        } else {
            self.notifier.notify(Toast::error(&error));
        }
        Err(error)
    }
}

impl<S: RemoteDelete> PaginatedList<S> {
    /// Delete item `id`: remove it locally at once, then ask the server.
    ///
    /// Exactly one delete call is issued. A failed call is reported as a
    /// notification and the item stays removed locally.
    pub async fn delete(&self, id: &str) -> Result<Option<S::Item>> {
        let removed = self.remove_local(id);
        match self.source.delete_remote(id).await {
            Ok(()) => {
                self.notifier
                    .notify(Toast::info("Deleted", "The publication was removed"));
                Ok(removed)
            }
            Err(error) => {
                self.notifier.notify(Toast::error(&error));
                Err(error)
            }
        }
    }
}
