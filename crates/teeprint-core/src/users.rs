//! User listing API types and table bookkeeping.
//!
//! The listing API is paginated server-side; sorting applies to the rows of
//! the current page only.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Delay between the last search/paging change and the fetch it triggers.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Selectable page sizes.
pub const PAGE_SIZES: [u32; 3] = [5, 10, 20];

/// Default page size.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A user record as returned by the listing API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub email_verified_at: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl User {
    /// Date part of `created_at` (the API returns ISO-8601 timestamps).
    pub fn created_date(&self) -> &str {
        self.created_at.get(..10).unwrap_or(&self.created_at)
    }
}

/// One page of users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPage {
    pub data: Vec<User>,
    pub current_page: u32,
    #[serde(default)]
    pub per_page: Option<u32>,
    pub total: u64,
    #[serde(default)]
    pub last_page: Option<u32>,
    #[serde(default)]
    pub next_page_url: Option<String>,
    #[serde(default)]
    pub prev_page_url: Option<String>,
}

/// Query parameters sent to the listing API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserQuery {
    /// Page size.
    pub paginate: u32,
    /// Free-text filter; omitted from the request when empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// 1-based page index.
    pub page: u32,
}

impl UserQuery {
    pub fn new(paginate: u32, search: &str, page: u32) -> Self {
        let search = search.trim();
        Self {
            paginate,
            search: (!search.is_empty()).then(|| search.to_string()),
            page: page.max(1),
        }
    }

    /// Key/value pairs in request order. `search` is left out when empty.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("paginate", self.paginate.to_string())];
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs
    }
}

/// Sortable columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortField {
    Name,
    Email,
    CreatedAt,
}

impl SortField {
    pub fn label(self) -> &'static str {
        match self {
            SortField::Name => "Name",
            SortField::Email => "Email",
            SortField::CreatedAt => "Created At",
        }
    }

    fn compare(self, a: &User, b: &User) -> Ordering {
        match self {
            SortField::Name => a.name.cmp(&b.name),
            SortField::Email => a.email.cmp(&b.email),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Table state: paging, search, sort and row selection.
#[derive(Debug, Clone)]
pub struct UserTable {
    pub search: String,
    pub page: u32,
    pub per_page: u32,
    sort: Option<(SortField, SortDirection)>,
    selected: HashSet<u64>,
    rows: Vec<User>,
    total: u64,
    /// When the current query was last changed and has not been fetched yet.
    dirty_since: Option<Instant>,
}

impl Default for UserTable {
    fn default() -> Self {
        Self {
            search: String::new(),
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
            sort: None,
            selected: HashSet::new(),
            rows: Vec::new(),
            total: 0,
            dirty_since: None,
        }
    }
}

impl UserTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Query for the current search/page/page-size.
    pub fn query(&self) -> UserQuery {
        UserQuery::new(self.per_page, &self.search, self.page)
    }

    pub fn rows(&self) -> &[User] {
        &self.rows
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn sort(&self) -> Option<(SortField, SortDirection)> {
        self.sort
    }

    /// Mark the query as changed at `now`. The fetch fires once
    /// [`SEARCH_DEBOUNCE`] has passed without further changes.
    pub fn mark_dirty(&mut self, now: Instant) {
        self.dirty_since = Some(now);
    }

    /// Whether a debounced fetch is due at `now`. Clears the pending flag when it is.
    pub fn take_due_fetch(&mut self, now: Instant) -> bool {
        match self.dirty_since {
            Some(since) if now.duration_since(since) >= SEARCH_DEBOUNCE => {
                self.dirty_since = None;
                true
            }
            _ => false,
        }
    }

    /// Whether a change is waiting for its debounced fetch.
    pub fn is_dirty(&self) -> bool {
        self.dirty_since.is_some()
    }

    /// Change the search term; results restart at page 1.
    pub fn set_search(&mut self, search: String, now: Instant) {
        if self.search != search {
            self.search = search;
            self.page = 1;
            self.mark_dirty(now);
        }
    }

    /// Change the page size; results restart at page 1.
    pub fn set_per_page(&mut self, per_page: u32, now: Instant) {
        if self.per_page != per_page {
            self.per_page = per_page;
            self.page = 1;
            self.mark_dirty(now);
        }
    }

    pub fn can_go_prev(&self) -> bool {
        self.page > 1
    }

    pub fn can_go_next(&self) -> bool {
        u64::from(self.page) * u64::from(self.per_page) < self.total
    }

    pub fn prev_page(&mut self, now: Instant) {
        if self.can_go_prev() {
            self.page -= 1;
            self.mark_dirty(now);
        }
    }

    pub fn next_page(&mut self, now: Instant) {
        if self.can_go_next() {
            self.page += 1;
            self.mark_dirty(now);
        }
    }

    /// Cycle sort on `field`: ascending → descending → unsorted. Picking a
    /// different column starts over at ascending.
    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort = match self.sort {
            Some((current, SortDirection::Ascending)) if current == field => {
                Some((field, SortDirection::Descending))
            }
            Some((current, SortDirection::Descending)) if current == field => None,
            _ => Some((field, SortDirection::Ascending)),
        };
        self.apply_sort();
    }

    /// Arrow shown next to a column header.
    pub fn sort_indicator(&self, field: SortField) -> &'static str {
        match self.sort {
            Some((current, SortDirection::Ascending)) if current == field => "↑",
            Some((current, SortDirection::Descending)) if current == field => "↓",
            _ => "↕",
        }
    }

    /// Install a freshly fetched page.
    pub fn apply_page(&mut self, page: UserPage) {
        self.total = page.total;
        self.rows = page.data;
        self.apply_sort();
    }

    /// Reset to an empty table after a failed fetch.
    pub fn apply_failure(&mut self) {
        self.rows.clear();
        self.total = 0;
    }

    fn apply_sort(&mut self) {
        if let Some((field, direction)) = self.sort {
            self.rows.sort_by(|a, b| {
                let ord = field.compare(a, b);
                match direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }
    }

    pub fn is_selected(&self, id: u64) -> bool {
        self.selected.contains(&id)
    }

    pub fn set_selected(&mut self, id: u64, selected: bool) {
        if selected {
            self.selected.insert(id);
        } else {
            self.selected.remove(&id);
        }
    }

    /// Whether every visible row is selected (and there is at least one).
    pub fn all_selected(&self) -> bool {
        !self.rows.is_empty() && self.rows.iter().all(|u| self.selected.contains(&u.id))
    }

    /// Select or clear every visible row.
    pub fn select_all(&mut self, selected: bool) {
        if selected {
            self.selected = self.rows.iter().map(|u| u.id).collect();
        } else {
            self.selected.clear();
        }
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// "first-last of total" label for the pagination footer.
    pub fn range_label(&self) -> String {
        let per_page = u64::from(self.per_page);
        let page = u64::from(self.page);
        let first = ((page - 1) * per_page + 1).min(self.total);
        let last = (page * per_page).min(self.total);
        format!("{}-{} of {}", first, last, self.total)
    }
}
