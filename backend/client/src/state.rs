//! # Listing screen state
//!
//! The product list, its filters and its transient messages as one value. [`ClientState::apply`]
//! never performs I/O: it returns the [`Effect`]s the caller must run, and the results come
//! back in as further [`Action`]s.
//!
//! Filter changes always reset to page 1. A successful delete refetches the current page,
//! or the previous one when the deleted product was the last item on a page after the first.
use std::{collections::BTreeSet, time::Duration};

use catalog::{Category, ProductPage, ProductQuery, ProductView};

pub const ITEMS_PER_PAGE: u32 = 10;
pub const ADDED_NOTICE_TTL: Duration = Duration::from_secs(2);
pub const DELETED_NOTICE_TTL: Duration = Duration::from_secs(3);

pub const ADDED_TEXT: &str = "Product added successfully!";
pub const DELETED_TEXT: &str = "Product deleted successfully!";
pub const DELETE_FAILED_TEXT: &str = "Failed to delete product. Please try again.";

/// Short-lived success message. `id` lets a stale timer skip a newer notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub id: String,
    pub name: String,
}

impl PendingDelete {
    pub fn prompt(&self) -> String {
        format!("Are you sure you want to delete \"{}\"?", self.name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SearchChanged(String),
    CategoryToggled(String),
    FiltersCleared,
    PageRequested(u32),
    ProductsLoaded(ProductPage),
    LoadFailed(String),
    CategoriesLoaded(Vec<Category>),
    ProductAdded,
    DeleteRequested { id: String, name: String },
    DeleteConfirmed,
    DeleteCancelled,
    ProductDeleted,
    DeleteFailed(String),
    NoticeExpired(u64),
    AlertDismissed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch { page: u32 },
    Delete { id: String },
    ExpireNotice { id: u64, after: Duration },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientState {
    pub search_term: String,
    pub selected_categories: BTreeSet<String>,
    pub current_page: u32,
    pub total_pages: u32,
    pub products: Vec<ProductView>,
    pub categories: Vec<Category>,
    pub loading: bool,
    pub notice: Option<Notice>,
    /// Blocking message, cleared only by [`Action::AlertDismissed`].
    pub alert: Option<String>,
    pub load_error: Option<String>,
    pub pending_delete: Option<PendingDelete>,
    next_notice: u64,
}

impl Default for ClientState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            selected_categories: BTreeSet::new(),
            current_page: 1,
            total_pages: 0,
            products: Vec::new(),
            categories: Vec::new(),
            loading: false,
            notice: None,
            alert: None,
            load_error: None,
            pending_delete: None,
            next_notice: 0,
        }
    }
}

impl ClientState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with filters already chosen, for shells that take them up front.
    pub fn with_filters(search: &str, categories: impl IntoIterator<Item = String>) -> Self {
        Self {
            search_term: search.trim().to_string(),
            selected_categories: categories.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Listing request for `page` under the current filters.
    pub fn query(&self, page: u32) -> ProductQuery {
        ProductQuery {
            page: page.max(1),
            limit: ITEMS_PER_PAGE,
            search: self.search_term.clone(),
            categories: self.selected_categories.iter().cloned().collect(),
        }
    }

    pub fn has_filters(&self) -> bool {
        !self.search_term.is_empty() || !self.selected_categories.is_empty()
    }

    pub fn apply(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::SearchChanged(term) => {
                let term = term.trim().to_string();
                if term == self.search_term {
                    return Vec::new();
                }
                self.search_term = term;
                self.first_page()
            }
            Action::CategoryToggled(id) => {
                if !self.selected_categories.remove(&id) {
                    self.selected_categories.insert(id);
                }
                self.first_page()
            }
            Action::FiltersCleared => {
                if !self.has_filters() {
                    return Vec::new();
                }
                self.search_term.clear();
                self.selected_categories.clear();
                self.first_page()
            }
            Action::PageRequested(page) => self.fetch(page),
            Action::ProductsLoaded(page) => {
                self.loading = false;
                self.load_error = None;
                self.products = page.products;
                self.current_page = page.pagination.current_page;
                self.total_pages = page.pagination.total_pages;
                Vec::new()
            }
            Action::LoadFailed(message) => {
                self.loading = false;
                self.products.clear();
                self.load_error = Some(message);
                Vec::new()
            }
            Action::CategoriesLoaded(categories) => {
                self.categories = categories;
                Vec::new()
            }
            Action::ProductAdded => {
                let mut effects = self.notify(ADDED_TEXT, ADDED_NOTICE_TTL);
                effects.extend(self.first_page());
                effects
            }
            Action::DeleteRequested { id, name } => {
                self.pending_delete = Some(PendingDelete { id, name });
                Vec::new()
            }
            Action::DeleteConfirmed => match self.pending_delete.take() {
                Some(pending) => vec![Effect::Delete { id: pending.id }],
                None => Vec::new(),
            },
            Action::DeleteCancelled => {
                self.pending_delete = None;
                Vec::new()
            }
            Action::ProductDeleted => {
                let page = if self.products.len() == 1 && self.current_page > 1 {
                    self.current_page - 1
                } else {
                    self.current_page
                };
                self.current_page = page;
                let mut effects = self.notify(DELETED_TEXT, DELETED_NOTICE_TTL);
                effects.extend(self.fetch(page));
                effects
            }
            Action::DeleteFailed(_) => {
                self.alert = Some(DELETE_FAILED_TEXT.to_string());
                Vec::new()
            }
            Action::NoticeExpired(id) => {
                if self.notice.as_ref().is_some_and(|n| n.id == id) {
                    self.notice = None;
                }
                Vec::new()
            }
            Action::AlertDismissed => {
                self.alert = None;
                Vec::new()
            }
        }
    }

    fn first_page(&mut self) -> Vec<Effect> {
        self.current_page = 1;
        self.fetch(1)
    }

    fn fetch(&mut self, page: u32) -> Vec<Effect> {
        self.loading = true;
        vec![Effect::Fetch { page: page.max(1) }]
    }

    fn notify(&mut self, text: &str, ttl: Duration) -> Vec<Effect> {
        self.next_notice += 1;
        let id = self.next_notice;
        self.notice = Some(Notice {
            id,
            text: text.to_string(),
        });

        vec![Effect::ExpireNotice { id, after: ttl }]
    }
}
