use std::{collections::VecDeque, time::Instant};

use catalog::ProductView;
use tracing::{debug, warn};

use crate::{
    api::ApiClient,
    error::ClientError,
    form::ProductForm,
    state::{Action, ClientState, Effect},
};

/// A live listing screen: reducer state plus the client that feeds it.
///
/// Effects run as soon as they are produced, except notice timers, which wait
/// for [`Session::tick`] to be called with a time past their deadline.
pub struct Session {
    api: ApiClient,
    state: ClientState,
    timers: Vec<(Instant, u64)>,
}

impl Session {
    pub fn new(api: ApiClient) -> Self {
        Self::with_state(api, ClientState::new())
    }

    pub fn with_state(api: ApiClient, state: ClientState) -> Self {
        Self {
            api,
            state,
            timers: Vec::new(),
        }
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Loads the category list and the first page under the current filters.
    pub async fn start(&mut self) -> Result<(), ClientError> {
        self.load_categories().await?;
        let page = self.state.current_page;
        self.dispatch(Action::PageRequested(page)).await;
        Ok(())
    }

    pub async fn load_categories(&mut self) -> Result<(), ClientError> {
        let categories = self.api.categories().await?;
        self.dispatch(Action::CategoriesLoaded(categories)).await;
        Ok(())
    }

    /// Applies `action` and every action its effects produce, until the queue runs dry.
    pub async fn dispatch(&mut self, action: Action) {
        let mut queue = VecDeque::from([action]);

        while let Some(action) = queue.pop_front() {
            for effect in self.state.apply(action) {
                if let Some(next) = self.run(effect).await {
                    queue.push_back(next);
                }
            }
        }
    }

    /// Fires every notice timer due at `now`.
    pub async fn tick(&mut self, now: Instant) {
        let (due, pending): (Vec<_>, Vec<_>) =
            self.timers.drain(..).partition(|(at, _)| *at <= now);
        self.timers = pending;

        for (_, id) in due {
            self.dispatch(Action::NoticeExpired(id)).await;
        }
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Validates the form, creates the product and refreshes the list.
    /// Returns the created product, or `None` with the form's errors filled in.
    pub async fn submit(&mut self, form: &mut ProductForm) -> Option<ProductView> {
        let payload = form.validate()?;
        form.submitting = true;

        match self.api.create_product(&payload).await {
            Ok(product) => {
                form.reset();
                self.dispatch(Action::ProductAdded).await;
                Some(product)
            }
            Err(e) => {
                warn!("Failed to add product: {e}");
                form.absorb(&e);
                None
            }
        }
    }

    async fn run(&mut self, effect: Effect) -> Option<Action> {
        match effect {
            Effect::Fetch { page } => {
                let query = self.state.query(page);
                debug!("Fetching products: {query:?}");

                match self.api.list_products(&query).await {
                    Ok(page) => Some(Action::ProductsLoaded(page)),
                    Err(e) => {
                        warn!("Failed to fetch products: {e}");
                        Some(Action::LoadFailed(e.to_string()))
                    }
                }
            }
            Effect::Delete { id } => match self.api.delete_product(&id).await {
                Ok(_) => Some(Action::ProductDeleted),
                Err(e) => {
                    warn!("Failed to delete product {id}: {e}");
                    Some(Action::DeleteFailed(e.to_string()))
                }
            },
            Effect::ExpireNotice { id, after } => {
                self.timers.push((Instant::now() + after, id));
                None
            }
        }
    }
}
