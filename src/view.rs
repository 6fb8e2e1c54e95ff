//! Page state for the list and detail screens.
//!
//! A [`ListView`] owns one loaded collection plus the current filter and the
//! open modal, if any. Mutations never patch rows in place: a successful
//! create or edit marks the view stale and the caller reloads it.

use serde::Serialize;
use std::cell::OnceCell;

use crate::{
    api::{Lookup, ResourceClient},
    filter,
    forms::{field_errors, EntityForm, FieldErrors},
    resource::{FilterField, Resource},
};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case", bound = "")]
pub enum Modal<R: Resource> {
    Closed,
    Add {
        form: R::Form,
        errors: FieldErrors,
        failure: Option<String>,
    },
    Edit {
        id: i64,
        form: R::Form,
        errors: FieldErrors,
        failure: Option<String>,
    },
    ConfirmDelete {
        target: R,
    },
}

/// What a submitted action ended in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The remote API accepted the change.
    Done,
    /// The form did not validate, nothing was sent.
    Invalid,
    /// The remote call failed; the modal is still open.
    Failed,
    /// Delete confirmation was refused.
    Declined,
}

/// Handed out when a load starts; a completion with an outdated ticket is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// The console builds one view per request and drops it after rendering, so
/// `dispose` and the stale flag only matter to callers that keep a view across
/// several loads. Load tickets still order overlapping loads on a kept view.
#[derive(Debug)]
pub struct ListView<R: Resource> {
    items: Vec<R>,
    field: R::Field,
    query: String,
    modal: Modal<R>,
    notice: Option<String>,
    visible: OnceCell<Vec<usize>>,
    generation: u64,
    stale: bool,
    disposed: bool,
}

impl<R: Resource> Default for ListView<R> {
    fn default() -> Self {
        Self::new(R::Field::default_field(), String::new())
    }
}

impl<R: Resource> ListView<R> {
    pub fn new(field: R::Field, query: String) -> Self {
        Self {
            items: Vec::new(),
            field,
            query,
            modal: Modal::Closed,
            notice: None,
            visible: OnceCell::new(),
            generation: 0,
            stale: true,
            disposed: false,
        }
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket(self.generation)
    }

    /// Stores a finished load. Returns false when the result was discarded.
    pub fn finish_load(&mut self, ticket: LoadTicket, items: Vec<R>) -> bool {
        if self.disposed || ticket.0 != self.generation {
            log::debug!("Discarding outdated {} load", R::PATH);
            return false;
        }
        self.set_items(items);
        self.stale = false;
        true
    }

    pub async fn load(&mut self, client: &ResourceClient<R>) {
        let ticket = self.begin_load();
        let items = client.list_all().await;
        self.finish_load(ticket, items);
    }

    /// Detaches the view; loads still in flight will not touch it.
    pub fn dispose(&mut self) {
        self.disposed = true;
    }

    fn set_items(&mut self, items: Vec<R>) {
        self.items = items;
        self.visible = OnceCell::new();
    }

    pub fn set_field(&mut self, field: R::Field) {
        if field != self.field {
            self.field = field;
            self.visible = OnceCell::new();
        }
    }

    pub fn set_query(&mut self, query: &str) {
        if query != self.query {
            self.query = query.to_owned();
            self.visible = OnceCell::new();
        }
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn field(&self) -> R::Field {
        self.field
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn modal(&self) -> &Modal<R> {
        &self.modal
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Rows passing the current filter, recomputed only after an input changed.
    pub fn visible(&self) -> Vec<&R> {
        self.visible
            .get_or_init(|| filter::filter_indices(&self.items, self.field, &self.query))
            .iter()
            .map(|&i| &self.items[i])
            .collect()
    }

    pub fn find(&self, id: i64) -> Option<&R> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Display-only hint for the add form. The server assigns the real id.
    pub fn candidate_id(&self) -> i64 {
        self.items.iter().map(|item| item.id()).max().map_or(1, |max| max + 1)
    }

    pub fn open_add(&mut self, form: R::Form) {
        self.modal = Modal::Add {
            form,
            errors: FieldErrors::new(),
            failure: None,
        };
    }

    pub fn open_edit(&mut self, entity: &R) {
        self.modal = Modal::Edit {
            id: entity.id(),
            form: R::Form::from_draft(&entity.to_draft()),
            errors: FieldErrors::new(),
            failure: None,
        };
    }

    pub fn request_delete(&mut self, target: R) {
        self.modal = Modal::ConfirmDelete { target };
    }

    pub async fn submit_add(&mut self, client: &ResourceClient<R>, form: R::Form) -> Outcome {
        let draft = match form.clone().into_draft() {
            Ok(draft) => draft,
            Err(errors) => {
                self.modal = Modal::Add {
                    form,
                    errors: field_errors(&errors),
                    failure: None,
                };
                return Outcome::Invalid;
            }
        };
        match client.create(&draft).await {
            Ok(_) => {
                self.modal = Modal::Closed;
                self.stale = true;
                Outcome::Done
            }
            Err(e) => {
                log::error!("Failed to add {}: {}", R::SINGULAR, e);
                self.modal = Modal::Add {
                    form,
                    errors: FieldErrors::new(),
                    failure: Some(e.to_string()),
                };
                Outcome::Failed
            }
        }
    }

    pub async fn submit_edit(
        &mut self,
        client: &ResourceClient<R>,
        id: i64,
        form: R::Form,
    ) -> Outcome {
        let draft = match form.clone().into_draft() {
            Ok(draft) => draft,
            Err(errors) => {
                self.modal = Modal::Edit {
                    id,
                    form,
                    errors: field_errors(&errors),
                    failure: None,
                };
                return Outcome::Invalid;
            }
        };
        match client.update(&R::from_draft(id, draft)).await {
            Ok(_) => {
                self.modal = Modal::Closed;
                self.stale = true;
                Outcome::Done
            }
            Err(e) => {
                log::error!("Failed to edit {} {}: {}", R::SINGULAR, id, e);
                self.modal = Modal::Edit {
                    id,
                    form,
                    errors: FieldErrors::new(),
                    failure: Some(e.to_string()),
                };
                Outcome::Failed
            }
        }
    }

    /// Only a confirmed request reaches the remote API.
    pub async fn resolve_delete(
        &mut self,
        client: &ResourceClient<R>,
        id: i64,
        confirmed: bool,
    ) -> Outcome {
        if !confirmed {
            self.modal = Modal::Closed;
            return Outcome::Declined;
        }
        match client.delete(id).await {
            Ok(()) => {
                self.remove_local(id);
                self.modal = Modal::Closed;
                self.stale = true;
                Outcome::Done
            }
            Err(e) => {
                log::error!("Failed to delete {} {}: {}", R::SINGULAR, id, e);
                self.notice = Some(e.to_string());
                self.modal = match self.find(id).cloned() {
                    Some(target) => Modal::ConfirmDelete { target },
                    None => Modal::Closed,
                };
                Outcome::Failed
            }
        }
    }

    /// Drops the row with `id`; a no-op when it is not there.
    pub fn remove_local(&mut self, id: i64) {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        if self.items.len() != before {
            self.visible = OnceCell::new();
        }
    }
}

/// A single entity resolved from a path segment.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView<R> {
    pub lookup: Lookup<R>,
}

impl<R: Resource> DetailView<R> {
    /// A segment that is not an integer id resolves to not found without a remote call.
    pub async fn resolve(client: &ResourceClient<R>, raw_id: &str) -> Self {
        let lookup = match raw_id.parse::<i64>() {
            Ok(id) => client.get_by_id(id).await,
            Err(_) => Lookup::NotFound,
        };
        Self { lookup }
    }
}
