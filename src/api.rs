use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

use crate::{
    errors::{ClientError, Operation},
    resource::Resource,
    structs::{Car, Rental, User},
};

/// Outcome of fetching a single entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
    /// The remote API could not be reached or answered with garbage. Carries the reason.
    Unavailable(String),
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(item) => Some(item),
            _ => None,
        }
    }
}

/// CRUD calls for one resource of the remote API. One attempt per call.
pub struct ResourceClient<R> {
    http: reqwest::Client,
    base_url: String,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceClient<R> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> ResourceClient<R> {
    pub fn new(http: reqwest::Client, api_url: &str) -> Self {
        Self {
            http,
            base_url: api_url.trim_end_matches('/').to_owned(),
            _resource: PhantomData,
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.base_url, R::PATH)
    }

    fn item_url(&self, id: i64) -> String {
        format!("{}/{}/{}", self.base_url, R::PATH, id)
    }

    /// Every entity of the resource. Failures are logged and read as an empty list.
    pub async fn list_all(&self) -> Vec<R> {
        let request = self.http.get(self.collection_url());
        match self.send_json::<Vec<R>>(Operation::Fetch, request).await {
            Ok(items) => items,
            Err(e) => {
                log::error!("Failed to list {}: {}", R::PATH, e);
                Vec::new()
            }
        }
    }

    pub async fn get_by_id(&self, id: i64) -> Lookup<R> {
        let request = self.http.get(self.item_url(id));
        match self.send_json::<R>(Operation::Fetch, request).await {
            Ok(item) => Lookup::Found(item),
            Err(e) if e.is_not_found() => {
                log::debug!("{} {} not found", R::SINGULAR, id);
                Lookup::NotFound
            }
            Err(e) => {
                log::error!("Failed to fetch {} {}: {}", R::SINGULAR, id, e);
                Lookup::Unavailable(e.to_string())
            }
        }
    }

    /// Sends the draft without an id; the server assigns it.
    pub async fn create(&self, draft: &R::Draft) -> Result<R, ClientError> {
        let request = self.http.post(self.collection_url()).json(draft);
        let created: R = self.send_json(Operation::Create, request).await?;
        log::info!("Created {} {}", R::SINGULAR, created.id());
        Ok(created)
    }

    /// Full replace of the stored entity.
    pub async fn update(&self, entity: &R) -> Result<R, ClientError> {
        let request = self.http.put(self.item_url(entity.id())).json(entity);
        let updated: R = self.send_json(Operation::Update, request).await?;
        log::info!("Updated {} {}", R::SINGULAR, updated.id());
        Ok(updated)
    }

    /// Deleting an id the server no longer has counts as success.
    pub async fn delete(&self, id: i64) -> Result<(), ClientError> {
        let request = self.http.delete(self.item_url(id));
        match self.send(Operation::Delete, request).await {
            Ok(_) => {
                log::info!("Deleted {} {}", R::SINGULAR, id);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                log::warn!("{} {} was already gone", R::SINGULAR, id);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn send(&self, op: Operation, request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request.send().await.map_err(|source| ClientError::Transport {
            op,
            resource: R::PATH,
            source,
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                op,
                resource: R::PATH,
                status,
            });
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        op: Operation,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = self.send(op, request).await?;
        response.json::<T>().await.map_err(|source| {
            if source.is_decode() {
                ClientError::Decode {
                    op,
                    resource: R::PATH,
                    source,
                }
            } else {
                ClientError::Transport {
                    op,
                    resource: R::PATH,
                    source,
                }
            }
        })
    }
}

/// One client per resource, sharing a connection pool.
#[derive(Clone)]
pub struct Clients {
    pub cars: ResourceClient<Car>,
    pub rentals: ResourceClient<Rental>,
    pub users: ResourceClient<User>,
}

impl Clients {
    pub fn new(http: reqwest::Client, api_url: &str) -> Self {
        Self {
            cars: ResourceClient::new(http.clone(), api_url),
            rentals: ResourceClient::new(http.clone(), api_url),
            users: ResourceClient::new(http, api_url),
        }
    }
}
