use std::collections::BTreeMap;
use std::fmt::{Debug, Display};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks, Create Params, and Actions)
// =============================================================================

/// Trait that any stored record must implement to be managed by ResourceActor.
///
/// Ids are ordered so that the store iterates in allocation (insertion) order.
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Ord + Clone + Send + Sync + Display + Debug;
    type CreateParams: Send + Sync + Debug;
    type Patch: Send + Sync + Debug;

    // --- Custom Actions ---
    type Action: Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;

    /// Construct the full Entity from the allocated ID and creation params
    fn from_create_params(id: Self::Id, params: Self::CreateParams) -> Result<Self, String>;

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), String> {
        Ok(())
    }

    /// Key that must be unique across the store, if any. Checked inside the
    /// actor on create.
    fn unique_key(&self) -> Option<String> {
        None
    }
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), String>;

    // --- Action Handler ---

    /// Handle a domain-specific action. The whole call runs inside the actor
    /// loop, so a check-then-mutate here is atomic with respect to every other
    /// request against the same store.
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, String>;
}

/// Errors reported by the framework itself, before any domain mapping.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FrameworkError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Request rejected: {0}")]
    Rejected(String),
    #[error("Conflicting item: {0}")]
    Conflict(String),
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Predicate evaluated inside the actor against every stored item.
pub type Filter<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

pub enum ResourceRequest<T: Entity> {
    Create {
        params: T::CreateParams,
        respond_to: Response<T>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<T>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
    Query {
        filter: Filter<T>,
        respond_to: Response<Vec<T>>,
    },
}

impl<T: Entity> Debug for ResourceRequest<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create { params, .. } => f.debug_struct("Create").field("params", params).finish(),
            Self::Get { id, .. } => f.debug_struct("Get").field("id", id).finish(),
            Self::Update { id, patch, .. } => f
                .debug_struct("Update")
                .field("id", id)
                .field("patch", patch)
                .finish(),
            Self::Action { id, action, .. } => f
                .debug_struct("Action")
                .field("id", id)
                .field("action", action)
                .finish(),
            Self::Query { .. } => f.debug_struct("Query").finish_non_exhaustive(),
        }
    }
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

pub struct ResourceActor<T: Entity> {
    name: &'static str,
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: BTreeMap<T::Id, T>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        name: &'static str,
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            name,
            receiver,
            store: BTreeMap::new(),
            next_id_fn: Box::new(next_id_fn),
        };
        (actor, ResourceClient::new(sender))
    }

    /// Runs until every client has been dropped.
    pub async fn run(mut self) {
        info!(store = self.name, "Store actor starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    let _ = respond_to.send(self.handle_create(params));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.store.get(&id).cloned()));
                }
                ResourceRequest::Update { id, patch, respond_to } => {
                    let _ = respond_to.send(self.handle_update(id, patch));
                }
                ResourceRequest::Action { id, action, respond_to } => {
                    let _ = respond_to.send(self.handle_action(id, action));
                }
                ResourceRequest::Query { filter, respond_to } => {
                    let items = self.store.values().filter(|item| filter(*item)).cloned().collect();
                    let _ = respond_to.send(Ok(items));
                }
            }
        }

        info!(store = self.name, "Store actor stopped");
    }

    fn handle_create(&mut self, params: T::CreateParams) -> Result<T, FrameworkError> {
        let id = (self.next_id_fn)();
        let mut item = T::from_create_params(id.clone(), params).map_err(FrameworkError::Rejected)?;
        item.on_create().map_err(FrameworkError::Rejected)?;
        if let Some(key) = item.unique_key() {
            if self.store.values().any(|other| other.unique_key().as_ref() == Some(&key)) {
                return Err(FrameworkError::Conflict(key));
            }
        }
        debug!(store = self.name, id = %id, "Item created");
        self.store.insert(id, item.clone());
        Ok(item)
    }

    fn handle_update(&mut self, id: T::Id, patch: T::Patch) -> Result<T, FrameworkError> {
        let item = self
            .store
            .get_mut(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        item.on_update(patch).map_err(FrameworkError::Rejected)?;
        Ok(item.clone())
    }

    fn handle_action(&mut self, id: T::Id, action: T::Action) -> Result<T::ActionResult, FrameworkError> {
        let item = self
            .store
            .get_mut(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        item.handle_action(action).map_err(|e| {
            warn!(store = self.name, id = %id, error = %e, "Action rejected");
            FrameworkError::Rejected(e)
        })
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: Entity> ResourceClient<T> {
    pub(crate) fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn call<R>(
        &self,
        request: ResourceRequest<T>,
        response: oneshot::Receiver<Result<R, FrameworkError>>,
    ) -> Result<R, FrameworkError> {
        self.sender.send(request).await.map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::CreateParams) -> Result<T, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.call(ResourceRequest::Create { params, respond_to }, response).await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.call(ResourceRequest::Get { id, respond_to }, response).await
    }

    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.call(ResourceRequest::Update { id, patch, respond_to }, response).await
    }

    pub async fn perform_action(&self, id: T::Id, action: T::Action) -> Result<T::ActionResult, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.call(ResourceRequest::Action { id, action, respond_to }, response).await
    }

    pub async fn query(
        &self,
        filter: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Result<Vec<T>, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        let filter: Filter<T> = Box::new(filter);
        self.call(ResourceRequest::Query { filter, respond_to }, response).await
    }

    pub async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        self.query(|_| true).await
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Debug, PartialEq)]
    struct Counter {
        id: u64,
        label: String,
        hits: u32,
        sealed: bool,
    }

    #[derive(Debug)]
    struct CounterCreate {
        label: String,
    }

    #[derive(Debug)]
    enum CounterAction {
        Hit,
        Seal,
    }

    impl Entity for Counter {
        type Id = u64;
        type CreateParams = CounterCreate;
        type Patch = String;
        type Action = CounterAction;
        type ActionResult = bool;

        fn from_create_params(id: u64, params: CounterCreate) -> Result<Self, String> {
            if params.label.is_empty() {
                return Err("label required".to_string());
            }
            Ok(Self { id, label: params.label, hits: 0, sealed: false })
        }

        fn unique_key(&self) -> Option<String> {
            Some(self.label.clone())
        }

        fn on_update(&mut self, patch: String) -> Result<(), String> {
            self.label = patch;
            Ok(())
        }

        fn handle_action(&mut self, action: CounterAction) -> Result<bool, String> {
            match action {
                CounterAction::Hit if self.sealed => Err("sealed".to_string()),
                CounterAction::Hit => {
                    self.hits += 1;
                    Ok(true)
                }
                CounterAction::Seal if self.sealed => Ok(false),
                CounterAction::Seal => {
                    self.sealed = true;
                    Ok(true)
                }
            }
        }
    }

    fn start() -> ResourceClient<Counter> {
        let counter = Arc::new(AtomicU64::new(1));
        let next_id = move || counter.fetch_add(1, Ordering::SeqCst);
        let (actor, client) = ResourceActor::new("counters", 10, next_id);
        tokio::spawn(actor.run());
        client
    }

    #[tokio::test]
    async fn test_resource_actor_with_actions() {
        let client = start();

        let id = client.create(CounterCreate { label: "a".into() }).await.unwrap().id;
        assert!(client.perform_action(id, CounterAction::Hit).await.unwrap());

        // Sealing twice reports no change the second time
        assert!(client.perform_action(id, CounterAction::Seal).await.unwrap());
        assert!(!client.perform_action(id, CounterAction::Seal).await.unwrap());

        let err = client.perform_action(id, CounterAction::Hit).await.unwrap_err();
        assert_eq!(err, FrameworkError::Rejected("sealed".to_string()));

        let stored = client.get(id).await.unwrap().unwrap();
        assert_eq!(stored.hits, 1);
        assert!(stored.sealed);
    }

    #[tokio::test]
    async fn test_query_preserves_insertion_order() {
        let client = start();
        for label in ["x", "y", "z"] {
            client.create(CounterCreate { label: label.into() }).await.unwrap();
        }

        let labels: Vec<String> = client.list().await.unwrap().into_iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["x", "y", "z"]);

        let only_y = client.query(|c: &Counter| c.label == "y").await.unwrap();
        assert_eq!(only_y.len(), 1);
        assert_eq!(only_y[0].id, 2);
    }

    #[tokio::test]
    async fn test_missing_and_rejected_items() {
        let client = start();

        let err = client.update(42, "b".into()).await.unwrap_err();
        assert_eq!(err, FrameworkError::NotFound("42".to_string()));

        let err = client.create(CounterCreate { label: String::new() }).await.unwrap_err();
        assert_eq!(err, FrameworkError::Rejected("label required".to_string()));

        assert!(client.get(7).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unique_key_conflict() {
        let client = start();
        client.create(CounterCreate { label: "dup".into() }).await.unwrap();

        let err = client.create(CounterCreate { label: "dup".into() }).await.unwrap_err();
        assert_eq!(err, FrameworkError::Conflict("dup".to_string()));
        assert_eq!(client.list().await.unwrap().len(), 1);
    }
}
