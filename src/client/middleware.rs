use crate::client::api::GraphQlClient;
use crate::client::errors::ClientError;
use crate::store::{Action, DispatchLayer, HostStore, Middleware};

/// The client packaged as host-store middleware.
///
/// Installation adopts the host store (validating the root-key sub-tree);
/// afterwards every dispatched action runs the rest of the chain first and
/// then triggers a query broadcast, so watchers always observe state that
/// already reflects the action.
pub struct ClientMiddleware {
    client: GraphQlClient,
}

impl ClientMiddleware {
    pub(crate) fn new(client: GraphQlClient) -> Self {
        Self { client }
    }
}

impl DispatchLayer for ClientMiddleware {
    fn dispatch(
        &self,
        _store: &HostStore,
        next: &dyn Fn(Action) -> Action,
        action: Action,
    ) -> Action {
        // Commit first; broadcast must reflect the committed state.
        let action = next(action);
        if let Some(query_manager) = self.client.current_query_manager() {
            query_manager.broadcast_queries();
        }
        action
    }
}

impl Middleware for ClientMiddleware {
    type InstallError = ClientError;

    fn install(&self, store: &HostStore) -> Result<(), ClientError> {
        self.client.adopt(store.clone()).map(|_| ())
    }
}
