//! Entry point: owns the store, the session and the registered receivers,
//! and drives one crawl at a time.

use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::level::Level;
use crate::registry::{Registration, Registry};
use crate::runner::{process, Node, RunContext};
use crate::session::Session;
use crate::traits::receiver::Receiver;
use crate::traits::store::ContentStore;
use crate::types::report::RunReport;
use crate::types::sites::Tenant;

/// Crawls a tenant and dispatches to registered receivers.
///
/// # Example
///
/// ```rust,ignore
/// let mut manager = RunningManager::new(store, session);
/// manager.register(InventoryReceiver::new());
/// let report = manager.run(Tenant::new("contoso")).await?;
/// ```
pub struct RunningManager<S> {
    store: S,
    session: Session,
    registry: Registry,
    cancel: CancellationToken,
}

impl<S: ContentStore> RunningManager<S> {
    pub fn new(store: S, session: Session) -> Self {
        Self {
            store,
            session,
            registry: Registry::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// Stop the run before the next node once `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Registers a receiver. Dispatch follows registration order.
    pub fn register(&mut self, receiver: impl Receiver + 'static) -> &Registration {
        self.registry.register(Box::new(receiver))
    }

    pub fn register_boxed(&mut self, receiver: Box<dyn Receiver>) -> &Registration {
        self.registry.register(receiver)
    }

    pub fn receivers(&self) -> &Registry {
        &self.registry
    }

    pub fn any_receiver_active_at_or_below(&self, level: Level) -> bool {
        self.registry.any_active_at_or_below(level)
    }

    pub fn any_receiver_with_include_sub_sites(&self) -> bool {
        self.registry.any_with_include_sub_sites()
    }

    pub fn any_receiver_with_include_hidden_lists(&self) -> bool {
        self.registry.any_with_include_hidden_lists()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Hands the receivers back, in registration order.
    pub fn into_receivers(self) -> Vec<Box<dyn Receiver>> {
        self.registry.into_receivers()
    }

    /// Crawls everything beneath `tenant`.
    ///
    /// Every receiver gets `on_start` first and `on_end` last. If a store
    /// call fails the run stops there, `on_end` is not called and the error
    /// is returned.
    pub async fn run(&mut self, tenant: Tenant) -> Result<RunReport> {
        let registry = std::mem::take(&mut self.registry);
        let mut ctx = RunContext::new(&self.store, registry, self.cancel.clone());

        tracing::info!(
            run_id = %ctx.report().run_id,
            receivers = ctx.report().receivers,
            root = %self.session.root(),
            "Starting tenant run"
        );

        ctx.registry_mut().dispatch_all(|receiver| receiver.on_start());
        let result = process(&mut ctx, Node::new(tenant, self.session.clone())).await;
        if result.is_ok() {
            ctx.registry_mut().dispatch_all(|receiver| receiver.on_end());
        }

        let (registry, mut report) = ctx.into_parts();
        self.registry = registry;

        match result {
            Ok(()) => {
                report.finish();
                tracing::info!(
                    run_id = %report.run_id,
                    nodes = report.total_nodes(),
                    store_calls = report.store_calls,
                    pruned_axes = report.pruned_axes,
                    "Tenant run complete"
                );
                Ok(report)
            }
            Err(e) => {
                tracing::error!(run_id = %report.run_id, error = %e, "Tenant run failed");
                Err(e)
            }
        }
    }
}
