//! The node protocol shared by every level.
//!
//! Each node goes through four phases:
//!
//! 1. **Hydrate** the entity's fields from the store.
//! 2. **Start**: dispatch the start (or leaf) callback to the active receivers.
//! 3. **Descend** into each child axis whose gate is open, one child at a time,
//!    depth-first.
//! 4. **End**: dispatch the end callback, then crawl the nested same-kind
//!    axis (sub-sites, sub-folders) and dispatch end-after-nested.
//!
//! Levels plug into the protocol through [`Visit`]; the protocol itself lives
//! only in [`process`].

mod folder;
mod list;
mod site;
mod taxonomy;
mod tenant;

use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use crate::error::{Result, RunnerError, StoreError, StoreResult};
use crate::level::Level;
use crate::registry::Registry;
use crate::session::Session;
use crate::traits::receiver::Receiver;
use crate::traits::store::{Axis, ContentStore};
use crate::types::config::ReceiverOptions;
use crate::types::entity::{Element, EntityKey, EntityRecord, Fields};
use crate::types::report::RunReport;
use crate::types::sites::{File, Folder, List, ListItem, Site, SiteCollection, Tenant, View};
use crate::types::taxonomy::{Term, TermGroup, TermSet, TermStore};

/// One entity waiting to be processed, with the session used to reach it.
pub(crate) struct Node<E> {
    element: E,
    session: Session,
}

impl<E: Element> Node<E> {
    pub(crate) fn new(element: E, session: Session) -> Self {
        Self { element, session }
    }

    /// Node for an enumerated child, reached through the parent's session.
    pub(crate) fn child(axis: Axis, record: EntityRecord, session: &Session) -> StoreResult<Self> {
        Ok(Self::new(E::from_record(axis, record)?, session.clone()))
    }
}

/// Per-level hooks plugged into [`process`].
pub(crate) trait Visit: Element + 'static {
    /// Axes crawled between start and end, in order.
    const AXES: &'static [Axis] = &[];

    /// Same-kind axis crawled after end.
    const NESTED: Option<Axis> = None;

    /// Node-specific filter applied on top of level membership.
    fn admits(&self, _options: &ReceiverOptions) -> bool {
        true
    }

    /// Called once the entity is hydrated, before any dispatch.
    fn hydrated(&self, _active: usize) {}

    /// Start callback, or the only callback of a leaf.
    fn start(&self, receiver: &mut dyn Receiver);

    fn end(&self, _receiver: &mut dyn Receiver) {}

    fn end_after_nested(&self, _receiver: &mut dyn Receiver) {}

    /// Fields a child record on `axis` needs before [`Visit::child`] can
    /// route it. Any the store left out of the enumeration are hydrated
    /// first.
    fn routing_fields(_axis: Axis) -> &'static [&'static str] {
        &[]
    }

    /// Builds the node for one enumerated child. `None` skips the child
    /// without touching the store.
    fn child(
        &self,
        _axis: Axis,
        _record: EntityRecord,
        _session: &Session,
        _registry: &Registry,
    ) -> StoreResult<Option<AnyNode>> {
        Ok(None)
    }

    fn is_leaf() -> bool {
        Self::AXES.is_empty() && Self::NESTED.is_none()
    }
}

macro_rules! any_node {
    ($($variant:ident),+ $(,)?) => {
        /// A node of any level.
        pub(crate) enum AnyNode {
            $($variant(Node<$variant>),)+
        }

        $(
            impl From<Node<$variant>> for AnyNode {
                fn from(node: Node<$variant>) -> Self {
                    AnyNode::$variant(node)
                }
            }
        )+

        fn process_any<'a, 's: 'a>(ctx: &'a mut RunContext<'s>, node: AnyNode) -> BoxFuture<'a, Result<()>> {
            match node {
                $(AnyNode::$variant(node) => process(ctx, node),)+
            }
        }
    };
}

any_node!(
    Tenant,
    TermStore,
    TermGroup,
    TermSet,
    Term,
    SiteCollection,
    Site,
    List,
    View,
    Folder,
    ListItem,
    File,
);

/// State shared by every node of one run.
pub(crate) struct RunContext<'s> {
    store: &'s dyn ContentStore,
    registry: Registry,
    report: RunReport,
    cancel: CancellationToken,
}

impl<'s> RunContext<'s> {
    pub(crate) fn new(
        store: &'s dyn ContentStore,
        registry: Registry,
        cancel: CancellationToken,
    ) -> Self {
        let report = RunReport::start(registry.len());
        Self {
            store,
            registry,
            report,
            cancel,
        }
    }

    pub(crate) fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub(crate) fn report(&self) -> &RunReport {
        &self.report
    }

    pub(crate) fn into_parts(self) -> (Registry, RunReport) {
        (self.registry, self.report)
    }

    async fn hydrate(
        &mut self,
        session: &Session,
        level: Level,
        key: &EntityKey,
        fields: &[&str],
    ) -> StoreResult<Fields> {
        self.report.store_calls += 1;
        self.store.hydrate(session, level, key, fields).await
    }

    async fn children(
        &mut self,
        session: &Session,
        parent: &EntityKey,
        axis: Axis,
    ) -> StoreResult<Vec<EntityRecord>> {
        self.report.store_calls += 1;
        self.store.children(session, parent, axis).await
    }

    /// Hydrates whichever of `fields` the record arrived without.
    async fn complete(
        &mut self,
        session: &Session,
        fields: &[&str],
        record: &mut EntityRecord,
    ) -> StoreResult<()> {
        let missing: Vec<&str> = fields
            .iter()
            .copied()
            .filter(|name| !record.fields.contains(name))
            .collect();
        if missing.is_empty() {
            return Ok(());
        }

        tracing::debug!(key = %record.key, fields = ?missing, "Hydrating record before routing");
        let loaded = self
            .hydrate(session, record.level, &record.key, &missing)
            .await?;
        record.fields.merge(loaded);
        Ok(())
    }

    /// Crawls one axis of `parent` if its gate is open. Returns whether it
    /// was.
    async fn descend<E: Visit>(&mut self, parent: &E, session: &Session, axis: Axis) -> Result<bool> {
        if !self.registry.is_axis_open(axis) {
            tracing::debug!(axis = %axis, parent = %parent.key(), "Axis pruned");
            self.report.pruned_axes += 1;
            return Ok(false);
        }

        let records = self.children(session, parent.key(), axis).await?;
        tracing::debug!(axis = %axis, parent = %parent.key(), children = records.len(), "Descending");

        for mut record in records {
            self.complete(session, E::routing_fields(axis), &mut record)
                .await?;
            if let Some(child) = parent.child(axis, record, session, &self.registry)? {
                process_any(self, child).await?;
            }
        }
        Ok(true)
    }
}

/// Runs the full protocol on one node and everything beneath it.
pub(crate) fn process<'a, 's: 'a, E: Visit>(
    ctx: &'a mut RunContext<'s>,
    node: Node<E>,
) -> BoxFuture<'a, Result<()>> {
    Box::pin(async move {
        if ctx.cancel.is_cancelled() {
            return Err(RunnerError::Cancelled);
        }

        let Node {
            mut element,
            session,
        } = node;

        let fields = ctx
            .hydrate(&session, E::LEVEL, element.key(), E::FIELDS)
            .await?;
        element.fields_mut().merge(fields);
        ctx.report.node(E::LEVEL);

        let active = ctx.registry.active_for(E::LEVEL, |options| element.admits(options));
        tracing::debug!(
            level = %E::LEVEL,
            key = %element.key(),
            active_receivers = active.len(),
            "Processing node"
        );
        element.hydrated(active.len());

        ctx.registry.dispatch(&active, |receiver| element.start(receiver));
        if E::is_leaf() {
            return Ok(());
        }

        for &axis in E::AXES {
            ctx.descend(&element, &session, axis).await?;
        }

        ctx.registry.dispatch(&active, |receiver| element.end(receiver));

        if let Some(axis) = E::NESTED {
            if ctx.descend(&element, &session, axis).await? {
                ctx.registry
                    .dispatch(&active, |receiver| element.end_after_nested(receiver));
            }
        }

        Ok(())
    })
}

/// Rejects a child record whose level does not belong on `axis`.
fn unexpected(axis: Axis, record: EntityRecord, expected: Level) -> StoreError {
    StoreError::UnexpectedLevel {
        axis,
        expected,
        found: record.level,
        key: record.key,
    }
}
