use url::Url;

use super::{AnyNode, Node, Visit};
use crate::error::{StoreError, StoreResult};
use crate::registry::Registry;
use crate::session::Session;
use crate::traits::receiver::Receiver;
use crate::traits::store::Axis;
use crate::types::entity::{Element, EntityRecord};
use crate::types::sites::{SiteCollection, Tenant};
use crate::types::taxonomy::TermStore;

impl Visit for Tenant {
    const AXES: &'static [Axis] = &[Axis::TermStores, Axis::SiteCollections];

    fn hydrated(&self, active: usize) {
        tracing::info!(
            root_site_url = self.root_site_url().unwrap_or("<unknown>"),
            active_receivers = active,
            "Tenant loaded"
        );
    }

    fn start(&self, receiver: &mut dyn Receiver) {
        if let Some(r) = receiver.as_tenant() {
            r.on_tenant_start(self);
        }
    }

    fn end(&self, receiver: &mut dyn Receiver) {
        if let Some(r) = receiver.as_tenant() {
            r.on_tenant_end(self);
        }
    }

    fn child(
        &self,
        axis: Axis,
        record: EntityRecord,
        session: &Session,
        _registry: &Registry,
    ) -> StoreResult<Option<AnyNode>> {
        Ok(Some(match axis {
            Axis::TermStores => Node::<TermStore>::child(axis, record, session)?.into(),
            _ => {
                let site_collection = SiteCollection::from_record(axis, record)?;
                let session = session_for(&site_collection, session)?;
                Node::new(site_collection, session).into()
            }
        }))
    }
}

/// Every site collection gets its own session rooted at its URL. The key
/// stands in when the enumeration did not return one.
fn session_for(site_collection: &SiteCollection, tenant: &Session) -> StoreResult<Session> {
    let raw = site_collection
        .url()
        .unwrap_or_else(|| site_collection.key().as_str());
    let url = Url::parse(raw).map_err(|source| StoreError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    Ok(tenant.for_root(url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use crate::session::Credentials;
    use crate::types::entity::Fields;

    fn tenant_session() -> Session {
        Session::new("https://contoso-admin.example.com", Credentials::anonymous()).unwrap()
    }

    #[test]
    fn test_site_collection_session_uses_its_url() {
        let site_collection = SiteCollection::from_parts(
            "sc-1".into(),
            Fields::new().with("Url", "https://contoso.example.com/sites/hr"),
        );
        let session = session_for(&site_collection, &tenant_session()).unwrap();
        assert_eq!(session.root().as_str(), "https://contoso.example.com/sites/hr");
    }

    #[test]
    fn test_site_collection_session_falls_back_to_key() {
        let site_collection = SiteCollection::new("https://contoso.example.com/sites/it");
        let session = session_for(&site_collection, &tenant_session()).unwrap();
        assert_eq!(session.root().host_str(), Some("contoso.example.com"));
    }

    #[test]
    fn test_unparseable_site_collection_url_is_an_error() {
        let tenant = Tenant::new("tenant");
        let record = EntityRecord::new(Level::SiteCollection, "not a url");
        let result = tenant.child(
            Axis::SiteCollections,
            record,
            &tenant_session(),
            &Registry::new(),
        );
        assert!(matches!(result, Err(StoreError::InvalidUrl { .. })));
    }
}
