//! Managed metadata entities: term stores down to terms.

use crate::level::Level;
use crate::types::entity::{element, Element};

element!(
    /// A term store of the tenant taxonomy.
    TermStore,
    Level::TermStore,
    ["Id", "Name"]
);

element!(
    /// A group of term sets.
    TermGroup,
    Level::TermGroup,
    ["Id", "Name"]
);

element!(
    /// A set of terms.
    TermSet,
    Level::TermSet,
    ["Id", "Name"]
);

element!(
    /// A term. Terms may nest.
    Term,
    Level::Term,
    ["Id", "Name", "TermsCount"]
);

impl TermStore {
    pub fn name(&self) -> Option<&str> {
        self.fields().str("Name")
    }
}

impl TermGroup {
    pub fn name(&self) -> Option<&str> {
        self.fields().str("Name")
    }
}

impl TermSet {
    pub fn name(&self) -> Option<&str> {
        self.fields().str("Name")
    }
}

impl Term {
    pub fn name(&self) -> Option<&str> {
        self.fields().str("Name")
    }

    /// Number of child terms, when the store reports it.
    pub fn terms_count(&self) -> Option<u64> {
        self.fields().u64("TermsCount")
    }
}
