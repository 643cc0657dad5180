//! Relationship section reader

use super::nodes::NodeReader;
use crate::error::DecodeError;
use crate::format::relationship;
use crate::registry::{LifecycleMethod, RelationshipSection};
use std::collections::{BTreeMap, BTreeSet};

impl NodeReader<'_> {
    /// Read the relationship section; unassigned flag bits are ignored
    pub(crate) fn read_relationships(&mut self) -> Result<RelationshipSection, DecodeError> {
        let flags = self.u16()?;
        let mut section = RelationshipSection::default();

        if flags & relationship::WIDGET_STATE != 0 {
            section.widget_to_state = self.read_pairs()?;
        }
        if flags & relationship::LIFECYCLE != 0 {
            let count = self.u32()?;
            for _ in 0..count {
                let state = self.str_ref()?;
                let method_count = self.u8()?;
                let mut hooks = BTreeMap::new();
                for _ in 0..method_count {
                    let hook = self.tag("lifecycle method", LifecycleMethod::from_u8)?;
                    hooks.insert(hook, self.str_ref()?);
                }
                section.lifecycle.insert(state, hooks);
            }
            section.build_methods = self.read_pairs()?;
        }
        if flags & relationship::METHOD_CALLS != 0 {
            section.method_calls = self.read_multimap()?;
        }
        if flags & relationship::FIELD_ACCESS != 0 {
            section.field_accesses = self.read_multimap()?;
        }
        if flags & relationship::CLASS_HIERARCHY != 0 {
            section.class_hierarchy = self.read_pairs()?;
        }
        if flags & relationship::INTERFACE_IMPLEMENTERS != 0 {
            section.interface_implementers = self.read_multimap()?;
        }
        if flags & relationship::BUILD_OUTPUTS != 0 {
            section.build_outputs = self.read_pairs()?;
        }
        Ok(section)
    }

    fn read_pairs(&mut self) -> Result<BTreeMap<String, String>, DecodeError> {
        let pairs = self.list(|r| Ok((r.str_ref()?, r.str_ref()?)))?;
        Ok(pairs.into_iter().collect())
    }

    fn read_multimap(&mut self) -> Result<BTreeMap<String, BTreeSet<String>>, DecodeError> {
        let entries = self.list(|r| {
            let key = r.str_ref()?;
            let values = r.list(Self::str_ref)?;
            Ok((key, values.into_iter().collect::<BTreeSet<_>>()))
        })?;
        Ok(entries.into_iter().collect())
    }
}
