//! Custom type reconciliation.
//!
//! Enum types are carried over from the source verbatim. Composite types are
//! regenerated from the target and only borrow the source id on a key match.

use crate::mapping::custom_type_key;
use crate::model::CustomType;
use std::collections::{HashMap, HashSet};

pub fn reconcile_custom_types(source: &[CustomType], target: &[CustomType]) -> Vec<CustomType> {
    let mut source_enums: HashMap<String, &CustomType> = HashMap::new();
    let mut source_composites: HashMap<String, &CustomType> = HashMap::new();
    for custom_type in source {
        let by_kind = if custom_type.is_enum() {
            &mut source_enums
        } else {
            &mut source_composites
        };
        by_kind.entry(custom_type_key(custom_type)).or_insert(custom_type);
    }

    let mut emitted: HashSet<&str> = HashSet::new();
    let mut result = Vec::with_capacity(source.len().max(target.len()));

    for custom_type in target {
        let key = custom_type_key(custom_type);
        if custom_type.is_enum() {
            match source_enums.get(&key).copied() {
                Some(existing) => {
                    if emitted.insert(&existing.id) {
                        result.push(existing.clone());
                    }
                }
                None => result.push(custom_type.clone()),
            }
        } else {
            match source_composites.get(&key).copied() {
                Some(existing) => result.push(CustomType {
                    id: existing.id.clone(),
                    ..custom_type.clone()
                }),
                None => result.push(custom_type.clone()),
            }
        }
    }

    // Enums the target did not mention are kept regardless.
    result.extend(
        source
            .iter()
            .filter(|t| t.is_enum() && !emitted.contains(t.id.as_str()))
            .cloned(),
    );
    result
}
