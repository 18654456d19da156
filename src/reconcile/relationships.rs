//! Relationship reconciliation.

use super::substitution::Substitution;
use crate::model::Relationship;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Same,
    Swapped,
}

fn direction(source: &Relationship, candidate: &Relationship) -> Option<Direction> {
    let (st, tt, sf, tf) = source.endpoints();
    match candidate.endpoints() {
        e if e == (st, tt, sf, tf) => Some(Direction::Same),
        e if e == (tt, st, tf, sf) => Some(Direction::Swapped),
        _ => None,
    }
}

/// Reconcile relationships after table ids were substituted.
///
/// Each source relationship, in source order, claims the first unclaimed
/// target relationship with the same endpoints in either direction; it keeps
/// its identity and adopts the target's cardinalities. Unclaimed source
/// relationships are deleted, unclaimed target ones are appended.
pub fn reconcile_relationships(
    source: &[Relationship],
    target: &[Relationship],
    substitution: &Substitution,
) -> Vec<Relationship> {
    if target.is_empty() {
        return Vec::new();
    }

    let mapped: Vec<Relationship> = target.iter().map(|r| substitution.relationship(r)).collect();
    if source.is_empty() {
        return mapped;
    }

    let mut claimed = vec![false; mapped.len()];
    // Built in source order, then new ones in target order.
    let mut result = Vec::with_capacity(mapped.len());

    for rel in source {
        let found = mapped
            .iter()
            .enumerate()
            .filter(|(i, _)| !claimed[*i])
            .find_map(|(i, candidate)| direction(rel, candidate).map(|d| (i, d)));

        let Some((i, dir)) = found else {
            log::debug!("relationship {} removed", rel.name);
            continue;
        };
        claimed[i] = true;
        result.push(adopt(rel, &mapped[i], dir));
    }

    result.extend(
        mapped
            .into_iter()
            .zip(claimed)
            .filter(|(_, claimed)| !claimed)
            .map(|(rel, _)| rel),
    );
    result
}

fn adopt(source: &Relationship, target: &Relationship, dir: Direction) -> Relationship {
    let (source_cardinality, target_cardinality, source_schema, target_schema) = match dir {
        Direction::Same => (
            target.source_cardinality,
            target.target_cardinality,
            &target.source_schema,
            &target.target_schema,
        ),
        Direction::Swapped => (
            target.target_cardinality,
            target.source_cardinality,
            &target.target_schema,
            &target.source_schema,
        ),
    };

    // Schemas only appear when the source relationship already had them.
    let keep = |own: &Option<String>, theirs: &Option<String>| {
        own.as_ref().map(|own| theirs.clone().unwrap_or_else(|| own.clone()))
    };

    Relationship {
        source_schema: keep(&source.source_schema, source_schema),
        target_schema: keep(&source.target_schema, target_schema),
        source_cardinality,
        target_cardinality,
        ..source.clone()
    }
}
