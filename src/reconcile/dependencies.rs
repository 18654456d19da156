use super::substitution::Substitution;
use crate::model::Dependency;
use std::collections::HashMap;

/// Substitute table ids into target dependencies; a dependency with the
/// same endpoints in the source keeps the source's id and timestamp.
pub fn reconcile_dependencies(
    source: &[Dependency],
    target: &[Dependency],
    substitution: &Substitution,
) -> Vec<Dependency> {
    let mut existing: HashMap<(&str, &str), &Dependency> = HashMap::new();
    for dep in source {
        existing
            .entry((dep.table_id.as_str(), dep.dependent_table_id.as_str()))
            .or_insert(dep);
    }

    target
        .iter()
        .map(|dep| {
            let mapped = substitution.dependency(dep);
            match existing.remove(&(
                substitution.table(&dep.table_id),
                substitution.table(&dep.dependent_table_id),
            )) {
                Some(found) => Dependency {
                    id: found.id.clone(),
                    created_at: found.created_at,
                    ..mapped
                },
                None => mapped,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;

    #[test]
    fn test_existing_dependency_keeps_id() {
        let mut source = dependency("D1", "A", "V");
        source.created_at = 9;
        let target = dependency("d1", "t_a", "t_v");

        let mut subst = Substitution::default();
        subst.add_table("t_a", "A");
        subst.add_table("t_v", "V");

        let result = reconcile_dependencies(&[source], &[target], &subst);
        assert_eq!(result[0].id, "D1");
        assert_eq!(result[0].created_at, 9);
        assert_eq!(result[0].table_id, "A");
        assert_eq!(result[0].dependent_table_id, "V");
    }

    #[test]
    fn test_new_dependency_is_mapped() {
        let mut subst = Substitution::default();
        subst.add_table("t_a", "A");

        let result = reconcile_dependencies(&[], &[dependency("d1", "t_a", "t_new")], &subst);
        assert_eq!(result[0].id, "d1");
        assert_eq!(result[0].table_id, "A");
        assert_eq!(result[0].dependent_table_id, "t_new");
    }

    #[test]
    fn test_source_only_dependency_is_dropped() {
        let result = reconcile_dependencies(
            &[dependency("D1", "A", "V")],
            &[],
            &Substitution::default(),
        );
        assert!(result.is_empty());
    }
}
