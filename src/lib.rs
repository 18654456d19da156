pub mod diff;
pub mod identity;
pub mod ids;
pub mod mapping;
pub mod measure;
pub mod model;
pub mod placement;
pub mod reconcile;

#[cfg(test)]
mod fixtures;

use wasm_bindgen::prelude::*;

pub use diff::{DiagramDiff, DiffOptions, DiffOptionsJson, generate_diff};
pub use model::{Diagram, ValidationError};
pub use reconcile::{ReconcileOptions, apply_changes};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid diagram: {0}")]
    Validation(#[from] ValidationError),
}

fn parse_diagram(json: &str) -> Result<Diagram, Error> {
    let diagram: Diagram = serde_json::from_str(json)?;
    diagram.validate()?;
    Ok(diagram)
}

/// Reconcile two diagrams given as JSON. Without `options` the default
/// schema is derived from the source's database type.
pub fn reconcile_json(
    source: &str,
    target: &str,
    options: Option<&ReconcileOptions>,
) -> Result<String, Error> {
    let source = parse_diagram(source)?;
    let target = parse_diagram(target)?;
    let derived;
    let options = match options {
        Some(options) => options,
        None => {
            derived = ReconcileOptions::for_database(source.database_type);
            &derived
        }
    };
    let result = apply_changes(&source, &target, options);
    Ok(serde_json::to_string(&result)?)
}

/// Diff two diagrams given as JSON. `options` is a `DiffOptionsJson` document.
pub fn diff_json(old: &str, new: &str, options: Option<&str>) -> Result<String, Error> {
    let old = parse_diagram(old)?;
    let new = parse_diagram(new)?;
    let options: DiffOptions = match options {
        Some(json) => serde_json::from_str::<DiffOptionsJson>(json)?.into(),
        None => DiffOptions::default(),
    };
    let diff = generate_diff(&old, &new, &options);
    Ok(serde_json::to_string(&diff)?)
}

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Reconcile JSON diagrams. Without `default_schema` the hint follows the
/// source's database type.
#[wasm_bindgen(js_name = "reconcileDiagrams")]
pub fn reconcile_diagrams(
    source: &str,
    target: &str,
    default_schema: Option<String>,
    place_new_tables: Option<bool>,
) -> Result<String, String> {
    let mut options = match default_schema {
        Some(schema) => ReconcileOptions {
            default_schema: Some(schema),
            ..ReconcileOptions::default()
        },
        None => {
            let diagram: Diagram =
                serde_json::from_str(source).map_err(|e| Error::from(e).to_string())?;
            ReconcileOptions::for_database(diagram.database_type)
        }
    };
    options.place_new_tables = place_new_tables.unwrap_or(false);
    reconcile_json(source, target, Some(&options)).map_err(|e| e.to_string())
}

#[wasm_bindgen(js_name = "diffDiagrams")]
pub fn diff_diagrams(old: &str, new: &str, options: Option<String>) -> Result<String, String> {
    diff_json(old, new, options.as_deref()).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;

    fn sample_json() -> String {
        let d = diagram(
            vec![
                table("T1", "users", vec![pk_field("F1", "id", "int")]),
                table("T2", "orders", vec![field("F2", "user_id", "int")]),
            ],
            vec![relationship("R1", "T2", "F2", "T1", "F1")],
        );
        serde_json::to_string(&d).unwrap()
    }

    #[test]
    fn test_reconcile_json_identity() {
        let json = sample_json();
        let out = reconcile_json(&json, &json, None).unwrap();
        let result: Diagram = serde_json::from_str(&out).unwrap();
        let original: Diagram = serde_json::from_str(&json).unwrap();
        assert_eq!(result.tables, original.tables);
        assert_eq!(result.relationships, original.relationships);
    }

    #[test]
    fn test_diff_json_with_options() {
        let old = sample_json();
        let mut d: Diagram = serde_json::from_str(&old).unwrap();
        d.tables[0].name = "customers".to_string();
        d.tables[0].x = 50.0;
        let new = serde_json::to_string(&d).unwrap();

        let out = diff_json(&old, &new, Some(r#"{"attributes":{"tables":["x"]}}"#)).unwrap();
        let diff: serde_json::Value = serde_json::from_str(&out).unwrap();
        let map = diff["diffMap"].as_object().unwrap();
        assert_eq!(map.len(), 1);
        assert!(map.contains_key("table-x-T1"));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let err = reconcile_json("{", &sample_json(), None).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        assert!(err.to_string().starts_with("invalid JSON"));
    }

    #[test]
    fn test_invalid_diagram_is_an_error() {
        let mut d: Diagram = serde_json::from_str(&sample_json()).unwrap();
        d.tables[1].id = "T1".to_string();
        let bad = serde_json::to_string(&d).unwrap();
        let err = diff_json(&bad, &sample_json(), None).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_wasm_entry_points_map_errors_to_strings() {
        let err = diff_diagrams("not json", "{}", None).unwrap_err();
        assert!(err.starts_with("invalid JSON"));
        assert!(reconcile_diagrams(&sample_json(), &sample_json(), None, None).is_ok());
    }
}
