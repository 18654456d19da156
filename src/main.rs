use erdsync::diff::{Attribute, AttributeFilters, DiffOptions, Matchers, generate_diff};
use erdsync::model::{DatabaseType, Diagram};
use erdsync::reconcile::{ReconcileOptions, apply_changes};
use std::env;
use std::fs;
use std::process;

fn usage(program: &str) -> ! {
    eprintln!("Usage:");
    eprintln!("  {} reconcile <source.json> <target.json> [options]", program);
    eprintln!("  {} diff <old.json> <new.json> [options]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -o, --output <file>        Output file (default: stdout)");
    eprintln!("  --default-schema <name>    reconcile: schema assumed for unqualified tables");
    eprintln!("  --database <type>          reconcile: derive the default schema from a database type");
    eprintln!("  --place-new                reconcile: move new tables clear of existing ones");
    eprintln!("  --by-name                  diff: pair tables, fields and indexes by name");
    eprintln!("  --attributes <kind=a,b>    diff: only compare these attributes of a kind");
    process::exit(1);
}

fn fail(message: String) -> ! {
    eprintln!("{}", message);
    process::exit(1);
}

fn is_command(name: &str) -> bool {
    matches!(name, "reconcile" | "diff")
}

fn load(path: &str) -> Diagram {
    let input = fs::read_to_string(path)
        .unwrap_or_else(|e| fail(format!("Failed to read {}: {}", path, e)));
    let diagram: Diagram = serde_json::from_str(&input)
        .unwrap_or_else(|e| fail(format!("Failed to parse {}: {}", path, e)));
    if let Err(e) = diagram.validate() {
        fail(format!("Invalid diagram {}: {}", path, e));
    }
    diagram
}

/// `tables=name,width` -> (tables, [Name, Width])
fn parse_attribute_filter(arg: &str) -> Option<(String, Vec<Attribute>)> {
    let (kind, list) = arg.split_once('=')?;
    let attributes = list
        .split(',')
        .filter(|a| !a.is_empty())
        .map(|a| serde_json::from_value(serde_json::Value::from(a.trim())).ok())
        .collect::<Option<Vec<Attribute>>>()?;
    Some((kind.to_string(), attributes))
}

fn set_attribute_filter(filters: &mut AttributeFilters, kind: &str, attributes: Vec<Attribute>) {
    let slot = match kind {
        "tables" => &mut filters.tables,
        "fields" => &mut filters.fields,
        "indexes" => &mut filters.indexes,
        "relationships" => &mut filters.relationships,
        "areas" => &mut filters.areas,
        "notes" => &mut filters.notes,
        _ => fail(format!("Unknown object kind: {}", kind)),
    };
    *slot = Some(attributes);
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        usage(&args[0]);
    }

    let command = args[1].as_str();
    if !is_command(command) {
        usage(&args[0]);
    }
    let (left, right) = (load(&args[2]), load(&args[3]));
    let mut output_path: Option<String> = None;
    let mut default_schema: Option<String> = None;
    let mut database: Option<DatabaseType> = None;
    let mut place_new = false;
    let mut by_name = false;
    let mut attributes = AttributeFilters::default();

    let mut i = 4;
    while i < args.len() {
        match args[i].as_str() {
            "-o" | "--output" => {
                i += 1;
                if i < args.len() {
                    output_path = Some(args[i].clone());
                }
            }
            "--default-schema" => {
                i += 1;
                if i < args.len() {
                    default_schema = Some(args[i].clone());
                }
            }
            "--database" => {
                i += 1;
                if i < args.len() {
                    database = Some(DatabaseType::from_str(&args[i]).unwrap_or_else(|| {
                        fail(format!("Invalid database type: {}", args[i]))
                    }));
                }
            }
            "--place-new" => place_new = true,
            "--by-name" => by_name = true,
            "--attributes" => {
                i += 1;
                if i < args.len() {
                    let (kind, list) = parse_attribute_filter(&args[i])
                        .unwrap_or_else(|| fail(format!("Invalid attribute filter: {}", args[i])));
                    set_attribute_filter(&mut attributes, &kind, list);
                }
            }
            _ => fail(format!("Unknown option: {}", args[i])),
        }
        i += 1;
    }

    let json = match command {
        "reconcile" => {
            let mut options =
                ReconcileOptions::for_database(database.unwrap_or(left.database_type));
            if default_schema.is_some() {
                options.default_schema = default_schema;
            }
            options.place_new_tables = place_new;
            let result = apply_changes(&left, &right, &options);
            serde_json::to_string_pretty(&result)
        }
        "diff" => {
            let options = DiffOptions {
                attributes,
                matchers: if by_name {
                    Matchers::by_name()
                } else {
                    Matchers::default()
                },
                ..DiffOptions::default()
            };
            let diff = generate_diff(&left, &right, &options);
            log::info!("{} changes", diff.diff_map.len());
            serde_json::to_string_pretty(&diff)
        }
        _ => usage(&args[0]),
    };
    let json = json.unwrap_or_else(|e| fail(format!("Failed to serialize result: {}", e)));

    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(&path, &json) {
                eprintln!("Failed to write {}: {}", path, e);
                process::exit(1);
            }
        }
        None => println!("{}", json),
    }
}
