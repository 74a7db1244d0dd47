use formdomain_kernel::{Context, Domain};
use serde_json::Value;
use std::fs;

pub fn read_json_file_or_exit<T>(path: &str, label: &str) -> T
where
    T: serde::de::DeserializeOwned,
{
    let bytes = fs::read(path).unwrap_or_else(|e| {
        eprintln!("error: failed to read {label} at {path}: {e}");
        std::process::exit(1);
    });
    serde_json::from_slice::<T>(&bytes).unwrap_or_else(|e| {
        eprintln!("error: failed to parse {label} JSON at {path}: {e}");
        std::process::exit(1);
    })
}

/// Domains decode through the kernel parser, so malformed shapes are
/// reported with their JSON path.
pub fn load_domain_or_exit(path: &str) -> Domain {
    read_json_file_or_exit(path, "domain")
}

pub fn load_context_or_exit(path: Option<&str>) -> Context {
    match path {
        Some(path) => read_json_file_or_exit(path, "context"),
        None => Context::new(),
    }
}

pub fn print_json(payload: &Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(payload).expect("json serialization")
    );
}

/// Shared output for commands whose result is a single domain.
pub fn print_domain_result(command: &str, result: &Domain, json_output: bool) {
    if json_output {
        print_json(&serde_json::json!({ "result": result.to_json() }));
    } else {
        println!("formdomain {command}");
        println!("  Result: {result}");
    }
}
