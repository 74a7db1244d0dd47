use crate::support::{load_domain_or_exit, print_json};
use formdomain_kernel::Domain;
use serde_json::json;

fn kind(domain: &Domain) -> &'static str {
    match domain {
        Domain::Leaf(_) => "leaf",
        Domain::And(_) => "and",
        Domain::Or(_) => "or",
        Domain::Bool(_) => "bool",
    }
}

pub fn run(domain_path: String, json_output: bool) {
    let domain = load_domain_or_exit(&domain_path);
    let variables: Vec<String> = domain.variables().iter().cloned().collect();

    if json_output {
        print_json(&json!({
            "kind": kind(&domain),
            "variables": variables,
            "domain": domain.to_json(),
        }));
    } else {
        println!("formdomain parse");
        println!("  Kind: {}", kind(&domain));
        println!("  Variables: {}", variables.join(", "));
        println!("  Domain: {domain}");
    }
}
