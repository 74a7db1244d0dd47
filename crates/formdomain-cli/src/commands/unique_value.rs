use crate::support::{load_domain_or_exit, print_json};
use formdomain_kernel::unique_value;
use serde_json::json;

pub fn run(domain_path: String, json_output: bool) {
    let domain = load_domain_or_exit(&domain_path);
    let value = unique_value(&domain);

    if json_output {
        print_json(&json!({
            "found": value.is_some(),
            "value": value.map(|v| v.to_json()),
        }));
    } else {
        println!("formdomain unique-value");
        match value {
            Some(value) => println!("  Value: {value}"),
            None => println!("  Value: (none)"),
        }
    }
}
