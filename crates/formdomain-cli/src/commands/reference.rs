use crate::support::{load_domain_or_exit, print_domain_result, print_json};
use formdomain_kernel::{extract_reference_models, prepare_reference_domain, restrict_reference_domain};
use serde_json::json;

pub fn run_models(domain_path: String, field: String, json_output: bool) {
    let domain = load_domain_or_exit(&domain_path);
    let models = extract_reference_models(&domain, &field);

    if json_output {
        print_json(&json!({
            "field": field,
            "models": models,
        }));
    } else {
        println!("formdomain reference-models");
        println!("  Field: {field}");
        if models.is_empty() {
            println!("  Models: (none)");
        }
        for model in &models {
            println!("  - {model}");
        }
    }
}

pub fn run_prepare(domain_path: String, field: String, model: Option<String>, json_output: bool) {
    let domain = load_domain_or_exit(&domain_path);
    let mut prepared = prepare_reference_domain(&domain, &field);
    if let Some(model) = &model {
        prepared = restrict_reference_domain(&prepared, &field, model);
    }
    print_domain_result("prepare-reference", &prepared, json_output);
}
