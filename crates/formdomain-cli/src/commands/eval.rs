use crate::support::{load_context_or_exit, load_domain_or_exit, print_json};
use formdomain_kernel::{Bias, evaluate_with_bias};
use serde_json::json;

pub fn run(domain_path: String, context_path: String, bias: Bias, json_output: bool) {
    let domain = load_domain_or_exit(&domain_path);
    let context = load_context_or_exit(Some(&context_path));

    let result = evaluate_with_bias(&domain, &context, bias);

    if json_output {
        print_json(&json!({
            "result": result,
            "bias": bias,
        }));
    } else {
        println!("formdomain eval");
        println!("  Bias: {bias}");
        println!("  Result: {result}");
    }
}
