use crate::support::{load_context_or_exit, load_domain_or_exit, print_json};
use formdomain_kernel::{Domain, invert, unique_value};
use serde_json::json;

pub fn run(domain_path: String, symbol: String, context_path: Option<String>, json_output: bool) {
    let domain = load_domain_or_exit(&domain_path);
    let context = load_context_or_exit(context_path.as_deref());

    let residual = invert(&domain, &symbol, &context);
    let default = unique_value(&residual).map(|v| v.to_json());

    if json_output {
        print_json(&json!({
            "symbol": symbol,
            "result": residual.to_json(),
            "defaultValue": default,
        }));
    } else {
        println!("formdomain invert");
        println!("  Symbol: {symbol}");
        match &residual {
            Domain::Bool(true) => println!("  Result: unconstrained"),
            Domain::Bool(false) => println!("  Result: unsatisfiable"),
            _ => println!("  Result: {residual}"),
        }
        if let Some(value) = default {
            println!("  Default: {value}");
        }
    }
}
