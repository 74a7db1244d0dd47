use crate::support::{load_domain_or_exit, print_domain_result};
use formdomain_kernel::simplify;

pub fn run(domain_path: String, json_output: bool) {
    let domain = load_domain_or_exit(&domain_path);
    print_domain_result("simplify", &simplify(&domain), json_output);
}
