use crate::support::{load_domain_or_exit, print_domain_result};
use formdomain_kernel::{localize, unlocalize};

/// `reverse` selects `unlocalize`.
pub fn run(domain_path: String, field: String, reverse: bool, json_output: bool) {
    let domain = load_domain_or_exit(&domain_path);
    if reverse {
        print_domain_result("unlocalize", &unlocalize(&domain, &field), json_output);
    } else {
        print_domain_result("localize", &localize(&domain, &field), json_output);
    }
}
