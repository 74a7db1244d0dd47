use crate::support::{load_domain_or_exit, print_domain_result};
use formdomain_kernel::{Bias, Domain, concat_with};

pub fn run(domain_paths: Vec<String>, or: bool, json_output: bool) {
    let domains: Vec<Domain> = domain_paths
        .iter()
        .map(|path| load_domain_or_exit(path))
        .collect();
    let connective = if or { Bias::Or } else { Bias::And };

    print_domain_result("concat", &concat_with(&domains, connective), json_output);
}
