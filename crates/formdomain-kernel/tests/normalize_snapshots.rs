//! Wire-form snapshots of the normalization passes on realistic domains.

use formdomain_kernel::{
    Bias, Context, Domain, concat, concat_with, invert, localize, merge, parse,
    prepare_reference_domain, simplify, unlocalize,
};
use serde_json::json;

#[test]
fn simplify_sale_line_domain() {
    let domain = parse(&json!([
        [["product.salable", "=", true]],
        ["OR", [["unit", "=", null]], [[["unit.category", "=", 3]]]]
    ]))
    .unwrap();
    insta::assert_snapshot!(
        simplify(&domain),
        @r#"[["product.salable","=",true],["OR",["unit","=",null],["unit.category","=",3]]]"#
    );
}

#[test]
fn merge_flattens_record_and_field_filters() {
    let domain = parse(&json!([
        ["company", "=", 1],
        [["active", "=", true], [["type", "in", ["goods", "service"]]]],
        ["OR", ["OR", ["a", "=", 1]], ["b", "=", 2]]
    ]))
    .unwrap();
    insta::assert_snapshot!(
        merge(&domain),
        @r#"[["company","=",1],["active","=",true],["type","in",["goods","service"]],["OR",["a","=",1],["b","=",2]]]"#
    );
}

#[test]
fn concat_record_rule_with_field_domain() {
    let rule = parse(&json!([["company", "=", 1]])).unwrap();
    let field = parse(&json!([["OR", ["party", "=", null], ["party.active", "=", true]]])).unwrap();
    insta::assert_snapshot!(
        concat(&[rule.clone(), field.clone()]),
        @r#"[["company","=",1],["OR",["party","=",null],["party.active","=",true]]]"#
    );
    insta::assert_snapshot!(
        concat_with(&[rule, field], Bias::Or),
        @r#"["OR",["company","=",1],["OR",["party","=",null],["party.active","=",true]]]"#
    );
}

#[test]
fn concat_with_resolved_inversion() {
    let rule = parse(&json!([["company", "=", 1]])).unwrap();
    let field = invert(
        &parse(&json!([["x", "=", 3], ["y", ">", 5]])).unwrap(),
        "x",
        &Context::new().with("y", 4),
    );
    insta::assert_snapshot!(concat(&[rule.clone(), field]), @"false");
    insta::assert_snapshot!(concat_with(&[rule, Domain::Bool(false)], Bias::Or), @r#"[["company","=",1]]"#);
}

#[test]
fn localize_and_back() {
    let domain = parse(&json!([
        ["party", "!=", null],
        ["party.lang.code", "=", "fr"],
        ["party.category", "child_of", [1], "parent"],
        ["party", "child_of", [7], "parent"]
    ]))
    .unwrap();
    let local = localize(&domain, "party");
    insta::assert_snapshot!(
        local,
        @r#"[["id","!=",null],["lang.code","=","fr"],["category","child_of",[1],"parent"],["parent","child_of",[7],"parent"]]"#
    );
    assert_eq!(unlocalize(&local, "party"), domain);
}

#[test]
fn prepare_reference_for_origin_field() {
    let domain = parse(&json!([
        ["origin", "in", ["sale.line,3", "sale.line,5", "stock.move,%"]],
        ["quantity", ">", 0]
    ]))
    .unwrap();
    insta::assert_snapshot!(
        prepare_reference_domain(&domain, "origin"),
        @r#"[["OR",["origin.id","in",[3,5],"sale.line"],["origin.id","!=",null,"stock.move"]],["quantity",">",0]]"#
    );
}
