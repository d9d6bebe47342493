#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn nineteen_fixtures_in_order() {
    let all = fixtures().unwrap();
    let names: Vec<&str> = all.iter().map(|f| f.name).collect();
    let expected: Vec<String> = (1..=19).map(|i| format!("test{i}")).collect();
    assert_eq!(names, expected);
}

#[test]
fn nested_fixtures_share_definitions() {
    let all = fixtures().unwrap();
    let test10 = &all[9].ty;
    assert!(test10.embeds("_test1"));
    assert!(!all[18].ty.embeds("_test19"));
}

#[test]
fn declarations_render_as_c() {
    let all = fixtures().unwrap();
    assert_eq!(
        all[10].ty.to_string(),
        "struct _test11 { size_t a; unsigned short b; unsigned short c; struct _test11** d; }"
    );
    assert_eq!(all[13].ty.to_string(), "struct _test14 { char a; char b[2]; short c; char d; }");
}
