use super::*;
use crate::error::JoblyError;

fn shown(values: &ParamList) -> Vec<String> {
    values.iter().map(|p| format!("{p:?}")).collect()
}

#[test]
fn mapped_field_uses_column_name() {
    let payload = UpdatePayload::new().set("a", 1_i32);
    let names = FieldNameMap::from([("a", "col_a")]);

    let set = sql_for_partial_update(&payload, &names).unwrap();
    assert_eq!(set.set_cols(), r#""col_a"=$1"#);
    assert_eq!(shown(set.values()), ["1"]);
}

#[test]
fn unmapped_field_falls_back_to_itself() {
    let payload = UpdatePayload::new().set("b", 2_i32);

    let set = sql_for_partial_update(&payload, &FieldNameMap::new()).unwrap();
    assert_eq!(set.set_cols(), r#""b"=$1"#);
    assert_eq!(shown(set.values()), ["2"]);
}

#[test]
fn only_the_listed_key_is_translated() {
    // A translated column name is not translated again.
    let payload = UpdatePayload::new().set("key", "val");
    let names = FieldNameMap::from([("key", "key1"), ("key1", "key2")]);

    let set = sql_for_partial_update(&payload, &names).unwrap();
    assert_eq!(set.set_cols(), r#""key1"=$1"#);
    assert_eq!(shown(set.values()), [r#""val""#]);
}

#[test]
fn empty_payload_is_rejected() {
    let names = FieldNameMap::from([("key", "key1")]);
    let err = sql_for_partial_update(&UpdatePayload::new(), &names).unwrap_err();
    assert!(matches!(err, JoblyError::NoData));

    let err = sql_for_partial_update(&UpdatePayload::new(), &FieldNameMap::new()).unwrap_err();
    assert!(matches!(err, JoblyError::NoData));
}

#[test]
fn placeholders_follow_insertion_order() {
    let payload = UpdatePayload::new()
        .set("firstName", "Aliya")
        .set("age", 32_i32)
        .set("isAdmin", true);
    let names = FieldNameMap::from([("firstName", "first_name"), ("isAdmin", "is_admin")]);

    let set = sql_for_partial_update(&payload, &names).unwrap();
    assert_eq!(
        set.set_cols(),
        r#""first_name"=$1, "age"=$2, "is_admin"=$3"#
    );
    assert_eq!(shown(set.values()), [r#""Aliya""#, "32", "true"]);
    assert_eq!(set.next_placeholder(), 4);
}

#[test]
fn placeholders_are_unique_and_in_range() {
    for n in 1..=12 {
        let mut payload = UpdatePayload::new();
        for i in 0..n {
            payload.insert(format!("f{i}"), i as i64);
        }
        let set = sql_for_partial_update(&payload, &FieldNameMap::new()).unwrap();
        assert_eq!(set.values().len(), n);

        let mut seen: Vec<usize> = set
            .set_cols()
            .split(", ")
            .map(|part| part.rsplit_once("=$").unwrap().1.parse().unwrap())
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (1..=n).collect::<Vec<_>>());
    }
}

#[test]
fn null_values_are_bound_not_skipped() {
    let payload = UpdatePayload::new()
        .set("salary", None::<i32>)
        .set("title", "Engineer");

    let set = sql_for_partial_update(&payload, &FieldNameMap::new()).unwrap();
    assert_eq!(set.set_cols(), r#""salary"=$1, "title"=$2"#);
    assert_eq!(shown(set.values()), ["None", r#""Engineer""#]);
}

#[test]
fn set_opt_skips_absent_fields() {
    let payload = UpdatePayload::new()
        .set_opt("title", None::<String>)
        .set_opt("salary", Some(10_i32));

    assert_eq!(payload.len(), 1);
    let set = sql_for_partial_update(&payload, &FieldNameMap::new()).unwrap();
    assert_eq!(set.set_cols(), r#""salary"=$1"#);
}

#[test]
fn setting_a_field_twice_keeps_its_position() {
    let payload = UpdatePayload::new()
        .set("title", "first")
        .set("salary", 1_i32)
        .set("title", "second");

    assert_eq!(payload.field_names().collect::<Vec<_>>(), ["title", "salary"]);
    let set = sql_for_partial_update(&payload, &FieldNameMap::new()).unwrap();
    assert_eq!(set.set_cols(), r#""title"=$1, "salary"=$2"#);
    assert_eq!(shown(set.values()), [r#""second""#, "1"]);
}

#[test]
fn embedded_quotes_in_column_names_are_doubled() {
    let payload = UpdatePayload::new().set(r#"we"ird"#, 1_i32);
    let set = sql_for_partial_update(&payload, &FieldNameMap::new()).unwrap();
    assert_eq!(set.set_cols(), r#""we""ird"=$1"#);
}

#[test]
fn update_values_never_appear_in_sql() {
    let hostile = "x'; DROP TABLE jobs; --";
    let payload = UpdatePayload::new()
        .set("title", hostile)
        .set("salary", 987_654_i32);

    let set = sql_for_partial_update(&payload, &FieldNameMap::new()).unwrap();
    assert!(!set.set_cols().contains(hostile));
    assert!(!set.set_cols().contains("987654"));
}

#[test]
fn partial_update_is_idempotent() {
    let payload = UpdatePayload::new().set("numEmployees", 5_i32).set("name", "C1");
    let names = FieldNameMap::from([("numEmployees", "num_employees")]);

    let a = sql_for_partial_update(&payload, &names).unwrap();
    let b = sql_for_partial_update(&payload, &names).unwrap();
    assert_eq!(a.set_cols(), b.set_cols());
    assert_eq!(shown(a.values()), shown(b.values()));
}

#[test]
fn into_parts_yields_bindable_refs() {
    let payload = UpdatePayload::new().set("title", "New").set("salary", 10_i32);
    let (cols, values) = sql_for_partial_update(&payload, &FieldNameMap::new())
        .unwrap()
        .into_parts();

    let sql = format!("UPDATE jobs SET {cols} WHERE id = ${}", values.len() + 1);
    assert_eq!(sql, r#"UPDATE jobs SET "title"=$1, "salary"=$2 WHERE id = $3"#);
    assert_eq!(values.as_refs().len(), 2);
}

#[test]
fn empty_where_fragment_renders_nothing() {
    let w = WhereFragment::new();
    assert!(w.is_empty());
    assert_eq!(w.clause(), "");
    assert_eq!(w.to_where_sql(), "");
    assert!(w.values().is_empty());
}

#[test]
fn raw_predicates_do_not_consume_placeholders() {
    let mut w = WhereFragment::new();
    w.and_raw("equity > 0").and_gte("salary", 5_i32);

    assert_eq!(w.clause(), "equity > 0 AND salary >= $1");
    assert_eq!(w.to_where_sql(), " WHERE equity > 0 AND salary >= $1");
    assert_eq!(shown(w.values()), ["5"]);
}

#[test]
fn contains_wraps_needle_in_wildcards() {
    let mut w = WhereFragment::new();
    w.and_lte("num_employees", 10_i32).and_contains("name", "net");

    assert_eq!(w.clause(), "num_employees <= $1 AND name ILIKE $2");
    assert_eq!(shown(w.values()), ["10", r#""%net%""#]);
}
