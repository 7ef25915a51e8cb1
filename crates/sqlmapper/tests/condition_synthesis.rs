mod common;

use common::Account;
use sqlmapper::prelude::*;

fn where_sql(wrapper: &ConditionWrapper<Account>) -> String {
    build_where_clause(wrapper, Dialect::Named).unwrap().sql
}

#[test]
fn null_equality_is_skipped_by_default() {
    let wrapper = ConditionWrapper::<Account>::new()
        .eq("age", None::<i32>)
        .unwrap();
    assert_eq!(wrapper.len(), 0);
    assert_eq!(where_sql(&wrapper), "1=1");
}

#[test]
fn null_equality_kept_becomes_is_null() {
    let wrapper = ConditionWrapper::<Account>::new()
        .eq_with("age", Value::Null, false)
        .unwrap();
    assert_eq!(where_sql(&wrapper), "age IS NULL");

    let wrapper = ConditionWrapper::<Account>::new()
        .ne_with(Account::AGE, Value::Null, false)
        .unwrap();
    assert_eq!(where_sql(&wrapper), "age IS NOT NULL");
}

#[test]
fn empty_membership_lists() {
    let empty: Vec<i32> = Vec::new();
    let in_nothing = ConditionWrapper::<Account>::new()
        .in_list_with("status", empty.clone(), false)
        .unwrap();
    assert_eq!(where_sql(&in_nothing), "1=0");

    let not_in_nothing = ConditionWrapper::<Account>::new()
        .not_in_with("status", empty, false)
        .unwrap();
    assert_eq!(where_sql(&not_in_nothing), "1=1");

    let standalone = build_condition(&Condition::in_list("status", Vec::<i32>::new()), Dialect::Named);
    assert_eq!(standalone.unwrap().sql, "1=0");
}

#[test]
fn top_level_conditions_join_with_and_in_order() {
    let wrapper = ConditionWrapper::<Account>::new()
        .eq("user_name", "alice")
        .unwrap()
        .gt(Account::AGE, 18)
        .unwrap()
        .in_list("status", [1, 2])
        .unwrap()
        .or([Condition::lt("age", 65), Condition::is_null("status")])
        .unwrap();

    let stmt = build_where_clause(&wrapper, Dialect::Named).unwrap();
    assert_eq!(
        stmt.sql,
        "user_name = #{conditions[0].value} AND age > #{conditions[1].value} \
         AND status IN (#{conditions[2].values[0]}, #{conditions[2].values[1]}) \
         AND (age < #{conditions[3].children[0].value} OR status IS NULL)"
    );
    assert_eq!(stmt.sql.matches(" AND ").count(), 3);
    assert_eq!(
        stmt.bind(&wrapper).unwrap(),
        vec![
            Value::from("alice"),
            Value::Int(18),
            Value::Int(1),
            Value::Int(2),
            Value::Int(65),
        ]
    );
}

#[test]
fn positional_dialect_numbers_placeholders() {
    let wrapper = ConditionWrapper::<Account>::new()
        .eq("user_name", "bob")
        .unwrap()
        .in_list("status", [3, 4])
        .unwrap();
    let stmt = build_where_clause(&wrapper, Dialect::Postgres).unwrap();
    assert_eq!(stmt.sql, "user_name = $1 AND status IN ($2, $3)");
    assert_eq!(stmt.params.len(), 3);
}

#[test]
fn raw_columns_are_validated() {
    let err = ConditionWrapper::<Account>::new()
        .eq("age; DROP TABLE account", 1)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidColumnIdentifier(_)));

    let err = ConditionWrapper::<Account>::new()
        .and([Condition::eq("ok", 1), Condition::eq("1bad", 2)])
        .unwrap_err();
    assert!(matches!(err, Error::InvalidColumnIdentifier(ref c) if c == "1bad"));
}

#[test]
fn ordered_null_comparison_is_rejected() {
    let wrapper = ConditionWrapper::<Account>::new()
        .gt_with("age", Value::Null, false)
        .unwrap();
    let err = build_where_clause(&wrapper, Dialect::Named).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidNullComparison { ref column, operator: ">" } if column == "age"
    ));
}

#[test]
fn update_spec_keeps_first_position() {
    let spec = UpdateSpec::<Account>::new()
        .set("user_name", "Alice")
        .unwrap()
        .set("age", 30)
        .unwrap()
        .set("user_name", "Bob")
        .unwrap()
        .clear("status")
        .unwrap();

    assert_eq!(spec.len(), 3);
    assert_eq!(spec.updates()[0], ("user_name".to_string(), Value::from("Bob")));

    let stmt = build_set_clause(&spec, Dialect::Named).unwrap();
    assert_eq!(
        stmt.sql,
        "user_name = #{updates.user_name}, age = #{updates.age}, status = NULL"
    );
    assert_eq!(stmt.bind(&spec).unwrap(), vec![Value::from("Bob"), Value::Int(30)]);
}

#[test]
fn empty_update_spec_has_nothing_to_set() {
    let spec = UpdateSpec::<Account>::new();
    assert!(matches!(
        build_set_clause(&spec, Dialect::Named),
        Err(Error::NoUpdatableFields(_))
    ));
}

#[test]
fn select_by_condition_is_live_rows_only() {
    let wrapper = ConditionWrapper::<Account>::new()
        .ge(Account::AGE, 21)
        .unwrap()
        .order_by_desc("id")
        .unwrap();
    let (sql, params) = SelectBuilder::by_condition(&wrapper).build().unwrap();
    assert_eq!(
        sql,
        "SELECT id, user_name, age, status, is_deleted FROM account \
         WHERE age >= #{condition.conditions[0].value} AND is_deleted = 0 ORDER BY id DESC"
    );
    assert_eq!(params, vec![Value::Int(21)]);
}

#[test]
fn update_with_spec_binds_both_roots() {
    let spec = UpdateSpec::<Account>::new().set("status", 2).unwrap();
    let wrapper = ConditionWrapper::<Account>::new()
        .lt(Account::AGE, 18)
        .unwrap();
    let (sql, params) = UpdateBuilder::with_spec(&spec, &wrapper)
        .build_with_dialect(Dialect::Postgres)
        .unwrap();
    assert_eq!(
        sql,
        "UPDATE account SET status = $1 WHERE age < $2 AND is_deleted = 0"
    );
    assert_eq!(params, vec![Value::Int(2), Value::Int(18)]);
}

#[test]
fn condition_tree_serializes_for_debugging() {
    let tree = Condition::or([Condition::eq("age", 18), Condition::is_not_null("status")]).unwrap();
    let json = serde_json::to_value(&tree).unwrap();
    assert_eq!(json["kind"], "Group");
    assert_eq!(json["children"][1]["is_null"], false);
}
