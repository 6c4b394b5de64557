use crate::error::dispatch::DispatchError;
use crate::handler::args::{FromArgs, RestArgs};

use serde_json::{Value, json};

/// **VALUE**: Verifies positional decoding into a typed tuple.
///
/// **WHY THIS MATTERS**: Every request method receives its parameters through this path. A
/// swapped index would silently feed the wrong value to the wrong parameter.
#[test]
fn given_matching_args_when_decoded_then_fills_tuple_in_order() {
    // GIVEN: Two numbers and a string on the wire
    let args = vec![json!(4), json!(2.5), json!("label")];

    // WHEN: Decoding into (i64, f64, String)
    let (a, b, label) = <(i64, f64, String)>::from_args(&args).expect("decode");

    // THEN: Each parameter gets its own position
    assert_eq!(a, 4);
    assert_eq!(b, 2.5);
    assert_eq!(label, "label");
}

/// **VALUE**: Verifies that missing trailing arguments decode from `null`.
///
/// **BUG THIS CATCHES**: Would catch an arity check that rejects short argument lists, which
/// would make every `Option<T>` parameter mandatory on the wire.
#[test]
fn given_missing_trailing_arg_when_decoded_as_option_then_none() {
    let args = vec![json!("only")];

    let (first, second) = <(String, Option<u32>)>::from_args(&args).expect("decode");

    assert_eq!(first, "only");
    assert_eq!(second, None);
}

#[test]
fn given_missing_required_arg_when_decoded_then_invalid_arguments() {
    let args = vec![json!(1)];

    let result = <(u32, u32)>::from_args(&args);

    assert!(matches!(result, Err(DispatchError::InvalidArguments { .. })));
}

/// **VALUE**: Verifies surplus arguments are rejected.
///
/// **WHY THIS MATTERS**: A caller passing more values than the method declares almost always
/// targets a different signature. Dropping the extras would hide that mismatch.
#[test]
fn given_surplus_args_when_decoded_then_invalid_arguments() {
    let args = vec![json!(1), json!(2), json!(3)];

    let error = <(u32, u32)>::from_args(&args).expect_err("surplus must fail");

    assert!(matches!(error, DispatchError::InvalidArguments { .. }));
    assert!(error.to_string().contains("expected at most 2 argument(s), got 3"));
}

#[test]
fn given_no_params_when_args_present_then_rejected() {
    assert!(<()>::from_args(&[]).is_ok());
    assert!(<()>::from_args(&[Value::Null]).is_err());
}

#[test]
fn given_wrong_type_when_decoded_then_error_names_argument_index() {
    let args = vec![json!(1), json!("two")];

    let error = <(u32, u32)>::from_args(&args).expect_err("type mismatch");

    assert!(error.to_string().contains("argument 1"));
}

#[test]
fn given_rest_args_when_decoded_then_keeps_everything_verbatim() {
    let args = vec![json!("showMessageBox"), json!({ "message": "hi" }), Value::Null];

    let rest = RestArgs::from_args(&args).expect("decode");

    let (first, tail) = rest.split_first().expect("non-empty");
    assert_eq!(first, &json!("showMessageBox"));
    assert_eq!(tail.len(), 2);
    assert_eq!(rest.into_inner(), args);
}
