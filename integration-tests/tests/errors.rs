use integration_tests::test_functions::{
    conversions::{IntToStr, StrToInt},
    variadic::{ArgVard, ArgVardMinusVard},
};
use weave_core::{ComposeError, Function, Type, Value, compose, compose_values, must_compose};

fn int_pair() -> Function {
    Function::tuple(|x: i32| (x, x))
}

#[test]
fn fewer_than_two_functions() {
    assert_eq!(
        compose([IntToStr.into()]).unwrap_err(),
        ComposeError::TooFewFunctions { count: 1 }
    );
    assert_eq!(
        compose_values(vec![]).unwrap_err(),
        ComposeError::TooFewFunctions { count: 0 }
    );
}

#[test]
fn value_that_is_not_a_function() {
    let error = compose_values(vec![
        Value::new(Function::from(IntToStr)),
        Value::new(Function::from(StrToInt)),
        Value::new("str_to_int".to_string()),
    ])
    .unwrap_err();

    assert_eq!(
        error,
        ComposeError::NotAFunction {
            index: 2,
            found: Type::of::<String>(),
        }
    );
    assert_eq!(
        error.to_string(),
        "argument 2 is not a function: found `String`"
    );
}

#[test]
fn return_count_differs_from_parameter_count() {
    let error = compose([int_pair(), StrToInt.into()]).unwrap_err();

    assert_eq!(
        error,
        ComposeError::ArityMismatch {
            index: 1,
            returns: 2,
            params: 1,
        }
    );
}

#[test]
fn return_type_differs_from_parameter_type() {
    let error = compose([IntToStr.into(), IntToStr.into()]).unwrap_err();

    assert_eq!(
        error,
        ComposeError::TypeMismatch {
            index: 1,
            position: 0,
            returned: Type::of::<String>(),
            expected: Type::of::<i32>(),
        }
    );
}

#[test]
fn too_few_returns_for_the_fixed_parameters() {
    let error = compose([Function::tuple(|| ()), ArgVard.into()]).unwrap_err();

    assert_eq!(
        error,
        ComposeError::VariadicArityTooShort {
            index: 1,
            returns: 0,
            fixed: 1,
        }
    );
}

#[test]
fn trailing_return_of_the_wrong_type() {
    let producer = Function::tuple(|s: String| (s, 1_i32, true));
    let error = compose([producer, ArgVard.into()]).unwrap_err();

    assert_eq!(
        error,
        ComposeError::VariadicTypeMismatch {
            index: 1,
            position: 2,
            returned: Type::of::<bool>(),
            expected: Type::of::<i32>(),
        }
    );
}

#[test]
fn fixed_parameter_before_the_slot_is_checked() {
    let error = compose([int_pair(), ArgVard.into()]).unwrap_err();

    assert_eq!(
        error,
        ComposeError::TypeMismatch {
            index: 1,
            position: 0,
            returned: Type::of::<i32>(),
            expected: Type::of::<String>(),
        }
    );
}

#[test]
fn first_failing_link_is_reported() {
    let error = compose([
        IntToStr.into(),
        StrToInt.into(),
        IntToStr.into(),
        IntToStr.into(),
        ArgVard.into(),
    ])
    .unwrap_err();

    assert!(matches!(error, ComposeError::TypeMismatch { index: 3, .. }));
}

#[test]
#[should_panic(expected = "incorrect argument length at function 1")]
fn must_compose_panics_with_the_error() {
    let _ = must_compose([int_pair(), StrToInt.into()]);
}

#[test]
fn must_compose_agrees_with_compose() {
    let checked = compose([ArgVardMinusVard.into(), ArgVard.into()]).unwrap();
    let unchecked = must_compose([ArgVardMinusVard.into(), ArgVard.into()]);

    assert_eq!(checked.signature(), unchecked.signature());
    assert_eq!(checked.name(), unchecked.name());

    let args = || vec![Value::new("x".to_string())];
    let a = checked.call(args()).unwrap();
    let b = unchecked.call(args()).unwrap();
    assert_eq!(a[0].downcast_ref::<String>(), b[0].downcast_ref::<String>());
    assert_eq!(a[1].downcast_ref::<i32>(), b[1].downcast_ref::<i32>());
}
