use integration_tests::test_functions::{
    conversions::IntToStr,
    temperature::{Mean, Split},
    variadic::{ArgVard, Empty, JustVard, arg_vard},
};
use weave_core::Function;

#[test]
fn descriptors_carry_signatures() {
    let cases: [(Function, &str); 6] = [
        (IntToStr.into(), "fn(i32) -> String"),
        (ArgVard.into(), "fn(String, ...i32) -> (String, i32)"),
        (JustVard.into(), "fn(...i32) -> Vec<i32>"),
        (Empty.into(), "fn()"),
        (Split.into(), "fn(f64) -> (f64, f64)"),
        (Mean.into(), "fn(...f64) -> f64"),
    ];

    for (function, expected) in cases {
        assert_eq!(function.signature().to_string(), expected);
    }
}

#[test]
fn descriptors_are_named_after_the_function() {
    assert_eq!(Function::from(ArgVard).name(), "arg_vard");
    assert_eq!(Function::from(Mean).name(), "mean");
}

#[test]
fn annotated_function_is_still_callable() {
    let (s, total) = arg_vard("direct".into(), vec![1, 2]);
    assert_eq!(s, "direct argVard");
    assert_eq!(total, 3);
}

#[test]
fn direct_call_through_the_descriptor() {
    let returned = Function::from(Mean)
        .call(vec![
            weave_core::Value::new(1.0_f64),
            weave_core::Value::new(2.0_f64),
        ])
        .unwrap();

    assert_eq!(returned[0].downcast_ref::<f64>(), Some(&1.5));
}
