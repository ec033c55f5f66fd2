/// Conversions between integers and strings.
///
/// `int_to_str` then `str_to_int` is a value-preserving round trip, which
/// keeps the composed calls from being trivially inlined away.
pub mod conversions {
    use weave_core::reflect;

    #[reflect]
    pub fn int_to_str(x: i32) -> String {
        x.to_string()
    }

    /// Panics if `s` is not an integer.
    #[reflect]
    pub fn str_to_int(s: String) -> i32 {
        s.parse()
            .unwrap_or_else(|err| panic!("`{s}` is not an integer: {err}"))
    }

    #[reflect]
    pub fn shout(s: String) -> String {
        s.to_uppercase()
    }
}

/// Producers and consumers around the variadic `arg_vard`.
pub mod variadic {
    use weave_core::reflect;

    /// Appends a marker to `a` and sums the variadic values.
    #[reflect]
    pub fn arg_vard(a: String, #[variadic] b: Vec<i32>) -> (String, i32) {
        (a + " argVard", b.iter().sum())
    }

    /// Produces no trailing values.
    #[reflect]
    pub fn arg_vard_minus_vard(a: String) -> String {
        a + " minus"
    }

    /// Produces exactly one trailing value.
    #[reflect]
    pub fn arg_vard_lit(a: String, b: i32) -> (String, i32) {
        (a + " lit", b)
    }

    /// Produces two trailing values.
    #[reflect]
    pub fn arg_vard_plus(a: String, b: i32, c: i32) -> (String, i32, i32) {
        (a + " plus", b, c)
    }

    /// Produces a ready-made sequence.
    #[reflect]
    pub fn arg_vard_slice(a: String, b: Vec<i32>) -> (String, Vec<i32>) {
        (a + " slice", b)
    }

    #[reflect]
    pub fn just_vard(#[variadic] a: Vec<i32>) -> Vec<i32> {
        a
    }

    #[reflect]
    pub fn empty() {}
}

/// Unit conversions on `f64`.
pub mod temperature {
    use weave_core::reflect;

    #[reflect]
    pub fn fahrenheit_to_celsius(f: f64) -> f64 {
        (f - 32.0) * 5.0 / 9.0
    }

    #[reflect]
    pub fn celsius_to_kelvin(c: f64) -> f64 {
        c + 273.15
    }

    /// Splits a temperature into its integer and fractional parts.
    #[reflect]
    pub fn split(t: f64) -> (f64, f64) {
        (t.trunc(), t.fract())
    }

    #[reflect]
    pub fn mean(#[variadic] values: Vec<f64>) -> f64 {
        if values.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let count = values.len() as f64;
        values.iter().sum::<f64>() / count
    }
}
