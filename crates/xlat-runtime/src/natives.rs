//! Hashing, equality and string conversion of primitive representations.

/// `Object.is`: NaN equals NaN, `+0` differs from `-0`.
pub fn same_value(a: f64, b: f64) -> bool {
    if a.is_nan() && b.is_nan() {
        return true;
    }
    a.to_bits() == b.to_bits()
}

/// `Double.hashCode`: the IEEE bits folded onto 32 bits, NaN canonicalized.
pub fn number_hash(value: f64) -> i32 {
    let bits = if value.is_nan() {
        0x7ff8_0000_0000_0000_u64
    } else {
        value.to_bits()
    };
    (bits ^ (bits >> 32)) as i32
}

pub fn boolean_hash(value: bool) -> i32 {
    if value { 1231 } else { 1237 }
}

/// `String.hashCode`: `s[0]*31^(n-1) + ... + s[n-1]` over UTF-16 code units.
pub fn string_hash(value: &str) -> i32 {
    value
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Number to string the way the target environment prints it.
pub fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{value}");
    }
    let formatted = format!("{value:e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => formatted,
    }
}

#[cfg(test)]
#[path = "tests/natives_tests.rs"]
mod tests;
