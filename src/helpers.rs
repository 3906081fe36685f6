/// Decimal places shown in text output.
pub const PRECISION: usize = 4;

/// Formats `val` with at most `precision` decimals, trailing zeros trimmed.
pub fn f64_rounded_string(val: &f64, precision: usize) -> String {
    let rounded = format!("{val:.precision$}");
    let trimmed = if rounded.contains('.') {
        rounded.trim_end_matches('0').trim_end_matches('.')
    } else {
        &rounded
    };
    match trimmed {
        "-0" => "0".to_owned(),
        other => other.to_owned(),
    }
}

pub fn rounded(val: f64) -> String {
    f64_rounded_string(&val, PRECISION)
}
