/// Returns a [`ValidationError`](crate::error::ValidationError) for `$field`
/// from the enclosing function unless `$cond` holds.
#[macro_export]
macro_rules! ensure {
    ($cond: expr, $field: expr, $($reason: tt)+) => {
        if !$cond {
            return Err(::core::convert::From::from(
                $crate::error::ValidationError::new($field, format!($($reason)+)),
            ));
        }
    };
}

#[macro_export]
macro_rules! ensure_eq {
    ($field: expr, $expr1: expr, $expr2: expr) => {
        if $expr1 != $expr2 {
            return Err(::core::convert::From::from(
                $crate::error::ValidationError::new(
                    $field,
                    format!(
                        "{0} != {1} ({0} = {2:?}, {1} = {3:?})",
                        stringify!($expr1),
                        stringify!($expr2),
                        $expr1,
                        $expr2
                    ),
                ),
            ));
        }
    };
}

#[macro_export]
macro_rules! dbg_display {
    ($e: expr) => {{
        let val = $e;
        log::debug!(
            "[{}/{}:{}] {} = {}",
            file!(),
            line!(),
            column!(),
            stringify!($e),
            val
        );
        val
    }};
}
