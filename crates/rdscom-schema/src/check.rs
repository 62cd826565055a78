/// Evaluate a batch of fallible results and report every failure at once.
///
/// Takes an error callback and a list of `Result` expressions. The error
/// strings of all failed results are concatenated with newlines and handed to
/// the callback in a single invocation; the macro evaluates to `true` when
/// any result failed. Useful for batching many field writes into one report:
///
/// ```
/// use rdscom_schema::{check, Buffer, FieldKind, Prototype};
///
/// let proto = Prototype::new(1)
///     .with_field("make", FieldKind::Byte)
///     .with_field("year", FieldKind::U16);
/// let mut buf = Buffer::new(proto);
///
/// let failed = check!(
///     |report| eprintln!("field writes failed:\n{report}"),
///     buf.set::<u8>("make", 1),
///     buf.set::<u16>("year", 2020),
/// );
/// assert!(!failed);
/// ```
#[macro_export]
macro_rules! check {
    ($on_error:expr, $($result:expr),+ $(,)?) => {{
        let mut report = ::std::string::String::new();
        $(
            if let Err(err) = &$result {
                report.push_str(&::std::string::ToString::to_string(err));
                report.push('\n');
            }
        )+
        let failed = !report.is_empty();
        if failed {
            ($on_error)(report.trim_end());
        }
        failed
    }};
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use crate::error::SchemaError;
    use crate::field::FieldKind;
    use crate::{Buffer, Prototype};

    #[test]
    fn all_ok_reports_nothing() {
        let mut buf = Buffer::new(
            Prototype::new(1)
                .with_field("a", FieldKind::U8)
                .with_field("b", FieldKind::U16),
        );

        let calls = RefCell::new(0);
        let failed = check!(
            |_report: &str| *calls.borrow_mut() += 1,
            buf.set::<u8>("a", 1),
            buf.set::<u16>("b", 2),
        );

        assert!(!failed);
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn failures_are_aggregated_into_one_callback() {
        let mut buf = Buffer::new(Prototype::new(1).with_field("a", FieldKind::U8));

        let report = RefCell::new(String::new());
        let calls = RefCell::new(0);
        let failed = check!(
            |r: &str| {
                *calls.borrow_mut() += 1;
                *report.borrow_mut() = r.to_string();
            },
            buf.set::<u8>("a", 1),
            buf.set::<u8>("missing", 2),
            buf.set::<u32>("a", 3),
        );

        assert!(failed);
        assert_eq!(*calls.borrow(), 1);
        let report = report.borrow();
        assert_eq!(report.lines().count(), 2);
        assert!(report.contains("unknown field"));
        assert!(report.contains("width mismatch"));
    }

    #[test]
    fn works_with_plain_results_too() {
        let ok: Result<u8, SchemaError> = Ok(1);
        let err: Result<u8, SchemaError> = Err(SchemaError::InvalidFieldName);

        assert!(!check!(|_r: &str| {}, ok));
        assert!(check!(|_r: &str| {}, err));
    }
}
