//! Sink implementations
//!
//! Contains ConsoleSink, FileSink, and EmailSink.

mod console;
mod email;
mod file;
mod smtp;

pub use self::console::ConsoleSink;
pub use self::email::EmailSink;
pub use self::file::FileSink;
pub use self::smtp::{EmailSettings, MailTransport, SmtpMailer};

use contracts::{Attr, Value};

/// Flatten nested groups into dotted keys: `req.id=7`
pub(crate) fn flatten_attrs(attrs: &[Attr]) -> Vec<(String, String)> {
    let mut out = Vec::with_capacity(attrs.len());
    flatten_into(attrs, "", &mut out);
    out
}

fn flatten_into(attrs: &[Attr], prefix: &str, out: &mut Vec<(String, String)>) {
    for attr in attrs {
        let key = if prefix.is_empty() {
            attr.key.clone()
        } else {
            format!("{prefix}.{}", attr.key)
        };
        match &attr.value {
            Value::Group(inner) => flatten_into(inner, &key, out),
            value => out.push((key, value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::attr;

    #[test]
    fn test_flatten_nested_groups() {
        let attrs = vec![
            attr("a", 1),
            Attr::group("g", vec![attr("b", true), Attr::group("h", vec![attr("c", "x")])]),
        ];
        assert_eq!(
            flatten_attrs(&attrs),
            vec![
                ("a".to_string(), "1".to_string()),
                ("g.b".to_string(), "true".to_string()),
                ("g.h.c".to_string(), "x".to_string()),
            ]
        );
    }
}
