//! AttrContext - attributes and groups accumulated by sink derivation

use crate::{Attr, Value};

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Attrs(Vec<Attr>),
    Group(String),
}

/// The `with_attrs` / `with_group` history of a derived sink.
///
/// Each derivation returns a new context; the receiver is never modified, so a
/// sink and every sink derived from it can be used side by side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttrContext {
    segments: Vec<Segment>,
}

impl AttrContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Context with `attrs` added at the current group depth
    pub fn with_attrs(&self, attrs: &[Attr]) -> Self {
        let mut next = self.clone();
        if !attrs.is_empty() {
            next.segments.push(Segment::Attrs(attrs.to_vec()));
        }
        next
    }

    /// Context with a group opened; later attributes nest under it
    pub fn with_group(&self, name: &str) -> Self {
        let mut next = self.clone();
        if !name.is_empty() {
            next.segments.push(Segment::Group(name.to_string()));
        }
        next
    }

    /// Merge the context with a record's own attributes.
    ///
    /// Record attributes land inside every open group. Groups left without
    /// members are dropped.
    pub fn resolve(&self, record_attrs: &[Attr]) -> Vec<Attr> {
        build(&self.segments, record_attrs)
    }
}

fn build(segments: &[Segment], tail: &[Attr]) -> Vec<Attr> {
    match segments.split_first() {
        None => tail
            .iter()
            .filter(|a| !a.value.is_empty_group())
            .cloned()
            .collect(),
        Some((Segment::Attrs(attrs), rest)) => {
            let mut out: Vec<Attr> = attrs
                .iter()
                .filter(|a| !a.value.is_empty_group())
                .cloned()
                .collect();
            out.extend(build(rest, tail));
            out
        }
        Some((Segment::Group(name), rest)) => {
            let inner = build(rest, tail);
            if inner.is_empty() {
                Vec::new()
            } else {
                vec![Attr {
                    key: name.clone(),
                    value: Value::Group(inner),
                }]
            }
        }
    }
}
