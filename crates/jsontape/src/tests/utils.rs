//! Oracle helpers: serde_json builds the expected tree, we assert both
//! surfaces agree with it, structurally and numerically.

use alloc::string::String;

use quickcheck::{Arbitrary, Gen};
use serde_json::Value as Oracle;

use crate::{dom::Element, lazy::LazyValue};

/// Walks the eager surface against the oracle tree.
#[expect(clippy::float_cmp)]
pub(crate) fn assert_eager_matches(element: Element<'_>, oracle: &Oracle) {
    match oracle {
        Oracle::Null => assert!(element.is_null()),
        Oracle::Bool(b) => assert_eq!(element.get_bool().unwrap(), *b),
        Oracle::Number(n) => {
            if let Some(i) = n.as_i64() {
                assert_eq!(element.get_i64().unwrap(), i);
            } else if let Some(u) = n.as_u64() {
                assert_eq!(element.get_u64().unwrap(), u);
            } else {
                assert_eq!(element.get_f64().unwrap(), n.as_f64().unwrap());
            }
        }
        Oracle::String(s) => assert_eq!(element.get_str().unwrap(), s.as_str()),
        Oracle::Array(items) => {
            let array = element.get_array().unwrap();
            let mut it = array.iter();
            for expected in items {
                assert_eager_matches(it.next().expect("missing element"), expected);
            }
            assert!(it.next().is_none(), "extra elements");
        }
        Oracle::Object(fields) => {
            let object = element.get_object().unwrap();
            let mut it = object.iter();
            for (key, expected) in fields {
                let (k, v) = it.next().expect("missing field");
                assert_eq!(k, key.as_str());
                assert_eager_matches(v, expected);
            }
            assert!(it.next().is_none(), "extra fields");
        }
    }
}

/// Walks the lazy surface against the oracle tree, consuming the value.
#[expect(clippy::float_cmp)]
pub(crate) fn assert_lazy_matches(value: LazyValue<'_, '_, '_>, oracle: &Oracle) {
    let mut value = value;
    match oracle {
        Oracle::Null => assert_eq!(value.is_null(), Ok(true)),
        Oracle::Bool(b) => assert_eq!(value.get_bool().unwrap(), *b),
        Oracle::Number(n) => {
            if let Some(i) = n.as_i64() {
                assert_eq!(value.get_i64().unwrap(), i);
            } else if let Some(u) = n.as_u64() {
                assert_eq!(value.get_u64().unwrap(), u);
            } else {
                assert_eq!(value.get_f64().unwrap(), n.as_f64().unwrap());
            }
        }
        Oracle::String(s) => assert_eq!(value.get_str().unwrap(), s.as_str()),
        Oracle::Array(items) => {
            let mut array = value.get_array().unwrap();
            for expected in items {
                let item = array.next().expect("missing element").unwrap();
                assert_lazy_matches(item, expected);
            }
            assert!(array.next().is_none(), "extra elements");
        }
        Oracle::Object(fields) => {
            let mut object = value.get_object().unwrap();
            for (key, expected) in fields {
                let field = object.next_field().expect("missing field").unwrap();
                let mut field = field;
                assert_eq!(field.unescape_key().unwrap(), key.as_str());
                assert_lazy_matches(field.value, expected);
            }
            assert!(object.next_field().is_none(), "extra fields");
        }
    }
}

/// A bounded-depth generated document.
#[derive(Clone, Debug)]
pub(crate) struct ArbJson(pub Oracle);

impl Arbitrary for ArbJson {
    fn arbitrary(g: &mut Gen) -> Self {
        ArbJson(arbitrary_value(g, 3))
    }
}

fn arbitrary_value(g: &mut Gen, depth: usize) -> Oracle {
    let scalar_only = depth == 0;
    let pick = u8::arbitrary(g) % if scalar_only { 5 } else { 7 };
    match pick {
        0 => Oracle::Null,
        1 => Oracle::Bool(bool::arbitrary(g)),
        2 => Oracle::from(i64::arbitrary(g)),
        3 => Oracle::from(u64::arbitrary(g)),
        4 => {
            let f = f64::arbitrary(g);
            if f.is_finite() {
                Oracle::from(f)
            } else {
                Oracle::from(0.5)
            }
        }
        5 => {
            let n = usize::arbitrary(g) % 4;
            Oracle::Array(
                (0..n)
                    .map(|_| arbitrary_value(g, depth - 1))
                    .collect(),
            )
        }
        _ => {
            let n = usize::arbitrary(g) % 4;
            let mut map = serde_json::Map::new();
            for _ in 0..n {
                map.insert(String::arbitrary(g), arbitrary_value(g, depth - 1));
            }
            Oracle::Object(map)
        }
    }
}
