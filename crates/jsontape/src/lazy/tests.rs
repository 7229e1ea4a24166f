use alloc::{
    string::{String, ToString},
    vec,
    vec::Vec,
};

use bstr::ByteSlice;

use crate::{Error, Kind, PaddedBytes, Parser};

#[test]
fn nested_object_path() {
    let padded = PaddedBytes::from(r#"{"a":{"b":1}}"#);
    let mut parser = Parser::new();
    let mut doc = parser.parse_lazy(&padded).unwrap();
    let mut outer = doc.value().unwrap().get_object().unwrap();
    let mut inner = outer.find("a").unwrap().get_object().unwrap();
    assert_eq!(inner.find("b").unwrap().get_u64(), Ok(1));
    drop(inner);
    drop(outer);
    assert_eq!(doc.finish(), Ok(()));
}

#[test]
fn array_iteration_of_scalars() {
    let padded = PaddedBytes::from("[1, 2, 3, 4]");
    let mut parser = Parser::new();
    let mut doc = parser.parse_lazy(&padded).unwrap();
    let mut arr = doc.value().unwrap().get_array().unwrap();
    let mut sum = 0;
    while let Some(item) = arr.next() {
        sum += item.unwrap().get_i64().unwrap();
    }
    assert!(arr.is_finished());
    drop(arr);
    assert_eq!(sum, 10);
    assert_eq!(doc.finish(), Ok(()));
}

#[test]
fn abandoning_elements_still_terminates() {
    // Iterate the outer array and discard each object unread.
    let padded = PaddedBytes::from(r#"[{"a":1},{"b":2}]"#);
    let mut parser = Parser::new();
    let mut doc = parser.parse_lazy(&padded).unwrap();
    let mut arr = doc.value().unwrap().get_array().unwrap();
    let mut count = 0;
    while let Some(item) = arr.next() {
        let _ = item.unwrap();
        count += 1;
    }
    drop(arr);
    assert_eq!(count, 2);
    assert_eq!(doc.finish(), Ok(()));
    assert_eq!(doc.error(), None);
}

#[test]
fn half_read_children_are_skipped() {
    let padded = PaddedBytes::from(r#"[{"a":1,"x":[9,9]},{"b":2}]"#);
    let mut parser = Parser::new();
    let mut doc = parser.parse_lazy(&padded).unwrap();
    let mut arr = doc.value().unwrap().get_array().unwrap();

    // Read only "a" of the first object, abandoning the rest of it.
    let first = arr.next().unwrap().unwrap();
    let mut first = first.get_object().unwrap();
    assert_eq!(first.find("a").unwrap().get_i64(), Ok(1));
    drop(first);

    let second = arr.next().unwrap().unwrap();
    let mut second = second.get_object().unwrap();
    assert_eq!(second.find("b").unwrap().get_i64(), Ok(2));
    drop(second);

    assert!(arr.next().is_none());
    drop(arr);
    assert_eq!(doc.finish(), Ok(()));
}

#[test]
fn lookups_are_ordered() {
    let json = r#"{"x":1,"y":2}"#;
    let mut parser = Parser::new();

    let padded = PaddedBytes::from(json);
    let mut doc = parser.parse_lazy(&padded).unwrap();
    let mut obj = doc.value().unwrap().get_object().unwrap();
    assert_eq!(obj.find("x").unwrap().get_i64(), Ok(1));
    assert_eq!(obj.find("y").unwrap().get_i64(), Ok(2));
    drop(obj);

    // Looking backwards fails: "x" is unreachable after "y" matched.
    let mut doc = parser.parse_lazy(&padded).unwrap();
    let mut obj = doc.value().unwrap().get_object().unwrap();
    assert_eq!(obj.find("y").unwrap().get_i64(), Ok(2));
    assert_eq!(obj.find("x").map(|_| ()), Err(Error::NoSuchField));
}

#[test]
fn keys_compare_raw_not_unescaped() {
    let padded = PaddedBytes::from(r#"{"a\nb":1}"#);
    let mut parser = Parser::new();

    let mut doc = parser.parse_lazy(&padded).unwrap();
    let mut obj = doc.value().unwrap().get_object().unwrap();
    // The unescaped spelling does not match the raw bytes.
    assert_eq!(obj.find("a\nb").map(|_| ()), Err(Error::NoSuchField));
    drop(obj);

    let mut doc = parser.parse_lazy(&padded).unwrap();
    let mut obj = doc.value().unwrap().get_object().unwrap();
    // The raw spelling does.
    assert_eq!(obj.find(r"a\nb").unwrap().get_i64(), Ok(1));
}

#[test]
fn field_iteration_yields_raw_and_unescaped_keys() {
    let padded = PaddedBytes::from(r#"{"plain":1,"escAped":2}"#);
    let mut parser = Parser::new();
    let mut doc = parser.parse_lazy(&padded).unwrap();
    let mut obj = doc.value().unwrap().get_object().unwrap();

    let mut raw_keys: Vec<String> = vec![];
    let mut unescaped: Vec<String> = vec![];
    let mut values = vec![];
    while let Some(field) = obj.next_field() {
        let mut field = field.unwrap();
        raw_keys.push(field.raw_key().to_string());
        unescaped.push(String::from(field.unescape_key().unwrap()));
        values.push(field.value.get_i64().unwrap());
    }
    assert_eq!(raw_keys, vec!["plain", r"escAped"]);
    assert_eq!(unescaped, vec!["plain", "escAped"]);
    assert_eq!(values, vec![1, 2]);
}

#[test]
fn strings_decode_into_the_staging_area() {
    let padded = PaddedBytes::from(r#"["plain","with \"escapes\"","😀"]"#);
    let mut parser = Parser::new();
    let mut doc = parser.parse_lazy(&padded).unwrap();
    let mut arr = doc.value().unwrap().get_array().unwrap();
    let mut out: Vec<String> = vec![];
    while let Some(item) = arr.next() {
        out.push(String::from(item.unwrap().get_str().unwrap()));
    }
    assert_eq!(out, vec!["plain", "with \"escapes\"", "\u{1F600}"]);
}

#[test]
fn skipped_regions_are_not_validated() {
    // The first element holds a malformed number, but nobody reads it:
    // skipping balances braces only, by design.
    let padded = PaddedBytes::from("[[01], 2]");
    let mut parser = Parser::new();
    let mut doc = parser.parse_lazy(&padded).unwrap();
    let mut arr = doc.value().unwrap().get_array().unwrap();
    let _ = arr.next().unwrap().unwrap(); // dropped unread
    assert_eq!(arr.next().unwrap().unwrap().get_i64(), Ok(2));
    assert!(arr.next().is_none());
    drop(arr);
    assert_eq!(doc.finish(), Ok(()));
}

#[test]
fn errors_poison_the_cursor() {
    let padded = PaddedBytes::from("[1, 2x, 3]");
    let mut parser = Parser::new();
    let mut doc = parser.parse_lazy(&padded).unwrap();
    let mut arr = doc.value().unwrap().get_array().unwrap();
    assert_eq!(arr.next().unwrap().unwrap().get_i64(), Ok(1));
    assert_eq!(
        arr.next().unwrap().unwrap().get_i64(),
        Err(Error::NumberError)
    );
    // The latched error propagates to every later navigation.
    assert_eq!(arr.next().unwrap().map(|_| ()), Err(Error::NumberError));
    assert!(arr.next().is_none());
    drop(arr);
    assert_eq!(doc.finish(), Err(Error::NumberError));
    assert_eq!(doc.error(), Some(Error::NumberError));
}

#[test]
fn type_mismatches_do_not_poison() {
    let padded = PaddedBytes::from("[-5]");
    let mut parser = Parser::new();
    let mut doc = parser.parse_lazy(&padded).unwrap();
    let mut arr = doc.value().unwrap().get_array().unwrap();
    let mut item = arr.next().unwrap().unwrap();
    assert_eq!(item.kind_hint(), Some(Kind::F64));
    assert_eq!(item.get_u64(), Err(Error::IncorrectType));
    assert_eq!(item.get_bool(), Err(Error::IncorrectType));
    // Still consumable with the right type.
    assert_eq!(item.get_i64(), Ok(-5));
    drop(item);
    assert!(arr.next().is_none());
    drop(arr);
    assert_eq!(doc.finish(), Ok(()));
}

#[test]
fn empty_containers() {
    let mut parser = Parser::new();

    let padded = PaddedBytes::from("[]");
    let mut doc = parser.parse_lazy(&padded).unwrap();
    let mut arr = doc.value().unwrap().get_array().unwrap();
    assert!(arr.next().is_none());
    drop(arr);
    assert_eq!(doc.finish(), Ok(()));

    let padded = PaddedBytes::from("{}");
    let mut doc = parser.parse_lazy(&padded).unwrap();
    let mut obj = doc.value().unwrap().get_object().unwrap();
    assert!(obj.next_field().is_none());
    assert_eq!(obj.find("k").map(|_| ()), Err(Error::NoSuchField));
    drop(obj);
    assert_eq!(doc.finish(), Ok(()));
}

#[test]
fn trailing_content_fails_at_finish() {
    let padded = PaddedBytes::from("1 2");
    let mut parser = Parser::new();
    let mut doc = parser.parse_lazy(&padded).unwrap();
    assert_eq!(doc.value().unwrap().get_i64(), Ok(1));
    assert_eq!(doc.finish(), Err(Error::TapeError));
}

#[test]
fn unconsumed_root_is_skipped_by_finish() {
    let padded = PaddedBytes::from(r#"{"deep":[{"x":[1,2,3]}]}"#);
    let mut parser = Parser::new();
    let mut doc = parser.parse_lazy(&padded).unwrap();
    assert_eq!(doc.finish(), Ok(()));
}

#[test]
fn raw_strings_skip_the_decoder() {
    let padded = PaddedBytes::from(r#"["a\nb"]"#);
    let mut parser = Parser::new();
    let mut doc = parser.parse_lazy(&padded).unwrap();
    let mut arr = doc.value().unwrap().get_array().unwrap();
    let mut v = arr.next().unwrap().unwrap();
    // Escapes stay spelled out.
    assert_eq!(v.get_raw_str().unwrap().as_bytes(), br"a\nb");
    drop(v);
    assert!(arr.next().is_none());
    drop(arr);
    assert_eq!(doc.finish(), Ok(()));
}

#[test]
fn unpadded_lazy_entry_point_copies_in() {
    let mut parser = Parser::new();
    let mut doc = parser.parse_lazy_unpadded(br#"{"n":7}"#).unwrap();
    let mut obj = doc.value().unwrap().get_object().unwrap();
    assert_eq!(obj.find("n").unwrap().get_i64(), Ok(7));
    drop(obj);
    assert_eq!(doc.finish(), Ok(()));
}

#[test]
fn scalar_getters_on_wrong_kinds() {
    let padded = PaddedBytes::from(r#"{"s":"x"}"#);
    let mut parser = Parser::new();
    let mut doc = parser.parse_lazy(&padded).unwrap();
    let mut obj = doc.value().unwrap().get_object().unwrap();
    let mut v = obj.find("s").unwrap();
    assert_eq!(v.get_i64(), Err(Error::IncorrectType));
    assert_eq!(v.get_str(), Ok("x"));
}
