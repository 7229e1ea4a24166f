use alloc::{format, vec, vec::Vec};

use super::scan;
use crate::{Error, PaddedBytes};

/// Runs a scan and returns the offsets without the sentinel, after checking
/// the sentinel and guard invariants.
fn scan_ok(input: &[u8]) -> Vec<u32> {
    let padded = PaddedBytes::new(input);
    let mut out = vec![];
    let n = scan(padded.as_padded(), padded.len(), &mut out).expect("scan should succeed");
    assert_eq!(out.len(), n + 1, "guard slot past the sentinel");
    assert_eq!(out[n - 1] as usize, padded.len(), "sentinel equals len");
    assert_eq!(out[n], 0, "guard is zero");
    assert!(out[..n].windows(2).all(|w| w[0] < w[1]), "strictly increasing");
    out.truncate(n - 1);
    out
}

fn scan_err(input: &[u8]) -> Error {
    let padded = PaddedBytes::new(input);
    let mut out = vec![];
    scan(padded.as_padded(), padded.len(), &mut out).expect_err("scan should fail")
}

#[test]
fn simple_object() {
    // { " a " :  1  }
    // 0 1 2 3 4  5  6   (closing quote at 3 is inside the literal)
    assert_eq!(scan_ok(br#"{"a":1}"#), vec![0, 1, 4, 5, 6]);
}

#[test]
fn operators_inside_strings_are_masked() {
    assert_eq!(scan_ok(br#"["a,b{}"]"#), vec![0, 1, 8]);
    assert_eq!(scan_ok(br#"{"}":"{"}"#), vec![0, 1, 4, 5, 8]);
}

#[test]
fn escaped_quote_does_not_close_the_string() {
    let offsets = scan_ok(br#""a\"b""#);
    assert_eq!(offsets, vec![0]);
}

#[test]
fn even_backslash_run_keeps_the_quote_real() {
    // "a\\" is a complete string; the quote after the run closes it.
    assert_eq!(scan_ok(br#"["a\\",1]"#), vec![0, 1, 6, 7, 8]);
}

#[test]
fn primitive_starts_are_emitted_once() {
    // [ t r u e , n u l l , 1  2  3  ]
    // 0 1       5 6       10 11    14
    assert_eq!(scan_ok(b"[true,null,123]"), vec![0, 1, 5, 6, 10, 11, 14]);
}

#[test]
fn whitespace_separates_primitives() {
    assert_eq!(scan_ok(b" 12 "), vec![1]);
    assert_eq!(scan_ok(b"[1 , 2]"), vec![0, 1, 3, 5, 6]);
}

#[test]
fn more_than_eight_structurals_per_block() {
    let input: Vec<u8> = core::iter::repeat_n(b'[', 20).collect();
    let offsets = scan_ok(&input);
    assert_eq!(offsets, (0..20).collect::<Vec<u32>>());
}

#[test]
fn string_spanning_a_block_boundary() {
    // Opening quote at 0, escape right at the 64-byte boundary.
    let body = "a".repeat(62);
    let json = format!("\"{body}\\\"x\"");
    assert_eq!(json.as_bytes()[63], b'\\');
    assert_eq!(scan_ok(json.as_bytes()), vec![0]);
}

#[test]
fn number_spanning_a_block_boundary_is_one_primitive() {
    let mut input = vec![b' '; 60];
    input.extend_from_slice(b"123456789");
    assert_eq!(scan_ok(&input), vec![60]);
}

#[test]
fn in_string_state_carries_across_blocks() {
    // A string that opens in one block and closes two blocks later.
    let body = "x".repeat(150);
    let json = format!("[\"{body}\"]");
    assert_eq!(scan_ok(json.as_bytes()), vec![0, 1, (body.len() + 3) as u32]);
}

#[test]
fn unclosed_string_is_latched() {
    assert_eq!(scan_err(br#""abc"#), Error::UnclosedString);
    let body = "y".repeat(200);
    let json = format!("[\"{body}");
    assert_eq!(scan_err(json.as_bytes()), Error::UnclosedString);
}

#[test]
fn control_character_inside_string_is_latched() {
    assert_eq!(scan_err(b"\"a\nb\""), Error::UnescapedChars);
    assert_eq!(scan_err(b"\"\t\""), Error::UnescapedChars);
    // Outside strings a newline is ordinary whitespace.
    assert_eq!(scan_ok(b"[1,\n2]"), vec![0, 1, 2, 4, 5]);
}

#[test]
fn invalid_utf8_is_rejected() {
    assert_eq!(scan_err(b"\"\xFF\""), Error::Utf8Error);
    assert_eq!(scan_err(b"[\xC2]"), Error::Utf8Error);
    // Truncated sequence at end of input.
    assert_eq!(scan_err(b"\"ab\xE2\x82\""), Error::Utf8Error);
}

#[test]
fn valid_utf8_strings_pass() {
    let json = "\"héllo 💯\"".as_bytes();
    assert_eq!(scan_ok(json), vec![0]);
}

#[test]
fn empty_inputs_report_empty() {
    assert_eq!(scan_err(b""), Error::Empty);
    assert_eq!(scan_err(b"   \n\t  "), Error::Empty);
}

#[test]
fn scanning_is_shift_invariant_across_block_boundaries() {
    // Leading whitespace only shifts offsets, so sliding a document over
    // every alignment near the 64- and 128-byte boundaries exercises all
    // four carries without changing the expected answer.
    let core = br#"["a\"b{,}", "c\\", -1.25e2, true, null, {"k":[]}]"#;
    let base = scan_ok(core);
    for pad in 1..=130usize {
        let mut input = vec![b' '; pad];
        input.extend_from_slice(core);
        let got = scan_ok(&input);
        let expected: Vec<u32> = base.iter().map(|&x| x + pad as u32).collect();
        assert_eq!(got, expected, "pad {pad}");
    }
}

#[test]
fn backslash_runs_survive_every_alignment() {
    // A string of nothing but escape pairs, slid across the boundary: the
    // closing quote must stay real at every offset.
    for pad in 32..=96usize {
        let mut input = vec![b' '; pad];
        input.push(b'"');
        input.extend_from_slice(&[b'\\'; 16]);
        input.push(b'"');
        let got = scan_ok(&input);
        assert_eq!(got, vec![pad as u32], "pad {pad}");
    }
}

#[test]
fn adjacent_scalars_after_strings_get_their_own_index() {
    // Invalid JSON, but stage 1 must still surface the stray scalar for
    // stage 2 to reject.
    assert_eq!(scan_ok(br#""a"x"#), vec![0, 3]);
}
