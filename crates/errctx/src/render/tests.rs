use std::error::Error as StdError;
use std::fmt;
use std::io;

use pretty_assertions::assert_eq;

use super::*;
use crate::{KeyValue, TextMarshal};

struct FailingMarshal;

impl TextMarshal for FailingMarshal {
    fn marshal_text(&self) -> Result<Vec<u8>, Box<dyn StdError + Send + Sync>> {
        Err("cannot marshal text".into())
    }
}

struct Timestamp(&'static str);

impl TextMarshal for Timestamp {
    fn marshal_text(&self) -> Result<Vec<u8>, Box<dyn StdError + Send + Sync>> {
        Ok(self.0.as_bytes().to_vec())
    }
}

struct Greeting(&'static str);

impl fmt::Display for Greeting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stringer: {}", self.0)
    }
}

struct Panicking;

impl fmt::Display for Panicking {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        panic!("I can't do this")
    }
}

#[derive(Debug)]
#[allow(dead_code, reason = "only read through Debug")]
struct Point {
    v: i32,
}

fn render_with(message: &str, pairs: Vec<KeyValue>) -> String {
    crate::new(message).with_pairs(pairs).to_string()
}

fn kv(key: &'static str, value: impl Into<Value>) -> KeyValue {
    KeyValue::new(key, value)
}

#[test]
fn test_message_only() {
    assert_eq!(render_with("", vec![]), "");
    assert_eq!(render_with("xx", vec![]), "xx");
}

#[test]
fn test_plain_pairs() {
    assert_eq!(
        render_with("xx", vec![kv("key1", "val1"), kv("key2", 2)]),
        "xx key1=val1 key2=2"
    );
}

#[test]
fn test_empty_message_has_no_leading_space() {
    assert_eq!(render_with("", vec![kv("a", 1)]), "a=1");
}

#[test]
fn test_nulls() {
    assert_eq!(
        render_with(
            "msg",
            vec![kv("nil1", Value::Null), kv("nil2", None::<Vec<u8>>)]
        ),
        "msg nil1=null nil2=null"
    );
}

#[test]
fn test_bytes_quoting() {
    assert_eq!(
        render_with(
            "msg",
            vec![
                kv("b1", b"noquotes".as_slice()),
                kv("b2", b"needs quotes".as_slice()),
                kv("b3", b"needs \\ \"escaped quotes\"".as_slice()),
            ]
        ),
        r#"msg b1=noquotes b2="needs quotes" b3="needs \\ \"escaped quotes\"""#
    );
}

#[test]
fn test_string_quoting() {
    assert_eq!(
        render_with(
            "msg",
            vec![
                kv("s1", "noquotes"),
                kv("s2", "needs quotes"),
                kv("s3", "needs \\ \"escaped quotes\""),
            ]
        ),
        r#"msg s1=noquotes s2="needs quotes" s3="needs \\ \"escaped quotes\"""#
    );
}

#[test]
fn test_single_quote_and_control_chars_are_quoted() {
    assert_eq!(Value::from("it's").to_string(), r#""it's""#);
    assert_eq!(Value::from("tab\there").to_string(), "\"tab\there\"");
    assert_eq!(Value::from("").to_string(), "");
}

#[test]
fn test_primitives() {
    assert_eq!(
        render_with(
            "msg",
            vec![kv("b", true), kv("i", -4), kv("u", 7u64), kv("f", 1.5)]
        ),
        "msg b=true i=-4 u=7 f=1.5"
    );
}

#[test]
fn test_text_marshal() {
    assert_eq!(
        render_with(
            "msg",
            vec![kv("key", Value::text(Timestamp("0001-01-01T00:00:00Z")))]
        ),
        "msg key=0001-01-01T00:00:00Z"
    );
}

#[test]
fn test_failing_text_marshal() {
    assert_eq!(
        render_with("msg", vec![kv("f1", Value::text(FailingMarshal))]),
        "msg f1=<ERROR>"
    );
}

#[test]
fn test_error_value() {
    assert_eq!(
        render_with("msg", vec![kv("e1", Value::error(io::Error::other("this failed")))]),
        r#"msg e1="this failed""#
    );
}

#[test]
fn test_display_value() {
    assert_eq!(
        render_with("msg", vec![kv("s1", Value::display(Greeting("I'm a Stringer")))]),
        r#"msg s1="Stringer: I'm a Stringer""#
    );
}

#[test]
fn test_optional_values() {
    assert_eq!(
        render_with(
            "msg",
            vec![kv("p1", Some(0)), kv("p2", None::<i32>), kv("p3", Some(3i64))]
        ),
        "msg p1=0 p2=null p3=3"
    );
}

#[test]
fn test_debug_fallback() {
    assert_eq!(
        render_with("msg", vec![kv("x1", Value::debug(Point { v: 0 }))]),
        r#"msg x1="Point { v: 0 }""#
    );
}

#[test]
fn test_panicking_value_renders_panic_token() {
    assert_eq!(
        render_with(
            "msg",
            vec![kv("p1", Value::display(Panicking)), kv("after", "ok")]
        ),
        "msg p1=<PANIC> after=ok"
    );
}

#[test]
fn test_caller_rendered_after_pairs() {
    let err = crate::Context::new().with("k", 1).caller(0).new_error("msg");
    let text = err.to_string();
    assert!(text.starts_with("msg k=1 "), "{text}");
    assert!(text.contains("render/tests.rs:"), "{text}");
}

#[test]
fn test_caused_chain() {
    let inner = crate::new("first error").with("card", "ace").with("suite", "spades");
    assert_eq!(inner.to_string(), "first error card=ace suite=spades");

    let Some(outer) = crate::with("piece", "rook")
        .with("color", "black")
        .wrap(crate::Cause::from(inner), "second error")
    else {
        panic!("wrap of a cause yields an error");
    };
    assert_eq!(
        outer.to_string(),
        "second error piece=rook color=black: first error card=ace suite=spades"
    );
}

#[test]
fn test_write_text_escapes_only_backslash_and_quote() {
    let mut buf = String::new();
    write_text(&mut buf, "a \"b\" \\c 'd'");
    assert_eq!(buf, r#""a \"b\" \\c 'd'""#);
}

#[test]
fn test_invalid_utf8_bytes_are_escaped() {
    let cases: [(&[u8], &str); 4] = [
        (&[b'a', 0xff, b'b'], r#""a\xffb""#),
        (&[b'o', b'k', 0xff], r#""ok\xff""#),
        (&[0xe2, 0x82], r#""\xe2\x82""#),
        (b"q\"\xc0 x", r#""q\"\xc0 x""#),
    ];
    for (bytes, want) in cases {
        let mut buf = String::new();
        write_value(&mut buf, &Value::from(bytes));
        assert_eq!(buf, want, "{bytes:?}");
    }
}

#[test]
fn test_backslash_in_invalid_utf8_stays_unambiguous() {
    let mut buf = String::new();
    write_value(&mut buf, &Value::from(&[b'\\', b'x', 0xff][..]));
    assert_eq!(buf, r#""\\x\xff""#);
}
