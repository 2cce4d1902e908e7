use std::io;

use pretty_assertions::assert_eq;

use super::*;
use crate::Variant;

fn eof() -> Cause {
    Arc::new(io::Error::new(io::ErrorKind::UnexpectedEof, "EOF"))
}

fn as_error(cause: &Cause) -> &Error {
    match cause.downcast_ref::<Error>() {
        Some(err) => err,
        None => panic!("expected an errctx::Error, got {cause:?}"),
    }
}

#[test]
fn test_with_is_pure() {
    let parent = Context::new().with("a", 1);
    let child = parent.with("b", 2);

    assert_eq!(parent.pairs().len(), 1);
    assert_eq!(child.pairs().len(), 2);
    assert_eq!(child.pairs().get("a"), Some(&Value::Int(1)));
}

#[test]
fn test_with_pairs_keeps_order() {
    let ctx = Context::new().with_pairs([("k1", "v1"), ("k2", "v2")]).with("k3", 3);
    let keys: Vec<_> = ctx.keyvals().into_iter().map(|kv| kv.key).collect();
    assert_eq!(keys, ["k1", "k2", "k3"]);
}

#[test]
fn test_empty_context() {
    assert!(Context::new().is_empty());
    assert!(Context::new().keyvals().is_empty());
    assert!(!Context::new().with("k", 1).is_empty());
}

#[test]
fn test_new_error_snapshots_context() {
    let ctx = Context::new().with("k", 1);
    let err = ctx.new_error("boom");
    let _later = ctx.with("other", 2);

    assert_eq!(err.variant(), Variant::Plain);
    assert_eq!(err.to_string(), "boom k=1");
}

#[test]
fn test_wrap_none_is_none() {
    let ctx = Context::new().with("k", 1);
    assert!(ctx.wrap(None, "no error").is_none());
    assert!(ctx.wrap(None, "").is_none());
    assert!(ctx.attach(None).is_none());
}

#[test]
fn test_wrap_with_message_is_caused() {
    let ctx = Context::new().with("k", 1);
    let Some(err) = ctx.wrap(eof(), "read failed") else {
        panic!("wrap of a cause yields an error");
    };
    assert_eq!(as_error(&err).variant(), Variant::Caused);
    assert_eq!(err.to_string(), "read failed k=1: EOF");
}

#[test]
fn test_wrap_without_message_attaches() {
    let ctx = Context::new().with("k", 1);
    let (Some(wrapped), Some(attached)) = (ctx.wrap(eof(), ""), ctx.attach(eof())) else {
        panic!("wrap and attach of a cause yield errors");
    };
    assert_eq!(as_error(&wrapped).variant(), Variant::Attached);
    assert_eq!(wrapped.to_string(), attached.to_string());
    assert_eq!(as_error(&wrapped).keyvals(), as_error(&attached).keyvals());
}

#[test]
fn test_attach_with_empty_context_returns_cause() {
    let cause = eof();
    let Some(attached) = Context::new().attach(Arc::clone(&cause)) else {
        panic!("attach of a cause yields an error");
    };
    assert!(Arc::ptr_eq(&attached, &cause));
}

#[test]
fn test_attach_merges_into_existing_error() {
    let Some(inner) = Context::new().with("k3", "v3").wrap(eof(), "something failed") else {
        panic!("wrap of a cause yields an error");
    };
    let Some(merged) = Context::new().with("k1", "v1").with("k2", "v2").attach(inner) else {
        panic!("attach of a cause yields an error");
    };

    let err = as_error(&merged);
    assert_eq!(err.variant(), Variant::Caused);
    assert_eq!(err.to_string(), "something failed k3=v3 k1=v1 k2=v2: EOF");
}

#[test]
fn test_attach_to_foreign_error() {
    let Some(err) = Context::new().with("k1", "v1").with("k2", "v2").attach(eof()) else {
        panic!("attach of a cause yields an error");
    };
    assert_eq!(as_error(&err).variant(), Variant::Attached);
    assert_eq!(err.to_string(), "EOF k1=v1 k2=v2");
}

#[test]
fn test_caller_records_call_site() {
    let (ctx, line) = (Context::new().caller(0), line!());
    let Some(location) = ctx.caller_location() else {
        panic!("depth zero is always resolvable");
    };
    assert!(
        location.ends_with(&format!("context/tests.rs:{line}")),
        "unexpected call site {location}"
    );
}

#[test]
fn test_caller_keeps_pairs() {
    let ctx = Context::new().with("k", 1).caller(0);
    assert_eq!(ctx.pairs().len(), 1);
    assert!(!ctx.is_empty());
}

#[test]
fn test_caller_beyond_stack_keeps_previous() {
    let ctx = Context::new().caller(0);
    let deeper = ctx.caller(usize::MAX / 2);
    assert_eq!(deeper.caller_location(), ctx.caller_location());
}

#[test]
fn test_caller_at_max_depth_keeps_previous() {
    let ctx = Context::new().caller(0);
    let deeper = ctx.caller(usize::MAX);
    assert_eq!(deeper.caller_location(), ctx.caller_location());
    assert!(Context::new().caller(usize::MAX).caller_location().is_none());
}

#[test]
fn test_caller_only_context_still_wraps() {
    let ctx = Context::new().caller(0);
    let Some(err) = ctx.attach(eof()) else {
        panic!("attach of a cause yields an error");
    };
    assert_eq!(as_error(&err).variant(), Variant::Attached);
}
