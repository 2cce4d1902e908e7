//! Subscriber setup. Runs in its own test binary: it touches the global
//! subscriber and `RUST_LOG`.

use errctx_tracing::init_tracing;

#[test]
fn init_tracing_yields_to_existing_subscriber() {
    std::env::set_var("RUST_LOG", "errctx=debug");
    let existing = tracing_subscriber::registry();
    assert!(tracing::subscriber::set_global_default(existing).is_ok());

    init_tracing();
    init_tracing();
}
