//! Writes the relay's OpenAPI document.
//!
//! Usage: `generate-openapi [OUTPUT]`; defaults to `specs/relay-api.json` at
//! the workspace root.

use std::path::PathBuf;

use utoipa::OpenApi;

fn main() {
    let out = std::env::args_os().nth(1).map(PathBuf::from).unwrap_or_else(|| {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../specs/relay-api.json")
    });

    let doc = relay_api::routes::ApiDoc::openapi()
        .to_pretty_json()
        .expect("serialize OpenAPI document");

    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent).expect("create output directory");
    }
    std::fs::write(&out, doc).expect("write OpenAPI document");
    println!("Wrote {}", out.display());
}
