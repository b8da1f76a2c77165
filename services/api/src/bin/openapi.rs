//! services/api/src/bin/openapi.rs
//!
//! Writes the OpenAPI document of the catalog and history endpoints so
//! front-end clients can generate their REST bindings offline.
//!
//! Usage: `openapi [OUTPUT]`, where OUTPUT defaults to `openapi.json`.

use api_lib::web::rest::ApiDoc;
use utoipa::OpenApi;

const DEFAULT_OUTPUT: &str = "openapi.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_OUTPUT.to_string());

    let mut doc = ApiDoc::openapi();
    doc.info.title = "MedConnect API".to_string();
    std::fs::write(&output, doc.to_pretty_json()?)?;

    println!("OpenAPI document written to {}", output);
    Ok(())
}
