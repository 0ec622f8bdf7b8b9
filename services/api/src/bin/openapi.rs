//! services/api/src/bin/openapi.rs
//!
//! Writes the storefront's OpenAPI 3.0 specification to
//! `storefront-openapi.json`, for clients that want the schema without a
//! running server.

use api_lib::web::rest::ApiDoc;
use utoipa::OpenApi;

const OUTPUT_PATH: &str = "storefront-openapi.json";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let spec = ApiDoc::openapi().to_pretty_json()?;
    std::fs::write(OUTPUT_PATH, spec)?;
    println!("Wrote the storefront API specification to {OUTPUT_PATH}");
    Ok(())
}
