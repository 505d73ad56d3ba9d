//! Print the `OpenAPI` document of the fee analytics API as JSON

use api::ApiDoc;
use utoipa::OpenApi;

fn main() -> eyre::Result<()> {
    let openapi = ApiDoc::openapi();
    let json = serde_json::to_string_pretty(&openapi)?;
    println!("{json}");
    Ok(())
}
