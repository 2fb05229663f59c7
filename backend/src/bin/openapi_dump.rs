//! Print the OpenAPI document as pretty JSON for client generation.

use color_eyre::eyre::Result;
use inventory::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<()> {
    color_eyre::install()?;
    println!("{}", ApiDoc::openapi().to_pretty_json()?);
    Ok(())
}
