use std::fs;

/// Writes the OpenAPI document to the path given as the first argument
/// (default `openapi.json`).
fn main() -> anyhow::Result<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "openapi.json".to_string());

    let doc = achievement_tracker::docs::build_openapi(achievement_tracker::app::app_port());
    fs::write(&path, serde_json::to_string_pretty(&doc)?)?;

    println!("wrote {}", path);
    Ok(())
}
