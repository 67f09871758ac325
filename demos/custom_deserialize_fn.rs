//! Example demonstrating custom deserializer functions

use envbind::Bind;

// Custom deserializer for comma-separated strings, trimming each item
fn comma_separated(s: &str) -> Result<Vec<String>, String> {
    Ok(s.split(',').map(|s| s.trim().to_string()).collect())
}

#[derive(Debug, Bind)]
struct Config {
    // Default: built-in conversion
    pub app_name: String,
    pub port: u16,

    // Uses serde_json::from_str (JSON format)
    #[envbind(deserializer = "serde_json::from_str")]
    pub json_tags: Vec<String>,

    // Uses custom function (comma-separated)
    #[envbind(deserializer = "comma_separated")]
    pub comma_tags: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    std::env::set_var("APP_NAME", "my-app");
    std::env::set_var("PORT", "8080");

    // JSON format (serde_json)
    std::env::set_var("JSON_TAGS", r#"["prod","api","v2"]"#);

    // Comma-separated (custom function)
    std::env::set_var("COMMA_TAGS", "tag1, tag2, tag3");

    let config = Config::from_env()?;

    println!("Configuration loaded:");
    println!("  App Name: {}", config.app_name);
    println!("  Port: {}", config.port);
    println!("  JSON Tags: {:?}", config.json_tags);
    println!("  Comma Tags: {:?}", config.comma_tags);

    Ok(())
}
