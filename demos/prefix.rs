//! Example demonstrating prefix attribute

use envbind::Bind;

#[derive(Debug, Bind)]
#[envbind(prefix = "MYAPP")]
struct Config {
    // Environment variables will be prefixed: MYAPP_DATABASE_URL, MYAPP_API_KEY, etc.
    #[envbind(required)]
    pub database_url: String,

    #[envbind(name = "SECRET")]
    pub api_key: String,

    #[envbind(default = "8080")]
    pub port: u16,

    pub debug: bool,
}

fn main() -> anyhow::Result<()> {
    // Set environment variables with prefix
    std::env::set_var("MYAPP_DATABASE_URL", "postgres://localhost/db");
    std::env::set_var("MYAPP_SECRET", "secret-key-123");
    std::env::set_var("MYAPP_PORT", "3000");

    let config = Config::from_env()?;

    println!("Configuration with prefix 'MYAPP':");
    println!("  Database URL: {}", config.database_url);
    println!("  API Key: {}", config.api_key);
    println!("  Port: {}", config.port);
    println!("  Debug: {}", config.debug);

    // The same struct under another prefix
    std::env::set_var("STAGING_DATABASE_URL", "postgres://staging/db");
    let staging: Config = envbind::process("STAGING")?;
    println!("Configuration with prefix 'STAGING':");
    println!("  Database URL: {}", staging.database_url);
    println!("  Port: {}", staging.port);

    Ok(())
}
