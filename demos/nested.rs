//! Example demonstrating nested structs and fallback keys
//!
//! Run with `RUST_LOG=envbind=debug` to see which keys were used.

use envbind::Bind;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Bind)]
struct Replica {
    host: String,
    #[envbind(default = "5432")]
    port: u16,
}

#[derive(Debug, Bind)]
struct Database {
    #[envbind(required)]
    host: String,
    #[envbind(default = "5432")]
    port: u16,

    // Keys: SHOP_DB__REPLICA__HOST, SHOP_DB__REPLICA__PORT
    #[envbind(nested)]
    replica: Replica,
}

#[derive(Debug, Bind)]
#[envbind(prefix = "SHOP")]
struct Config {
    name: String,

    // Segment overridden: SHOP_DB__... instead of SHOP_DATABASE__...
    #[envbind(nested, name = "DB")]
    database: Database,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    std::env::set_var("SHOP_NAME", "storefront");
    std::env::set_var("SHOP_DB__HOST", "primary.internal");

    // No SHOP_DB__REPLICA__HOST: the coarser SHOP_DB__REPLICA is used instead
    std::env::set_var("SHOP_DB__REPLICA", "replica.internal");

    let config = Config::from_env()?;

    println!("Configuration loaded:");
    println!("  Name: {}", config.name);
    println!(
        "  Database: {}:{}",
        config.database.host, config.database.port
    );
    println!(
        "  Replica: {}:{}",
        config.database.replica.host, config.database.replica.port
    );

    Ok(())
}
