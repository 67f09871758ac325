//! Example demonstrating sequences, maps and other built-in types

use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::time::Duration;

use envbind::Bind;

#[derive(Debug, Bind)]
struct Config {
    // HOSTS=a,b,c
    hosts: Vec<String>,

    // PORTS=80,443
    ports: Vec<u16>,

    // LIMITS=read:10,write:5
    limits: BTreeMap<String, u32>,

    // UPSTREAMS=api:http://api.internal:8080 (values may contain ':')
    upstreams: HashMap<String, url::Url>,

    // Raw bytes, no splitting
    salt: Vec<u8>,

    #[envbind(default = "1m 30s")]
    timeout: Duration,

    time_zone: Option<chrono_tz::Tz>,

    listen: Option<SocketAddr>,
}

fn main() -> anyhow::Result<()> {
    std::env::set_var("HOSTS", "a.internal,b.internal,c.internal");
    std::env::set_var("PORTS", "80,443");
    std::env::set_var("LIMITS", "read:10,write:5");
    std::env::set_var("UPSTREAMS", "api:http://api.internal:8080");
    std::env::set_var("SALT", "s3cr3t,with,commas");
    std::env::set_var("TIME_ZONE", "Asia/Tokyo");

    let config = Config::from_env()?;

    println!("Configuration loaded:");
    println!("  Hosts: {:?}", config.hosts);
    println!("  Ports: {:?}", config.ports);
    println!("  Limits: {:?}", config.limits);
    for (name, url) in &config.upstreams {
        println!("  Upstream {name}: {url}");
    }
    println!("  Salt: {} bytes", config.salt.len());
    println!("  Timeout: {:?}", config.timeout);
    println!("  Time zone: {:?}", config.time_zone);
    println!("  Listen: {:?}", config.listen);

    Ok(())
}
