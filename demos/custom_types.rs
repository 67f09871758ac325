//! Example demonstrating custom conversion traits

use envbind::{Bind, Decoder, Setter, TextUnmarshaler};

#[derive(Debug)]
enum Level {
    Low,
    High,
}

impl Decoder for Level {
    type Error = String;

    fn decode(value: &str) -> Result<Self, Self::Error> {
        match value {
            "low" => Ok(Level::Low),
            "high" => Ok(Level::High),
            other => Err(format!("unknown level '{other}'")),
        }
    }
}

/// Feature flags separated by `;`
#[derive(Debug, Default)]
struct Features(Vec<String>);

impl Setter for Features {
    type Error = std::convert::Infallible;

    fn set(&mut self, value: &str) -> Result<(), Self::Error> {
        self.0 = value.split(';').map(str::to_string).collect();
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Upper(String);

impl TextUnmarshaler for Upper {
    type Error = std::str::Utf8Error;

    fn unmarshal_text(&mut self, text: &[u8]) -> Result<(), Self::Error> {
        self.0 = std::str::from_utf8(text)?.to_uppercase();
        Ok(())
    }
}

#[derive(Debug, Bind)]
struct Config {
    #[envbind(required)]
    level: Level,

    // Element types use the custom traits too
    levels: Vec<Level>,

    features: Features,

    region: Upper,
}

fn main() -> anyhow::Result<()> {
    std::env::set_var("LEVEL", "high");
    std::env::set_var("LEVELS", "low,high,low");
    std::env::set_var("FEATURES", "search;checkout");
    std::env::set_var("REGION", "eu-west-1");

    let config = Config::from_env()?;

    println!("Configuration loaded:");
    println!("  Level: {:?}", config.level);
    println!("  Levels: {:?}", config.levels);
    println!("  Features: {:?}", config.features.0);
    println!("  Region: {}", config.region.0);

    // Conversion failures name the key, the field and the value
    std::env::set_var("LEVEL", "extreme");
    if let Err(e) = Config::from_env() {
        println!("Expected error: {e}");
    }

    Ok(())
}
