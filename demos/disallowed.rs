//! Example demonstrating detection of unrecognized variables

use envbind::{Bind, Error};

#[derive(Debug, Bind)]
#[envbind(prefix = "WORKER")]
struct Config {
    #[envbind(default = "4")]
    threads: usize,

    queue: String,
}

fn main() -> anyhow::Result<()> {
    std::env::set_var("WORKER_THREADS", "8");
    std::env::set_var("WORKER_QUEUE", "jobs");

    // Typo: should be WORKER_THREADS
    std::env::set_var("WORKER_THREDS", "16");

    match envbind::check_disallowed::<Config>("WORKER") {
        Ok(()) => println!("No unrecognized variables"),
        Err(Error::Disallowed { names }) => {
            println!("Unrecognized variables: {}", names.join(", "));
        }
        Err(e) => return Err(e.into()),
    }

    let config = Config::from_env()?;
    println!("Configuration loaded: {config:?}");

    Ok(())
}
