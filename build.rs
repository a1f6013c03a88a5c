// build.rs

use std::env;

fn main() -> anyhow::Result<()> {
    let api_port = env::var("API_PORT").unwrap_or_else(|_| "8080".into());
    let threshold = env::var("DEFAULT_THRESHOLD").unwrap_or_else(|_| "35.0".into());

    println!("cargo:rustc-env=API_PORT={api_port}");
    println!("cargo:rustc-env=DEFAULT_THRESHOLD={threshold}");
    println!("cargo:rerun-if-env-changed=API_PORT");
    println!("cargo:rerun-if-env-changed=DEFAULT_THRESHOLD");

    Ok(())
}

// EOF
