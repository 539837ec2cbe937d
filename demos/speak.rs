//! Render a phrase and save it to the working directory.
//!
//! Usage:
//!   UBERDUCK_API_KEY=... UBERDUCK_API_SECRET=... cargo run --example speak

use uberduck::{SpeakOptions, UberduckClient};

#[tokio::main]
async fn main() -> uberduck::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let client = UberduckClient::builder().build()?;

    let names = client.voice_names().await?;
    println!("{} voices available", names.len());

    let options = SpeakOptions::new().save_to("quack.wav").return_path();
    let output = client.speak("quack quack", "big-bird", &options).await?;
    if let Some(path) = output.into_path() {
        println!("rendered audio saved to quack.wav (served from {})", path);
    }
    Ok(())
}
