use nanobanana::{
    logger::{self, LoggerConfig},
    ApiClient, ApiConfig, GenerationRequest, PollStatusRequest, PollStatusResponse,
};
use std::env;
use std::fs;
use std::time::Duration;

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    logger::init_with_config(LoggerConfig::from_env())?;
    if !dotenv_loaded {
        log::warn!("No .env file found, using system environment variables");
    }

    let mut args = env::args().skip(1);
    let (image_path, prompt) = match (args.next(), args.next()) {
        (Some(path), Some(prompt)) => (path, prompt),
        _ => {
            eprintln!("usage: nanobanana <image-path> <prompt>");
            std::process::exit(2);
        }
    };

    let config = ApiConfig::from_env()?;
    log::info!("Using Nano Banana backend at {}", config.base_url());
    let client = ApiClient::new(config);

    let image = fs::read(&image_path)?;
    log::info!("Loaded {} ({} bytes)", image_path, image.len());
    let request = GenerationRequest::from_image_bytes(&image).with_prompt(prompt);

    let submitted = client.generate_image(&request).await.into_result()?;
    let request_id = submitted
        .request_id
        .ok_or("backend accepted the request without an id")?;
    log::info!("Request accepted: {}", request_id);

    let interval = Duration::from_secs(env_or("POLL_INTERVAL_SECS", 3));
    let max_attempts: u32 = env_or("POLL_MAX_ATTEMPTS", 100);
    let poll = PollStatusRequest::new(request_id);

    for attempt in 1..=max_attempts {
        match client.poll_status(&poll).await {
            PollStatusResponse::Completed(result) => {
                let output = result.output.unwrap_or_default();
                log::info!("Generated image: {}", output);
                println!("{}", output);
                return Ok(());
            }
            PollStatusResponse::Failed(error) => return Err(error.into()),
            status => {
                match status.progress() {
                    Some(progress) => log::info!(
                        "[{}/{}] {} ({:.0}%)",
                        attempt,
                        max_attempts,
                        status.status(),
                        progress
                    ),
                    None => log::info!("[{}/{}] {}", attempt, max_attempts, status.status()),
                }
                tokio::time::sleep(interval).await;
            }
        }
    }

    Err(format!("gave up after {} polls", max_attempts).into())
}
