use moodtube_lib::{completion, init_app, Config, Pipeline};
use std::io::BufRead;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    init_app(&config);

    if args.first().map(|a| a == "--check").unwrap_or(false) {
        return match completion::validate_credentials(&config).await {
            Ok(_) => {
                println!("Credentials OK ({})", config.provider.as_str());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Credential check failed: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let message = if args.is_empty() {
        let mut line = String::new();
        if let Err(e) = std::io::stdin().lock().read_line(&mut line) {
            eprintln!("Failed to read message: {}", e);
            return ExitCode::FAILURE;
        }
        line
    } else {
        args.join(" ")
    };

    let message = message.trim();
    if message.is_empty() {
        eprintln!("Usage: moodtube <message>   (or pipe one line on stdin)");
        return ExitCode::FAILURE;
    }

    let pipeline = Pipeline::from_config(&config);
    let response = pipeline.handle(message).await;

    match serde_json::to_string_pretty(&response) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to serialize response: {}", e);
            ExitCode::FAILURE
        }
    }
}
