use clap::{ArgAction, Parser, Subcommand};
use restguard::{
    Classifier, ErrorCodeRegistry, ExchangeEnvironment, MessageFormatter, Outcome, ResponseError,
    default_classifier,
};
use restguard_http::reqwest::Method;
use restguard_http::{Client, ClientConfig, HttpError, Request, Response};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const FAILURE_EXIT: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "restguard")]
#[command(about = "Classify API responses into typed failures")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify a recorded exchange (`-` reads stdin).
    Classify(ClassifyArgs),
    /// Send a request through the error-raising pipeline.
    Request(RequestArgs),
    /// List registered error codes and their kinds.
    Codes,
}

#[derive(clap::Args, Debug)]
struct ClassifyArgs {
    #[arg(long)]
    exchange_file: Option<PathBuf>,
    #[arg(long)]
    exchange_json: Option<String>,
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
}

#[derive(clap::Args, Debug)]
struct RequestArgs {
    path: String,
    #[arg(long, default_value = "GET")]
    method: String,
    #[arg(long = "header")]
    headers: Vec<String>,
    #[arg(long)]
    data: Option<String>,
    #[arg(long)]
    base_url: Option<String>,
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Classify(args) => classify_command(args),
        Commands::Request(args) => request_command(args).await,
        Commands::Codes => codes_command(),
    };

    match result {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("RESTGUARD_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn classify_command(args: ClassifyArgs) -> Result<ExitCode, String> {
    let source = load_exchange_source(args.exchange_file.as_deref(), args.exchange_json.as_deref())?;
    let exchange: ExchangeEnvironment =
        serde_json::from_str(&source).map_err(|error| format!("invalid exchange: {error}"))?;

    let config = ClientConfig::from_env().map_err(|error| error.to_string())?;
    let classifier = Classifier::new(
        ErrorCodeRegistry::with_defaults(),
        MessageFormatter::with_max_depth(config.max_body_depth),
    );

    match classifier.classify(&exchange) {
        Outcome::Success => {
            if args.json {
                println!("{}", serde_json::json!({"outcome": "success", "status": exchange.status}));
            } else {
                println!("success ({})", exchange.status);
            }
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Failure(error) => print_failure(&error, args.json),
    }
}

async fn request_command(args: RequestArgs) -> Result<ExitCode, String> {
    let mut config = ClientConfig::from_env().map_err(|error| error.to_string())?;
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    tracing::debug!(base_url = %config.base_url, raise_errors = config.raise_errors, "client configured");
    let client = Client::from_config(&config).map_err(|error| error.to_string())?;
    let request = build_request(&args.path, &args.method, &args.headers, args.data.as_deref())?;

    match client.send(request).await {
        Ok(response) => {
            print_response(&response, args.json)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(HttpError::Response(error)) => print_failure(&error, args.json),
        Err(error) => Err(error.to_string()),
    }
}

fn codes_command() -> Result<ExitCode, String> {
    for (code, subkind) in default_classifier().registry().codes() {
        println!("{code}\t{subkind}");
    }
    Ok(ExitCode::SUCCESS)
}

fn load_exchange_source(file: Option<&Path>, json: Option<&str>) -> Result<String, String> {
    match (file, json) {
        (Some(_), Some(_)) => {
            Err("provide only one of --exchange-file or --exchange-json".to_string())
        }
        (Some(path), None) if path == Path::new("-") => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|error| format!("failed reading stdin: {error}"))?;
            Ok(buffer)
        }
        (Some(path), None) => std::fs::read_to_string(path)
            .map_err(|error| format!("failed reading {}: {error}", path.display())),
        (None, Some(json)) => Ok(json.to_string()),
        (None, None) => Err("provide --exchange-file or --exchange-json".to_string()),
    }
}

fn build_request(
    path: &str,
    method: &str,
    headers: &[String],
    data: Option<&str>,
) -> Result<Request, String> {
    let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .map_err(|_| format!("invalid method: {method}"))?;
    let mut request = Request::new(method, path);
    for header in headers {
        let (name, value) = header
            .split_once(':')
            .ok_or_else(|| format!("header must be NAME:VALUE, got {header:?}"))?;
        request = request.with_header(name.trim(), value.trim());
    }
    if let Some(data) = data {
        let body = serde_json::from_str(data).map_err(|error| format!("invalid --data: {error}"))?;
        request = request.with_body(body);
    }
    Ok(request)
}

fn print_response(response: &Response, json: bool) -> Result<(), String> {
    if json {
        let rendered = serde_json::to_string_pretty(response).map_err(|e| e.to_string())?;
        println!("{rendered}");
    } else {
        let rendered = serde_json::to_string_pretty(response.body()).map_err(|e| e.to_string())?;
        println!("status: {}", response.status());
        println!("{rendered}");
    }
    Ok(())
}

fn print_failure(error: &ResponseError, json: bool) -> Result<ExitCode, String> {
    if json {
        let rendered = serde_json::to_string_pretty(error).map_err(|e| e.to_string())?;
        println!("{rendered}");
    } else {
        println!("failure: {} (status {})", error.kind, error.status());
        println!("{}", error.message);
    }
    Ok(ExitCode::from(FAILURE_EXIT))
}
