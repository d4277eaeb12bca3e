use arrrg::CommandLine;
use arrrg_derive::CommandLine;
use serde_json::Value;

use repairdesk::{CreateServiceRequestResponse, DiagnosticsResponse, http_utils};

#[derive(CommandLine, Default, PartialEq, Eq)]
struct Options {
    #[arrrg(optional, "Base URL of the repairdesk API server")]
    base_url: String,
}

const USAGE: &str = r#"Usage: repairctl [options] <command> [args...]

Options:
  --base-url <url>     Base URL of the repairdesk API server (default: http://localhost:8000)

Commands:
  health                       Check service liveness
  test                         Show store connectivity diagnostics
  categories                   List issue categories
  guides [category-key]        List solution guides, optionally filtered
  request <json>               Submit a service request from a JSON payload
  seed                         Insert baseline data into empty collections"#;

fn fail(message: &str) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn usage_exit(message: &str) -> ! {
    eprintln!("Error: {}", message);
    eprintln!("{}", USAGE);
    std::process::exit(1);
}

fn print_response<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => fail(&format!("Failed to format response: {}", e)),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (options, free) = Options::from_command_line_relaxed("USAGE: repairctl <command> [args...]");

    if free.is_empty() {
        usage_exit("No command specified");
    }

    let base_url = if options.base_url.is_empty() {
        "http://localhost:8000".to_string()
    } else {
        options.base_url
    };

    let client = http_utils::RepairClient::new(base_url);

    match free[0].as_str() {
        "health" => {
            let status: Value =
                http_utils::execute_or_exit(|| client.get("/api/health"), "health check").await;
            print_response(&status);
        }
        "test" => {
            let diagnostics: DiagnosticsResponse =
                http_utils::execute_or_exit(|| client.get("/test"), "diagnostics").await;
            print_response(&diagnostics);
        }
        "categories" => {
            let categories: Vec<Value> =
                http_utils::execute_or_exit(|| client.get("/api/categories"), "list categories")
                    .await;
            print_response(&categories);
        }
        "guides" => {
            let path = match free.get(1) {
                Some(key) => format!("/api/guides?category_key={}", key),
                None => "/api/guides".to_string(),
            };
            let guides: Vec<Value> =
                http_utils::execute_or_exit(|| client.get(&path), "list guides").await;
            print_response(&guides);
        }
        "request" => {
            let Some(raw) = free.get(1) else {
                usage_exit("request requires a JSON payload");
            };
            let payload: Value = match serde_json::from_str(raw) {
                Ok(payload) => payload,
                Err(e) => fail(&format!("Invalid JSON payload: {}", e)),
            };
            let created: CreateServiceRequestResponse = http_utils::execute_or_exit(
                || client.post("/api/requests", &payload),
                "submit request",
            )
            .await;
            print_response(&created);
        }
        "seed" => {
            let result: Value =
                http_utils::execute_or_exit(|| client.post_empty("/api/seed"), "seed").await;
            print_response(&result);
        }
        other => {
            usage_exit(&format!("Unknown command: {}", other));
        }
    }

    Ok(())
}
