//! Zititex Contact CLI
//!
//! Commands: fields, validate, submit, check-config, test-api
//! Outputs JSON to stdout, logs to stderr
//! Returns 2 on validation failure, 1 on any other failure

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zititex_contact::{
    config::{API_KEY_VAR, BASE_URL_VAR},
    ApiConfig, ContactApi, ContactSubmission, FieldValidator, FormSchema, FormValues,
    HttpContactClient, SubmissionCoordinator, SubmitOutcome,
};

#[derive(Parser)]
#[command(name = "zititex-contact-cli")]
#[command(about = "Zititex CLI - Contact form validation and submission")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with field definitions (built-in contact form when omitted)
    #[arg(short, long)]
    fields: Option<PathBuf>,

    /// Contact API base URL
    #[arg(long, env = BASE_URL_VAR, default_value = "")]
    api_url: String,

    /// Contact API key
    #[arg(long, env = API_KEY_VAR, default_value = "", hide_env_values = true)]
    api_key: String,

    /// Request timeout in seconds (transport default when omitted)
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// List field definitions
    Fields,

    /// Validate form values without sending them
    Validate {
        /// JSON object of field name -> value
        #[arg(short, long)]
        payload: String,
    },

    /// Validate and send form values to the contact API
    Submit {
        /// JSON object of field name -> value
        #[arg(short, long)]
        payload: String,
    },

    /// Report whether the contact API is configured
    CheckConfig,

    /// Send a sample submission straight to the contact API
    TestApi,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    tracing::debug!("zititex-contact v{}", zititex_contact::CRATE_VERSION);

    let schema = match &cli.fields {
        Some(path) => match FormSchema::load_from_file(path) {
            Ok(s) => s,
            Err(e) => {
                print_json(&serde_json::json!({
                    "success": false,
                    "error": format!("Failed to load fields: {}", e),
                }));
                return ExitCode::FAILURE;
            }
        },
        None => FormSchema::zititex(),
    };

    let mut config = ApiConfig::new(cli.api_url, cli.api_key);
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    match cli.command {
        Commands::Fields => {
            print_json(&schema.fields());
            ExitCode::SUCCESS
        }

        Commands::Validate { payload } => {
            let values = match parse_values(&payload) {
                Ok(v) => v,
                Err(e) => {
                    print_json(&serde_json::json!({"valid": false, "error": e}));
                    return ExitCode::FAILURE;
                }
            };

            let errors = FieldValidator::new().validate_form(&schema, &values);
            let valid = errors.is_empty();
            print_json(&serde_json::json!({"valid": valid, "errors": errors}));
            if valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            }
        }

        Commands::Submit { payload } => {
            let values = match parse_values(&payload) {
                Ok(v) => v,
                Err(e) => {
                    print_json(&serde_json::json!({"success": false, "error": e}));
                    return ExitCode::FAILURE;
                }
            };
            let client = match HttpContactClient::new(config) {
                Ok(c) => c,
                Err(e) => {
                    print_json(&serde_json::json!({"success": false, "error": e.to_string()}));
                    return ExitCode::FAILURE;
                }
            };

            let coordinator = SubmissionCoordinator::new(schema, client);
            for (name, value) in values.iter() {
                if let Err(e) = coordinator.set_value(name, value) {
                    tracing::warn!(error = %e, "ignoring value");
                }
            }

            let outcome = run_async(async {
                let cancel = CancellationToken::new();
                let on_ctrl_c = cancel.clone();
                tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        on_ctrl_c.cancel();
                    }
                });
                coordinator.submit_with_cancel(cancel).await
            });

            let Some(outcome) = outcome else {
                return ExitCode::FAILURE;
            };
            report_outcome(outcome)
        }

        Commands::CheckConfig => {
            let configured = config.is_configured();
            let endpoint = config.contact_endpoint().map(|u| u.to_string()).ok();
            print_json(&serde_json::json!({
                "configured": configured,
                "endpoint": endpoint,
                "api_key": config.masked_key(),
            }));
            if configured {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }

        Commands::TestApi => {
            let client = match HttpContactClient::new(config) {
                Ok(c) => c,
                Err(e) => {
                    print_json(&serde_json::json!({"success": false, "error": e.to_string()}));
                    return ExitCode::FAILURE;
                }
            };

            let sample = ContactSubmission::sample();
            tracing::info!(endpoint = ?client.config().contact_endpoint().ok(), "testing contact api");
            let Some(result) = run_async(client.send_contact_form(&sample)) else {
                return ExitCode::FAILURE;
            };

            print_json(&result);
            if result.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn report_outcome(outcome: SubmitOutcome) -> ExitCode {
    match outcome {
        SubmitOutcome::Sent(result) => {
            print_json(&result);
            ExitCode::SUCCESS
        }
        SubmitOutcome::Invalid(errors) => {
            print_json(&serde_json::json!({"success": false, "errors": errors}));
            ExitCode::from(2)
        }
        SubmitOutcome::Failed(result) => {
            print_json(&result);
            ExitCode::FAILURE
        }
        SubmitOutcome::Busy | SubmitOutcome::Cancelled => {
            print_json(&serde_json::json!({"success": false, "error": "Submission cancelled"}));
            ExitCode::FAILURE
        }
    }
}

fn parse_values(payload: &str) -> Result<FormValues, String> {
    serde_json::from_str::<BTreeMap<String, String>>(payload)
        .map(|m| m.into_iter().collect())
        .map_err(|e| format!("Invalid payload: {}", e))
}

fn run_async<F: std::future::Future>(future: F) -> Option<F::Output> {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => Some(rt.block_on(future)),
        Err(e) => {
            print_json(&serde_json::json!({"success": false, "error": format!("Runtime error: {}", e)}));
            None
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Failed to render output: {}", e),
    }
}
