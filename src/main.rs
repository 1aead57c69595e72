use anyhow::{bail, Context, Result};
use care_portal_client::core::config::Config;
use care_portal_client::core::state::PortalState;
use care_portal_client::core::tracing_init::init_tracing;
use care_portal_client::forms::serialize::parse_urlencoded;
use care_portal_client::forms::submit::FormSubmitter;
use care_portal_client::session::bootstrap::{bootstrap, BootstrapOutcome};
use care_portal_client::session::login::login;
use care_portal_client::session::logout::{activate, logout};
use care_portal_client::session::storage::FileStorage;
use care_portal_client::ui::page::{MemoryPage, Page};
use reqwest::Method;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

const USAGE: &str = "\
Usage: care-portal-client [config.toml] <command> [args]

Commands:
  status [path]                        Check the stored session as a page load at path
  login <username> <password>          Sign in and store the session
  logout                               Sign out and clear the stored session
  submit <method> <endpoint> <fields>  Submit urlencoded form fields as JSON";

fn main() -> Result<()> {
    let mut args: Vec<String> = env::args().skip(1).collect();

    let config_path = if args.first().map(|a| a.ends_with(".toml")).unwrap_or(false) {
        PathBuf::from(args.remove(0))
    } else {
        PathBuf::from("config.toml")
    };

    if args.is_empty() {
        println!("{}", USAGE);
        return Ok(());
    }

    // Load and validate configuration
    let config = Config::from_file(&config_path).context(format!(
        "Failed to load configuration from '{}'. \
        Copy config.example.toml to config.toml and adjust the values.",
        config_path.display()
    ))?;

    init_tracing(&config.logging);

    // Page work is single-threaded: one task at a time, suspended only on I/O
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build Tokio runtime")?;

    runtime.block_on(async_main(config, config_path, args))
}

async fn async_main(config: Config, config_path: PathBuf, args: Vec<String>) -> Result<()> {
    info!(
        config_path = %config_path.display(),
        base_url = %config.portal.base_url,
        storage = %config.storage.path.display(),
        "Portal client starting"
    );

    let storage = Arc::new(
        FileStorage::open(config.storage.path.clone()).context("Failed to open session storage")?,
    );

    let start_path = match args.first().map(String::as_str) {
        Some("status") => args.get(1).cloned().unwrap_or_else(|| "/dashboard".to_string()),
        Some("login") => config.portal.login_path.clone(),
        _ => "/dashboard".to_string(),
    };

    let page = Arc::new(
        MemoryPage::new(start_path)
            .with_element(config.page.current_user_element.clone())
            .with_element(config.page.logout_trigger_element.clone())
            .with_element(config.alerts.container_id.clone()),
    );

    let state = PortalState::new(config, storage, page.clone())?;

    match args[0].as_str() {
        "status" => match bootstrap(&state) {
            BootstrapOutcome::LoginView => println!("On the login view, no session required"),
            BootstrapOutcome::RedirectedToLogin => {
                println!("Not signed in, redirected to {}", page.current_path())
            }
            BootstrapOutcome::Ready { .. } => {
                let name = page
                    .text_of(&state.config.page.current_user_element)
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| "(unnamed user)".to_string());
                println!("Signed in as {}", name);
            }
        },
        "login" => {
            let (Some(username), Some(password)) = (args.get(1), args.get(2)) else {
                bail!("login requires <username> <password>\n\n{}", USAGE);
            };
            let user = login(&state, username, password).await?;
            println!(
                "Signed in as {}",
                user.display_name().unwrap_or(username.as_str())
            );
        }
        "logout" => {
            // Same path as clicking the page's logout trigger
            let trigger = state.config.page.logout_trigger_element.clone();
            if !activate(&state, &trigger).await {
                logout(&state).await;
            }
            println!("Signed out, now at {}", page.current_path());
        }
        "submit" => {
            let (Some(method), Some(endpoint)) = (args.get(1), args.get(2)) else {
                bail!("submit requires <method> <endpoint> [fields]\n\n{}", USAGE);
            };
            let method = Method::from_bytes(method.to_uppercase().as_bytes())
                .context(format!("Invalid HTTP method '{}'", method))?;
            let fields = parse_urlencoded(args.get(3).map(String::as_str).unwrap_or(""))
                .context("Failed to parse form fields")?;

            let submitter = FormSubmitter::new(state.clone(), endpoint.clone())
                .method(method)
                .on_success(|data| {
                    println!("{}", serde_json::to_string_pretty(data).unwrap_or_default());
                })
                .on_error(|e| {
                    eprintln!("Submission failed: {}", e);
                });

            if submitter.submit(&fields).await.is_err() {
                bail!("Submission to {} failed", endpoint);
            }
        }
        other => {
            bail!("Unknown command '{}'\n\n{}", other, USAGE);
        }
    }

    Ok(())
}
