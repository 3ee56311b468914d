//! Dev console for the auth pipeline.
//!
//! Reads commands from stdin and drives a channel-backed identity provider
//! against the backend named by `API_URL`:
//!
//! ```text
//! sign-in <uid> <token>   provider reports a signed-in identity
//! refresh <token>         rotate the current identity's token
//! signed-out              provider reports no session
//! sign-out                run the sign-out coordinator
//! go <path>               guard and perform a navigation
//! check <path>            show the guard's decision without navigating
//! state                   print the current auth session
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use authgate::identity::ChannelProvider;
use authgate::routes::Navigator;
use authgate::{AuthApp, AuthConfig};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// Navigator that just remembers where the console "is".
#[derive(Default)]
struct ConsoleNavigator {
    location: Mutex<String>,
}

#[async_trait::async_trait]
impl Navigator for ConsoleNavigator {
    async fn push(&self, path: &str) {
        path.clone_into(&mut self.location.lock().unwrap_or_else(PoisonError::into_inner));
        tracing::info!(location = path, "navigated");
    }
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AuthConfig::from_env().expect("auth config");
    let provider = Arc::new(ChannelProvider::new());
    let navigator = Arc::new(ConsoleNavigator::default());
    let app = Arc::new(AuthApp::start(&config, provider.clone(), navigator.clone()).expect("http client"));

    tracing::info!(api_url = %config.api_url, policy = ?config.sign_out_policy, "authgate console ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            ["sign-in", uid, token] => provider.sign_in(*uid, *token),
            ["refresh", token] => {
                if !provider.refresh_token(*token) {
                    tracing::warn!("nobody is signed in");
                }
            }
            ["signed-out"] => provider.confirm_signed_out(),
            ["sign-out"] => {
                if let Err(e) = app.sign_out().await {
                    tracing::error!(error = %e, "sign-out failed");
                }
            }
            ["go", path] => {
                // Parked navigations must not block the next provider command.
                let app = app.clone();
                let path = (*path).to_string();
                tokio::spawn(async move {
                    let decision = app.navigate(&path).await;
                    tracing::info!(%path, ?decision, "navigation finished");
                });
            }
            ["check", path] => {
                let guard = app.guard();
                let intent = guard.routes().intent(path);
                match guard.evaluate(&intent) {
                    Some(decision) => println!("{path} requires_auth={} -> {decision:?}", intent.requires_auth),
                    None => println!("{path} requires_auth={} -> parked (auth loading)", intent.requires_auth),
                }
            }
            ["state"] => {
                let location = navigator.location.lock().unwrap_or_else(PoisonError::into_inner).clone();
                println!(
                    "location={location} session={:?} seq={} subscribers={} stalled={}",
                    app.session(),
                    app.store().latest_seq(),
                    provider.subscriber_count(),
                    app.guard().stalled(),
                );
            }
            [] => {}
            _ => tracing::warn!(%line, "unknown command"),
        }
    }
}
