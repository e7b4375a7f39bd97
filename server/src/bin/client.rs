//! Example RPC client.
//!
//! Creates an address, confirms it, reads it back singly and as a one-entry
//! page, then deletes it. Every call has a one second deadline.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
use mailer::{
    config::ClientConfig,
    proto,
    rpc::{ClientError, MailerClient},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const EMAIL_ADDRESS: &str = "naufal.ihsan@mail.com";
const CONFIRMED_AT: i64 = 10_000;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailer=debug,mailer_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&config).await {
        tracing::error!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(config: &ClientConfig) -> Result<(), ClientError> {
    let mut client = MailerClient::connect(config.rpc_addr).await?;
    tracing::info!("connected to {}", config.rpc_addr);

    let created = client.create_email(EMAIL_ADDRESS).await?;
    log_response("create", &created);

    let Some(mut entry) = created.email_entry else {
        tracing::error!("email not found");
        return Ok(());
    };
    entry.confirmed_at = CONFIRMED_AT;

    log_response("update", &client.update_email(entry).await?);
    log_response("get", &client.get_email(EMAIL_ADDRESS).await?);

    let batch = client.get_email_batch(1, 1).await?;
    let total = batch.email_entries.len();
    for (i, entry) in batch.email_entries.iter().enumerate() {
        tracing::info!("item [{} of {total}]: {entry:?}", i + 1);
    }

    log_response("delete", &client.delete_email(EMAIL_ADDRESS).await?);
    Ok(())
}

fn log_response(call: &str, response: &proto::EmailResponse) {
    match &response.email_entry {
        Some(entry) => tracing::info!("{call} response: {}", entry.email),
        None => tracing::info!("{call} response: email not found"),
    }
}
