use reqwest::Client;
use serde_json::json;
use tracing::info;

use crate::{config::Config, error::AppError};

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";
const SENDER: &str = "CoffeeRun <noreply@coffeerun.local>";

/// Sends login links through Resend, or logs them when no API key is configured.
#[derive(Clone)]
pub struct Mailer {
    client: Client,
    api_key: String,
    frontend_url: String,
    expiry_minutes: i64,
}

impl Mailer {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            api_key: config.resend_api_key.clone(),
            frontend_url: config.frontend_url.trim_end_matches('/').to_string(),
            expiry_minutes: config.magic_link_expiry_minutes,
        }
    }

    pub fn magic_link(&self, token: &str) -> String {
        format!("{}/auth/verify?token={token}", self.frontend_url)
    }

    pub async fn send_magic_link(&self, email: &str, token: &str) -> Result<(), AppError> {
        let link = self.magic_link(token);

        if self.api_key.is_empty() {
            info!("Magic link (dev mode) for {email}: {link}");
            return Ok(());
        }

        let html = format!(
            r#"<h2>Login to CoffeeRun</h2>
<p>Click the link below to log in. This link expires in {} minutes.</p>
<p><a href="{link}">Log in to CoffeeRun</a></p>
<p><small>If you didn't request this, you can safely ignore this email.</small></p>"#,
            self.expiry_minutes
        );

        self.client
            .post(RESEND_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "from": SENDER,
                "to": [email],
                "subject": "Your CoffeeRun login link",
                "html": html,
            }))
            .send()
            .await?
            .error_for_status()?;

        info!("Sent magic link to {email}");

        Ok(())
    }
}
