use crate::domain::{recipient_batches, SubscriberNumber};
use crate::sms_client::SmsClient;
use crate::telemetry::error_chain_fmt;
use actix_http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;
use sqlx::PgPool;
use std::fmt::{Debug, Formatter};

#[derive(serde::Deserialize)]
pub struct BroadcastData {
    message: String,
}

#[derive(thiserror::Error)]
pub enum BroadcastError {
    #[error("{0}")]
    ValidationError(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl Debug for BroadcastError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for BroadcastError {
    fn status_code(&self) -> StatusCode {
        match self {
            BroadcastError::ValidationError(_) => StatusCode::BAD_REQUEST,
            BroadcastError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[tracing::instrument(
    name = "Broadcasting a message to all subscribers",
    skip(form, pool, sms_client),
    fields(recipients = tracing::field::Empty)
)]
pub async fn broadcast(
    form: web::Form<BroadcastData>,
    pool: web::Data<PgPool>,
    sms_client: web::Data<SmsClient>,
) -> Result<HttpResponse, BroadcastError> {
    let message = form.0.message;
    if message.trim().is_empty() {
        return Err(BroadcastError::ValidationError(
            "The message to broadcast cannot be empty.".into(),
        ));
    }

    let recipients = get_subscribed_numbers(&pool)
        .await
        .context("Failed to retrieve subscribed numbers")?;
    tracing::Span::current().record("recipients", &recipients.len());

    for (index, batch) in recipient_batches(&recipients).enumerate() {
        if let Err(e) = sms_client.send_message(batch, &message).await {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                batch = index,
                batch_size = batch.len(),
                "Failed to send a batch of the broadcast"
            );
        }
    }

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(sent_page(recipients.len())))
}

fn sent_page(count: usize) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta http-equiv="content-type" content="text/html; charset=utf-8">
    <title>Message sent</title>
</head>
<body>
    <p>Your message has been sent to {count} subscribers.</p>
    <p><a href="/">Back</a></p>
</body>
</html>"#
    )
}

/// Stored numbers that no longer parse are skipped with a warning.
#[tracing::instrument(name = "Getting subscribed numbers", skip(pool))]
async fn get_subscribed_numbers(pool: &PgPool) -> Result<Vec<SubscriberNumber>, sqlx::Error> {
    let numbers = sqlx::query_scalar::<_, String>(
        r#"SELECT number FROM subscribers WHERE subscribed = TRUE ORDER BY number"#,
    )
    .fetch_all(pool)
    .await?
    .into_iter()
    .filter_map(|number| match SubscriberNumber::parse(number) {
        Ok(number) => Some(number),
        Err(e) => {
            tracing::warn!("Skipping a subscriber. {}", e);
            None
        }
    })
    .collect();
    Ok(numbers)
}
