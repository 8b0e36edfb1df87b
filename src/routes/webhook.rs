use crate::domain::{Keyword, SubscriberNumber, SubscriptionChange};
use crate::sms_client::SmsClient;
use crate::telemetry::error_chain_fmt;
use actix_http::StatusCode;
use actix_web::error::{InternalError, UrlencodedError};
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};
use std::fmt::{Debug, Formatter};

/// Inbound message as posted by the gateway. Missing fields read as empty.
#[derive(serde::Deserialize)]
pub struct WebhookData {
    #[serde(default)]
    originator: String,
    #[serde(default)]
    payload: String,
}

#[derive(thiserror::Error)]
pub enum WebhookError {
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl Debug for WebhookError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for WebhookError {
    fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Bodies that cannot be read as a form are acknowledged like any other
/// message the service has nothing to do with.
pub fn webhook_form_config() -> web::FormConfig {
    web::FormConfig::default().error_handler(reject_as_ok)
}

fn reject_as_ok(err: UrlencodedError, _req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(error.message = %err, "Ignoring unreadable inbound message");
    InternalError::from_response(err, ok()).into()
}

#[tracing::instrument(
    name = "Handling an inbound message",
    skip(form, pool, sms_client),
    fields(
        originator = %form.originator,
        payload = %form.payload
    )
)]
pub async fn receive_webhook(
    form: web::Form<WebhookData>,
    pool: web::Data<PgPool>,
    sms_client: web::Data<SmsClient>,
) -> Result<HttpResponse, WebhookError> {
    let WebhookData {
        originator,
        payload,
    } = form.0;
    let number = match SubscriberNumber::parse(originator) {
        Ok(number) => number,
        Err(e) => {
            tracing::warn!("Ignoring inbound message: {}", e);
            return Ok(ok());
        }
    };
    let keyword = Keyword::parse(&payload);

    let mut transaction = pool
        .begin()
        .await
        .context("Failed to acquire a Postgres connection from the pool")?;
    let subscribed = get_subscription_flag(&mut transaction, &number)
        .await
        .context("Failed to look up the subscriber")?;
    let change = SubscriptionChange::decide(subscribed, keyword);

    let change = match change {
        Some(change) => change,
        None => {
            tracing::info!("Nothing to do for incoming message.");
            return Ok(ok());
        }
    };

    match change {
        SubscriptionChange::Created => {
            let inserted = insert_subscriber(&mut transaction, &number)
                .await
                .context("Failed to insert a new subscriber")?;
            // A concurrent message from the same number created the record first.
            if !inserted {
                tracing::info!("Nothing to do for incoming message.");
                return Ok(ok());
            }
        }
        SubscriptionChange::Resubscribed | SubscriptionChange::Unsubscribed => {
            set_subscribed(&mut transaction, &number, change.subscribed())
                .await
                .context("Failed to update the subscriber")?
        }
    }
    transaction
        .commit()
        .await
        .context("Failed to commit the SQL transaction to update a subscriber")?;

    send_reply(&sms_client, number, change.reply()).await;
    Ok(ok())
}

fn ok() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}

/// Failures are logged, never retried.
#[tracing::instrument(name = "Sending a reply to the originator", skip(sms_client))]
async fn send_reply(sms_client: &SmsClient, number: SubscriberNumber, body: &str) {
    tracing::info!("{} <-- {}", number, body);
    if let Err(e) = sms_client.send_message(&[number], body).await {
        tracing::error!(
            error.cause_chain = ?e,
            error.message = %e,
            "Failed to send a reply to the originator"
        );
    }
}

/// `None` when the number has never subscribed. Locks the row until commit.
#[tracing::instrument(name = "Getting subscription flag by number", skip(transaction))]
async fn get_subscription_flag(
    transaction: &mut Transaction<'_, Postgres>,
    number: &SubscriberNumber,
) -> Result<Option<bool>, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        r#"SELECT subscribed FROM subscribers WHERE number = $1 FOR UPDATE"#,
    )
    .bind(number.as_ref())
    .fetch_optional(transaction)
    .await
}

#[tracing::instrument(name = "Saving new subscriber in the database", skip(transaction))]
async fn insert_subscriber(
    transaction: &mut Transaction<'_, Postgres>,
    number: &SubscriberNumber,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
    INSERT INTO subscribers (number, subscribed) VALUES ($1, TRUE)
    ON CONFLICT (number) DO NOTHING
        "#,
    )
    .bind(number.as_ref())
    .execute(transaction)
    .await?;
    Ok(result.rows_affected() == 1)
}

#[tracing::instrument(name = "Updating subscription flag", skip(transaction))]
async fn set_subscribed(
    transaction: &mut Transaction<'_, Postgres>,
    number: &SubscriberNumber,
    subscribed: bool,
) -> Result<(), sqlx::Error> {
    sqlx::query(r#"UPDATE subscribers SET subscribed = $1 WHERE number = $2"#)
        .bind(subscribed)
        .bind(number.as_ref())
        .execute(transaction)
        .await?;
    Ok(())
}
