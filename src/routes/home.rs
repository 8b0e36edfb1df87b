use crate::telemetry::error_chain_fmt;
use actix_http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;
use sqlx::PgPool;
use std::fmt::{Debug, Formatter};

#[derive(thiserror::Error)]
pub enum StatusError {
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl Debug for StatusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for StatusError {
    fn status_code(&self) -> StatusCode {
        match self {
            StatusError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[tracing::instrument(name = "Rendering the subscriber count", skip(pool))]
pub async fn home(pool: web::Data<PgPool>) -> Result<HttpResponse, StatusError> {
    let count = count_subscribers(&pool)
        .await
        .context("Failed to count subscribers")?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta http-equiv="content-type" content="text/html; charset=utf-8">
    <title>SMS marketing</title>
</head>
<body>
    <p>There are currently {count} subscribers.</p>
    <form action="/send" method="post">
        <label>Message
            <textarea name="message" rows="4" cols="40"></textarea>
        </label>
        <button type="submit">Send to all subscribers</button>
    </form>
</body>
</html>"#
        )))
}

#[tracing::instrument(name = "Counting subscribed numbers", skip(pool))]
async fn count_subscribers(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(r#"SELECT COUNT(*) FROM subscribers WHERE subscribed = TRUE"#)
        .fetch_one(pool)
        .await
}
