use crate::domain::SubscriberNumber;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};

/// Client for the gateway's "create message" call.
#[derive(Clone)]
pub struct SmsClient {
    originator: String,
    http_client: Client,
    base_url: String,
    access_key: Secret<String>,
}

impl SmsClient {
    pub fn new(
        base_url: String,
        originator: String,
        access_key: Secret<String>,
        timeout: std::time::Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            originator,
            base_url,
            http_client,
            access_key,
        })
    }

    /// Sends `body` to every number in `recipients` with a single API call.
    pub async fn send_message(
        &self,
        recipients: &[SubscriberNumber],
        body: &str,
    ) -> Result<(), reqwest::Error> {
        let url = format!("{}/messages", self.base_url);
        let request_body = SendMessageRequest {
            originator: &self.originator,
            recipients: recipients.iter().map(|number| number.as_ref()).collect(),
            body,
        };
        self.http_client
            .post(&url)
            .header(
                "Authorization",
                format!("AccessKey {}", self.access_key.expose_secret()),
            )
            .json(&request_body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[derive(serde::Serialize)]
struct SendMessageRequest<'a> {
    originator: &'a str,
    recipients: Vec<&'a str>,
    body: &'a str,
}
