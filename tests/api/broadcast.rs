use crate::helpers::{number, spawn_app, TestApp};
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn create_subscribers(app: &TestApp, count: usize) {
    for i in 0..count {
        app.insert_subscriber(&number(i), true).await;
    }
}

#[actix_rt::test]
async fn recipients_are_sent_in_batches_of_fifty() {
    // Arrange
    let app = spawn_app().await;
    create_subscribers(&app, 120).await;
    Mock::given(path("/messages"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(3)
        .mount(&app.sms_server)
        .await;

    // Act
    let response = app.post_send("message=Big%20sale%20today".into()).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let sent = app.sent_messages().await;
    let sizes: Vec<usize> = sent.iter().map(|m| m.recipients.len()).collect();
    assert_eq!(vec![50, 50, 20], sizes);
    assert!(sent.iter().all(|m| m.body == "Big sale today"));

    let mut recipients: Vec<String> = sent.into_iter().flat_map(|m| m.recipients).collect();
    recipients.sort();
    recipients.dedup();
    assert_eq!(120, recipients.len());

    let html = response.text().await.unwrap();
    assert!(html.contains("sent to 120 subscribers"));
}

#[actix_rt::test]
async fn unsubscribed_numbers_do_not_receive_broadcasts() {
    let app = spawn_app().await;
    app.insert_subscriber(&number(1), true).await;
    app.insert_subscriber(&number(2), false).await;
    app.insert_subscriber(&number(3), true).await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&app.sms_server)
        .await;

    let response = app.post_send("message=Hello".into()).await;

    assert_eq!(200, response.status().as_u16());
    let sent = app.sent_messages().await;
    assert_eq!(vec![number(1), number(3)], sent[0].recipients);
    let html = response.text().await.unwrap();
    assert!(html.contains("sent to 2 subscribers"));
}

#[actix_rt::test]
async fn broadcasting_without_subscribers_sends_nothing() {
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&app.sms_server)
        .await;

    let response = app.post_send("message=Hello".into()).await;

    assert_eq!(200, response.status().as_u16());
    let html = response.text().await.unwrap();
    assert!(html.contains("sent to 0 subscribers"));
}

#[actix_rt::test]
async fn a_failing_batch_does_not_stop_the_broadcast() {
    let app = spawn_app().await;
    create_subscribers(&app, 120).await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&app.sms_server)
        .await;

    let response = app.post_send("message=Hello".into()).await;

    assert_eq!(200, response.status().as_u16());
    let html = response.text().await.unwrap();
    assert!(html.contains("sent to 120 subscribers"));
}

#[actix_rt::test]
async fn broadcast_returns_400_for_invalid_data() {
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&app.sms_server)
        .await;

    let test_cases = vec![
        ("", "missing message"),
        ("message=", "empty message"),
        ("message=%20%20%0A", "whitespace-only message"),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = app.post_send(invalid_body.into()).await;
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was {}",
            error_message
        );
    }
}
