use crate::helpers::{number, spawn_app};

#[actix_rt::test]
async fn home_shows_the_number_of_subscribers() {
    let app = spawn_app().await;
    app.insert_subscriber(&number(1), true).await;
    app.insert_subscriber(&number(2), true).await;
    app.insert_subscriber(&number(3), false).await;

    let response = app.get_home().await;

    assert_eq!(200, response.status().as_u16());
    let html = response.text().await.unwrap();
    assert!(html.contains("There are currently 2 subscribers."));
    assert!(html.contains(r#"action="/send""#));
}

#[actix_rt::test]
async fn home_counts_new_subscribers() {
    let app = spawn_app().await;

    let html = app.get_home().await.text().await.unwrap();
    assert!(html.contains("There are currently 0 subscribers."));

    app.insert_subscriber(&number(1), true).await;

    let html = app.get_home().await.text().await.unwrap();
    assert!(html.contains("There are currently 1 subscribers."));
}
