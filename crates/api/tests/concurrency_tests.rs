mod common;

use common::*;
use futures_util::future::join_all;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_overlapping_bookings_admit_one() {
    let app = spawn_app().await;

    // Every request covers 12:00 on the same ground and date.
    let requests = (0..24).map(|i| {
        let start = 10 + (i % 3) as u8;
        app.client
            .post(app.url("/bookings"))
            .json(&booking_body("2025-10-04", start, 3))
            .send()
    });

    let responses = join_all(requests).await;
    let statuses: Vec<StatusCode> = responses
        .into_iter()
        .map(|r| r.expect("request failed").status())
        .collect();

    let created = statuses.iter().filter(|s| **s == StatusCode::CREATED).count();
    let conflicts = statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count();
    assert_eq!(created, 1, "statuses: {:?}", statuses);
    assert_eq!(conflicts, statuses.len() - 1);

    let schedule: Value = app
        .client
        .get(app.url("/schedule?ground_id=1&from=2025-10-04&to=2025-10-04"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(schedule.as_array().unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_disjoint_bookings_all_succeed() {
    let app = spawn_app().await;

    let requests = (0..8u8).map(|i| {
        app.client
            .post(app.url("/bookings"))
            .json(&booking_body("2025-10-05", 6 + 2 * i, 2))
            .send()
    });

    let responses = join_all(requests).await;
    for response in responses {
        assert_eq!(response.unwrap().status(), StatusCode::CREATED);
    }
}
