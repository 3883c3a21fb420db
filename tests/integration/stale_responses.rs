use crate::support::{controller, page, GatedFetcher};
use pagewise::{FetchError, Generation, Role};

#[tokio::test]
async fn superseded_reset_response_is_ignored() {
    let fetcher = GatedFetcher::new();
    let controller = controller(fetcher.clone(), Role::Admin, "me");

    let first = tokio::spawn({
        let controller = controller.clone();
        async move { controller.refresh().await }
    });
    fetcher.wait_for_calls(1).await;

    let second = tokio::spawn({
        let controller = controller.clone();
        async move { controller.refresh().await }
    });
    fetcher.wait_for_calls(2).await;
    let before = controller.state();
    assert_eq!(before.generation, Generation::INITIAL.next().next());

    fetcher.respond(0, Ok(page(&["stale"], 1, 1, 1)));
    first.await.unwrap();
    assert_eq!(controller.state(), before);

    fetcher.respond(1, Ok(page(&["fresh"], 1, 1, 1)));
    second.await.unwrap();
    let state = controller.state();
    assert_eq!(state.items, vec!["fresh"]);
    assert!(!state.is_loading_initial);
}

#[tokio::test]
async fn stale_failure_does_not_surface() {
    let fetcher = GatedFetcher::new();
    let controller = controller(fetcher.clone(), Role::Admin, "me");

    let first = tokio::spawn({
        let controller = controller.clone();
        async move { controller.refresh().await }
    });
    fetcher.wait_for_calls(1).await;
    let second = tokio::spawn({
        let controller = controller.clone();
        async move { controller.refresh().await }
    });
    fetcher.wait_for_calls(2).await;

    fetcher.respond(1, Ok(page(&["fresh"], 1, 1, 1)));
    second.await.unwrap();
    fetcher.respond(0, Err(FetchError::Network("timeout".into())));
    first.await.unwrap();

    let state = controller.state();
    assert_eq!(state.items, vec!["fresh"]);
    assert_eq!(state.last_error, None);
}

#[tokio::test]
async fn reset_discards_in_flight_continuation() {
    let fetcher = GatedFetcher::new();
    let controller = controller(fetcher.clone(), Role::Admin, "me");

    let initial = tokio::spawn({
        let controller = controller.clone();
        async move { controller.refresh().await }
    });
    fetcher.wait_for_calls(1).await;
    fetcher.respond(0, Ok(page(&["a", "b"], 1, 3, 6)));
    initial.await.unwrap();

    assert!(controller.on_sentinel_visible());
    fetcher.wait_for_calls(2).await;
    assert_eq!(fetcher.query(1).page, 2);

    let reset = tokio::spawn({
        let controller = controller.clone();
        async move { controller.refresh().await }
    });
    fetcher.wait_for_calls(3).await;
    assert_eq!(fetcher.query(2).page, 1);

    fetcher.respond(1, Ok(page(&["c", "d"], 2, 3, 6)));
    fetcher.respond(2, Ok(page(&["x"], 1, 1, 1)));
    reset.await.unwrap();
    let state = controller.settled().await;

    assert_eq!(state.items, vec!["x"]);
    assert_eq!(state.page_number, 1);
    assert!(!state.has_more());
}

#[tokio::test]
async fn shutdown_discards_in_flight_response() {
    let fetcher = GatedFetcher::new();
    let controller = controller(fetcher.clone(), Role::Admin, "me");

    let pending = tokio::spawn({
        let controller = controller.clone();
        async move { controller.refresh().await }
    });
    fetcher.wait_for_calls(1).await;
    controller.shutdown();

    fetcher.respond(0, Ok(page(&["late"], 1, 1, 1)));
    pending.await.unwrap();

    assert!(!controller.is_active());
    assert!(controller.state().items.is_empty());
}
