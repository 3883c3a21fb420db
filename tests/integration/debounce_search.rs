use crate::support::{controller, page, GatedFetcher};
use pagewise::Role;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn rapid_search_edits_coalesce_into_one_fetch() {
    let fetcher = GatedFetcher::new();
    let controller = controller(fetcher.clone(), Role::Admin, "me");

    for text in ["r", "re", "ren", "rent"] {
        controller.set_search(text).unwrap();
        tokio::time::advance(Duration::from_millis(100)).await;
    }
    assert_eq!(fetcher.call_count(), 0);

    fetcher.wait_for_calls(1).await;
    assert_eq!(fetcher.query(0).search.as_deref(), Some("rent"));

    fetcher.respond(0, Ok(page(&["rent"], 1, 1, 1)));
    let state = controller.settled().await;
    assert_eq!(state.items, vec!["rent"]);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(fetcher.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn immediate_reset_cancels_pending_search() {
    let fetcher = GatedFetcher::new();
    let controller = controller(fetcher.clone(), Role::Admin, "me");

    controller.set_search("coffee").unwrap();
    let status = tokio::spawn({
        let controller = controller.clone();
        async move { controller.set_field("status", "open").await }
    });
    fetcher.wait_for_calls(1).await;

    let query = fetcher.query(0);
    assert_eq!(query.search.as_deref(), Some("coffee"));
    assert_eq!(query.extra.get("status").map(String::as_str), Some("open"));

    fetcher.respond(0, Ok(page(&["latte"], 1, 1, 1)));
    status.await.unwrap().unwrap();

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(fetcher.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn shutdown_drops_pending_search() {
    let fetcher = GatedFetcher::new();
    let controller = controller(fetcher.clone(), Role::Admin, "me");

    controller.set_search("late").unwrap();
    controller.shutdown();
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(fetcher.call_count(), 0);
    assert_eq!(controller.filters().search(), "late");
}
