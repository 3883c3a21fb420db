use crate::support::{controller, page, GatedFetcher, ScriptedFetcher};
use pagewise::visibility::{ManualTrigger, VisibilityTrigger};
use pagewise::{FetchError, Role, SentinelHandle};

#[tokio::test]
async fn continuation_appends_pages_in_order() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok(page(&["a", "b"], 1, 3, 5)),
        Ok(page(&["c", "d"], 2, 3, 5)),
        Ok(page(&["e"], 3, 3, 5)),
    ]);
    let controller = controller(fetcher.clone(), Role::Admin, "me");

    controller.refresh().await;
    assert!(controller.continuation_fetch().await);
    assert!(controller.continuation_fetch().await);

    let state = controller.state();
    assert_eq!(state.items, vec!["a", "b", "c", "d", "e"]);
    assert_eq!(state.page_number, 3);
    assert_eq!(state.total_count, 5);
    assert_eq!(
        fetcher.queries().iter().map(|q| q.page).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
}

#[tokio::test]
async fn sentinel_at_last_page_issues_no_fetch() {
    let fetcher = ScriptedFetcher::new(vec![Ok(page(&["a"], 1, 1, 1))]);
    let controller = controller(fetcher.clone(), Role::Admin, "me");
    controller.refresh().await;
    let before = controller.state();

    assert!(!controller.on_sentinel_visible());
    assert!(!controller.continuation_fetch().await);

    let mut trigger = ManualTrigger::new();
    controller.attach_trigger(&mut trigger, SentinelHandle::new(7));
    assert!(trigger.fire());

    assert_eq!(controller.state(), before);
    assert!(!controller.state().is_loading_more);
    assert_eq!(fetcher.call_count(), 1);
}

#[tokio::test]
async fn repeated_sentinel_while_loading_fetches_once() {
    let fetcher = GatedFetcher::new();
    let controller = controller(fetcher.clone(), Role::Admin, "me");

    let initial = tokio::spawn({
        let controller = controller.clone();
        async move { controller.refresh().await }
    });
    fetcher.wait_for_calls(1).await;

    // Still loading page 1: sentinel is ignored
    assert!(!controller.on_sentinel_visible());

    fetcher.respond(0, Ok(page(&["a"], 1, 2, 2)));
    initial.await.unwrap();

    let mut trigger = ManualTrigger::new();
    controller.attach_trigger(&mut trigger, SentinelHandle::new(1));
    trigger.fire();
    trigger.fire();
    trigger.fire();
    fetcher.wait_for_calls(2).await;
    assert_eq!(fetcher.call_count(), 2);

    fetcher.respond(1, Ok(page(&["b"], 2, 2, 2)));
    let state = controller.settled().await;
    assert_eq!(state.items, vec!["a", "b"]);

    controller.detach_trigger(&mut trigger);
    assert!(!trigger.is_observing());
}

#[tokio::test]
async fn auth_failure_keeps_items() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok(page(&["a", "b"], 1, 1, 2)),
        Err(FetchError::Auth("session expired".into())),
    ]);
    let controller = controller(fetcher.clone(), Role::Admin, "me");

    controller.refresh().await;
    controller.refresh().await;

    let state = controller.state();
    assert_eq!(state.last_error, Some(FetchError::Auth("session expired".into())));
    assert!(state.requires_login());
    assert!(!state.is_loading_initial);
    assert_eq!(state.items, vec!["a", "b"]);
}

#[tokio::test]
async fn failed_reset_blocks_continuation_until_next_reset() {
    let fetcher = ScriptedFetcher::new(vec![
        Ok(page(&["a"], 1, 3, 3)),
        Err(FetchError::Server {
            status: 500,
            message: "boom".into(),
        }),
        Ok(page(&["a"], 1, 3, 3)),
    ]);
    let controller = controller(fetcher.clone(), Role::Admin, "me");

    controller.refresh().await;
    controller.refresh().await;
    assert!(!controller.state().has_more());
    assert!(!controller.on_sentinel_visible());

    controller.refresh().await;
    let state = controller.state();
    assert!(state.has_more());
    assert_eq!(state.last_error, None);
}
