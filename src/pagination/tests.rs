//! Tests for the paginator driver.

use super::*;
use crate::test_support::ScriptedTransport;
use futures::TryStreamExt;
use pretty_assertions::assert_eq;
use serde_json::json;

fn items(range: std::ops::Range<u64>) -> Value {
    Value::Array(range.map(|id| json!({"id": id})).collect())
}

fn ids(values: &[Value]) -> Vec<u64> {
    values.iter().filter_map(|v| v["id"].as_u64()).collect()
}

#[tokio::test]
async fn test_offset_stops_on_has_more_false() {
    let transport = ScriptedTransport::new()
        .on_get("users.json", json!({"users": items(0..3), "has_more": false}))
        .into_arc();

    let paginator: OffsetPaginator<Value> =
        Paginator::offset(transport.clone(), "users.json", "users", 100);
    let users = paginator.collect().await.unwrap();

    assert_eq!(ids(&users), vec![0, 1, 2]);
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn test_offset_count_fetches_exact_pages() {
    let transport = ScriptedTransport::new()
        .on_get("tickets.json", json!({"tickets": items(0..100), "count": 250}))
        .on_get("tickets.json", json!({"tickets": items(100..200), "count": 250}))
        .on_get("tickets.json", json!({"tickets": items(200..250), "count": 250}))
        .into_arc();

    let paginator: OffsetPaginator<Value> =
        Paginator::offset(transport.clone(), "tickets.json", "tickets", 100);
    let tickets = paginator.collect().await.unwrap();

    assert_eq!(tickets.len(), 250);
    let pages: Vec<String> = transport
        .calls()
        .iter()
        .map(|call| call.params["page"].clone())
        .collect();
    assert_eq!(pages, vec!["1", "2", "3"]);
    assert!(transport
        .calls()
        .iter()
        .all(|call| call.params["per_page"] == "100"));
}

#[tokio::test]
async fn test_offset_fallback_fetches_one_empty_page() {
    let transport = ScriptedTransport::new()
        .on_get("organizations.json", json!({"organizations": items(0..2)}))
        .on_get("organizations.json", json!({"organizations": []}))
        .into_arc();

    let paginator: OffsetPaginator<Value> =
        Paginator::offset(transport.clone(), "organizations.json", "organizations", 100);
    let orgs = paginator.collect().await.unwrap();

    assert_eq!(orgs.len(), 2);
    assert_eq!(transport.calls().len(), 2);
}

#[tokio::test]
async fn test_missing_items_key_reads_as_empty_page() {
    let transport = ScriptedTransport::new()
        .on_get("tickets.json", json!({"ticket": {"id": 1}}))
        .into_arc();

    let mut paginator: OffsetPaginator<Value> =
        Paginator::offset(transport.clone(), "tickets.json", "tickets", 100);
    let page = paginator.get_page(None).await.unwrap();

    assert!(page.is_empty());
    assert!(!paginator.has_more());
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn test_cursor_chaining() {
    let transport = ScriptedTransport::new()
        .on_get(
            "incremental/tickets/cursor.json",
            json!({"tickets": items(0..2), "next_cursor": "abc"}),
        )
        .on_get(
            "incremental/tickets/cursor.json",
            json!({"tickets": items(2..3)}),
        )
        .into_arc();

    let paginator: CursorPaginator<Value> = Paginator::cursor(
        transport.clone(),
        "incremental/tickets/cursor.json",
        "tickets",
        100,
    )
    .with_params(crate::transport::query([("start_time", 0)]));
    let tickets = paginator.collect().await.unwrap();

    assert_eq!(ids(&tickets), vec![0, 1, 2]);
    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    assert!(!calls[0].params.contains_key("cursor"));
    assert_eq!(calls[1].params.get("cursor").map(String::as_str), Some("abc"));
    assert_eq!(calls[1].params.get("start_time").map(String::as_str), Some("0"));
}

#[tokio::test]
async fn test_export_envelope() {
    let transport = ScriptedTransport::new()
        .on_get(
            EXPORT_PATH,
            json!({
                "results": items(0..2),
                "links": {"next": "https://acme.zendesk.com/api/v2/search/export.json?page[after]=c1"},
                "meta": {"after_cursor": "c1", "has_more": true}
            }),
        )
        .on_get(
            EXPORT_PATH,
            json!({
                "results": items(2..4),
                "links": {"next": null},
                "meta": {"after_cursor": null, "has_more": false}
            }),
        )
        .into_arc();

    let paginator: ExportCursorPaginator<Value> =
        Paginator::export(transport.clone(), "status:open", "ticket", 2);
    let results = paginator.collect().await.unwrap();

    assert_eq!(ids(&results), vec![0, 1, 2, 3]);
    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    assert!(!calls[0].params.contains_key("page[after]"));
    assert_eq!(calls[1].params.get("page[after]").map(String::as_str), Some("c1"));
    assert!(!calls[1].params.contains_key("cursor"));
    for call in &calls {
        assert_eq!(call.params["query"], "status:open");
        assert_eq!(call.params["filter[type]"], "ticket");
        assert_eq!(call.params["page[size]"], "2");
    }
}

#[tokio::test]
async fn test_search_422_ends_stream_gracefully() {
    let mut transport = ScriptedTransport::new();
    for page in 0..10u64 {
        transport = transport.on_get(
            "search.json",
            json!({"results": items(page * 100..page * 100 + 100), "count": 5000}),
        );
    }
    let transport = transport.fail_on_get("search.json", 422).into_arc();

    let paginator: OffsetPaginator<Value> =
        Paginator::offset(transport.clone(), "search.json", "results", 100)
            .ending_on_result_window();
    let results = paginator.collect().await.unwrap();

    assert_eq!(results.len(), 1000);
    assert_eq!(transport.calls().len(), 11);
    assert_eq!(transport.calls()[10].params["page"], "11");
}

#[tokio::test]
async fn test_search_404_is_raised_with_context() {
    let transport = ScriptedTransport::new()
        .on_get("search.json", json!({"results": items(0..10), "count": 100}))
        .on_get("search.json", json!({"results": items(10..20), "count": 100}))
        .fail_on_get("search.json", 404)
        .into_arc();

    let paginator: OffsetPaginator<Value> =
        Paginator::offset(transport.clone(), "search.json", "results", 10)
            .ending_on_result_window();
    let mut stream = paginator.iterate();

    let mut seen = 0;
    let err = loop {
        match stream.try_next().await {
            Ok(Some(_)) => seen += 1,
            Ok(None) => panic!("expected an error"),
            Err(e) => break e,
        }
    };

    assert_eq!(seen, 20);
    match err {
        ZendeskError::Pagination { context, source } => {
            assert_eq!(context.page, Some(3));
            assert_eq!(context.path, "search.json");
            assert_eq!(source.status_code(), Some(404));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(stream.try_next().await.unwrap().is_none());
}

#[tokio::test]
async fn test_422_is_an_error_outside_search() {
    let transport = ScriptedTransport::new()
        .fail_on_get("users.json", 422)
        .into_arc();

    let paginator: OffsetPaginator<Value> =
        Paginator::offset(transport, "users.json", "users", 100);
    let err = paginator.collect().await.unwrap_err();
    assert!(err.is_result_window_limit());
}

#[tokio::test]
async fn test_limit_short_circuits() {
    let transport = ScriptedTransport::new()
        .on_get("users.json", json!({"users": items(0..10), "has_more": true}))
        .on_get("users.json", json!({"users": items(10..20), "has_more": true}))
        .into_arc();

    let paginator: OffsetPaginator<Value> =
        Paginator::offset(transport.clone(), "users.json", "users", 10).with_limit(5);
    let users = paginator.collect().await.unwrap();

    assert_eq!(ids(&users), vec![0, 1, 2, 3, 4]);
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn test_zero_limit_fetches_nothing() {
    let transport = ScriptedTransport::new().into_arc();

    let paginator: OffsetPaginator<Value> =
        Paginator::offset(transport.clone(), "users.json", "users", 10).with_limit(0);
    assert!(paginator.collect().await.unwrap().is_empty());
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn test_get_page_jumps_for_offset() {
    let transport = ScriptedTransport::new()
        .on_get("users.json", json!({"users": items(40..50), "count": 100}))
        .into_arc();

    let mut paginator: OffsetPaginator<Value> =
        Paginator::offset(transport.clone(), "users.json", "users", 10);
    let page = paginator.get_page(Some(5)).await.unwrap();

    assert_eq!(page.len(), 10);
    assert_eq!(transport.calls()[0].params["page"], "5");
    let info = paginator.pagination_info().unwrap();
    assert_eq!(info.page, Some(5));
    assert_eq!(info.count, Some(100));
    assert!(paginator.has_more());
}

#[tokio::test]
async fn test_get_page_does_not_advance() {
    let transport = ScriptedTransport::new()
        .on_get("users.json", json!({"users": items(0..10), "count": 30}))
        .on_get("users.json", json!({"users": items(0..10), "count": 30}))
        .into_arc();

    let mut paginator: OffsetPaginator<Value> =
        Paginator::offset(transport.clone(), "users.json", "users", 10);
    paginator.get_page(None).await.unwrap();
    paginator.get_page(None).await.unwrap();

    let pages: Vec<String> = transport
        .calls()
        .iter()
        .map(|call| call.params["page"].clone())
        .collect();
    assert_eq!(pages, vec!["1", "1"]);
}

#[tokio::test]
async fn test_cursor_rejects_page_jump() {
    let transport = ScriptedTransport::new().into_arc();
    let mut paginator: CursorPaginator<Value> =
        Paginator::cursor(transport.clone(), "incremental/users.json", "users", 100);

    let err = paginator.get_page(Some(2)).await.unwrap_err();
    assert!(matches!(err, ZendeskError::Validation(_)));
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn test_result_type_filter_and_decode() {
    #[derive(serde::Deserialize)]
    struct Row {
        id: u64,
    }

    let transport = ScriptedTransport::new()
        .on_get(
            "search.json",
            json!({
                "results": [
                    {"id": 1, "result_type": "ticket"},
                    {"id": 2, "result_type": "user"},
                    {"id": 3, "result_type": "ticket"}
                ],
                "count": 3
            }),
        )
        .into_arc();

    let paginator: OffsetPaginator<Row> =
        Paginator::offset(transport, "search.json", "results", 100).with_result_type("ticket");
    let rows = paginator.collect().await.unwrap();

    assert_eq!(rows.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 3]);
}

#[tokio::test]
async fn test_pages_yields_each_page() {
    let transport = ScriptedTransport::new()
        .on_get("tickets.json", json!({"tickets": items(0..2), "count": 3}))
        .on_get("tickets.json", json!({"tickets": items(2..3), "count": 3}))
        .into_arc();

    let paginator: OffsetPaginator<Value> =
        Paginator::offset(transport, "tickets.json", "tickets", 2);
    let pages: Vec<Vec<Value>> = paginator.pages().try_collect().await.unwrap();

    assert_eq!(pages.len(), 2);
    assert_eq!(ids(&pages[1]), vec![2]);
}

#[test]
fn test_cursor_has_more_rule() {
    assert!(cursor_has_more(false, None, None));
    assert!(cursor_has_more(true, None, Some("c")));
    assert!(cursor_has_more(true, Some(true), Some("c")));
    assert!(!cursor_has_more(true, Some(true), None));
    assert!(!cursor_has_more(true, Some(false), Some("c")));
}
