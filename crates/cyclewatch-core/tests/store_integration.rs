//! Store retrieval tests against a mock search backend.

use chrono::{TimeZone, Utc};
use mockito::Matcher;
use serde_json::json;

use cyclewatch_core::{
    EsStore, EventStatus, NativeProductionSource, ProductionQuery, TimeSelector,
};

fn event_doc(forecast_time: &str) -> serde_json::Value {
    json!({
        "type": "production",
        "time": "2024-03-01T02:14:28+00:00",
        "data": {
            "system": "nwp_gfs",
            "stream": "oper",
            "type": "grib2",
            "name": "orig",
            "event": "before_upload",
            "status": 1,
            "start_time": "2024-03-01T00:00:00+00:00",
            "forecast_time": forecast_time,
        },
    })
}

fn search_page(total: u64, docs: &[serde_json::Value]) -> String {
    let hits: Vec<serde_json::Value> = docs.iter().map(|doc| json!({"_source": doc})).collect();
    json!({"hits": {"total": {"value": total}, "hits": hits}}).to_string()
}

fn march_selector() -> TimeSelector {
    TimeSelector::Single(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
}

fn query() -> ProductionQuery {
    ProductionQuery {
        system: "nwp_gfs".to_string(),
        ..ProductionQuery::default()
    }
}

#[tokio::test]
async fn paginates_until_total_exhausted() {
    let mut server = mockito::Server::new_async().await;
    let page1 = server
        .mock("POST", "/prod-event-2024-03/_search")
        .match_body(Matcher::PartialJson(json!({"from": 0, "size": 2})))
        .with_body(search_page(3, &[event_doc("000h"), event_doc("003h")]))
        .create_async()
        .await;
    let page2 = server
        .mock("POST", "/prod-event-2024-03/_search")
        .match_body(Matcher::PartialJson(json!({"from": 2, "size": 2})))
        .with_body(search_page(3, &[event_doc("006h")]))
        .create_async()
        .await;

    let store = EsStore::new([server.url()]).unwrap().with_page_size(2);
    let messages = store
        .search(&NativeProductionSource::new(), &query(), &march_selector())
        .await
        .unwrap();

    page1.assert_async().await;
    page2.assert_async().await;
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0].forecast_hours, 0);
    assert_eq!(messages[2].forecast_hours, 6);
    assert_eq!(messages[0].status, EventStatus::Complete);
}

#[tokio::test]
async fn query_body_carries_source_filters() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/prod-event-2024-03/_search")
        .match_body(Matcher::PartialJson(json!({
            "query": {"bool": {"filter": [{"term": {"data.system": "nwp_gfs"}}]}},
        })))
        .with_body(search_page(0, &[]))
        .create_async()
        .await;

    let store = EsStore::new([server.url()]).unwrap();
    let messages = store
        .search(&NativeProductionSource::new(), &query(), &march_selector())
        .await
        .unwrap();
    mock.assert_async().await;
    assert!(messages.is_empty());
}

#[tokio::test]
async fn missing_index_is_skipped() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/prod-event-2024-03/_search")
        .with_status(404)
        .create_async()
        .await;

    let store = EsStore::new([server.url()]).unwrap();
    let messages = store
        .search(&NativeProductionSource::new(), &query(), &march_selector())
        .await
        .unwrap();
    mock.assert_async().await;
    assert!(messages.is_empty());
}

#[tokio::test]
async fn server_error_surfaces_as_store_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/prod-event-2024-03/_search")
        .with_status(500)
        .create_async()
        .await;

    let store = EsStore::new([server.url()]).unwrap();
    let err = store
        .search(&NativeProductionSource::new(), &query(), &march_selector())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn undecodable_documents_are_skipped() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/prod-event-2024-03/_search")
        .with_body(search_page(2, &[json!({"not": "an event"}), event_doc("012h")]))
        .create_async()
        .await;

    let store = EsStore::new([server.url()]).unwrap();
    let messages = store
        .search(&NativeProductionSource::new(), &query(), &march_selector())
        .await
        .unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].forecast_hours, 12);
}
