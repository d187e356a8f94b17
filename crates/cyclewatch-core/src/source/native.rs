//! Native production-event source.
//!
//! Cyclewatch's own message-bus schema: envelope documents
//! `{type, time, data: {...}}` stored in monthly `prod-event-%Y-%m` indices.

use serde_json::{json, Value};

use crate::error::SourceError;
use crate::message::{EventStatus, ProductionEventMessage};

use super::{dedup_indices, parse_time, str_field, EventSource, ProductionQuery, TimeSelector};

#[derive(Debug, Clone, Copy, Default)]
pub struct NativeProductionSource;

impl NativeProductionSource {
    pub fn new() -> Self {
        Self
    }
}

impl EventSource for NativeProductionSource {
    type Query = ProductionQuery;
    type Message = ProductionEventMessage;

    fn build_query(&self, query: &ProductionQuery) -> Value {
        let mut conditions = vec![json!({"term": {"data.system": query.system}})];
        if let Some(production_type) = &query.production_type {
            conditions.push(json!({"term": {"data.type": production_type}}));
        }
        if let Some(stream) = &query.stream {
            conditions.push(json!({"term": {"data.stream": stream}}));
        }
        if let Some(name) = &query.production_name {
            conditions.push(json!({"term": {"data.name": name}}));
        }
        match &query.start_time {
            Some(TimeSelector::Single(t)) => {
                conditions.push(json!({"term": {"data.start_time": t.to_rfc3339()}}));
            }
            Some(TimeSelector::Range(start, end)) => {
                conditions.push(json!({
                    "range": {
                        "data.start_time": {
                            "gte": start.to_rfc3339(),
                            "lte": end.to_rfc3339(),
                        }
                    }
                }));
            }
            Some(TimeSelector::List(times)) => {
                let times: Vec<String> = times.iter().map(|t| t.to_rfc3339()).collect();
                conditions.push(json!({"terms": {"data.start_time": times}}));
            }
            None => {}
        }
        if let Some(forecast_time) = &query.forecast_time {
            conditions.push(json!({"term": {"data.forecast_time": forecast_time}}));
        }

        json!({
            "query": {
                "bool": {
                    "filter": conditions,
                },
            },
            "sort": [
                {"time": "asc"},
            ],
        })
    }

    fn resolve_partitions(&self, selector: &TimeSelector) -> Vec<String> {
        dedup_indices(
            selector
                .days()
                .iter()
                .map(|d| d.format("prod-event-%Y-%m").to_string())
                .collect(),
        )
    }

    fn parse_event(&self, doc: &Value) -> Result<ProductionEventMessage, SourceError> {
        let data = doc.get("data").ok_or_else(|| SourceError::missing("data"))?;
        let status_code = data
            .get("status")
            .and_then(Value::as_i64)
            .ok_or_else(|| SourceError::missing("data.status"))?;
        let forecast_time = str_field(data, "forecast_time")?;

        Ok(ProductionEventMessage {
            system: str_field(data, "system")?.to_string(),
            stream: str_field(data, "stream")?.to_string(),
            production_type: str_field(data, "type")?.to_string(),
            production_name: str_field(data, "name")?.to_string(),
            event: str_field(data, "event")?.to_string(),
            status: EventStatus::from_code(status_code),
            start_time: parse_time(str_field(data, "start_time")?, "data.start_time")?,
            forecast_hours: parse_forecast_hours(forecast_time)?,
            time: parse_time(str_field(doc, "time")?, "time")?,
        })
    }
}

/// Parse a lead-time string like `"036h"` into whole hours.
fn parse_forecast_hours(raw: &str) -> Result<i64, SourceError> {
    raw.strip_suffix('h')
        .and_then(|hours| hours.parse::<i64>().ok())
        .ok_or_else(|| {
            SourceError::invalid("data.forecast_time", format!("not an hour duration: {raw}"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn sample_doc() -> Value {
        json!({
            "type": "production",
            "time": "2024-03-01T06:14:28.123+00:00",
            "data": {
                "system": "nwp_gfs",
                "stream": "oper",
                "type": "grib2",
                "name": "orig",
                "event": "before_upload",
                "status": 1,
                "start_time": "2024-03-01T00:00:00+00:00",
                "forecast_time": "036h",
            },
        })
    }

    #[test]
    fn test_parse_event() {
        let message = NativeProductionSource.parse_event(&sample_doc()).unwrap();
        assert_eq!(message.system, "nwp_gfs");
        assert_eq!(message.status, EventStatus::Complete);
        assert_eq!(message.forecast_hours, 36);
        assert_eq!(
            message.start_time,
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_event_missing_field() {
        let mut doc = sample_doc();
        doc["data"].as_object_mut().unwrap().remove("system");
        let err = NativeProductionSource.parse_event(&doc).unwrap_err();
        assert!(err.to_string().contains("system"));
    }

    #[test]
    fn test_parse_event_bad_forecast_time() {
        let mut doc = sample_doc();
        doc["data"]["forecast_time"] = json!("tomorrow");
        assert!(NativeProductionSource.parse_event(&doc).is_err());
    }

    #[test]
    fn test_build_query_filters() {
        let query = ProductionQuery {
            system: "nwp_gfs".to_string(),
            stream: Some("oper".to_string()),
            production_type: Some("grib2".to_string()),
            production_name: Some("orig".to_string()),
            start_time: Some(TimeSelector::Range(
                Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap(),
            )),
            forecast_time: None,
        };
        let body = NativeProductionSource.build_query(&query);
        let filters = body["query"]["bool"]["filter"].as_array().unwrap();
        assert_eq!(filters.len(), 5);
        assert_eq!(filters[0]["term"]["data.system"], "nwp_gfs");
        assert!(filters[4]["range"]["data.start_time"]["gte"]
            .as_str()
            .unwrap()
            .starts_with("2024-03-01"));
        assert_eq!(body["sort"][0]["time"], "asc");
    }

    #[test]
    fn test_resolve_partitions_monthly() {
        let selector = TimeSelector::Range(
            Utc.with_ymd_and_hms(2024, 3, 30, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 4, 2, 0, 0, 0).unwrap(),
        );
        assert_eq!(
            NativeProductionSource.resolve_partitions(&selector),
            vec!["prod-event-2024-03".to_string(), "prod-event-2024-04".to_string()]
        );
    }
}
