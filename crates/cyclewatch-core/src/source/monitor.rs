//! Legacy ops-monitor production-event source.
//!
//! Flat documents `{source, datetime, status, startTime, forecastTime}` in
//! monthly `monitor-prod-%Y-%m` indices. The monitor only records upload
//! events for the operational grib2 stream, so several message fields are
//! fixed. System names differ from the native schema and are mapped through
//! [`EventSource::canonical_system`].

use serde_json::{json, Value};

use crate::error::SourceError;
use crate::message::{EventStatus, ProductionEventMessage};

use super::{dedup_indices, parse_time, str_field, EventSource, ProductionQuery, TimeSelector};

#[derive(Debug, Clone, Copy, Default)]
pub struct MonitorProductionSource;

impl MonitorProductionSource {
    pub fn new() -> Self {
        Self
    }
}

impl EventSource for MonitorProductionSource {
    type Query = ProductionQuery;
    type Message = ProductionEventMessage;

    fn build_query(&self, query: &ProductionQuery) -> Value {
        // The monitor schema has no stream/type/name fields to filter on.
        let mut conditions = vec![json!({"term": {"source": query.system}})];
        match &query.start_time {
            Some(TimeSelector::Single(t)) => {
                conditions.push(json!({"term": {"startTime": t.to_rfc3339()}}));
            }
            Some(TimeSelector::Range(start, end)) => {
                conditions.push(json!({
                    "range": {
                        "startTime": {
                            "gte": start.to_rfc3339(),
                            "lte": end.to_rfc3339(),
                        }
                    }
                }));
            }
            Some(TimeSelector::List(times)) => {
                let times: Vec<String> = times.iter().map(|t| t.to_rfc3339()).collect();
                conditions.push(json!({"terms": {"startTime": times}}));
            }
            None => {}
        }

        json!({
            "query": {
                "bool": {
                    "filter": conditions,
                },
            },
            "sort": [
                {"datetime": "asc"},
            ],
        })
    }

    fn resolve_partitions(&self, selector: &TimeSelector) -> Vec<String> {
        dedup_indices(
            selector
                .days()
                .iter()
                .map(|d| d.format("monitor-prod-%Y-%m").to_string())
                .collect(),
        )
    }

    fn parse_event(&self, doc: &Value) -> Result<ProductionEventMessage, SourceError> {
        let status = match str_field(doc, "status")? {
            "0" => EventStatus::Complete,
            _ => EventStatus::Unknown,
        };
        let forecast_hours = doc
            .get("forecastTime")
            .and_then(Value::as_i64)
            .ok_or_else(|| SourceError::missing("forecastTime"))?;

        Ok(ProductionEventMessage {
            system: str_field(doc, "source")?.to_string(),
            stream: "oper".to_string(),
            production_type: "grib2".to_string(),
            production_name: "orig".to_string(),
            event: "before_upload".to_string(),
            status,
            start_time: parse_time(str_field(doc, "startTime")?, "startTime")?,
            forecast_hours,
            time: parse_time(str_field(doc, "datetime")?, "datetime")?,
        })
    }

    fn canonical_system(&self, system: &str) -> String {
        match system {
            "gfs_gmf" => "nwp_gfs",
            "meso_10km" => "nwp_meso_10km",
            "meso_3km" => "nwp_meso_3km",
            other => other,
        }
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn sample_doc() -> Value {
        json!({
            "source": "nwp_gfs",
            "datetime": "2024-03-01T06:14:28+00:00",
            "status": "0",
            "startTime": "2024-03-01T00:00:00+00:00",
            "forecastTime": 36,
        })
    }

    #[test]
    fn test_parse_event_fills_fixed_fields() {
        let message = MonitorProductionSource.parse_event(&sample_doc()).unwrap();
        assert_eq!(message.system, "nwp_gfs");
        assert_eq!(message.stream, "oper");
        assert_eq!(message.production_type, "grib2");
        assert_eq!(message.production_name, "orig");
        assert_eq!(message.event, "before_upload");
        assert_eq!(message.status, EventStatus::Complete);
        assert_eq!(message.forecast_hours, 36);
    }

    #[test]
    fn test_parse_event_non_zero_status_is_unknown() {
        let mut doc = sample_doc();
        doc["status"] = json!("2");
        let message = MonitorProductionSource.parse_event(&doc).unwrap();
        assert_eq!(message.status, EventStatus::Unknown);
    }

    #[test]
    fn test_build_query_single_start_time() {
        let query = ProductionQuery {
            system: "nwp_gfs".to_string(),
            start_time: Some(TimeSelector::Single(
                Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            )),
            ..ProductionQuery::default()
        };
        let body = MonitorProductionSource.build_query(&query);
        let filters = body["query"]["bool"]["filter"].as_array().unwrap();
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0]["term"]["source"], "nwp_gfs");
        assert_eq!(body["sort"][0]["datetime"], "asc");
    }

    #[test]
    fn test_canonical_system_mapping() {
        let source = MonitorProductionSource;
        assert_eq!(source.canonical_system("gfs_gmf"), "nwp_gfs");
        assert_eq!(source.canonical_system("meso_3km"), "nwp_meso_3km");
        assert_eq!(source.canonical_system("nwp_gfs"), "nwp_gfs");
    }

    #[test]
    fn test_resolve_partitions() {
        let selector =
            TimeSelector::Single(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        assert_eq!(
            MonitorProductionSource.resolve_partitions(&selector),
            vec!["monitor-prod-2024-03".to_string()]
        );
    }
}
