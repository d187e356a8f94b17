//! Workflow-scheduler client source.
//!
//! One document per scheduler command, in envelope shape
//! `{type, time, data: {...}}`, stored in daily `scheduler-client-%Y-%m-%d`
//! indices. Run dates are 8-digit strings in the documents and in the query
//! terms.

use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::error::SourceError;
use crate::message::SchedulerClientMessage;

use super::{parse_time, str_field, EventSource, TimeSelector};

/// Query parameters for scheduler-client retrieval.
#[derive(Debug, Clone, Default)]
pub struct SchedulerClientQuery {
    pub node_path: String,
    pub host: Option<String>,
    pub port: Option<String>,
    pub run_date: Option<TimeSelector>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SchedulerClientSource;

impl SchedulerClientSource {
    pub fn new() -> Self {
        Self
    }
}

impl EventSource for SchedulerClientSource {
    type Query = SchedulerClientQuery;
    type Message = SchedulerClientMessage;

    fn build_query(&self, query: &SchedulerClientQuery) -> Value {
        let mut conditions = vec![json!({"term": {"data.node_path.keyword": query.node_path}})];
        if let Some(host) = &query.host {
            conditions.push(json!({"term": {"data.host": host}}));
        }
        if let Some(port) = &query.port {
            conditions.push(json!({"term": {"data.port": port}}));
        }
        match &query.run_date {
            Some(TimeSelector::Single(d)) => {
                conditions.push(json!({"term": {"data.run_date": d.format("%Y%m%d").to_string()}}));
            }
            Some(TimeSelector::Range(start, end)) => {
                conditions.push(json!({
                    "range": {
                        "data.run_date": {
                            "gte": start.format("%Y%m%d").to_string(),
                            "lte": end.format("%Y%m%d").to_string(),
                        }
                    }
                }));
            }
            Some(TimeSelector::List(dates)) => {
                let dates: Vec<String> = dates
                    .iter()
                    .map(|d| d.format("%Y%m%d").to_string())
                    .collect();
                conditions.push(json!({"terms": {"data.run_date": dates}}));
            }
            None => {}
        }

        json!({
            "query": {
                "bool": {
                    "filter": conditions,
                },
            },
        })
    }

    fn resolve_partitions(&self, selector: &TimeSelector) -> Vec<String> {
        selector
            .days()
            .iter()
            .map(|d| d.format("scheduler-client-%Y-%m-%d").to_string())
            .collect()
    }

    fn parse_event(&self, doc: &Value) -> Result<SchedulerClientMessage, SourceError> {
        let data = doc.get("data").ok_or_else(|| SourceError::missing("data"))?;
        let arguments = data
            .get("args")
            .and_then(Value::as_array)
            .map(|args| {
                args.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        // try_no arrives as a string and is not always numeric.
        let try_no = data
            .get("try_no")
            .and_then(Value::as_str)
            .and_then(|raw| raw.parse::<u32>().ok());
        let run_date_raw = str_field(data, "run_date")?;
        let run_date = NaiveDate::parse_from_str(run_date_raw, "%Y%m%d")
            .map_err(|e| SourceError::invalid("data.run_date", e.to_string()))?;

        Ok(SchedulerClientMessage {
            command: str_field(data, "command")?.to_string(),
            arguments,
            time: parse_time(str_field(doc, "time")?, "time")?,
            host: str_field(data, "host")?.to_string(),
            port: str_field(data, "port")?.to_string(),
            node_path: str_field(data, "node_path")?.to_string(),
            node_rid: str_field(data, "node_rid")?.to_string(),
            try_no,
            run_date,
        })
    }
}
