//! Search-backend event retrieval.
//!
//! `EsStore` runs a source-built query against every index partition the
//! time selector resolves to, paginating with from/size until the reported
//! hit total is exhausted. Retrieval failures surface as [`StoreError`];
//! the situation core never sees this layer.

use serde_json::{json, Value};
use tracing::{debug, info};
use url::Url;

use crate::error::StoreError;
use crate::source::{EventSource, TimeSelector};

const DEFAULT_PAGE_SIZE: usize = 20;

/// Event store backed by an Elasticsearch-compatible search API.
#[derive(Debug, Clone)]
pub struct EsStore {
    client: reqwest::Client,
    hosts: Vec<Url>,
    page_size: usize,
}

impl EsStore {
    /// Validate host URLs and build a store handle.
    pub fn new<I, S>(hosts: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let hosts = hosts
            .into_iter()
            .map(|host| {
                Url::parse(host.as_ref()).map_err(|e| StoreError::InvalidHost {
                    host: host.as_ref().to_string(),
                    message: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if hosts.is_empty() {
            return Err(StoreError::NoHosts);
        }
        Ok(Self {
            client: reqwest::Client::new(),
            hosts,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Retrieve and decode every event matching `query` within the indices
    /// covered by `selector`.
    ///
    /// Indices absent from the backend (rotated out or not yet created) are
    /// skipped; any other non-success status is an error.
    pub async fn search<S: EventSource>(
        &self,
        source: &S,
        query: &S::Query,
        selector: &TimeSelector,
    ) -> Result<Vec<S::Message>, StoreError> {
        let query_body = source.build_query(query);
        let mut messages = Vec::new();
        for index in source.resolve_partitions(selector) {
            self.search_index(source, &index, &query_body, &mut messages)
                .await?;
        }
        info!(count = messages.len(), "search done");
        Ok(messages)
    }

    async fn search_index<S: EventSource>(
        &self,
        source: &S,
        index: &str,
        query_body: &Value,
        messages: &mut Vec<S::Message>,
    ) -> Result<(), StoreError> {
        let mut from = 0usize;
        loop {
            debug!(index, from, size = self.page_size, "searching page");
            let Some(response) = self.fetch_page(index, query_body, from).await? else {
                debug!(index, "index not present, skipping");
                return Ok(());
            };

            let total = response["hits"]["total"]["value"].as_u64().ok_or_else(|| {
                StoreError::UnexpectedResponse("missing hits.total.value".to_string())
            })? as usize;
            let hits = response["hits"]["hits"].as_array().ok_or_else(|| {
                StoreError::UnexpectedResponse("missing hits.hits".to_string())
            })?;
            debug!(index, total, page_hits = hits.len(), "got page");

            for hit in hits {
                let doc = hit.get("_source").ok_or_else(|| {
                    StoreError::UnexpectedResponse("hit without _source".to_string())
                })?;
                match source.parse_event(doc) {
                    Ok(message) => messages.push(message),
                    Err(e) => {
                        // One undecodable document should not abort a batch
                        // retrieval spanning months of indices.
                        tracing::warn!(index, error = %e, "skipping undecodable event document");
                    }
                }
            }

            from += hits.len();
            if from >= total || hits.is_empty() {
                return Ok(());
            }
        }
    }

    /// POST one search page. `Ok(None)` means the index does not exist.
    async fn fetch_page(
        &self,
        index: &str,
        query_body: &Value,
        from: usize,
    ) -> Result<Option<Value>, StoreError> {
        // Hosts are tried in order; the first reachable one wins.
        let mut last_error = None;
        for host in &self.hosts {
            let url = match host.join(&format!("{index}/_search")) {
                Ok(url) => url,
                Err(e) => {
                    return Err(StoreError::InvalidHost {
                        host: host.to_string(),
                        message: e.to_string(),
                    })
                }
            };
            let mut body = json!({
                "size": self.page_size,
                "from": from,
            });
            merge_body(&mut body, query_body);

            let response = match self.client.post(url).json(&body).send().await {
                Ok(response) => response,
                Err(e) => {
                    last_error = Some(StoreError::Request(e));
                    continue;
                }
            };
            if response.status() == reqwest::StatusCode::NOT_FOUND {
                return Ok(None);
            }
            if !response.status().is_success() {
                return Err(StoreError::Status {
                    index: index.to_string(),
                    status: response.status().as_u16(),
                });
            }
            return Ok(Some(response.json::<Value>().await?));
        }
        Err(last_error.unwrap_or(StoreError::NoHosts))
    }
}

fn merge_body(body: &mut Value, query_body: &Value) {
    if let (Some(target), Some(extra)) = (body.as_object_mut(), query_body.as_object()) {
        for (key, value) in extra {
            target.insert(key.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_host() {
        assert!(matches!(
            EsStore::new(["not a url"]),
            Err(StoreError::InvalidHost { .. })
        ));
    }

    #[test]
    fn test_new_rejects_empty_hosts() {
        let hosts: Vec<String> = vec![];
        assert!(matches!(EsStore::new(hosts), Err(StoreError::NoHosts)));
    }

    #[test]
    fn test_merge_body_keeps_paging_keys() {
        let mut body = json!({"size": 10, "from": 0});
        merge_body(&mut body, &json!({"query": {"match_all": {}}}));
        assert_eq!(body["size"], 10);
        assert_eq!(body["from"], 0);
        assert!(body["query"]["match_all"].is_object());
    }
}
