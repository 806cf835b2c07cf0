use std::sync::Arc;

use thiserror::Error;

use super::api::{ApiError, ApiRequest, ZafClient};
use super::mock;
use super::query::{search_query, DateRange};
use super::ticket::{RawTicket, Ticket};

const SEARCH_PATH: &str = "/api/v2/search.json";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("response has no results array")]
    MissingResults,
    #[error("search returned no tickets")]
    Empty,
}

/// Where a batch of tickets came from. Simulated batches carry the reason
/// the live fetch was abandoned so the UI can say so.
#[derive(Debug, Clone)]
pub enum TicketSource {
    Live,
    Simulated { reason: String },
}

#[derive(Debug, Clone)]
pub struct TicketBatch {
    pub tickets: Vec<Ticket>,
    pub source: TicketSource,
    pub range: DateRange,
}

/// One attempt against the search API, no retry. Individual results that
/// fail to normalize are skipped; an entirely empty result set is an error
/// so the caller can decide whether to substitute synthetic data.
pub async fn fetch_tickets(
    client: &dyn ZafClient,
    range: DateRange,
) -> Result<Vec<Ticket>, FetchError> {
    let query = search_query(range);
    log::debug!("search query: {query}");

    let request = ApiRequest::get(SEARCH_PATH).with_query("query", query);
    let body = client.request(request).await?;

    let results = body
        .get("results")
        .and_then(|value| value.as_array())
        .ok_or(FetchError::MissingResults)?;

    let tickets: Vec<Ticket> = results
        .iter()
        .filter_map(|value| {
            serde_json::from_value::<RawTicket>(value.clone())
                .ok()
                .and_then(RawTicket::normalize)
        })
        .collect();

    if tickets.is_empty() {
        return Err(FetchError::Empty);
    }

    Ok(tickets)
}

/// The fallback policy, kept out of `fetch_tickets` on purpose: on any
/// fetch error the batch is rebuilt from the synthetic generator and tagged
/// `Simulated`, so downstream stages always have something to render and
/// the UI always knows which kind of data it is showing.
pub async fn load_batch(client: Arc<dyn ZafClient>, range: DateRange) -> TicketBatch {
    match fetch_tickets(client.as_ref(), range).await {
        Ok(tickets) => TicketBatch {
            tickets,
            source: TicketSource::Live,
            range,
        },
        Err(err) => {
            log::warn!("ticket fetch failed, substituting simulated data: {err}");
            TicketBatch {
                tickets: mock::generate(range),
                source: TicketSource::Simulated {
                    reason: err.to_string(),
                },
                range,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zendesk::query::validate_range;
    use crate::zendesk::ticket::{Priority, Status};
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct CannedClient {
        response: Result<Value, ApiError>,
    }

    #[async_trait]
    impl ZafClient for CannedClient {
        async fn request(&self, _request: ApiRequest) -> Result<Value, ApiError> {
            match &self.response {
                Ok(value) => Ok(value.clone()),
                Err(err) => Err(ApiError::Transport(err.to_string())),
            }
        }
    }

    #[tokio::test]
    async fn normalizes_results_and_skips_malformed_entries() {
        let client = CannedClient {
            response: Ok(json!({
                "results": [
                    {
                        "id": 1,
                        "status": "open",
                        "created_at": "2024-01-01T10:00:00Z",
                        "subject": "Printer on fire",
                        "priority": "urgent"
                    },
                    { "status": "open" },
                    {
                        "id": 2,
                        "status": "solved",
                        "created_at": "2024-01-02T09:00:00Z",
                        "subject": "Password reset"
                    }
                ]
            })),
        };

        let tickets = fetch_tickets(&client, DateRange::default()).await.unwrap();
        assert_eq!(tickets.len(), 2);
        assert_eq!(tickets[0].priority, Priority::Urgent);
        assert_eq!(tickets[1].status, Status::Solved);
        assert_eq!(tickets[1].priority, Priority::Normal);
    }

    #[tokio::test]
    async fn empty_and_malformed_responses_are_errors() {
        let empty = CannedClient {
            response: Ok(json!({ "results": [] })),
        };
        assert!(matches!(
            fetch_tickets(&empty, DateRange::default()).await,
            Err(FetchError::Empty)
        ));

        let malformed = CannedClient {
            response: Ok(json!({ "count": 3 })),
        };
        assert!(matches!(
            fetch_tickets(&malformed, DateRange::default()).await,
            Err(FetchError::MissingResults)
        ));
    }

    #[tokio::test]
    async fn load_batch_falls_back_to_simulated_data() {
        let client: Arc<dyn ZafClient> = Arc::new(CannedClient {
            response: Err(ApiError::Transport("connection refused".to_owned())),
        });

        let range = validate_range("2024-03-01", "2024-03-03").unwrap();
        let batch = load_batch(client, range).await;

        assert!(matches!(batch.source, TicketSource::Simulated { .. }));
        assert!(!batch.tickets.is_empty());
    }
}
