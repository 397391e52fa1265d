//! HTTP front of the ledger, compatible with the receipt client: `POST /`
//! with a JSON body of `date`, `restaurant` and `amount`, answered in plain
//! text.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use libreceipt::{display_amount, Ledger, Outcome, RawEntry, Table, FAILURE_MESSAGE};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error};

#[derive(Debug, Default, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub date: String,
    #[serde(default, alias = "payee")]
    pub restaurant: String,
    #[serde(default)]
    pub amount: String,
}

pub fn app<T: Table + 'static>(ledger: Arc<Ledger<T>>) -> Router {
    Router::new()
        .route("/", post(submit::<T>))
        .route("/total", get(total::<T>))
        .with_state(ledger)
}

async fn submit<T: Table + 'static>(
    State(ledger): State<Arc<Ledger<T>>>,
    Json(submission): Json<Submission>,
) -> (StatusCode, String) {
    debug!(?submission, "received submission");

    // the ledger lock is held across file I/O
    let outcome = tokio::task::spawn_blocking(move || {
        ledger.submit_entry(&RawEntry::new(
            &submission.date,
            &submission.restaurant,
            &submission.amount,
        ))
    })
    .await;

    match outcome {
        Ok(outcome @ Outcome::Failed(_)) => (StatusCode::INTERNAL_SERVER_ERROR, outcome.to_string()),
        Ok(outcome) => (StatusCode::OK, outcome.to_string()),
        Err(e) => {
            error!(error = %e, "submission task died");
            (StatusCode::INTERNAL_SERVER_ERROR, FAILURE_MESSAGE.to_string())
        }
    }
}

async fn total<T: Table + 'static>(State(ledger): State<Arc<Ledger<T>>>) -> (StatusCode, String) {
    match tokio::task::spawn_blocking(move || ledger.total()).await {
        Ok(Ok(total)) => (StatusCode::OK, display_amount(total)),
        Ok(Err(e)) => {
            error!(error = %e, "cannot read running total");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
        Err(e) => {
            error!(error = %e, "total task died");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::app;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use libreceipt::{Ledger, MemoryTable};
    use std::sync::Arc;
    use tower::ServiceExt;

    use anyhow::Result;

    fn router() -> Result<(Router, MemoryTable)> {
        let table = MemoryTable::new();
        let ledger = Ledger::open(table.clone(), 2024)?;
        Ok((app(Arc::new(ledger)), table))
    }

    async fn send(router: &Router, request: Request<Body>) -> Result<(StatusCode, String)> {
        let response = router.clone().oneshot(request).await?;
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await?;
        Ok((status, String::from_utf8(body.to_vec())?))
    }

    fn post(json: &str) -> Result<Request<Body>> {
        Ok(Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))?)
    }

    #[tokio::test]
    async fn test_submit_receipts() -> Result<()> {
        let (router, table) = router()?;

        let (status, body) = send(
            &router,
            post(r#"{"date": "01-15", "restaurant": "Cafe A", "amount": "12.50"}"#)?,
        )
        .await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK. Running total: 12.50");

        let (_, body) = send(
            &router,
            post(r#"{"date": "01-20", "payee": "Cafe B", "amount": "7.49"}"#)?,
        )
        .await?;
        assert_eq!(body, "OK. Running total: 19.99");

        let saved = table.saved().ok_or(anyhow::anyhow!("nothing saved"))?;
        assert_eq!(saved.rows("jan")?.len(), 2);

        let request = Request::builder().uri("/total").body(Body::empty())?;
        let (status, body) = send(&router, request).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "19.99");
        Ok(())
    }

    #[tokio::test]
    async fn test_submit_invalid() -> Result<()> {
        let (router, _) = router()?;

        let (status, body) = send(
            &router,
            post(r#"{"date": "13-01", "restaurant": "Cafe A", "amount": "1"}"#)?,
        )
        .await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Invalid date format. Please use mm-dd");

        let (_, body) = send(&router, post(r#"{"date": "01-01", "restaurant": "Cafe A"}"#)?).await?;
        assert_eq!(body, "Cannot read Amount");

        let (_, body) = send(
            &router,
            post(r#"{"date": "01-01", "restaurant": "Cafe A", "amount": "1_000"}"#)?,
        )
        .await?;
        assert_eq!(body, "Cannot read Amount");

        let (status, _) = send(&router, post("not json")?).await?;
        assert!(status.is_client_error());
        Ok(())
    }

    #[tokio::test]
    async fn test_storage_failure() -> Result<()> {
        let (router, table) = router()?;
        table.fail_saves(true);

        let (status, body) = send(
            &router,
            post(r#"{"date": "02-02", "restaurant": "Cafe A", "amount": "1"}"#)?,
        )
        .await?;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, libreceipt::FAILURE_MESSAGE);
        Ok(())
    }

    #[tokio::test]
    async fn test_total_overflow_is_server_error() -> Result<()> {
        let (router, table) = router()?;
        let huge = r#"{"date": "10-01", "restaurant": "Yacht", "amount": "999999999999999999999999.99"}"#;

        let (status, _) = send(&router, post(huge)?).await?;
        assert_eq!(status, StatusCode::OK);
        let saves = table.saves();

        let (status, body) = send(&router, post(huge)?).await?;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, libreceipt::FAILURE_MESSAGE);
        assert_eq!(table.saves(), saves);
        Ok(())
    }
}
