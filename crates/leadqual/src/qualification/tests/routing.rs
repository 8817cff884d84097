use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;

use super::common::*;
use crate::qualification::router::{
    get_offer_handler, results_handler, score_handler, set_offer_handler, upload_leads_handler,
    LeadUploadRequest, OfferSubmission,
};

async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("body is json")
}

fn submission() -> OfferSubmission {
    OfferSubmission {
        name: "Outbound Copilot".to_string(),
        value_propositions: vec!["Personalized outreach at scale".to_string()],
        ideal_use_cases: vec!["Technology companies".to_string()],
    }
}

#[tokio::test]
async fn offer_roundtrip_via_handlers() {
    let (_, service) = service(
        StaticTransport("Intent: High\nReasoning: strong fit"),
        fast_config(),
    );
    let service = Arc::new(service);

    let missing = get_offer_handler(State(service.clone())).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let created =
        set_offer_handler(State(service.clone()), axum::Json(submission())).await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let fetched = get_offer_handler(State(service.clone())).await;
    assert_eq!(fetched.status(), StatusCode::OK);
    let body = json_body(fetched).await;
    assert_eq!(body["name"], "Outbound Copilot");
}

#[tokio::test]
async fn invalid_offer_is_rejected_with_422() {
    let (_, service) = service(
        StaticTransport("Intent: High\nReasoning: strong fit"),
        fast_config(),
    );
    let service = Arc::new(service);

    let mut invalid = submission();
    invalid.ideal_use_cases.clear();
    let response = set_offer_handler(State(service), axum::Json(invalid)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn upload_score_and_rank_flow() {
    let (_, service) = service(
        StaticTransport("Intent: High\nReasoning: strong fit"),
        fast_config(),
    );
    let service = Arc::new(service);

    let created =
        set_offer_handler(State(service.clone()), axum::Json(submission())).await;
    assert_eq!(created.status(), StatusCode::CREATED);

    // Scoring before any upload is rejected.
    let premature = score_handler(State(service.clone())).await;
    assert_eq!(premature.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let csv = "name,role,company,industry,location,professional_summary\n\
Low Fit,Analyst,Farmhand Inc,Agriculture,Boise,Keeps the books.\n\
Jamie Rivera,CEO,Acme Corp,Technology,Denver,Runs outbound.\n";
    let uploaded = upload_leads_handler(
        State(service.clone()),
        axum::Json(LeadUploadRequest {
            csv: csv.to_string(),
        }),
    )
    .await;
    assert_eq!(uploaded.status(), StatusCode::CREATED);
    assert_eq!(json_body(uploaded).await["uploaded"], 2);

    let scored = score_handler(State(service.clone())).await;
    assert_eq!(scored.status(), StatusCode::OK);
    let report = json_body(scored).await;
    assert_eq!(report["scored"], 2);
    assert_eq!(report["stats"]["succeeded"], 2);

    let results = results_handler(State(service.clone())).await;
    let body = json_body(results).await;
    assert_eq!(body["count"], 2);
    // Ranked: the CEO outranks the analyst despite upload order.
    assert_eq!(body["results"][0]["prospect"]["name"], "Jamie Rivera");
    assert_eq!(body["results"][0]["total_score"], 100);
}

#[tokio::test]
async fn scoring_without_offer_conflicts() {
    let (_, service) = service(
        StaticTransport("Intent: High\nReasoning: strong fit"),
        fast_config(),
    );
    let response = score_handler(State(Arc::new(service))).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}
