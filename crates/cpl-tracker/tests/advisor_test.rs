//! Advisor dashboard integration tests.
//!
//! Run with: `cargo test -p cpl-tracker --test advisor_test`

mod helpers;

use cpl_tracker::{AdvisorDashboard, DashboardState, RequestFilter, TrackerError};
use helpers::{sample_requests, with_document, FakeGateway};

#[tokio::test]
async fn test_load_and_filter() {
    let gateway = FakeGateway::with_requests(sample_requests());
    let mut dashboard = AdvisorDashboard::new("Dr. Rivera");

    let count = dashboard.load(&gateway).await.unwrap();
    assert_eq!(count, 3);
    assert_eq!(dashboard.state(), &DashboardState::Ready);

    dashboard.filter = RequestFilter::new("ada", "all");
    assert_eq!(dashboard.filtered().len(), 2);

    dashboard.filter.status = "approved".to_string();
    let rows = dashboard.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, "REQ3");
    assert_eq!(rows[0].status_label, "Approved");
    assert_eq!(rows[0].submitted, "Jan 10, 2025");

    // Clearing the search widens again; the full list is never narrowed.
    dashboard.filter.search.clear();
    dashboard.filter.status = "all".to_string();
    assert_eq!(dashboard.filtered().len(), 3);
    assert_eq!(gateway.calls(), 1);
}

#[tokio::test]
async fn test_unavailable_store_shows_no_rows() {
    let gateway = FakeGateway::with_requests(sample_requests());
    let mut dashboard = AdvisorDashboard::new("Dr. Rivera");
    dashboard.load(&gateway).await.unwrap();

    gateway.set_wrong_source(true);
    let err = dashboard.load(&gateway).await.unwrap_err();

    assert!(matches!(err, TrackerError::Unavailable(_)));
    assert!(matches!(dashboard.state(), DashboardState::Unavailable(_)));
    assert!(dashboard.filtered().is_empty());
}

#[tokio::test]
async fn test_unreachable_gateway_shows_no_rows() {
    let gateway = FakeGateway::with_requests(sample_requests());
    gateway.set_unreachable(true);
    let mut dashboard = AdvisorDashboard::new("Dr. Rivera");

    let err = dashboard.load(&gateway).await.unwrap_err();

    assert!(!err.is_client_side());
    assert!(dashboard.requests().is_empty());
}

#[tokio::test]
async fn test_open_prefills_form() {
    let mut requests = sample_requests();
    requests[1].credits = Some(3.0);
    requests[1].notes = Some("Needs syllabus".to_string());
    let gateway = FakeGateway::with_requests(requests);
    let mut dashboard = AdvisorDashboard::new("Dr. Rivera");
    dashboard.load(&gateway).await.unwrap();

    let form = dashboard.open("REQ2").unwrap();

    assert_eq!(form.status, "under-review");
    assert_eq!(form.credits, Some(3.0));
    assert_eq!(form.notes, "Needs syllabus");
    assert_eq!(dashboard.open_form(), Some(&form));
    assert!(matches!(
        dashboard.open("REQ404"),
        Err(TrackerError::RequestNotFound(_))
    ));
}

#[tokio::test]
async fn test_submit_with_empty_status_makes_no_call() {
    let gateway = FakeGateway::with_requests(sample_requests());
    let mut dashboard = AdvisorDashboard::new("Dr. Rivera");
    dashboard.load(&gateway).await.unwrap();
    let calls_before = gateway.calls();

    let mut form = dashboard.open("REQ1").unwrap();
    form.status = "  ".to_string();
    let err = dashboard.submit(&gateway, &form).await.unwrap_err();

    assert!(matches!(err, TrackerError::MissingStatus));
    assert_eq!(err.notice().message, "Please select a status");
    assert_eq!(gateway.calls(), calls_before);
    assert!(dashboard.open_form().is_some());
}

#[tokio::test]
async fn test_submit_updates_and_reloads() {
    let gateway = FakeGateway::with_requests(sample_requests());
    let mut dashboard = AdvisorDashboard::new("Dr. Rivera");
    dashboard.load(&gateway).await.unwrap();

    let mut form = dashboard.open("REQ1").unwrap();
    form.status = "approved".to_string();
    form.credits = Some(3.0);
    form.notes = "  ok  ".to_string();
    let notice = dashboard.submit(&gateway, &form).await.unwrap();

    assert_eq!(notice.message, "Status updated successfully");
    assert!(dashboard.open_form().is_none());
    // load, update, reload
    assert_eq!(gateway.calls(), 3);

    let (id, update) = &gateway.updates()[0];
    assert_eq!(id, "REQ1");
    assert_eq!(update.notes.as_deref(), Some("ok"));
    assert_eq!(update.updated_by.as_deref(), Some("Dr. Rivera"));
    assert_eq!(
        update.expected_updated_at.as_deref(),
        Some("2025-01-10T09:30:00")
    );

    let refreshed = dashboard
        .requests()
        .iter()
        .find(|r| r.id == "REQ1")
        .unwrap();
    assert_eq!(refreshed.status, "approved");
    assert_eq!(refreshed.credits, Some(3.0));
    assert_eq!(refreshed.notes.as_deref(), Some("ok"));
    assert_eq!(refreshed.updated_by.as_deref(), Some("Dr. Rivera"));
    assert!(refreshed.updated_at.is_some());
}

#[tokio::test]
async fn test_stale_form_is_rejected() {
    let gateway = FakeGateway::with_requests(sample_requests());
    let mut dashboard = AdvisorDashboard::new("Dr. Rivera");
    dashboard.load(&gateway).await.unwrap();

    let mut form = dashboard.open("REQ2").unwrap();
    gateway.touch("REQ2");
    form.status = "denied".to_string();
    let err = dashboard.submit(&gateway, &form).await.unwrap_err();

    let message = err.notice().message;
    assert!(message.starts_with("Failed to update status"));
    assert!(message.contains("409"));
    assert!(dashboard.open_form().is_some());
}

#[tokio::test]
async fn test_document_helpers() {
    let mut requests = sample_requests();
    requests[0] = with_document(requests[0].clone(), "doc-1", "transcript.pdf");
    let gateway = FakeGateway::with_requests(requests);
    let mut dashboard = AdvisorDashboard::new("Dr. Rivera");
    dashboard.load(&gateway).await.unwrap();

    let document = dashboard.download(&gateway, "REQ1").await.unwrap();
    assert_eq!(
        document.content_type.as_deref(),
        Some("application/octet-stream")
    );
    dashboard.preview(&gateway, "REQ1").await.unwrap();

    assert_eq!(
        gateway.fetches(),
        vec![
            ("doc-1".to_string(), "transcript.pdf".to_string(), false),
            ("doc-1".to_string(), "transcript.pdf".to_string(), true),
        ]
    );

    let calls_before = gateway.calls();
    let err = dashboard.download(&gateway, "REQ2").await.unwrap_err();
    assert!(matches!(err, TrackerError::NoDocument(_)));
    assert_eq!(gateway.calls(), calls_before);
}
