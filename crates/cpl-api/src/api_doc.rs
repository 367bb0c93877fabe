//! OpenAPI documentation, served at `/api/openapi.json`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use cpl_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "CPL Portal Gateway",
        version = "0.1.0",
        description = "Gateway between the credit-for-prior-learning portal and its backend services. Relays document uploads and downloads, lists request records and forwards advisor status updates to the request store."
    ),
    paths(
        // Documents
        handlers::upload::upload_document,
        handlers::documents::download_document,
        handlers::documents::preview_document,
        handlers::documents::view_document,
        // Requests
        handlers::requests::list_requests,
        handlers::requests::requests_by_nuid,
        handlers::requests::update_status,
        // Health
        handlers::health::health,
    ),
    components(
        schemas(
            models::Request,
            models::RequestStatus,
            models::DataSource,
            models::RequestListResponse,
            models::NuidRequestsResponse,
            models::StatusUpdate,
            models::StatusUpdateResponse,
            models::UploadFields,
            handlers::health::HealthResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "documents", description = "Document upload and retrieval"),
        (name = "requests", description = "Credit request records and status updates"),
        (name = "health", description = "Gateway descriptor")
    )
)]
pub struct ApiDoc;
