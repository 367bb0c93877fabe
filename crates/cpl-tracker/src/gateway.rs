//! Network seam of the tracker.

use anyhow::Result;
use async_trait::async_trait;
use cpl_api_client::{ApiClient, DownloadedDocument};
use cpl_core::{
    NuidRequestsResponse, RequestListResponse, StatusUpdate, StatusUpdateResponse, UploadFields,
};
use serde_json::{Map, Value};

/// Gateway operations the tracker views depend on.
#[async_trait]
pub trait TrackerGateway: Send + Sync {
    async fn list_requests(&self) -> Result<RequestListResponse>;

    async fn requests_by_nuid(&self, nuid: &str) -> Result<NuidRequestsResponse>;

    async fn update_status(
        &self,
        request_id: &str,
        update: &StatusUpdate,
    ) -> Result<StatusUpdateResponse>;

    async fn upload_document(
        &self,
        file_name: &str,
        content_type: Option<&str>,
        data: Vec<u8>,
        fields: &UploadFields,
    ) -> Result<Map<String, Value>>;

    async fn fetch_document(
        &self,
        document_id: &str,
        filename: &str,
        preview: bool,
    ) -> Result<DownloadedDocument>;
}

#[async_trait]
impl TrackerGateway for ApiClient {
    async fn list_requests(&self) -> Result<RequestListResponse> {
        ApiClient::list_requests(self).await
    }

    async fn requests_by_nuid(&self, nuid: &str) -> Result<NuidRequestsResponse> {
        ApiClient::requests_by_nuid(self, nuid).await
    }

    async fn update_status(
        &self,
        request_id: &str,
        update: &StatusUpdate,
    ) -> Result<StatusUpdateResponse> {
        ApiClient::update_status(self, request_id, update).await
    }

    async fn upload_document(
        &self,
        file_name: &str,
        content_type: Option<&str>,
        data: Vec<u8>,
        fields: &UploadFields,
    ) -> Result<Map<String, Value>> {
        ApiClient::upload_document(self, file_name, content_type, data, fields).await
    }

    async fn fetch_document(
        &self,
        document_id: &str,
        filename: &str,
        preview: bool,
    ) -> Result<DownloadedDocument> {
        ApiClient::fetch_document(self, document_id, filename, preview).await
    }
}
