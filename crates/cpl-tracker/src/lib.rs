//! CPL request tracker
//!
//! Client-side state for the three portal views: the advisor dashboard, the student
//! self-service lookup and the document upload queue that hands files to the
//! assistant. State lives in explicit structs that are passed to the operations
//! that change them; every network call goes through [`TrackerGateway`].

pub mod advisor;
pub mod assistant;
pub mod context;
pub mod error;
pub mod filter;
pub mod gateway;
pub mod notice;
pub mod student;
pub mod uploads;

pub use advisor::{AdvisorDashboard, DashboardState, RequestRow, StatusForm};
pub use assistant::{Assistant, OutboundMessage};
pub use context::StudentContext;
pub use error::{TrackerError, TrackerResult};
pub use filter::{RequestFilter, ALL_STATUSES};
pub use gateway::TrackerGateway;
pub use notice::{Notice, NoticeLevel};
pub use student::{StudentLookup, StudentRequestView};
pub use uploads::{SelectedFile, UploadJob, UploadQueue, UploadStatus, UploadedFile};
