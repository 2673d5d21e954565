// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Assignment, ExclusionPair, MatchConstraints, Participant, YearData};
pub use requests::{
    GenerateRequest, ImportCsvRequest, SaveYearRequest, SendEmailsRequest, TestEmailRequest,
    ValidateRequest,
};
pub use responses::{
    EmailDispatchResponse, ErrorResponse, GenerateResponse, HealthResponse,
    ImportHistoryResponse, ImportWishlistResponse, ValidateResponse,
};
