use actix_web::{web, HttpResponse, Responder};
use chrono::Datelike;
use std::sync::Arc;
use validator::Validate;

use crate::core::{is_complete_bijection, Engine, EngineError};
use crate::models::{
    ErrorResponse, GenerateRequest, GenerateResponse, HealthResponse, SendEmailsRequest,
    TestEmailRequest, ValidateRequest, ValidateResponse,
};
use crate::services::{JsonStore, Mailer, StorageError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<JsonStore>,
    /// None when email credentials are not configured
    pub mailer: Option<Arc<Mailer>>,
    pub engine: Engine,
}

/// Configure assignment-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/assignments/generate", web::post().to(generate))
        .route("/assignments/validate", web::post().to(validate))
        .route("/assignments/email", web::post().to(send_emails))
        .route("/assignments/email/test", web::post().to(send_test_email));
}

fn storage_error(e: StorageError) -> HttpResponse {
    tracing::error!("Storage operation failed: {}", e);
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: "Storage error".to_string(),
        message: e.to_string(),
        status_code: 500,
    })
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Generate assignments endpoint
///
/// POST /api/v1/assignments/generate
///
/// Request body:
/// ```json
/// {
///   "participants": [...],
///   "exclusionPairs": [...],
///   "currentYear": 2024
/// }
/// ```
///
/// All fields are optional: participants and exclusions fall back to the
/// stored roster, the year to the server clock. History always comes from
/// the store.
async fn generate(
    state: web::Data<AppState>,
    req: web::Json<GenerateRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for generate request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let participants = match &req.participants {
        Some(list) => list.clone(),
        None => match state.store.load_participants().await {
            Ok(list) => list,
            Err(e) => return storage_error(e),
        },
    };

    let exclusion_pairs = match &req.exclusion_pairs {
        Some(list) => list.clone(),
        None => match state.store.load_exclusions().await {
            Ok(list) => list,
            Err(e) => return storage_error(e),
        },
    };

    let historical_data = match state.store.load_history().await {
        Ok(history) => history,
        Err(e) => return storage_error(e),
    };

    let current_year = req
        .current_year
        .unwrap_or_else(|| chrono::Utc::now().year());

    tracing::info!(
        "Generating assignments for year {} ({} participants, {} exclusions, {} archived years)",
        current_year,
        participants.len(),
        exclusion_pairs.len(),
        historical_data.len()
    );

    let constraints = crate::models::MatchConstraints {
        participants: &participants,
        exclusion_pairs: &exclusion_pairs,
        historical_data: &historical_data,
        current_year,
    };

    match state.engine.generate(&constraints) {
        Ok(assignments) => {
            tracing::info!(
                "Generated {} assignments for year {}",
                assignments.len(),
                current_year
            );
            HttpResponse::Ok().json(GenerateResponse {
                count: assignments.len(),
                year: current_year,
                assignments,
            })
        }
        Err(e @ EngineError::InsufficientParticipants { .. }) => {
            HttpResponse::BadRequest().json(ErrorResponse {
                error: "Insufficient participants".to_string(),
                message: e.to_string(),
                status_code: 400,
            })
        }
        Err(e @ EngineError::Infeasible { .. }) => {
            tracing::warn!("Matching infeasible for year {}: {}", current_year, e);
            HttpResponse::UnprocessableEntity().json(ErrorResponse {
                error: "Infeasible constraints".to_string(),
                message: e.to_string(),
                status_code: 422,
            })
        }
    }
}

/// Bijection check endpoint
///
/// POST /api/v1/assignments/validate
async fn validate(req: web::Json<ValidateRequest>) -> impl Responder {
    let valid = is_complete_bijection(&req.assignments, &req.participants);
    HttpResponse::Ok().json(ValidateResponse { valid })
}

/// Email dispatch endpoint
///
/// POST /api/v1/assignments/email
///
/// Sends one templated message per assignment; failures are collected into
/// the batch summary rather than aborting the run.
async fn send_emails(
    state: web::Data<AppState>,
    req: web::Json<SendEmailsRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let Some(mailer) = &state.mailer else {
        return HttpResponse::ServiceUnavailable().json(ErrorResponse {
            error: "Email not configured".to_string(),
            message: "Set the email service id, template id, and public key".to_string(),
            status_code: 503,
        });
    };

    tracing::info!("Dispatching {} assignment emails", req.assignments.len());
    let summary = mailer.send_all(&req.assignments).await;
    tracing::info!(
        "Email dispatch finished: {} sent, {} failed",
        summary.success,
        summary.failed
    );

    HttpResponse::Ok().json(summary)
}

/// Configuration-check email endpoint
///
/// POST /api/v1/assignments/email/test
async fn send_test_email(
    state: web::Data<AppState>,
    req: web::Json<TestEmailRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let Some(mailer) = &state.mailer else {
        return HttpResponse::ServiceUnavailable().json(ErrorResponse {
            error: "Email not configured".to_string(),
            message: "Set the email service id, template id, and public key".to_string(),
            status_code: 503,
        });
    };

    match mailer.send_test(&req.email, &req.name).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "sent": true })),
        Err(e) => {
            tracing::error!("Test email to {} failed: {}", req.email, e);
            HttpResponse::BadGateway().json(ErrorResponse {
                error: "Email delivery failed".to_string(),
                message: e.to_string(),
                status_code: 502,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }
}
