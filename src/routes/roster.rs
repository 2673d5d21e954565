use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{
    ErrorResponse, ExclusionPair, ImportCsvRequest, ImportHistoryResponse,
    ImportWishlistResponse, Participant, SaveYearRequest, YearData,
};
use crate::routes::assignments::AppState;
use crate::services::csv;
use crate::services::StorageError;

/// Configure roster, history, and import/export routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/participants", web::get().to(get_participants))
        .route("/participants", web::put().to(put_participants))
        .route("/exclusions", web::get().to(get_exclusions))
        .route("/exclusions", web::put().to(put_exclusions))
        .route("/years", web::get().to(list_years))
        .route("/years", web::post().to(save_year))
        .route("/years/{year}", web::get().to(get_year))
        .route("/years/{year}", web::delete().to(delete_year))
        .route("/years/{year}/export", web::get().to(export_year_csv))
        .route("/import/history", web::post().to(import_history))
        .route("/import/wishlist", web::post().to(import_wishlist));
}

fn storage_error(e: StorageError) -> HttpResponse {
    tracing::error!("Storage operation failed: {}", e);
    HttpResponse::InternalServerError().json(ErrorResponse {
        error: "Storage error".to_string(),
        message: e.to_string(),
        status_code: 500,
    })
}

fn csv_error(e: csv::CsvError) -> HttpResponse {
    tracing::info!("CSV import rejected: {}", e);
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Invalid CSV".to_string(),
        message: e.to_string(),
        status_code: 400,
    })
}

/// Merge two rosters by display name, preferring entries from `preferred`
///
/// Name matching is case-insensitive; ids can differ between the two sides
/// when a wishlist import carries fresher email addresses. On a name
/// collision the preferred entry keeps its id/email but absent wishlist,
/// address, and exclusion text fall back to the other side's values.
fn merge_participants_by_name(
    preferred: Vec<Participant>,
    other: Vec<Participant>,
) -> Vec<Participant> {
    let mut merged = preferred;
    let mut unmatched = Vec::new();

    for candidate in other {
        match merged
            .iter_mut()
            .find(|p| p.name.trim().eq_ignore_ascii_case(candidate.name.trim()))
        {
            Some(kept) => {
                if kept.wishlist.is_none() {
                    kept.wishlist = candidate.wishlist;
                }
                if kept.address.is_none() {
                    kept.address = candidate.address;
                }
                if kept.exclusions.is_none() {
                    kept.exclusions = candidate.exclusions;
                }
            }
            None => unmatched.push(candidate),
        }
    }

    merged.extend(unmatched);
    merged
}

async fn get_participants(state: web::Data<AppState>) -> impl Responder {
    match state.store.load_participants().await {
        Ok(participants) => HttpResponse::Ok().json(participants),
        Err(e) => storage_error(e),
    }
}

async fn put_participants(
    state: web::Data<AppState>,
    req: web::Json<Vec<Participant>>,
) -> impl Responder {
    match state.store.save_participants(&req).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "count": req.len() })),
        Err(e) => storage_error(e),
    }
}

async fn get_exclusions(state: web::Data<AppState>) -> impl Responder {
    match state.store.load_exclusions().await {
        Ok(exclusions) => HttpResponse::Ok().json(exclusions),
        Err(e) => storage_error(e),
    }
}

async fn put_exclusions(
    state: web::Data<AppState>,
    req: web::Json<Vec<ExclusionPair>>,
) -> impl Responder {
    match state.store.save_exclusions(&req).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "count": req.len() })),
        Err(e) => storage_error(e),
    }
}

/// List the archived years, newest first
async fn list_years(state: web::Data<AppState>) -> impl Responder {
    match state.store.load_history().await {
        Ok(history) => HttpResponse::Ok().json(history),
        Err(e) => storage_error(e),
    }
}

/// Archive a completed matching for one year
///
/// POST /api/v1/years
async fn save_year(
    state: web::Data<AppState>,
    req: web::Json<SaveYearRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let year_data = YearData {
        year: req.year,
        assignments: req.assignments.clone(),
        saved_at: chrono::Utc::now(),
    };

    match state.store.save_year(year_data).await {
        Ok(()) => {
            tracing::info!(
                "Archived {} assignments for year {}",
                req.assignments.len(),
                req.year
            );
            HttpResponse::Ok().json(serde_json::json!({
                "year": req.year,
                "count": req.assignments.len(),
                "export": export_path(req.year),
            }))
        }
        Err(e) => storage_error(e),
    }
}

/// Download path for an archived year's CSV
fn export_path(year: i32) -> String {
    format!("/api/v1/years/{}/export", year)
}

async fn get_year(state: web::Data<AppState>, path: web::Path<i32>) -> impl Responder {
    let year = path.into_inner();
    match state.store.get_year(year).await {
        Ok(Some(year_data)) => HttpResponse::Ok().json(year_data),
        Ok(None) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Year not found".to_string(),
            message: format!("No saved assignments for year {}", year),
            status_code: 404,
        }),
        Err(e) => storage_error(e),
    }
}

async fn delete_year(state: web::Data<AppState>, path: web::Path<i32>) -> impl Responder {
    let year = path.into_inner();
    match state.store.delete_year(year).await {
        Ok(true) => HttpResponse::Ok().json(serde_json::json!({ "deleted": year })),
        Ok(false) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Year not found".to_string(),
            message: format!("No saved assignments for year {}", year),
            status_code: 404,
        }),
        Err(e) => storage_error(e),
    }
}

/// Download one archived year as CSV
///
/// GET /api/v1/years/{year}/export
async fn export_year_csv(state: web::Data<AppState>, path: web::Path<i32>) -> impl Responder {
    let year = path.into_inner();
    let year_data = match state.store.get_year(year).await {
        Ok(Some(data)) => data,
        Ok(None) => {
            return HttpResponse::NotFound().json(ErrorResponse {
                error: "Year not found".to_string(),
                message: format!("No saved assignments for year {}", year),
                status_code: 404,
            });
        }
        Err(e) => return storage_error(e),
    };

    match csv::export_year(year, &year_data.assignments) {
        Ok(document) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"secret-santa-{}.csv\"", year),
            ))
            .body(document),
        Err(e) => {
            tracing::error!("CSV export for {} failed: {}", year, e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Export failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            })
        }
    }
}

/// Import a past year's assignments from CSV
///
/// POST /api/v1/import/history
///
/// Archives the year and additionally records one unidirectional exclusion
/// per imported edge. The archive feeds the recent-repeat window and the
/// exclusions outlive it; both mechanisms are kept deliberately.
async fn import_history(
    state: web::Data<AppState>,
    req: web::Json<ImportCsvRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let (year_data, imported_participants) = match csv::import_history(&req.csv) {
        Ok(parsed) => parsed,
        Err(e) => return csv_error(e),
    };

    let year = year_data.year;
    let assignments_imported = year_data.assignments.len();
    let new_exclusions = csv::exclusions_from_year(&year_data);
    let exclusions_created = new_exclusions.len();

    if let Err(e) = state.store.save_year(year_data).await {
        return storage_error(e);
    }

    let merged_exclusions = match state.store.merge_exclusions(new_exclusions).await {
        Ok(merged) => merged,
        Err(e) => return storage_error(e),
    };

    // Fill in names for a roster that was already loaded; an empty roster
    // stays empty, a history import is not a sign-up
    let stored = match state.store.load_participants().await {
        Ok(stored) => stored,
        Err(e) => return storage_error(e),
    };
    let participants = if stored.is_empty() {
        imported_participants
    } else {
        let merged = merge_participants_by_name(stored, imported_participants);
        if let Err(e) = state.store.save_participants(&merged).await {
            return storage_error(e);
        }
        merged
    };

    tracing::info!(
        "Imported {} assignments from {}, created {} exclusions",
        assignments_imported,
        year,
        exclusions_created
    );

    HttpResponse::Ok().json(ImportHistoryResponse {
        year,
        assignments_imported,
        exclusions_created,
        total_exclusions: merged_exclusions.len(),
        participants,
    })
}

/// Import the wishlist sign-up CSV
///
/// POST /api/v1/import/wishlist
///
/// Replaces roster entries by name with the imported data (the sign-up form
/// is the fresher source) and merges the resolved bidirectional exclusions.
async fn import_wishlist(
    state: web::Data<AppState>,
    req: web::Json<ImportCsvRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let (imported_participants, imported_exclusions) = match csv::import_wishlist(&req.csv) {
        Ok(parsed) => parsed,
        Err(e) => return csv_error(e),
    };

    let stored = match state.store.load_participants().await {
        Ok(stored) => stored,
        Err(e) => return storage_error(e),
    };
    let participants = merge_participants_by_name(imported_participants, stored);
    if let Err(e) = state.store.save_participants(&participants).await {
        return storage_error(e);
    }

    let exclusion_pairs = match state.store.merge_exclusions(imported_exclusions).await {
        Ok(merged) => merged,
        Err(e) => return storage_error(e),
    };

    tracing::info!(
        "Wishlist import: {} participants, {} exclusions total",
        participants.len(),
        exclusion_pairs.len()
    );

    HttpResponse::Ok().json(ImportWishlistResponse {
        participants,
        exclusion_pairs,
    })
}
