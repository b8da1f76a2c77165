//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the read-only REST endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::protocol::{
    ConsultationView, DoctorView, MedicationView, PrescriptionView, SpecialtyView,
};
use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::Json,
};
use medconnect_core::{
    catalog::{self, AVAILABLE_DATES, AVAILABLE_TIMES, DOCTORS, SPECIALTIES},
    history::{search_consultations, search_prescriptions},
    SpecialtyId,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use utoipa::{IntoParams, OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        get_catalog,
        get_specialty_doctors,
        get_history,
    ),
    components(
        schemas(
            CatalogResponse,
            HistoryResponse,
            SpecialtyView,
            DoctorView,
            ConsultationView,
            PrescriptionView,
            MedicationView,
        )
    ),
    tags(
        (name = "MedConnect API", description = "Read-only catalog and medical history of the telehealth demo.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Query Structs
//=========================================================================================

/// Everything the booking wizard can offer.
#[derive(Serialize, ToSchema)]
pub struct CatalogResponse {
    pub specialties: Vec<SpecialtyView>,
    pub doctors: Vec<DoctorView>,
    pub dates: Vec<String>,
    pub times: Vec<String>,
}

#[derive(Serialize, ToSchema)]
pub struct HistoryResponse {
    pub consultations: Vec<ConsultationView>,
    pub prescriptions: Vec<PrescriptionView>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Case-insensitive search term. Empty or missing returns everything.
    pub q: Option<String>,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Get the full booking catalog.
#[utoipa::path(
    get,
    path = "/catalog",
    responses(
        (status = 200, description = "Specialties, doctors, dates and times", body = CatalogResponse)
    )
)]
pub async fn get_catalog() -> Json<CatalogResponse> {
    Json(CatalogResponse {
        specialties: SPECIALTIES.iter().map(SpecialtyView::from).collect(),
        doctors: DOCTORS.iter().map(DoctorView::from).collect(),
        dates: AVAILABLE_DATES.iter().map(|d| d.to_string()).collect(),
        times: AVAILABLE_TIMES.iter().map(|t| t.to_string()).collect(),
    })
}

/// List the doctors offering one specialty.
#[utoipa::path(
    get,
    path = "/catalog/specialties/{id}/doctors",
    responses(
        (status = 200, description = "Doctors in catalog order", body = [DoctorView]),
        (status = 404, description = "Unknown specialty")
    ),
    params(
        ("id" = String, Path, description = "Specialty id, e.g. `pediatria`.")
    )
)]
pub async fn get_specialty_doctors(
    Path(id): Path<String>,
) -> Result<Json<Vec<DoctorView>>, (StatusCode, String)> {
    let specialty = id.parse::<SpecialtyId>().map_err(|e| {
        warn!("Doctor lookup for unknown specialty '{}'.", id);
        (StatusCode::NOT_FOUND, e.to_string())
    })?;
    let doctors = catalog::doctors_for(specialty).map(DoctorView::from).collect();
    Ok(Json(doctors))
}

/// Search the medical history.
#[utoipa::path(
    get,
    path = "/history",
    responses(
        (status = 200, description = "Matching consultations and prescriptions", body = HistoryResponse)
    ),
    params(HistoryQuery)
)]
pub async fn get_history(Query(query): Query<HistoryQuery>) -> Json<HistoryResponse> {
    let term = query.q.unwrap_or_default();
    debug!(term = %term, "History search.");
    Json(HistoryResponse {
        consultations: search_consultations(&term)
            .into_iter()
            .map(ConsultationView::from)
            .collect(),
        prescriptions: search_prescriptions(&term)
            .into_iter()
            .map(PrescriptionView::from)
            .collect(),
    })
}
