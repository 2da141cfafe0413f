//! # API REST
//!
//! REST API implementation for HPMS.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, CORS, API key check, status codes)
//!
//! Uses `api-shared` for wire types and `hpms-core` for all data operations.

#![warn(rust_2018_idioms)]

use api_shared::auth::validate_api_key;
use api_shared::{
    AdmissionDto, AdmissionReq, AdmissionRes, BillingDto, BillingReq, BillingRes, ChatReq,
    ChatRes, CreatePatientReq, CreatePatientRes, ErrorRes, HealthRes, HealthService,
    ListPatientsRes, MedicalRecordDto, MedicalRecordReq, MedicalRecordRes, PatientDetailsRes,
    PatientDto,
};
use axum::{
    extract::{rejection::JsonRejection, FromRequest, Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use hpms_core::model::{
    Admission, AdmissionForm, Billing, BillingForm, MedicalRecord, MedicalRecordForm, Patient,
    PatientDetails, PatientForm,
};
use hpms_core::{
    ChatRelay, CoreConfig, HospitalError, HospitalResult, PatientService, RecordStore,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

/// Header carrying the REST access key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Application state shared by all request handlers.
#[derive(Clone)]
pub struct AppState {
    service: PatientService,
    relay: ChatRelay,
    api_key: Option<Arc<str>>,
}

impl AppState {
    pub fn new(service: PatientService, relay: ChatRelay, api_key: Option<String>) -> Self {
        Self {
            service,
            relay,
            api_key: api_key.map(Arc::from),
        }
    }

    /// Build the store, patient service and chat relay described by `cfg`.
    ///
    /// Falls back to in-process tables (with a warning) when no hosted backend is configured.
    pub fn from_config(cfg: &CoreConfig, api_key: Option<String>) -> HospitalResult<Self> {
        let store = RecordStore::from_config(cfg)?;
        if matches!(store, RecordStore::Memory(_)) {
            tracing::warn!("no hosted backend configured; patient data is kept in memory only");
        }
        if api_key.is_none() {
            tracing::warn!("HPMS_API_KEY not set; REST API is open");
        }

        let relay = ChatRelay::new(store.clone(), cfg)?;
        Ok(Self::new(PatientService::new(store), relay, api_key))
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_patients,
        create_patient,
        patient_details,
        add_medical_record,
        add_admission,
        add_billing,
        chat,
    ),
    components(schemas(
        HealthRes,
        ErrorRes,
        PatientDto,
        ListPatientsRes,
        CreatePatientReq,
        CreatePatientRes,
        MedicalRecordDto,
        MedicalRecordReq,
        MedicalRecordRes,
        AdmissionDto,
        AdmissionReq,
        AdmissionRes,
        BillingDto,
        BillingReq,
        BillingRes,
        PatientDetailsRes,
        ChatReq,
        ChatRes,
    ))
)]
struct ApiDoc;

/// Build the full HPMS router with docs, CORS and the API key check applied.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/patients", get(list_patients).post(create_patient))
        .route("/patients/:id", get(patient_details))
        .route("/patients/:id/medical-records", post(add_medical_record))
        .route("/patients/:id/admission", post(add_admission))
        .route("/patients/:id/billing", post(add_billing))
        .route("/chat", post(chat))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    Router::new()
        .route("/health", get(health))
        .merge(protected)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Error response: a status code and a `{ "error": ... }` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

fn status_for(err: &HospitalError) -> StatusCode {
    match err {
        HospitalError::InvalidInput(_) | HospitalError::InvalidText { .. } => {
            StatusCode::BAD_REQUEST
        }
        HospitalError::NotFound(_) => StatusCode::NOT_FOUND,
        HospitalError::Conflict(_) | HospitalError::Backend { status: 409, .. } => {
            StatusCode::CONFLICT
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<HospitalError> for ApiError {
    fn from(err: HospitalError) -> Self {
        let status = status_for(&err);
        if status.is_server_error() {
            tracing::error!(error = %err, "request failed");
        } else {
            tracing::warn!(error = %err, "request rejected");
        }
        Self::new(status, err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorRes {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// JSON body extractor whose rejections use the `{ "error": ... }` shape.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw)
        .map_err(|_| ApiError::new(StatusCode::BAD_REQUEST, format!("invalid patient id: {raw}")))
}

async fn require_api_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(expected) = state.api_key.as_deref() {
        let provided = req
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok());
        validate_api_key(provided, expected)
            .map_err(|e| ApiError::new(StatusCode::UNAUTHORIZED, e.to_string()))?;
    }
    Ok(next.run(req).await)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint; never requires the API key.
#[axum::debug_handler]
async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[derive(Debug, Deserialize)]
struct ListParams {
    search: Option<String>,
}

#[utoipa::path(
    get,
    path = "/patients",
    params(
        ("search" = Option<String>, Query, description = "Case-insensitive match on name, phone or email")
    ),
    responses(
        (status = 200, description = "Patients, newest first", body = ListPatientsRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// List patients, newest first, optionally filtered by `search`.
#[axum::debug_handler]
async fn list_patients(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListPatientsRes>, ApiError> {
    let patients = state.service.list_patients(params.search.as_deref()).await?;
    Ok(Json(ListPatientsRes {
        patients: patients.iter().map(patient_dto).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/patients",
    request_body = CreatePatientReq,
    responses(
        (status = 201, description = "Patient created", body = CreatePatientRes),
        (status = 400, description = "Invalid form", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Register a new patient.
#[axum::debug_handler]
async fn create_patient(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreatePatientReq>,
) -> Result<(StatusCode, Json<CreatePatientRes>), ApiError> {
    let patient = state.service.create_patient(patient_form(req)).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatePatientRes {
            patient: patient_dto(&patient),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    params(("id" = String, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient with medical records, admission and billing", body = PatientDetailsRes),
        (status = 400, description = "Malformed id", body = ErrorRes),
        (status = 404, description = "Unknown patient", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn patient_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PatientDetailsRes>, ApiError> {
    let details = state.service.patient_details(parse_id(&id)?).await?;
    Ok(Json(details_res(&details)))
}

#[utoipa::path(
    post,
    path = "/patients/{id}/medical-records",
    params(("id" = String, Path, description = "Patient id")),
    request_body = MedicalRecordReq,
    responses(
        (status = 201, description = "Medical record added", body = MedicalRecordRes),
        (status = 400, description = "Invalid form or id", body = ErrorRes),
        (status = 404, description = "Unknown patient", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn add_medical_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<MedicalRecordReq>,
) -> Result<(StatusCode, Json<MedicalRecordRes>), ApiError> {
    let form = MedicalRecordForm {
        illness: req.illness,
        symptoms: req.symptoms,
        diagnosis: req.diagnosis,
        prescription: req.prescription,
        doctor_name: req.doctor_name,
        notes: req.notes,
    };
    let record = state.service.add_medical_record(parse_id(&id)?, form).await?;
    Ok((
        StatusCode::CREATED,
        Json(MedicalRecordRes {
            record: medical_record_dto(&record),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/patients/{id}/admission",
    params(("id" = String, Path, description = "Patient id")),
    request_body = AdmissionReq,
    responses(
        (status = 201, description = "Admission recorded", body = AdmissionRes),
        (status = 400, description = "Invalid form or id", body = ErrorRes),
        (status = 404, description = "Unknown patient", body = ErrorRes),
        (status = 409, description = "Patient already has an admission", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn add_admission(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<AdmissionReq>,
) -> Result<(StatusCode, Json<AdmissionRes>), ApiError> {
    let form = AdmissionForm {
        is_admitted: req.is_admitted,
        admission_date: req.admission_date,
        floor_number: req.floor_number.map(|n| n.to_string()),
        room_number: req.room_number,
        discharge_date: req.discharge_date,
    };
    let admission = state.service.add_admission(parse_id(&id)?, form).await?;
    Ok((
        StatusCode::CREATED,
        Json(AdmissionRes {
            admission: admission_dto(&admission),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/patients/{id}/billing",
    params(("id" = String, Path, description = "Patient id")),
    request_body = BillingReq,
    responses(
        (status = 201, description = "Billing recorded", body = BillingRes),
        (status = 400, description = "Invalid amounts or id", body = ErrorRes),
        (status = 404, description = "Unknown patient", body = ErrorRes),
        (status = 409, description = "Patient already has a billing record", body = ErrorRes)
    )
)]
#[axum::debug_handler]
async fn add_billing(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<BillingReq>,
) -> Result<(StatusCode, Json<BillingRes>), ApiError> {
    let form = BillingForm {
        total_amount: req.total_amount.to_string(),
        amount_paid: req.amount_paid.map(|n| n.to_string()),
        payment_status: req.payment_status,
    };
    let billing = state.service.add_billing(parse_id(&id)?, form).await?;
    Ok((
        StatusCode::CREATED,
        Json(BillingRes {
            billing: billing_dto(&billing),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatReq,
    responses(
        (status = 200, description = "Assistant reply", body = ChatRes),
        (status = 400, description = "Blank message", body = ErrorRes),
        (status = 500, description = "Chat failed", body = ErrorRes)
    )
)]
/// Ask the assistant a question about the stored patients.
///
/// Apart from a blank message, every failure (missing key, backend, completion endpoint) is a
/// 500 carrying the error message.
#[axum::debug_handler]
async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatReq>, JsonRejection>,
) -> Result<Json<ChatRes>, ApiError> {
    let Json(req) = body.map_err(|rejection| {
        tracing::error!(error = %rejection.body_text(), "chat request body rejected");
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, rejection.body_text())
    })?;
    let response = state.relay.ask(&req.message).await.map_err(chat_error)?;
    Ok(Json(ChatRes { response }))
}

/// `/chat` only distinguishes a blank message; everything else is a 500.
fn chat_error(err: HospitalError) -> ApiError {
    if err.is_invalid_input() {
        return err.into();
    }
    tracing::error!(error = %err, "chat failed");
    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

fn patient_form(req: CreatePatientReq) -> PatientForm {
    PatientForm {
        full_name: req.full_name,
        date_of_birth: req.date_of_birth,
        gender: req.gender,
        contact_number: req.contact_number,
        email: req.email,
        address: req.address,
        emergency_contact_name: req.emergency_contact_name,
        emergency_contact_number: req.emergency_contact_number,
        blood_group: req.blood_group,
        allergies: req.allergies,
    }
}

fn patient_dto(p: &Patient) -> PatientDto {
    PatientDto {
        id: p.id.to_string(),
        full_name: p.full_name.clone(),
        date_of_birth: p.date_of_birth.to_string(),
        gender: p.gender.map(|g| g.as_str().to_string()),
        contact_number: p.contact_number.clone(),
        email: p.email.clone(),
        address: p.address.clone(),
        emergency_contact_name: p.emergency_contact_name.clone(),
        emergency_contact_number: p.emergency_contact_number.clone(),
        blood_group: p.blood_group.map(|b| b.as_str().to_string()),
        allergies: p.allergies.clone(),
        created_at: p.created_at.to_rfc3339(),
    }
}

fn medical_record_dto(r: &MedicalRecord) -> MedicalRecordDto {
    MedicalRecordDto {
        id: r.id.to_string(),
        patient_id: r.patient_id.to_string(),
        illness: r.illness.clone(),
        symptoms: r.symptoms.clone(),
        diagnosis: r.diagnosis.clone(),
        prescription: r.prescription.clone(),
        doctor_name: r.doctor_name.clone(),
        notes: r.notes.clone(),
        created_at: r.created_at.to_rfc3339(),
    }
}

fn admission_dto(a: &Admission) -> AdmissionDto {
    AdmissionDto {
        id: a.id.to_string(),
        patient_id: a.patient_id.to_string(),
        is_admitted: a.is_admitted,
        floor_number: a.floor_number,
        room_number: a.room_number.clone(),
        admission_date: a.admission_date.map(|d| d.to_string()),
        discharge_date: a.discharge_date.map(|d| d.to_string()),
        created_at: a.created_at.to_rfc3339(),
    }
}

fn billing_dto(b: &Billing) -> BillingDto {
    BillingDto {
        id: b.id.to_string(),
        patient_id: b.patient_id.to_string(),
        total_amount: b.total_amount,
        amount_paid: b.amount_paid,
        amount_due: b.amount_due,
        payment_status: b.payment_status.as_str().to_string(),
        created_at: b.created_at.to_rfc3339(),
    }
}

fn details_res(d: &PatientDetails) -> PatientDetailsRes {
    PatientDetailsRes {
        patient: patient_dto(&d.patient),
        medical_records: d.medical_records.iter().map(medical_record_dto).collect(),
        admission: d.admission.as_ref().map(admission_dto),
        billing: d.billing.as_ref().map(billing_dto),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method};
    use hpms_core::config::{BackendConfig, ChatConfig};
    use hpms_core::store::MemoryStore;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::ServiceExt;

    fn app(api_key: Option<&str>) -> Router {
        let cfg = CoreConfig::new(
            BackendConfig::Memory,
            ChatConfig {
                endpoint: "http://127.0.0.1:9/v1/chat/completions".into(),
                model: "test-model".into(),
                api_key: None,
            },
            Duration::from_secs(5),
        );
        let store = RecordStore::Memory(MemoryStore::new());
        let relay = ChatRelay::new(store.clone(), &cfg).unwrap();
        router(AppState::new(
            PatientService::new(store),
            relay,
            api_key.map(Into::into),
        ))
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
        key: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = axum::http::Request::builder().method(method).uri(uri);
        if let Some(key) = key {
            builder = builder.header(API_KEY_HEADER, key);
        }
        let req = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    fn new_patient(name: &str, phone: &str) -> Value {
        json!({
            "full_name": name,
            "date_of_birth": "1985-03-09",
            "gender": "female",
            "contact_number": phone,
            "blood_group": "AB+"
        })
    }

    async fn create(app: &Router, name: &str, phone: &str) -> String {
        let (status, body) = send(
            app,
            Method::POST,
            "/patients",
            Some(new_patient(name, phone)),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["patient"]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (status, body) = send(&app(None), Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn create_then_list_and_search() {
        let app = app(None);
        create(&app, "Mary Seacole", "555-1805").await;
        create(&app, "Florence Nightingale", "555-1820").await;

        let (status, body) = send(&app, Method::GET, "/patients", None, None).await;
        assert_eq!(status, StatusCode::OK);
        let patients = body["patients"].as_array().unwrap();
        assert_eq!(patients.len(), 2);
        assert_eq!(patients[0]["full_name"], "Florence Nightingale");
        assert_eq!(patients[0]["gender"], "Female");
        assert_eq!(patients[0]["blood_group"], "AB+");

        let (_, body) = send(&app, Method::GET, "/patients?search=seacole", None, None).await;
        let patients = body["patients"].as_array().unwrap();
        assert_eq!(patients.len(), 1);
        assert_eq!(patients[0]["full_name"], "Mary Seacole");
    }

    #[tokio::test]
    async fn invalid_patient_is_bad_request() {
        let app = app(None);
        let mut body = new_patient("", "555-0000");
        body["full_name"] = json!("  ");

        let (status, resp) = send(&app, Method::POST, "/patients", Some(body), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(resp["error"].as_str().unwrap().contains("full_name"));

        let (_, list) = send(&app, Method::GET, "/patients", None, None).await;
        assert!(list["patients"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_json_uses_error_body() {
        let req = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/patients")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let resp = app(None).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn details_bad_and_unknown_ids() {
        let app = app(None);
        let (status, _) = send(&app, Method::GET, "/patients/not-a-uuid", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let uri = format!("/patients/{}", Uuid::new_v4());
        let (status, body) = send(&app, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn records_admission_and_billing_flow() {
        let app = app(None);
        let id = create(&app, "Edith Cavell", "555-1915").await;

        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/patients/{id}/medical-records"),
            Some(json!({"illness": "Influenza", "symptoms": "Fever", "doctor_name": "Dr Snow"})),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let admission = json!({"floor_number": 2, "room_number": "2B"});
        let uri = format!("/patients/{id}/admission");
        let (status, body) =
            send(&app, Method::POST, &uri, Some(admission.clone()), None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["admission"]["is_admitted"], true);
        let (status, _) = send(&app, Method::POST, &uri, Some(admission), None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/patients/{id}/billing"),
            Some(json!({"total_amount": 250.0, "amount_paid": 100.5, "payment_status": "partial"})),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["billing"]["amount_due"], 149.5);

        let (status, body) =
            send(&app, Method::GET, &format!("/patients/{id}"), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["medical_records"].as_array().unwrap().len(), 1);
        assert_eq!(body["admission"]["floor_number"], 2);
        assert_eq!(body["billing"]["payment_status"], "partial");
    }

    #[tokio::test]
    async fn overpayment_is_bad_request() {
        let app = app(None);
        let id = create(&app, "Clara Barton", "555-1881").await;
        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/patients/{id}/billing"),
            Some(json!({"total_amount": 10.0, "amount_paid": 20.0})),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn chat_failures() {
        let app = app(None);
        let (status, body) = send(
            &app,
            Method::POST,
            "/chat",
            Some(json!({"message": "Who is admitted?"})),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "chat API key is not configured");

        let (status, _) =
            send(&app, Method::POST, "/chat", Some(json!({"message": "  "})), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) =
            send(&app, Method::POST, "/chat", Some(json!({"question": "hi"})), None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].is_string());
    }

    #[test]
    fn chat_errors_other_than_blank_input_are_internal() {
        let conflict = chat_error(HospitalError::Backend {
            status: 409,
            message: "duplicate key".into(),
        });
        assert_eq!(conflict.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            chat_error(HospitalError::NotFound("patient".into())).status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            chat_error(HospitalError::InvalidInput("message must not be empty".into())).status,
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn preflight_is_answered_without_api_key() {
        let req = axum::http::Request::builder()
            .method(Method::OPTIONS)
            .uri("/patients")
            .header(header::ORIGIN, "http://localhost:5173")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type,x-api-key")
            .body(Body::empty())
            .unwrap();

        let resp = app(Some("s3cret")).oneshot(req).await.unwrap();
        assert!(resp.status().is_success(), "{}", resp.status());
        assert!(resp
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn api_key_guards_everything_but_health() {
        let app = app(Some("s3cret"));

        let (status, body) = send(&app, Method::GET, "/patients", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "missing API key");

        let (status, _) = send(&app, Method::GET, "/patients", None, Some("nope")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, Method::GET, "/patients", None, Some("s3cret")).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
    }
}
