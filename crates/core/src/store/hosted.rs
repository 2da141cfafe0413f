//! Hosted backend client.
//!
//! Talks to a PostgREST-style table API (`{url}/rest/v1/{table}`):
//! - every request carries the service key as both `apikey` and bearer token,
//! - reads use `select`, `column=eq.value` filters, `order` and `limit` query parameters,
//! - inserts post a one-element array with `Prefer: return=representation` and read the
//!   stored row back from the response.

use crate::constants::{
    ADMISSIONS_TABLE, BILLING_TABLE, MEDICAL_RECORDS_TABLE, PATIENTS_TABLE, REST_PATH_PREFIX,
};
use crate::model::{
    Admission, Billing, MedicalRecord, NewAdmission, NewBilling, NewMedicalRecord, NewPatient,
    Patient, PatientBundle,
};
use crate::{HospitalError, HospitalResult};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};
use uuid::Uuid;

const NEWEST_FIRST: &str = "created_at.desc";
const BUNDLE_SELECT: &str = "*,medical_records(*),admissions(*),billing(*)";

#[derive(Debug, Clone)]
pub struct HostedStore {
    client: Client,
    base_url: String,
    key: String,
}

impl HostedStore {
    /// Build a client for the hosted backend at `base_url`.
    ///
    /// `reqwest::Client` is reference counted internally, so clones share one connection pool.
    pub fn new(base_url: String, key: String, timeout: Duration) -> HospitalResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(HospitalError::ClientBuild)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            key,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}/{}", self.base_url, REST_PATH_PREFIX, table)
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.key).bearer_auth(&self.key)
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &'static str,
        query: &[(&str, String)],
    ) -> HospitalResult<Vec<T>> {
        debug!(table, ?query, "hosted select");

        let response = self
            .authed(self.client.get(self.table_url(table)))
            .query(query)
            .send()
            .await
            .map_err(|e| {
                error!(table, error = %e, "hosted select failed (transport)");
                HospitalError::Transport(e)
            })?;

        check_status(table, response)
            .await?
            .json::<Vec<T>>()
            .await
            .map_err(HospitalError::Deserialization)
    }

    async fn select_one<T: DeserializeOwned>(
        &self,
        table: &'static str,
        column: &str,
        id: Uuid,
    ) -> HospitalResult<Option<T>> {
        let rows = self
            .select(
                table,
                &[
                    ("select", "*".to_string()),
                    (column, format!("eq.{id}")),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn insert<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &'static str,
        row: &B,
    ) -> HospitalResult<T> {
        debug!(table, "hosted insert");

        let response = self
            .authed(self.client.post(self.table_url(table)))
            .header("Prefer", "return=representation")
            .json(&[row])
            .send()
            .await
            .map_err(|e| {
                error!(table, error = %e, "hosted insert failed (transport)");
                HospitalError::Transport(e)
            })?;

        let rows = check_status(table, response)
            .await?
            .json::<Vec<T>>()
            .await
            .map_err(HospitalError::Deserialization)?;

        rows.into_iter()
            .next()
            .ok_or(HospitalError::EmptyInsert(table))
    }

    pub async fn insert_patient(&self, new: &NewPatient) -> HospitalResult<Patient> {
        self.insert(PATIENTS_TABLE, new).await
    }

    pub async fn list_patients(&self) -> HospitalResult<Vec<Patient>> {
        self.select(
            PATIENTS_TABLE,
            &[
                ("select", "*".to_string()),
                ("order", NEWEST_FIRST.to_string()),
            ],
        )
        .await
    }

    pub async fn get_patient(&self, id: Uuid) -> HospitalResult<Option<Patient>> {
        self.select_one(PATIENTS_TABLE, "id", id).await
    }

    pub async fn insert_medical_record(
        &self,
        new: &NewMedicalRecord,
    ) -> HospitalResult<MedicalRecord> {
        self.insert(MEDICAL_RECORDS_TABLE, new).await
    }

    pub async fn list_medical_records(&self, patient_id: Uuid) -> HospitalResult<Vec<MedicalRecord>> {
        self.select(
            MEDICAL_RECORDS_TABLE,
            &[
                ("select", "*".to_string()),
                ("patient_id", format!("eq.{patient_id}")),
                ("order", NEWEST_FIRST.to_string()),
            ],
        )
        .await
    }

    pub async fn insert_admission(&self, new: &NewAdmission) -> HospitalResult<Admission> {
        self.insert(ADMISSIONS_TABLE, new).await
    }

    pub async fn get_admission(&self, patient_id: Uuid) -> HospitalResult<Option<Admission>> {
        self.select_one(ADMISSIONS_TABLE, "patient_id", patient_id)
            .await
    }

    pub async fn insert_billing(&self, new: &NewBilling) -> HospitalResult<Billing> {
        self.insert(BILLING_TABLE, new).await
    }

    pub async fn get_billing(&self, patient_id: Uuid) -> HospitalResult<Option<Billing>> {
        self.select_one(BILLING_TABLE, "patient_id", patient_id).await
    }

    pub async fn list_patient_bundles(&self) -> HospitalResult<Vec<PatientBundle>> {
        self.select(PATIENTS_TABLE, &[("select", BUNDLE_SELECT.to_string())])
            .await
    }
}

// Error envelope returned by the table API.
#[derive(Debug, Deserialize)]
struct BackendErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Pass successful responses through; turn anything else into `HospitalError::Backend`.
async fn check_status(table: &'static str, response: Response) -> HospitalResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read error body>".to_string());

    let message = serde_json::from_str::<BackendErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or(body);

    error!(table, status = status.as_u16(), %message, "hosted backend rejected request");

    Err(HospitalError::Backend {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BillingForm, PatientForm};
    use axum::extract::{Query, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    const KEY: &str = "service-role-key";

    type Seen = Arc<Mutex<Vec<(String, HashMap<String, String>)>>>;

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn authorised(headers: &HeaderMap) -> bool {
        let apikey = headers.get("apikey").and_then(|v| v.to_str().ok());
        let bearer = headers.get("authorization").and_then(|v| v.to_str().ok());
        apikey == Some(KEY) && bearer == Some(format!("Bearer {KEY}").as_str())
    }

    fn patient_row(name: &str) -> Value {
        json!({
            "id": Uuid::new_v4(),
            "full_name": name,
            "date_of_birth": "1975-05-05",
            "gender": "Other",
            "contact_number": "07700 900000",
            "email": null,
            "created_at": "2026-10-01T08:00:00+00:00"
        })
    }

    async fn fake_backend(seen: Seen) -> String {
        let app = Router::new()
            .route(
                "/rest/v1/patients",
                get(
                    |State(seen): State<Seen>,
                     headers: HeaderMap,
                     Query(q): Query<HashMap<String, String>>| async move {
                        if !authorised(&headers) {
                            return (StatusCode::UNAUTHORIZED, Json(json!({"message": "bad key"})));
                        }
                        seen.lock().unwrap().push(("patients".into(), q.clone()));
                        (
                            StatusCode::OK,
                            Json(json!([patient_row("Newest"), patient_row("Oldest")])),
                        )
                    },
                )
                .post(
                    |headers: HeaderMap, Json(rows): Json<Vec<Value>>| async move {
                        let prefer = headers.get("prefer").and_then(|v| v.to_str().ok());
                        if !authorised(&headers) || prefer != Some("return=representation") {
                            return (StatusCode::BAD_REQUEST, Json(json!({"message": "bad insert"})));
                        }
                        let mut row = rows.into_iter().next().unwrap();
                        row["id"] = json!(Uuid::new_v4());
                        row["created_at"] = json!("2026-10-18T12:00:00+00:00");
                        (StatusCode::CREATED, Json(json!([row])))
                    },
                ),
            )
            .route(
                "/rest/v1/admissions",
                get(
                    |State(seen): State<Seen>, Query(q): Query<HashMap<String, String>>| async move {
                        seen.lock().unwrap().push(("admissions".into(), q));
                        Json(json!([]))
                    },
                ),
            )
            .route(
                "/rest/v1/billing",
                axum::routing::post(|| async {
                    (
                        StatusCode::CONFLICT,
                        Json(json!({
                            "code": "23505",
                            "message": "duplicate key value violates unique constraint"
                        })),
                    )
                }),
            )
            .with_state(seen);
        spawn(app).await
    }

    #[tokio::test]
    async fn list_patients_orders_newest_first_with_auth_headers() {
        let seen: Seen = Arc::default();
        let url = fake_backend(seen.clone()).await;
        let store = HostedStore::new(url, KEY.into(), Duration::from_secs(5)).unwrap();

        let patients = store.list_patients().await.expect("list should succeed");
        assert_eq!(patients.len(), 2);
        assert_eq!(patients[0].full_name, "Newest");

        let seen = seen.lock().unwrap();
        let (table, query) = &seen[0];
        assert_eq!(table, "patients");
        assert_eq!(query.get("select").map(String::as_str), Some("*"));
        assert_eq!(query.get("order").map(String::as_str), Some(NEWEST_FIRST));
    }

    #[tokio::test]
    async fn bundles_request_embedded_children() {
        let seen: Seen = Arc::default();
        let url = fake_backend(seen.clone()).await;
        let store = HostedStore::new(url, KEY.into(), Duration::from_secs(5)).unwrap();

        let bundles = store.list_patient_bundles().await.unwrap();
        assert_eq!(bundles.len(), 2);
        assert!(bundles[0].medical_records.is_empty());

        let seen = seen.lock().unwrap();
        assert_eq!(
            seen[0].1.get("select").map(String::as_str),
            Some(BUNDLE_SELECT)
        );
    }

    #[tokio::test]
    async fn insert_returns_stored_representation() {
        let url = fake_backend(Arc::default()).await;
        let store = HostedStore::new(url, KEY.into(), Duration::from_secs(5)).unwrap();

        let new = NewPatient::try_from(PatientForm {
            full_name: "Ines Duarte".into(),
            date_of_birth: "2001-12-24".into(),
            gender: "female".into(),
            contact_number: "912 345 678".into(),
            blood_group: Some("B-".into()),
            ..Default::default()
        })
        .unwrap();

        let stored = store.insert_patient(&new).await.expect("insert should succeed");
        assert_eq!(stored.full_name, "Ines Duarte");
        assert_eq!(stored.blood_group, Some(crate::model::BloodGroup::BNegative));
        assert_eq!(stored.created_at.to_rfc3339(), "2026-10-18T12:00:00+00:00");
    }

    #[tokio::test]
    async fn single_row_read_filters_by_patient_and_limits() {
        let seen: Seen = Arc::default();
        let url = fake_backend(seen.clone()).await;
        let store = HostedStore::new(url, KEY.into(), Duration::from_secs(5)).unwrap();
        let patient_id = Uuid::new_v4();

        let admission = store.get_admission(patient_id).await.unwrap();
        assert!(admission.is_none());

        let seen = seen.lock().unwrap();
        let (table, query) = &seen[0];
        assert_eq!(table, "admissions");
        assert_eq!(query.get("patient_id"), Some(&format!("eq.{patient_id}")));
        assert_eq!(query.get("limit").map(String::as_str), Some("1"));
    }

    #[tokio::test]
    async fn backend_errors_surface_status_and_message() {
        let url = fake_backend(Arc::default()).await;
        let store = HostedStore::new(url, KEY.into(), Duration::from_secs(5)).unwrap();
        let new = NewBilling::from_form(
            Uuid::new_v4(),
            BillingForm {
                total_amount: "10".into(),
                ..Default::default()
            },
        )
        .unwrap();

        match store.insert_billing(&new).await {
            Err(HospitalError::Backend { status, message }) => {
                assert_eq!(status, 409);
                assert!(message.contains("duplicate key"));
            }
            other => panic!("expected backend error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn wrong_key_is_reported_as_backend_error() {
        let url = fake_backend(Arc::default()).await;
        let store = HostedStore::new(url, "wrong".into(), Duration::from_secs(5)).unwrap();

        let err = store.list_patients().await.unwrap_err();
        assert!(matches!(err, HospitalError::Backend { status: 401, .. }));
    }
}
