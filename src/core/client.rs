//! Typed REST client for the GearGuard backend
//!
//! HTTP goes through the [`Transport`] trait so commands and the kanban
//! board can be exercised against an in-memory fake.

use std::time::Duration;

use chrono::NaiveDate;
use miette::Diagnostic;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::entities::{
    CalendarEvent, Equipment, EquipmentInput, EquipmentList, EquipmentStatus, LoginRequest,
    MaintenanceRequest, MaintenanceTeam, MemberAdd, MemberUpdate, NewRequest, RegisterRequest,
    Report, RequestStatus, RequestType, RequestUpdate, TeamInput, Token, User, UserRole,
    UserUpdate,
};

#[derive(Debug, Error, Diagnostic)]
pub enum ApiError {
    #[error("could not reach {url}: {message}")]
    #[diagnostic(
        code(gearguard::api::transport),
        help("check that the backend is running, or pass --server")
    )]
    Transport { url: String, message: String },

    #[error("session expired or missing: {detail}")]
    #[diagnostic(code(gearguard::api::unauthorized), help("run `gearguard login`"))]
    Unauthorized { detail: String },

    #[error("{detail}")]
    #[diagnostic(code(gearguard::api::status))]
    Status { status: u16, detail: String },

    #[error("unexpected response from {path}: {message}")]
    #[diagnostic(code(gearguard::api::decode))]
    Decode { path: String, message: String },

    #[error("invalid server URL '{0}'")]
    #[diagnostic(
        code(gearguard::api::url),
        help("use a full URL such as http://localhost:8000")
    )]
    InvalidUrl(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn query_opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one HTTP exchange; status codes are not interpreted here
pub trait Transport {
    fn send(&self, request: &ApiRequest, token: Option<&str>) -> Result<ApiResponse, ApiError>;
}

/// Blocking reqwest transport
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ApiError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::InvalidUrl(base_url));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("gearguard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Transport {
                url: base_url.clone(),
                message: e.to_string(),
            })?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest, token: Option<&str>) -> Result<ApiResponse, ApiError> {
        let url = format!("{}{}", self.base_url, request.path);

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let resp = builder.send().map_err(|e| ApiError::Transport {
            url: url.clone(),
            message: e.to_string(),
        })?;
        let status = resp.status().as_u16();
        let body = resp.text().map_err(|e| ApiError::Transport {
            url,
            message: e.to_string(),
        })?;

        Ok(ApiResponse { status, body })
    }
}

/// Pull the human message out of an error body.
///
/// The backend sends `{"detail": "..."}` for handled errors and
/// `{"detail": [{"msg": ...}, ...]}` for request validation failures.
pub fn error_detail(status: u16, body: &str) -> String {
    let fallback = || format!("Request failed ({})", status);
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return fallback();
    };
    match value.get("detail") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Array(items)) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if msgs.is_empty() {
                fallback()
            } else {
                msgs.join("; ")
            }
        }
        _ => fallback(),
    }
}

/// Filters for `GET /api/equipment`
#[derive(Debug, Clone, Default)]
pub struct EquipmentQuery {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub department: Option<String>,
    pub status: Option<EquipmentStatus>,
}

impl EquipmentQuery {
    /// Filter values in order, used as cache key parts
    pub fn key_parts(&self) -> Vec<String> {
        vec![
            self.skip.map(|v| v.to_string()).unwrap_or_default(),
            self.limit.map(|v| v.to_string()).unwrap_or_default(),
            self.search.clone().unwrap_or_default(),
            self.department.clone().unwrap_or_default(),
            self.status.map(|s| s.to_string()).unwrap_or_default(),
        ]
    }
}

/// Filters for `GET /api/maintenance-requests`
#[derive(Debug, Clone, Default)]
pub struct RequestQuery {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<RequestStatus>,
    pub request_type: Option<RequestType>,
    pub equipment_id: Option<i64>,
    pub team_id: Option<i64>,
}

impl RequestQuery {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Default::default()
        }
    }

    pub fn key_parts(&self) -> Vec<String> {
        vec![
            self.skip.map(|v| v.to_string()).unwrap_or_default(),
            self.limit.map(|v| v.to_string()).unwrap_or_default(),
            self.status.as_ref().map(|s| s.to_string()).unwrap_or_default(),
            self.request_type.map(|t| t.to_string()).unwrap_or_default(),
            self.equipment_id.map(|v| v.to_string()).unwrap_or_default(),
            self.team_id.map(|v| v.to_string()).unwrap_or_default(),
        ]
    }
}

pub struct ApiClient<T: Transport = HttpTransport> {
    transport: T,
    token: Option<String>,
    read_retries: u32,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            token: None,
            read_retries: 1,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn with_read_retries(mut self, retries: u32) -> Self {
        self.read_retries = retries;
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Execute a request and turn non-2xx statuses into errors.
    ///
    /// A failed GET is retried `read_retries` times whatever the failure;
    /// mutations are sent exactly once.
    pub fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let attempts = if request.method == Method::Get {
            self.read_retries + 1
        } else {
            1
        };

        let mut attempt = 0;
        loop {
            attempt += 1;
            tracing::debug!(method = %request.method, path = %request.path, attempt, "api call");
            let result = self
                .transport
                .send(request, self.token.as_deref())
                .and_then(check_status);
            match result {
                Err(e) if attempt < attempts => {
                    tracing::warn!(path = %request.path, error = %e, "retrying read");
                }
                other => return other,
            }
        }
    }

    fn call<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        let resp = self.execute(&request)?;
        serde_json::from_str(&resp.body).map_err(|e| ApiError::Decode {
            path: request.path.clone(),
            message: e.to_string(),
        })
    }

    fn call_empty(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.execute(&request).map(|_| ())
    }

    fn get<R: DeserializeOwned>(&self, path: impl Into<String>) -> Result<R, ApiError> {
        self.call(ApiRequest::new(Method::Get, path))
    }

    fn send_body<B: Serialize, R: DeserializeOwned>(
        &self,
        method: Method,
        path: impl Into<String>,
        body: &B,
    ) -> Result<R, ApiError> {
        let path = path.into();
        let value = serde_json::to_value(body).map_err(|e| ApiError::Decode {
            path: path.clone(),
            message: e.to_string(),
        })?;
        self.call(ApiRequest::new(method, path).body(value))
    }

    // ----- auth -----

    /// Exchange credentials for a bearer token.
    ///
    /// A 401 here means bad credentials, not an expired session.
    pub fn login(&self, username: &str, password: &str) -> Result<Token, ApiError> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.send_body(Method::Post, "/api/auth/login", &body)
            .map_err(|e| match e {
                ApiError::Unauthorized { detail } => ApiError::Status { status: 401, detail },
                other => other,
            })
    }

    pub fn register(&self, body: &RegisterRequest) -> Result<User, ApiError> {
        self.send_body(Method::Post, "/api/auth/register", body)
    }

    pub fn me(&self) -> Result<User, ApiError> {
        self.get("/api/auth/me")
    }

    pub fn list_users(&self, role: Option<UserRole>) -> Result<Vec<User>, ApiError> {
        self.call(ApiRequest::new(Method::Get, "/api/auth/users").query_opt("role", role))
    }

    pub fn create_user(&self, body: &RegisterRequest) -> Result<User, ApiError> {
        self.send_body(Method::Post, "/api/auth/users", body)
    }

    pub fn update_user(&self, id: i64, body: &UserUpdate) -> Result<User, ApiError> {
        self.send_body(Method::Put, format!("/api/auth/users/{}", id), body)
    }

    pub fn delete_user(&self, id: i64) -> Result<(), ApiError> {
        self.call_empty(ApiRequest::new(Method::Delete, format!("/api/auth/users/{}", id)))
    }

    // ----- equipment -----

    pub fn list_equipment(&self, query: &EquipmentQuery) -> Result<EquipmentList, ApiError> {
        let request = ApiRequest::new(Method::Get, "/api/equipment")
            .query_opt("skip", query.skip)
            .query_opt("limit", query.limit)
            .query_opt("search", query.search.as_deref().filter(|s| !s.is_empty()))
            .query_opt("department", query.department.as_deref().filter(|s| !s.is_empty()))
            .query_opt("status", query.status);
        self.call(request)
    }

    pub fn get_equipment(&self, id: i64) -> Result<Equipment, ApiError> {
        self.get(format!("/api/equipment/{}", id))
    }

    pub fn create_equipment(&self, body: &EquipmentInput) -> Result<Equipment, ApiError> {
        self.send_body(Method::Post, "/api/equipment", body)
    }

    /// Full replacement; send every field
    pub fn update_equipment(&self, id: i64, body: &EquipmentInput) -> Result<Equipment, ApiError> {
        self.send_body(Method::Put, format!("/api/equipment/{}", id), body)
    }

    pub fn delete_equipment(&self, id: i64) -> Result<(), ApiError> {
        self.call_empty(ApiRequest::new(Method::Delete, format!("/api/equipment/{}", id)))
    }

    pub fn equipment_requests(&self, id: i64) -> Result<Vec<MaintenanceRequest>, ApiError> {
        self.get(format!("/api/equipment/{}/maintenance-requests", id))
    }

    // ----- maintenance requests -----

    pub fn list_requests(&self, query: &RequestQuery) -> Result<Vec<MaintenanceRequest>, ApiError> {
        let request = ApiRequest::new(Method::Get, "/api/maintenance-requests")
            .query_opt("skip", query.skip)
            .query_opt("limit", query.limit)
            .query_opt("status", query.status.as_ref())
            .query_opt("request_type", query.request_type)
            .query_opt("equipment_id", query.equipment_id)
            .query_opt("team_id", query.team_id);
        self.call(request)
    }

    pub fn get_request(&self, id: i64) -> Result<MaintenanceRequest, ApiError> {
        self.get(format!("/api/maintenance-requests/{}", id))
    }

    pub fn create_request(&self, body: &NewRequest) -> Result<MaintenanceRequest, ApiError> {
        self.send_body(Method::Post, "/api/maintenance-requests", body)
    }

    pub fn update_request(
        &self,
        id: i64,
        body: &RequestUpdate,
    ) -> Result<MaintenanceRequest, ApiError> {
        self.send_body(Method::Put, format!("/api/maintenance-requests/{}", id), body)
    }

    pub fn delete_request(&self, id: i64) -> Result<(), ApiError> {
        self.call_empty(ApiRequest::new(
            Method::Delete,
            format!("/api/maintenance-requests/{}", id),
        ))
    }

    pub fn calendar_events(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<CalendarEvent>, ApiError> {
        let request = ApiRequest::new(Method::Get, "/api/maintenance-requests/calendar/preventive")
            .query_opt("start_date", start)
            .query_opt("end_date", end);
        self.call(request)
    }

    // ----- teams -----

    pub fn list_teams(&self) -> Result<Vec<MaintenanceTeam>, ApiError> {
        self.get("/api/maintenance-teams")
    }

    pub fn get_team(&self, id: i64) -> Result<MaintenanceTeam, ApiError> {
        self.get(format!("/api/maintenance-teams/{}", id))
    }

    pub fn create_team(&self, name: &str) -> Result<MaintenanceTeam, ApiError> {
        let body = TeamInput {
            team_name: name.to_string(),
        };
        self.send_body(Method::Post, "/api/maintenance-teams", &body)
    }

    pub fn rename_team(&self, id: i64, name: &str) -> Result<MaintenanceTeam, ApiError> {
        let body = TeamInput {
            team_name: name.to_string(),
        };
        self.send_body(Method::Put, format!("/api/maintenance-teams/{}", id), &body)
    }

    pub fn delete_team(&self, id: i64) -> Result<(), ApiError> {
        self.call_empty(ApiRequest::new(
            Method::Delete,
            format!("/api/maintenance-teams/{}", id),
        ))
    }

    pub fn add_member(&self, team_id: i64, body: &MemberAdd) -> Result<MaintenanceTeam, ApiError> {
        self.send_body(
            Method::Post,
            format!("/api/maintenance-teams/{}/members", team_id),
            body,
        )
    }

    pub fn update_member(
        &self,
        team_id: i64,
        user_id: i64,
        body: &MemberUpdate,
    ) -> Result<MaintenanceTeam, ApiError> {
        self.send_body(
            Method::Put,
            format!("/api/maintenance-teams/{}/members/{}", team_id, user_id),
            body,
        )
    }

    pub fn remove_member(&self, team_id: i64, user_id: i64) -> Result<(), ApiError> {
        self.call_empty(ApiRequest::new(
            Method::Delete,
            format!("/api/maintenance-teams/{}/members/{}", team_id, user_id),
        ))
    }

    // ----- misc -----

    pub fn reports(&self) -> Result<Report, ApiError> {
        self.get("/api/reports")
    }

    /// Backend liveness; returns the raw JSON body
    pub fn health(&self) -> Result<Value, ApiError> {
        self.get("/api/health")
    }
}

fn check_status(resp: ApiResponse) -> Result<ApiResponse, ApiError> {
    if resp.is_success() {
        return Ok(resp);
    }
    let detail = error_detail(resp.status, &resp.body);
    if resp.status == 401 {
        Err(ApiError::Unauthorized { detail })
    } else {
        Err(ApiError::Status {
            status: resp.status,
            detail,
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;

    /// Scripted transport: replays queued responses and records every request
    #[derive(Default)]
    pub struct FakeTransport {
        pub responses: RefCell<VecDeque<Result<ApiResponse, ApiError>>>,
        pub calls: RefCell<Vec<(ApiRequest, Option<String>)>>,
    }

    impl FakeTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, status: u16, body: &str) -> Self {
            self.responses.borrow_mut().push_back(Ok(ApiResponse {
                status,
                body: body.to_string(),
            }));
            self
        }

        pub fn fail(self, message: &str) -> Self {
            self.responses.borrow_mut().push_back(Err(ApiError::Transport {
                url: "http://fake".to_string(),
                message: message.to_string(),
            }));
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }

        pub fn last_call(&self) -> Option<ApiRequest> {
            self.calls.borrow().last().map(|(req, _)| req.clone())
        }
    }

    impl Transport for FakeTransport {
        fn send(&self, request: &ApiRequest, token: Option<&str>) -> Result<ApiResponse, ApiError> {
            self.calls
                .borrow_mut()
                .push((request.clone(), token.map(str::to_string)));
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Transport {
                    url: "http://fake".to_string(),
                    message: "no scripted response".to_string(),
                }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeTransport;
    use super::*;

    #[test]
    fn test_error_detail_variants() {
        assert_eq!(
            error_detail(400, r#"{"detail": "Team name already exists"}"#),
            "Team name already exists"
        );
        assert_eq!(
            error_detail(
                422,
                r#"{"detail": [{"loc": ["body", "email"], "msg": "value is not a valid email address"},
                               {"loc": ["body"], "msg": "field required"}]}"#
            ),
            "value is not a valid email address; field required"
        );
        assert_eq!(error_detail(502, "<html>Bad gateway</html>"), "Request failed (502)");
        assert_eq!(error_detail(500, r#"{"error": "x"}"#), "Request failed (500)");
    }

    #[test]
    fn test_bearer_token_is_forwarded() {
        let client = ApiClient::new(FakeTransport::new().respond(
            200,
            r#"{"id": 1, "username": "admin", "role": "ADMIN"}"#,
        ))
        .with_token(Some("tok-123".to_string()));

        let me = client.me().unwrap();
        assert!(me.is_admin());
        let calls = client.transport().calls.borrow();
        assert_eq!(calls[0].0.path, "/api/auth/me");
        assert_eq!(calls[0].1.as_deref(), Some("tok-123"));
    }

    #[test]
    fn test_401_is_unauthorized_except_on_login() {
        let client = ApiClient::new(
            FakeTransport::new()
                .respond(401, r#"{"detail": "Could not validate credentials"}"#)
                .respond(401, r#"{"detail": "Could not validate credentials"}"#)
                .respond(401, r#"{"detail": "Incorrect username or password"}"#),
        );

        let err = client.me().unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized { .. }));

        let err = client.login("kim", "wrong").unwrap_err();
        match err {
            ApiError::Status { status, detail } => {
                assert_eq!(status, 401);
                assert_eq!(detail, "Incorrect username or password");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_reads_retry_once_after_transport_failure() {
        let client = ApiClient::new(FakeTransport::new().fail("connection reset").respond(200, "[]"));
        let teams = client.list_teams().unwrap();
        assert!(teams.is_empty());
        assert_eq!(client.transport().call_count(), 2);
    }

    #[test]
    fn test_reads_give_up_after_configured_retries() {
        let client = ApiClient::new(FakeTransport::new().fail("down").fail("down").respond(200, "[]"))
            .with_read_retries(1);
        assert!(matches!(client.list_teams(), Err(ApiError::Transport { .. })));
        assert_eq!(client.transport().call_count(), 2);
    }

    #[test]
    fn test_mutations_are_never_retried() {
        let client = ApiClient::new(FakeTransport::new().fail("timeout").respond(201, "{}"));
        assert!(client.delete_request(4).is_err());
        assert_eq!(client.transport().call_count(), 1);
    }

    #[test]
    fn test_failed_reads_retry_once_whatever_the_status() {
        let client = ApiClient::new(
            FakeTransport::new()
                .respond(404, r#"{"detail": "Equipment not found"}"#)
                .respond(404, r#"{"detail": "Equipment not found"}"#),
        );
        let err = client.get_equipment(99).unwrap_err();
        assert_eq!(err.to_string(), "Equipment not found");
        assert_eq!(err.status(), Some(404));
        assert_eq!(client.transport().call_count(), 2);
    }

    #[test]
    fn test_read_recovers_after_server_error() {
        let client = ApiClient::new(
            FakeTransport::new()
                .respond(500, r#"{"detail": "boom"}"#)
                .respond(200, "[]"),
        );
        assert!(client.list_teams().unwrap().is_empty());
        assert_eq!(client.transport().call_count(), 2);
    }

    #[test]
    fn test_list_requests_query_string() {
        let client = ApiClient::new(FakeTransport::new().respond(200, "[]"));
        let query = RequestQuery {
            limit: Some(1000),
            status: Some(RequestStatus::InProgress),
            team_id: Some(3),
            ..Default::default()
        };
        client.list_requests(&query).unwrap();

        let call = client.transport().last_call().unwrap();
        assert_eq!(call.path, "/api/maintenance-requests");
        assert_eq!(
            call.query,
            vec![
                ("limit".to_string(), "1000".to_string()),
                ("status".to_string(), "IN_PROGRESS".to_string()),
                ("team_id".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_status_update_body() {
        let client = ApiClient::new(FakeTransport::new().fail("offline"));
        let _ = client.update_request(12, &RequestUpdate::status_only(RequestStatus::Scrap));

        let call = client.transport().last_call().unwrap();
        assert_eq!(call.method, Method::Put);
        assert_eq!(call.path, "/api/maintenance-requests/12");
        assert_eq!(call.body, Some(serde_json::json!({ "status": "SCRAP" })));
    }

    #[test]
    fn test_delete_accepts_empty_204() {
        let client = ApiClient::new(FakeTransport::new().respond(204, ""));
        client.remove_member(2, 9).unwrap();
        let call = client.transport().last_call().unwrap();
        assert_eq!(call.path, "/api/maintenance-teams/2/members/9");
    }

    #[test]
    fn test_decode_error_names_path() {
        let client = ApiClient::new(FakeTransport::new().respond(200, "{not json"));
        let err = client.reports().unwrap_err();
        assert!(matches!(err, ApiError::Decode { ref path, .. } if path == "/api/reports"));
    }

    #[test]
    fn test_invalid_server_url() {
        assert!(matches!(
            HttpTransport::new("localhost:8000", 5),
            Err(ApiError::InvalidUrl(_))
        ));
        assert!(HttpTransport::new("http://localhost:8000/", 5).is_ok());
    }
}
