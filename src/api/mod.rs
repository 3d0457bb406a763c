//! Client for the vendor UI API.
//!
//! Thin, sequential wrappers over the vendor endpoints: each method builds
//! one request, executes it through the injected [`HttpClient`], and decodes
//! the response exactly once into the types in [`types`]. No retry, no token
//! refresh; vendor failures propagate unmodified.

pub mod types;

use serde::de::DeserializeOwned;
use serde_json::json;

use crate::config::{Credentials, DateWindow};
use crate::error::{Result, XngError};
use crate::http::{ApiRequest, HttpClient, HttpResponse};
use types::{
    Campaign, CampaignDetail, CampaignList, LoginResponse, MetricDefinition, Segment, Session,
    StatsGroup, StatsResponse,
};

/// Client for the vendor UI API, generic over the HTTP transport.
#[derive(Clone)]
pub struct ApiClient<C: HttpClient> {
    http: C,
}

impl<C: HttpClient> ApiClient<C> {
    pub fn new(http: C) -> Self {
        Self { http }
    }

    /// Resolve the company id for the login email, then exchange
    /// email+password for a bearer token.
    ///
    /// The companies endpoint returns a list of company ids for the email;
    /// the first one is the account to log into. An empty list, or a
    /// rejected login, is a fatal authentication error.
    #[tracing::instrument(skip_all)]
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Session> {
        let companies: Vec<u64> = self
            .send(
                ApiRequest::post("/ui/managers/companies")
                    .json_body(&json!({ "email": credentials.email }))?,
            )
            .await?;

        let company_id = *companies.first().ok_or_else(|| {
            XngError::Authentication(format!("no company found for {}", credentials.email))
        })?;

        tracing::debug!(company_id, "resolved company, logging in");

        let login: LoginResponse = self
            .send(
                ApiRequest::post("/ui/managers/login")
                    .header("company-id", company_id.to_string())
                    .json_body(&json!({
                        "email": credentials.email,
                        "password": credentials.password,
                    }))?,
            )
            .await
            .map_err(|e| match e {
                XngError::ApiStatus {
                    status: status @ (401 | 403),
                    ..
                } => XngError::Authentication(format!(
                    "login rejected for {} (status {})",
                    credentials.email, status
                )),
                other => other,
            })?;

        tracing::info!(company_id, "authenticated");

        Ok(Session {
            company_id,
            token: login.token,
            refresh_token: login.refresh_token,
        })
    }

    /// List campaigns touching the date window.
    ///
    /// The vendor call is a single page fixed at offset 0 / limit 10000;
    /// campaign sets above that size are truncated.
    #[tracing::instrument(skip_all)]
    pub async fn list_campaigns(
        &self,
        session: &Session,
        window: &DateWindow,
    ) -> Result<Vec<Campaign>> {
        let request = self
            .authed(
                session,
                ApiRequest::post("/ui/campaigns/list")
                    .header("X-XNG-ApiVersion", "2")
                    .query("offset", "0")
                    .query("limit", "10000")
                    .query("startDate", window.start_bound())
                    .query("endDate", window.end_bound()),
            )
            .json_body(&json!({
                "filter": [],
                "search": { "searchType": "name", "searchTerm": "" },
            }))?;

        let list: CampaignList = self.send(request).await?;
        tracing::info!(campaigns = list.list.len(), "fetched campaign list");
        Ok(list.list)
    }

    /// The metric-id to display-name dictionary, fetched once per run.
    pub async fn metric_definitions(&self, session: &Session) -> Result<Vec<MetricDefinition>> {
        self.send(self.authed(session, ApiRequest::get("/ui/stats/metrics")))
            .await
    }

    /// Full campaign detail (channel configs, scheduling, segment id).
    pub async fn campaign_detail(
        &self,
        session: &Session,
        campaign_id: i64,
    ) -> Result<CampaignDetail> {
        self.send(self.authed(
            session,
            ApiRequest::get(format!("/ui/campaigns/{campaign_id}/full")),
        ))
        .await
    }

    /// Daily stats breakdown for one campaign, grouped by message or
    /// variation.
    pub async fn campaign_stats(
        &self,
        session: &Session,
        campaign_id: i64,
        group: StatsGroup,
        window: &DateWindow,
    ) -> Result<StatsResponse> {
        self.send(self.authed(
            session,
            ApiRequest::get(format!("/ui/campaign/{campaign_id}/stats"))
                .header("X-XNG-ApiVersion", "2")
                .query("interval", "DAY")
                .query("groupBy", group.query_value())
                .query("startDate", window.start_bound())
                .query("endDate", window.end_bound()),
        ))
        .await
    }

    /// Segment (filter) resource by id.
    pub async fn segment(&self, session: &Session, segment_id: &str) -> Result<Segment> {
        self.send(self.authed(session, ApiRequest::get(format!("/ui/filters/{segment_id}"))))
            .await
    }

    /// Add the session headers every authenticated call carries.
    fn authed(&self, session: &Session, request: ApiRequest) -> ApiRequest {
        request
            .header("Company-Id", session.company_id.to_string())
            .header("Authorization", format!("Bearer {}", session.token))
    }

    /// Execute a request and decode the JSON body of a success response.
    async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let response = self.http.execute(&request).await?;
        let HttpResponse { status, body } = response;
        if !(200..300).contains(&status) {
            return Err(XngError::ApiStatus { status, body });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockHttpClient;

    fn ok(body: serde_json::Value) -> Result<HttpResponse> {
        Ok(HttpResponse {
            status: 200,
            body: body.to_string(),
        })
    }

    fn credentials() -> Credentials {
        Credentials {
            email: "a@b.com".to_string(),
            password: "x".to_string(),
            api_key: None,
        }
    }

    #[tokio::test]
    async fn test_authenticate_builds_session() {
        let mock = MockHttpClient::new();
        mock.add_response("POST /ui/managers/companies", ok(json!([7, 12])));
        mock.add_response(
            "POST /ui/managers/login",
            ok(json!({"token": "T1", "refreshToken": "R1"})),
        );

        let client = ApiClient::new(mock.clone());
        let session = client.authenticate(&credentials()).await.unwrap();
        assert_eq!(session.company_id, 7);
        assert_eq!(session.token, "T1");
        assert_eq!(session.refresh_token, "R1");

        let calls = mock.get_calls();
        assert_eq!(calls[1].header("company-id"), Some("7"));
        assert_eq!(
            calls[1].body.as_deref(),
            Some(r#"{"email":"a@b.com","password":"x"}"#)
        );
    }

    #[tokio::test]
    async fn test_authenticate_fails_on_empty_company_list() {
        let mock = MockHttpClient::new();
        mock.add_response("POST /ui/managers/companies", ok(json!([])));

        let client = ApiClient::new(mock);
        let error = client.authenticate(&credentials()).await.unwrap_err();
        assert!(matches!(error, XngError::Authentication(_)));
        assert!(error.to_string().contains("a@b.com"));
    }

    #[tokio::test]
    async fn test_authenticate_maps_rejected_login() {
        let mock = MockHttpClient::new();
        mock.add_response("POST /ui/managers/companies", ok(json!([7])));
        mock.add_response(
            "POST /ui/managers/login",
            Ok(HttpResponse {
                status: 401,
                body: "bad password".to_string(),
            }),
        );

        let client = ApiClient::new(mock);
        let error = client.authenticate(&credentials()).await.unwrap_err();
        assert!(matches!(error, XngError::Authentication(_)));
    }

    #[tokio::test]
    async fn test_non_success_status_surfaces_body() {
        let mock = MockHttpClient::new();
        mock.add_response(
            "GET /ui/stats/metrics",
            Ok(HttpResponse {
                status: 500,
                body: "upstream broke".to_string(),
            }),
        );

        let client = ApiClient::new(mock);
        let session = Session {
            company_id: 7,
            token: "T1".to_string(),
            refresh_token: "R1".to_string(),
        };
        let error = client.metric_definitions(&session).await.unwrap_err();
        match error {
            XngError::ApiStatus { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "upstream broke");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
