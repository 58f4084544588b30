//! HTTP client for the TutorHub backend
//!
//! Session credentials are kept in the client's cookie store, so every
//! request after login carries the session cookie.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, warn};
use tutorhub_core::{
    AvailabilitySlot, BookingDecision, BookingId, BookingRequest, ClassSession, ClassSessionId,
    ClientConfig, Credentials, NewBookingRequest, NewComment, NewPost, NewScheduleEntry, Post,
    ScheduleEntry, ScheduleEntryId, User,
};

use crate::api::TutoringApi;
use crate::error::{Error, Result};
use crate::protocol::{self, CurrentUserResponse};

/// `reqwest`-backed implementation of [`TutoringApi`]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let user_agent = config
            .user_agent
            .clone()
            .unwrap_or_else(|| format!("tutorhub-client/{}", env!("CARGO_PKG_VERSION")));

        let mut builder = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(user_agent);

        // No timeout unless configured; the transport default applies
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{}", self.base_url, path))
    }

    async fn send(&self, name: &str, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            error!(request = name, error = %e, "Request failed to complete");
            Error::transport(e)
        })?;
        Self::check_response(name, response).await
    }

    async fn check_response(name: &str, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            debug!(request = name, status = status.as_u16(), "Request succeeded");
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            debug!(request = name, status = status.as_u16(), "Not authenticated");
            return Err(Error::Unauthorized {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.unwrap_or_default();
        let message = protocol::error_message(&body, status.canonical_reason());
        warn!(request = name, status = status.as_u16(), message = %message, "Request rejected");

        Err(Error::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(name: &str, response: Response) -> Result<T> {
        let bytes = response.bytes().await.map_err(Error::transport)?;
        serde_json::from_slice(&bytes).map_err(|e| {
            error!(request = name, error = %e, "Could not decode response");
            Error::Decode(e)
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, name: &str, path: &str) -> Result<T> {
        let response = self.send(name, self.request(Method::GET, path)).await?;
        Self::decode(name, response).await
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        name: &str,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.send(name, self.request(method, path).json(body)).await?;
        Self::decode(name, response).await
    }

    /// Send a request whose response body is ignored
    async fn send_unit(&self, name: &str, request: RequestBuilder) -> Result<()> {
        self.send(name, request).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl TutoringApi for HttpClient {
    async fn login(&self, credentials: &Credentials) -> Result<()> {
        self.send_unit(
            "login",
            self.request(Method::POST, protocol::LOGIN).json(credentials),
        )
        .await
    }

    async fn current_user(&self) -> Result<User> {
        let envelope: CurrentUserResponse =
            self.get_json("current_user", protocol::CURRENT_USER).await?;
        Ok(envelope.user)
    }

    async fn logout(&self) -> Result<()> {
        self.send_unit("logout", self.request(Method::POST, protocol::LOGOUT))
            .await
    }

    async fn list_availabilities(&self) -> Result<Vec<AvailabilitySlot>> {
        self.get_json("list_availabilities", protocol::AVAILABILITIES)
            .await
    }

    async fn my_bookings(&self) -> Result<Vec<BookingRequest>> {
        self.get_json("my_bookings", protocol::MY_BOOKINGS).await
    }

    async fn request_booking(&self, request: &NewBookingRequest) -> Result<BookingRequest> {
        self.send_json(
            "request_booking",
            Method::POST,
            protocol::REQUEST_BOOKING,
            request,
        )
        .await
    }

    async fn tutor_schedule(&self) -> Result<Vec<ScheduleEntry>> {
        self.get_json("tutor_schedule", protocol::TUTOR_SCHEDULE).await
    }

    async fn create_schedule_entry(&self, entry: &NewScheduleEntry) -> Result<ScheduleEntry> {
        self.send_json(
            "create_schedule_entry",
            Method::POST,
            protocol::TUTOR_SCHEDULE,
            entry,
        )
        .await
    }

    async fn delete_schedule_entry(&self, id: ScheduleEntryId) -> Result<()> {
        self.send_unit(
            "delete_schedule_entry",
            self.request(Method::DELETE, &protocol::schedule_entry(id)),
        )
        .await
    }

    async fn tutor_booking_requests(&self) -> Result<Vec<BookingRequest>> {
        self.get_json("tutor_booking_requests", protocol::TUTOR_BOOKING_REQUESTS)
            .await
    }

    async fn decide_booking_request(
        &self,
        id: BookingId,
        decision: BookingDecision,
    ) -> Result<BookingRequest> {
        let response = self
            .send(
                "decide_booking_request",
                self.request(Method::PATCH, &protocol::booking_decision(id, decision)),
            )
            .await?;
        Self::decode("decide_booking_request", response).await
    }

    async fn community_sessions(&self) -> Result<Vec<ClassSession>> {
        self.get_json("community_sessions", protocol::COMMUNITY_SESSIONS)
            .await
    }

    async fn community_posts(&self, session_id: ClassSessionId) -> Result<Vec<Post>> {
        self.get_json("community_posts", &protocol::session_posts(session_id))
            .await
    }

    async fn create_post(&self, post: &NewPost) -> Result<()> {
        self.send_unit(
            "create_post",
            self.request(Method::POST, protocol::COMMUNITY_POSTS).json(post),
        )
        .await
    }

    async fn create_comment(&self, comment: &NewComment) -> Result<()> {
        self.send_unit(
            "create_comment",
            self.request(Method::POST, protocol::COMMUNITY_COMMENTS)
                .json(comment),
        )
        .await
    }
}
