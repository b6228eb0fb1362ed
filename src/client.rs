// src/client.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::models::{Appointment, AppointmentPayload, Doctor, Patient, Stats};

/// The clinic REST API as seen by the desk.
#[async_trait]
pub trait ClinicApi: Send + Sync {
    async fn list_appointments(&self) -> Result<Vec<Appointment>, ClientError>;
    async fn get_stats(&self) -> Result<Stats, ClientError>;
    async fn list_patients(&self) -> Result<Vec<Patient>, ClientError>;
    async fn list_doctors(&self) -> Result<Vec<Doctor>, ClientError>;
    async fn create_appointment(
        &self,
        payload: &AppointmentPayload,
    ) -> Result<Appointment, ClientError>;
    async fn update_appointment(
        &self,
        id: i64,
        payload: &AppointmentPayload,
    ) -> Result<Appointment, ClientError>;
    async fn delete_appointment(&self, id: i64) -> Result<(), ClientError>;
}

/// reqwest-backed client. No timeout unless one is configured.
pub struct HttpClinicApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpClinicApi {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "api request");
        self.client.request(method, url)
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, ClientError> {
        let response = req.send().await.map_err(|e| {
            if e.is_connect() {
                ClientError::Transport(format!("cannot reach {}: {e}", self.base_url))
            } else {
                ClientError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        self.send(req)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ClinicApi for HttpClinicApi {
    async fn list_appointments(&self) -> Result<Vec<Appointment>, ClientError> {
        self.json(self.request(Method::GET, "/appointments")).await
    }

    async fn get_stats(&self) -> Result<Stats, ClientError> {
        self.json(self.request(Method::GET, "/stats")).await
    }

    async fn list_patients(&self) -> Result<Vec<Patient>, ClientError> {
        self.json(self.request(Method::GET, "/patients")).await
    }

    async fn list_doctors(&self) -> Result<Vec<Doctor>, ClientError> {
        self.json(self.request(Method::GET, "/doctors")).await
    }

    async fn create_appointment(
        &self,
        payload: &AppointmentPayload,
    ) -> Result<Appointment, ClientError> {
        self.json(self.request(Method::POST, "/appointments").json(payload))
            .await
    }

    async fn update_appointment(
        &self,
        id: i64,
        payload: &AppointmentPayload,
    ) -> Result<Appointment, ClientError> {
        self.json(self.request(Method::PUT, &format!("/appointments/{id}")).json(payload))
            .await
    }

    async fn delete_appointment(&self, id: i64) -> Result<(), ClientError> {
        // body is a confirmation message; nothing to decode
        self.send(self.request(Method::DELETE, &format!("/appointments/{id}")))
            .await?;
        Ok(())
    }
}
