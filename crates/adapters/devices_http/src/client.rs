//! Shared `PUT` plumbing for both device services.

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{StatusCode, Url};

use geppetto_app::ports::LightState;

use crate::error::HttpDeviceError;

/// A device service reachable under one base URL.
#[derive(Debug, Clone)]
pub(crate) struct ServiceClient {
    http: reqwest::Client,
    base: Url,
}

impl ServiceClient {
    /// `base` may be given with or without a trailing slash.
    pub(crate) fn new(http: reqwest::Client, base: &str) -> Result<Self, HttpDeviceError> {
        let normalized = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        };
        let base = Url::parse(&normalized)
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https"))
            .ok_or_else(|| HttpDeviceError::InvalidBaseUrl(base.to_string()))?;
        Ok(Self { http, base })
    }

    /// Append `segments` to the base path, percent-encoding each one.
    ///
    /// `.` and `..` are refused so a device name can never leave its
    /// resource.
    fn url(&self, segments: &[&str]) -> Result<Url, HttpDeviceError> {
        if let Some(segment) = segments.iter().find(|s| matches!(**s, "." | "..")) {
            return Err(HttpDeviceError::InvalidDeviceName((*segment).to_string()));
        }
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| HttpDeviceError::InvalidBaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `PUT` to the resource at `segments`, expecting `200 OK`.
    pub(crate) async fn put(
        &self,
        segments: &[&str],
        accept: Option<&'static str>,
        body: Option<(&'static str, &LightState)>,
    ) -> Result<(), HttpDeviceError> {
        let url = self.url(segments)?;
        let mut request = self.http.put(url.clone());
        if let Some(accept) = accept {
            request = request.header(ACCEPT, accept);
        }
        if let Some((content_type, state)) = body {
            request = request.header(CONTENT_TYPE, content_type).json(state);
        }

        let response = request.send().await.map_err(|err| {
            tracing::debug!(%url, successful = false, error = %err, "device request failed");
            HttpDeviceError::Request(err)
        })?;
        let status = response.status();
        let successful = status == StatusCode::OK;
        tracing::debug!(%url, %status, successful, "device request done");

        if successful {
            Ok(())
        } else {
            Err(HttpDeviceError::Status(status))
        }
    }
}
