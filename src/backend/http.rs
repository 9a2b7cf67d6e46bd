//! reqwest-based transport

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::Client;

use super::{Attachment, BackendError, OutboundRequest, RawReply, Transport};

/// Where the rendering layer fetches a generated artifact
pub fn download_url(base_url: &str, filename: &str) -> String {
    format!(
        "{}/download/{}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(filename)
    )
}

pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn file_part(file: Attachment) -> Result<Part, BackendError> {
        let mime = file.mime_type();
        let part = Part::bytes(file.bytes)
            .file_name(file.name)
            .mime_str(mime)?;
        Ok(part)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: OutboundRequest) -> Result<RawReply, BackendError> {
        let url = format!("{}{}", self.base_url, request.endpoint().path());

        let builder = match request {
            OutboundRequest::Json(payload) => self.client.post(&url).json(&payload),
            OutboundRequest::Multipart { payload, file } => {
                let mut form = Form::new().part("file", Self::file_part(file)?);
                for (name, value) in payload.form_fields() {
                    form = form.text(name, value);
                }
                self.client.post(&url).multipart(form)
            }
        };

        let response = builder.send().await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.text().await?;

        tracing::debug!(%url, status, %content_type, "Backend replied");

        Ok(RawReply {
            status,
            content_type,
            body,
        })
    }
}
