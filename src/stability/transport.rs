use super::form::{FormField, FormPayload};
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub form: FormPayload,
}

impl OutboundRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Sends one multipart POST and returns the raw status and body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_multipart(&self, request: OutboundRequest) -> Result<TransportResponse>;
}

#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn to_multipart(payload: FormPayload) -> Result<Form> {
        let mut form = Form::new();
        for field in payload.fields {
            form = match field {
                FormField::Text { name, value } => form.text(name, value),
                FormField::File {
                    name,
                    file_name,
                    mime,
                    bytes,
                } => {
                    let part = Part::bytes(bytes)
                        .file_name(file_name)
                        .mime_str(&mime)
                        .map_err(|e| GatewayError::ImageError(e.to_string()))?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post_multipart(&self, request: OutboundRequest) -> Result<TransportResponse> {
        let form = Self::to_multipart(request.form)?;

        let mut builder = self.client.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.multipart(form).send().await.map_err(|e| {
            log::error!("HTTP error: {}", e);
            GatewayError::TransportFailure(e.to_string())
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            log::error!("Failed to read response body: {}", e);
            GatewayError::TransportFailure(e.to_string())
        })?;

        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    fn edit_payload(mime: &str) -> FormPayload {
        FormPayload {
            fields: vec![
                FormField::Text {
                    name: "text_prompts[0][text]".to_string(),
                    value: "make it snow".to_string(),
                },
                FormField::Text {
                    name: "image_strength".to_string(),
                    value: "0.35".to_string(),
                },
                FormField::File {
                    name: "init_image".to_string(),
                    file_name: "init_image.png".to_string(),
                    mime: mime.to_string(),
                    bytes: vec![0x89, 0x50, 0x4E, 0x47],
                },
            ],
        }
    }

    fn local_transport() -> ReqwestTransport {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        ReqwestTransport::with_client(client)
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack
            .windows(needle.len())
            .position(|window| window == needle)
    }

    async fn read_request(socket: &mut TcpStream) -> Vec<u8> {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 8192];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            if let Some(end) = find(&buf, b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                let body = &buf[end + 4..];
                let length = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|value| value.trim().parse::<usize>().ok());
                match length {
                    Some(length) if body.len() >= length => break,
                    None if body.ends_with(b"0\r\n\r\n") => break,
                    _ => {}
                }
            }
        }
        buf
    }

    /// Accepts one connection, answers with `status` and `body`, returns the raw request.
    async fn serve_once(status: &'static str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let body = body.to_string();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let raw = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&raw).into_owned()
        });

        (format!("http://{}", addr), handle)
    }

    #[test]
    fn test_to_multipart_accepts_png_part() {
        let form = ReqwestTransport::to_multipart(edit_payload("image/png")).unwrap();
        assert!(!form.boundary().is_empty());
    }

    #[test]
    fn test_to_multipart_rejects_bad_mime() {
        let result = ReqwestTransport::to_multipart(edit_payload("not a mime"));
        assert!(matches!(result, Err(GatewayError::ImageError(_))));
    }

    #[tokio::test]
    async fn test_post_sends_headers_and_parts() {
        let (base, server) = serve_once("200 OK", r#"{"artifacts":[]}"#).await;

        let request = OutboundRequest {
            url: format!("{}/v1/generation/sdxl/image-to-image", base),
            headers: vec![
                ("Accept".to_string(), "application/json".to_string()),
                ("Authorization".to_string(), "Bearer sk-local".to_string()),
            ],
            form: edit_payload("image/png"),
        };
        let response = local_transport().post_multipart(request).await.unwrap();
        let raw = server.await.unwrap();
        let lowered = raw.to_lowercase();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, r#"{"artifacts":[]}"#);

        assert!(raw.starts_with("POST /v1/generation/sdxl/image-to-image HTTP/1.1\r\n"));
        assert!(lowered.contains("\r\naccept: application/json\r\n"));
        assert!(lowered.contains("\r\nauthorization: bearer sk-local\r\n"));
        assert!(lowered.contains("content-type: multipart/form-data; boundary="));

        assert!(raw.contains(r#"name="text_prompts[0][text]""#));
        assert!(raw.contains("make it snow"));
        assert!(raw.contains(r#"name="image_strength""#));
        assert!(raw.contains(r#"name="init_image"; filename="init_image.png""#));
        assert!(lowered.contains("content-type: image/png"));
        assert_eq!(raw.matches("filename=").count(), 1);
    }

    #[tokio::test]
    async fn test_post_returns_error_status_and_body_verbatim() {
        let (base, server) = serve_once("403 Forbidden", "invalid api key").await;

        let request = OutboundRequest {
            url: format!("{}/v1/generation/sdxl/text-to-image", base),
            headers: vec![("Authorization".to_string(), "Bearer sk-bad".to_string())],
            form: FormPayload::default(),
        };
        let response = local_transport().post_multipart(request).await.unwrap();
        server.await.unwrap();

        assert_eq!(response.status, 403);
        assert_eq!(response.body, "invalid api key");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let request = OutboundRequest {
            url: format!("http://{}/v1/generation/sdxl/text-to-image", addr),
            headers: vec![],
            form: FormPayload::default(),
        };
        let result = local_transport().post_multipart(request).await;

        assert!(matches!(result, Err(GatewayError::TransportFailure(_))));
    }
}
