use std::time::Duration;

use embedded_svc::http::client::Client;
use embedded_svc::io::Write;
use esp_idf_svc::http::client::{Configuration, EspHttpConnection};

use crate::net::Transport;

/// One HTTP(S) connection per request, certificates checked against the built-in bundle.
pub struct HttpTransport {
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Transport for HttpTransport {
    fn post(&mut self, url: &str, headers: &[(&str, &str)], body: &[u8]) -> anyhow::Result<u16> {
        let connection = EspHttpConnection::new(&Configuration {
            crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
            timeout: Some(self.timeout),
            ..Default::default()
        })?;
        let mut client = Client::wrap(connection);

        let content_length = body.len().to_string();
        let mut all_headers = headers.to_vec();
        all_headers.push(("Content-Length", content_length.as_str()));

        let mut request = client.post(url, &all_headers)?;
        request.write_all(body)?;
        request.flush()?;
        let response = request.submit()?;

        Ok(response.status())
    }
}
