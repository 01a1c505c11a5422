use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use http::StatusCode;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

use crate::config::{JobConfiguration, JobSettings, DEFAULT_CUTOFF_DAYS};
use crate::error::TransportError;
use crate::http::{FormPost, HttpResponse, HttpSender};

/// Replays canned responses in order and keeps every request it was given.
#[derive(Default)]
pub struct RecordingSender {
    responses: Mutex<VecDeque<Result<HttpResponse, String>>>,
    requests: Mutex<Vec<FormPost>>,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        self.responses.lock().unwrap().push_back(Ok(HttpResponse {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.to_owned(),
        }));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_owned()));
        self
    }

    pub fn requests(&self) -> Vec<FormPost> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpSender for RecordingSender {
    async fn post_form(&self, request: FormPost) -> Result<HttpResponse, TransportError> {
        let url = request.url.to_string();
        self.requests.lock().unwrap().push(request);

        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(TransportError::new(url, message)),
            None => Err(TransportError::new(url, "no response queued")),
        }
    }
}

pub fn job_configuration() -> JobConfiguration {
    JobConfiguration::from_settings(JobSettings {
        identity_server_authority: "https://identity.example.com".to_owned(),
        host_prefix: None,
        server_url: "https://cm.example.com".to_owned(),
        username: "purger".to_owned(),
        password: "hunter2".to_owned(),
        client_secret: "s3cr3t".to_owned(),
        default_cutoff_days: DEFAULT_CUTOFF_DAYS,
    })
    .unwrap()
}

pub fn field<'a>(request: &'a FormPost, name: &str) -> Option<&'a str> {
    request
        .fields
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.as_str())
}

/// Collects formatted log lines written by a scoped subscriber.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Routes this thread's logs into a buffer until the guard is dropped.
pub fn capture_logs() -> (LogBuffer, DefaultGuard) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .finish();

    (buffer, tracing::subscriber::set_default(subscriber))
}
