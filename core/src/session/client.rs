//! Session client
//!
//! Every logical operation walks the same small state machine:
//!
//! ```text
//! Sent --200--> Success
//! Sent --401--> Reauthenticating --204--> Retried --200--> Success
//!                                \--other--> Failed     \--401--> Failed (Auth)
//! Sent/Retried --other--> Failed (Upstream)
//! ```
//!
//! Renewal happens at most once per operation; a second 401 is terminal.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{COOKIE, REFERER};
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tokio::io::AsyncWrite;
use tracing::{debug, info, warn};

use lazyai_config::{SkydeckConfig, StreamRequestShape, StreamResponseFormat, StreamingConfig};
use lazyai_protocol::{SendMessageRequest, StreamingRequest, SubmitEnvelope, SubmitResult};

use super::cookies::{ACCESS_COOKIE, REFRESH_COOKIE, cookie_from_headers, cookie_header};
use super::stream::{pipe_stream, write_envelope_reply};
use crate::auth::{CredentialStore, Credentials};
use crate::error::{Result, SessionError};

pub const CHAT_PATH: &str = "/api/v1/conversations/chat_v2/";
pub const STREAMING_PATH: &str = "/api/v1/conversations/streaming/";
pub const REFRESH_PATH: &str = "/api/v1/authentication/token/refresh/";

/// Transport settings for a session
#[derive(Debug, Clone)]
pub struct ClientSettings {
  /// API origin, without trailing slash
  pub base_url: String,
  /// `Referer` sent on every call
  pub referrer: String,
  /// Connect and idle-read deadline for every call; total deadline for
  /// calls whose body is read in one go
  pub timeout: Duration,
  /// Streaming endpoint contract
  pub streaming: StreamingConfig,
}

impl From<&SkydeckConfig> for ClientSettings {
  fn from(config: &SkydeckConfig) -> Self {
    Self {
      base_url: config.base_url.trim_end_matches('/').to_string(),
      referrer: config.referrer.clone(),
      timeout: Duration::from_secs(config.timeout_secs),
      streaming: config.streaming,
    }
  }
}

/// Position of an operation in the renewal state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
  /// First attempt with the token we started with
  Sent,
  /// Second attempt, after one successful renewal
  Retried,
}

/// What to do with a response in a given phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
  Success,
  Reauthenticate,
  StillUnauthorized,
  Failed,
}

fn transition(phase: Phase, status: StatusCode) -> Transition {
  match (phase, status) {
    (_, StatusCode::OK) => Transition::Success,
    (Phase::Sent, StatusCode::UNAUTHORIZED) => Transition::Reauthenticate,
    (Phase::Retried, StatusCode::UNAUTHORIZED) => Transition::StillUnauthorized,
    _ => Transition::Failed,
  }
}

/// Authenticated client for the SkyDeck conversation API
///
/// Holds the two credentials as plain fields and attaches them per request.
/// The access token may be replaced once per operation; each replacement is
/// persisted through the [`CredentialStore`] before the request is replayed.
///
/// One instance per credential set. Operations take `&mut self`, so sharing a
/// client across tasks needs external synchronization.
pub struct SessionClient {
  http: Client,
  settings: ClientSettings,
  access_token: String,
  refresh_token: String,
  store: Arc<dyn CredentialStore>,
}

impl SessionClient {
  /// Create a client; fails only if the HTTP transport cannot be built.
  pub fn new(
    settings: ClientSettings,
    credentials: Credentials,
    store: Arc<dyn CredentialStore>,
  ) -> Result<Self> {
    // Connect and idle-read bounds only; a raw reply may outlast any total
    // deadline. Buffered calls set their own total deadline per request.
    let http = Client::builder()
      .connect_timeout(settings.timeout)
      .read_timeout(settings.timeout)
      .build()?;
    Ok(Self {
      http,
      settings,
      access_token: credentials.access_token,
      refresh_token: credentials.refresh_token,
      store,
    })
  }

  /// Access token currently attached to requests
  pub fn access_token(&self) -> &str {
    &self.access_token
  }

  /// Submit a message and return the conversation and pending reply ids.
  pub async fn submit(&mut self, request: &SendMessageRequest) -> Result<SubmitResult> {
    debug!(
      conversation_id = ?request.conversation_id,
      model_id = request.model_id,
      "submitting message"
    );
    let response = self
      .send_authenticated("submit", |client| client.chat_request(request))
      .await?;

    let body = response.text().await?;
    let envelope: SubmitEnvelope =
      serde_json::from_str(&body).map_err(|e| SessionError::Decode {
        message: e.to_string(),
        body: body.clone(),
      })?;
    let result = SubmitResult::from(envelope);
    info!(
      conversation_id = result.conversation_id,
      assistant_message_id = result.assistant_message_id,
      "message accepted"
    );
    Ok(result)
  }

  /// Fetch the reply for `assistant_message_id` and copy it into `sink`.
  ///
  /// With the raw response format each received chunk is written and flushed
  /// before the next one is awaited. Returns the number of bytes written.
  pub async fn stream_reply<W>(&mut self, assistant_message_id: u64, sink: &mut W) -> Result<u64>
  where
    W: AsyncWrite + Unpin,
  {
    let response = self
      .send_authenticated("stream", |client| {
        client.streaming_request(assistant_message_id)
      })
      .await?;

    let written = match self.settings.streaming.response {
      StreamResponseFormat::Raw => pipe_stream(response.bytes_stream(), sink).await?,
      StreamResponseFormat::Envelope => {
        let body = response.text().await?;
        write_envelope_reply(&body, sink).await?
      }
    };
    debug!(assistant_message_id, written, "reply streamed");
    Ok(written)
  }

  /// Drive one operation through the renewal state machine.
  ///
  /// `build` is called again for the replay so the request picks up the
  /// renewed token; it must produce the same request otherwise.
  async fn send_authenticated<F>(&mut self, operation: &'static str, build: F) -> Result<Response>
  where
    F: Fn(&Self) -> RequestBuilder,
  {
    let mut phase = Phase::Sent;
    loop {
      let response = build(&*self).send().await?;
      let status = response.status();
      debug!(operation, ?phase, %status, "response received");

      match transition(phase, status) {
        Transition::Success => return Ok(response),
        Transition::Reauthenticate => {
          info!(operation, "access token rejected, renewing");
          self.reauthenticate().await?;
          phase = Phase::Retried;
        }
        Transition::StillUnauthorized => {
          warn!(operation, "still unauthorized after renewal");
          return Err(SessionError::Auth(format!(
            "{operation} was rejected as unauthorized even after renewing the access token"
          )));
        }
        Transition::Failed => {
          let body = response.text().await.unwrap_or_default();
          return Err(SessionError::Upstream { status, body });
        }
      }
    }
  }

  /// Exchange the refresh token for a new access token and persist it.
  ///
  /// The upstream answers 204 with the token in a `Set-Cookie` header; any
  /// other status is fatal and leaves the held and stored tokens untouched.
  async fn reauthenticate(&mut self) -> Result<()> {
    let response = self
      .http
      .post(self.url(REFRESH_PATH))
      .timeout(self.settings.timeout)
      .header(REFERER, &self.settings.referrer)
      .header(COOKIE, cookie_header(REFRESH_COOKIE, &self.refresh_token))
      .send()
      .await?;

    let status = response.status();
    if status != StatusCode::NO_CONTENT {
      let body = response.text().await.unwrap_or_default();
      return Err(SessionError::Auth(format!(
        "token renewal returned HTTP {status}: {body}"
      )));
    }

    let access_token = cookie_from_headers(response.headers(), ACCESS_COOKIE).ok_or_else(|| {
      SessionError::Auth(format!(
        "token renewal succeeded but set no `{ACCESS_COOKIE}` cookie"
      ))
    })?;

    self.access_token = access_token;
    self.store.save_access_token(&self.access_token).await?;
    info!("access token renewed and persisted");
    Ok(())
  }

  fn chat_request(&self, request: &SendMessageRequest) -> RequestBuilder {
    let form = request
      .form_fields()
      .into_iter()
      .fold(Form::new(), |form, (name, value)| form.text(name, value));
    self
      .authenticated(self.http.post(self.url(CHAT_PATH)))
      .timeout(self.settings.timeout)
      .multipart(form)
  }

  fn streaming_request(&self, message_id: u64) -> RequestBuilder {
    let url = self.url(STREAMING_PATH);
    let builder = match self.settings.streaming.request {
      StreamRequestShape::Query => self.http.get(url).query(&[("message_id", message_id)]),
      StreamRequestShape::JsonBody => self.http.post(url).json(&StreamingRequest { message_id }),
    };
    let builder = match self.settings.streaming.response {
      StreamResponseFormat::Raw => builder,
      StreamResponseFormat::Envelope => builder.timeout(self.settings.timeout),
    };
    self.authenticated(builder)
  }

  /// Attach the referrer and the access cookie. The refresh token is never
  /// attached here.
  fn authenticated(&self, builder: RequestBuilder) -> RequestBuilder {
    builder
      .header(REFERER, &self.settings.referrer)
      .header(COOKIE, cookie_header(ACCESS_COOKIE, &self.access_token))
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.settings.base_url.trim_end_matches('/'), path)
  }
}
