use crate::http::HttpClient;
use crate::model::{Operation, SecuritySchemes};
use crate::outcome::RequestOutcome;
use crate::request::{PreparedRequest, RequestSettings};
use tracing::{debug, error, info};

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleState {
    Idle,
    Sending,
    Succeeded(RequestOutcome),
    Failed(RequestOutcome),
}

/// Interactive console bound to one operation.
///
/// `send` takes `&mut self`, so a console can never run two requests at once.
#[derive(Debug)]
pub struct Console {
    client: HttpClient,
    operation: Operation,
    schemes: SecuritySchemes,
    settings: RequestSettings,
    state: ConsoleState,
}

impl Console {
    pub fn new(
        client: HttpClient,
        operation: Operation,
        schemes: SecuritySchemes,
        settings: RequestSettings,
    ) -> Self {
        Console {
            client,
            operation,
            schemes,
            settings,
            state: ConsoleState::Idle,
        }
    }

    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    pub fn settings(&self) -> &RequestSettings {
        &self.settings
    }

    pub fn state(&self) -> &ConsoleState {
        &self.state
    }

    /// Sets the value of a parameter. Returns false when the operation has no
    /// parameter by that name.
    pub fn set_parameter(&mut self, name: &str, value: &str) -> bool {
        match self.operation.parameter_mut(name) {
            Some(param) => {
                param.value = value.to_string();
                true
            }
            None => false,
        }
    }

    pub fn prepare(&self, body_text: Option<&str>) -> crate::error::Result<PreparedRequest> {
        PreparedRequest::build(&self.operation, &self.schemes, &self.settings, body_text)
    }

    /// Builds and sends the request. Input errors and transport errors end up
    /// in the returned outcome; this never fails.
    pub async fn send(&mut self, body_text: Option<&str>) -> RequestOutcome {
        self.state = ConsoleState::Sending;

        let outcome = match self.prepare(body_text) {
            Ok(req) => {
                info!(method = %req.method, url = %req.url, "sending request");
                debug!(headers = ?req.headers, body = ?req.body, "request details");
                match self.client.execute(&req).await {
                    Ok(res) => RequestOutcome::Response(res),
                    Err(e) => {
                        error!(error = %e, url = %req.url, "request failed");
                        RequestOutcome::failed()
                    }
                }
            }
            Err(e) => {
                info!(error = %e, "request rejected before sending");
                RequestOutcome::rejected(&e)
            }
        };

        self.state = match &outcome {
            RequestOutcome::Response(_) => ConsoleState::Succeeded(outcome.clone()),
            _ => ConsoleState::Failed(outcome.clone()),
        };
        outcome
    }
}
