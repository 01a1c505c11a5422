use std::fmt;

use http::header::{HeaderValue, AUTHORIZATION};
use serde_derive::Deserialize;
use tracing::{error, info};
use url::Url;

use crate::context::{CutoffDays, CUTOFF_PARAM_NAME};
use crate::error::{PurgeError, TransportError};
use crate::http::{FormPost, HttpSender};
use crate::token::BearerToken;

/// A purge task accepted by the data tools API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PurgeReceipt {
    pub task_id: String,
    pub cutoff_days: CutoffDays,
}

impl fmt::Display for PurgeReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Contact purge task {} registered with xConnect. Removing data older than {} days.",
            self.task_id, self.cutoff_days
        )
    }
}

#[derive(Deserialize)]
struct PurgeTaskResponse {
    #[serde(rename = "TaskId", default)]
    task_id: Option<String>,
}

/// Registers a contact purge task for everything older than `cutoff_days`.
pub async fn register_purge_task(
    http: &dyn HttpSender,
    task_url: &Url,
    token: BearerToken,
    cutoff_days: CutoffDays,
) -> Result<PurgeReceipt, PurgeError> {
    let mut request =
        FormPost::new(task_url.clone()).field(CUTOFF_PARAM_NAME, cutoff_days.to_string());
    let authorization = HeaderValue::try_from(format!("Bearer {}", token.as_str()))
        .map_err(|error| TransportError::new(task_url.as_str(), error))?;
    request.headers.insert(AUTHORIZATION, authorization);

    let response = http.post_form(request).await?;

    if !response.status.is_success() {
        error!(
            status = response.status.as_u16(),
            body = %response.body,
            "Contact purge task registration failed with error: {}",
            response.body
        );
        return Err(PurgeError::TaskRejected {
            status: response.status,
            body: response.body,
        });
    }

    let task_response: PurgeTaskResponse =
        serde_json::from_str(&response.body).map_err(|source| PurgeError::MalformedResponse {
            endpoint: "purge task",
            source,
        })?;

    let task_id = task_response
        .task_id
        .filter(|task_id| !task_id.is_empty())
        .ok_or(PurgeError::MissingTaskId)?;

    let receipt = PurgeReceipt {
        task_id,
        cutoff_days,
    };
    info!(
        task_id = %receipt.task_id,
        cutoff_days = receipt.cutoff_days.get(),
        "{receipt}"
    );

    Ok(receipt)
}
