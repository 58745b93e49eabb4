use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use tracing::info;

use crate::config::ToolConfig;
use crate::error::ToolError;
use crate::models::RawDetection;

const VISION_SERVICE: &str = "CV model";
const VISION_TIMEOUT: Duration = Duration::from_secs(60);

/// Submit a sample image to the vision-model endpoint and return the parsed
/// detection payload. Configuration and file checks happen before any
/// network traffic.
pub async fn analyze_image(
    config: &ToolConfig,
    image_path: &str,
) -> Result<RawDetection, ToolError> {
    let url = config.cv_model_url()?;

    let bytes = tokio::fs::read(image_path)
        .await
        .map_err(|_| ToolError::FileNotFound(image_path.to_string()))?;

    let file_name = Path::new(image_path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sample.png".to_string());

    info!(image_path, "submitting sample image to CV model");

    let form = Form::new().part("image_file", Part::bytes(bytes).file_name(file_name));

    let response = reqwest::Client::new()
        .post(url)
        .multipart(form)
        .timeout(VISION_TIMEOUT)
        .send()
        .await
        .map_err(|source| ToolError::Transport {
            service: VISION_SERVICE,
            source,
        })?;

    let status = response.status();
    let body = response.text().await.map_err(|source| ToolError::Transport {
        service: VISION_SERVICE,
        source,
    })?;

    if !status.is_success() {
        return Err(ToolError::UpstreamStatus {
            service: VISION_SERVICE,
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|e| ToolError::MalformedReply {
        message: e.to_string(),
        raw: body,
    })
}
