use tracing::info;

use crate::job::request::{GenerateJob, ProviderRoute};
use crate::job::response::ImageVariation;
use crate::response::ApiResponse;
use crate::ApiState;

mod external;
mod managed;

/// Picks the provider path. The two paths differ on partial failure: the
/// external batch is all-or-nothing, managed styles may be skipped.
pub(crate) async fn generate(
    state: &ApiState,
    job: &GenerateJob,
) -> ApiResponse<Vec<ImageVariation>> {
    let external = matches!(job.route, ProviderRoute::External { .. });
    info!(
        task = "generate",
        external,
        has_reference_image = job.reference_image.is_some(),
        has_app_role = job.app_role.is_some()
    );

    match &job.route {
        ProviderRoute::External { api_key, model } => {
            let client = state.external(api_key)?;
            external::generate(
                &client,
                &state.config.openai,
                &state.config.generate,
                model.as_deref(),
                &job.prompt,
            )
            .await
        }
        ProviderRoute::Managed => {
            managed::generate(
                state.gateway()?,
                &state.config.gateway.image_model,
                &state.config.generate,
                job,
            )
            .await
        }
    }
}
