use crate::ApiError;

pub async fn get_404() -> ApiError {
    ApiError::NotFoundError("Not found".to_string())
}
