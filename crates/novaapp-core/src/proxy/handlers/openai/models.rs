// OpenAI models listing
use super::*;

pub async fn handle_list_models(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.adapter.list_models())
}
