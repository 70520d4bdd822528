use super::{classify, log_outcome, request_language};
use crate::services::SessionStore;
use crate::state::ResultState;
use cattle_api::{
    ApiRequest, ApiResponse, BreedDetails, Cattle, CattleRequest, CattleResponse, ImageUpload,
    PredictionBody, Transport,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Cattle records, breed lookup and image prediction
pub struct CattleRepo {
    transport: Arc<dyn Transport>,
    session: Arc<SessionStore>,
}

impl CattleRepo {
    pub fn new(transport: Arc<dyn Transport>, session: Arc<SessionStore>) -> Self {
        Self { transport, session }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> ResultState<ApiResponse<T>> {
        let language = request_language(&self.session);
        let outcome = self.transport.send(&request, &language).await;
        let state = classify::<T>(outcome);
        log_outcome(request.endpoint(), &state);
        state
    }

    pub async fn add_cattle(
        &self,
        request: CattleRequest,
    ) -> ResultState<ApiResponse<CattleResponse>> {
        self.execute(ApiRequest::AddCattle(request)).await
    }

    pub async fn get_cattle(&self, user_id: &str) -> ResultState<ApiResponse<Vec<Cattle>>> {
        self.execute(ApiRequest::GetCattle {
            user_id: user_id.to_string(),
        })
        .await
    }

    pub async fn get_breed_by_id(&self, breed_id: &str) -> ResultState<ApiResponse<BreedDetails>> {
        self.execute(ApiRequest::GetBreed {
            breed_id: breed_id.to_string(),
        })
        .await
    }

    pub async fn upload_and_predict(
        &self,
        upload: ImageUpload,
    ) -> ResultState<ApiResponse<PredictionBody>> {
        self.execute(ApiRequest::UploadAndPredict(upload)).await
    }
}
