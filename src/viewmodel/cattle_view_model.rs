use super::operation::{Operation, TriggerPolicy};
use crate::error::AppError;
use crate::repo::CattleRepo;
use crate::services::{filter_by_location, SessionStore};
use crate::state::ResultState;
use cattle_api::{
    BreedDetails, Cattle, CattleRequest, CattleResponse, ImageUpload, Prediction, PredictionBody,
};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;

pub const NOT_LOGGED_IN: &str = "User not logged in";

/// Cattle list, registration, breed lookup and prediction, one slot each
pub struct CattleViewModel {
    repo: CattleRepo,
    session: Arc<SessionStore>,
    list: Operation<Vec<Cattle>>,
    add: Operation<CattleResponse>,
    breed: Operation<BreedDetails>,
    prediction: Operation<PredictionBody>,
}

impl CattleViewModel {
    pub fn new(repo: CattleRepo, session: Arc<SessionStore>, policy: TriggerPolicy) -> Self {
        Self {
            repo,
            session,
            list: Operation::new("get-cattle", policy),
            add: Operation::new("push-cattle", policy),
            breed: Operation::new("get-breed", policy),
            prediction: Operation::new("upload-and-predict", policy),
        }
    }

    /// Past records of the logged-in user
    pub async fn get_cattle(&self) -> Option<ResultState<Vec<Cattle>>> {
        self.list
            .run(async {
                let user_id = match self.session.user_id() {
                    Ok(Some(user_id)) => user_id,
                    Ok(None) => return ResultState::Failed(NOT_LOGGED_IN.to_string()),
                    Err(e) => return ResultState::Failed(e.user_message()),
                };
                self.repo.get_cattle(&user_id).await.map(|r| r.body)
            })
            .await
    }

    /// Registers a record; the list is reloaded once the server accepted it
    pub async fn add_cattle(&self, request: CattleRequest) -> Option<ResultState<CattleResponse>> {
        let published = self
            .add
            .run(async move {
                if let Err(e) = request.validate() {
                    return ResultState::Failed(AppError::from(e).user_message());
                }
                self.repo.add_cattle(request).await.map(|r| r.body)
            })
            .await;

        if matches!(published, Some(ResultState::Success(_))) {
            self.get_cattle().await;
        }
        published
    }

    pub async fn get_breed_by_id(&self, breed_id: &str) -> Option<ResultState<BreedDetails>> {
        self.breed
            .run(async {
                if breed_id.trim().is_empty() {
                    return ResultState::Failed("breed id must not be empty".to_string());
                }
                self.repo.get_breed_by_id(breed_id.trim()).await.map(|r| r.body)
            })
            .await
    }

    /// Uploads the image at `path` for breed prediction
    pub async fn upload_and_predict(&self, path: &Path) -> Option<ResultState<PredictionBody>> {
        self.prediction
            .run(async {
                let upload = match ImageUpload::from_path(path) {
                    Ok(upload) => upload,
                    Err(e) => {
                        log::warn!("Could not read image {}: {}", path.display(), e);
                        return ResultState::Failed(format!("Could not read image file: {}", e));
                    }
                };
                self.repo.upload_and_predict(upload).await.map(|r| r.body)
            })
            .await
    }

    /// Predictions of the current batch that occur in the user's home location
    pub fn filtered_predictions(&self) -> Vec<Prediction> {
        let state = self.prediction.state();
        let Some(body) = state.success() else {
            return Vec::new();
        };

        let home = self.session.location().unwrap_or_else(|e| {
            log::warn!("Could not read home location: {}", e);
            None
        });
        filter_by_location(&body.predictions, home.as_deref())
    }

    pub fn cattle_state(&self) -> ResultState<Vec<Cattle>> {
        self.list.state()
    }

    pub fn add_state(&self) -> ResultState<CattleResponse> {
        self.add.state()
    }

    pub fn breed_state(&self) -> ResultState<BreedDetails> {
        self.breed.state()
    }

    pub fn prediction_state(&self) -> ResultState<PredictionBody> {
        self.prediction.state()
    }

    pub fn subscribe_cattle(&self) -> watch::Receiver<ResultState<Vec<Cattle>>> {
        self.list.subscribe()
    }

    pub fn subscribe_add(&self) -> watch::Receiver<ResultState<CattleResponse>> {
        self.add.subscribe()
    }

    pub fn subscribe_breed(&self) -> watch::Receiver<ResultState<BreedDetails>> {
        self.breed.subscribe()
    }

    pub fn subscribe_prediction(&self) -> watch::Receiver<ResultState<PredictionBody>> {
        self.prediction.subscribe()
    }

    pub fn reset_cattle_state(&self) {
        self.list.reset();
    }

    pub fn reset_add_state(&self) {
        self.add.reset();
    }

    pub fn reset_breed_state(&self) {
        self.breed.reset();
    }

    pub fn reset_prediction_state(&self) {
        self.prediction.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionFields;
    use crate::test_support::{cattle_json, ok_envelope, ScriptedTransport};
    use cattle_api::{ApiRequest, RawResponse};
    use serde_json::json;
    use std::io::Write;

    fn setup() -> (Arc<ScriptedTransport>, Arc<SessionStore>, CattleViewModel) {
        let transport = ScriptedTransport::new();
        let session = Arc::new(SessionStore::open_in_memory().unwrap());
        let repo = CattleRepo::new(transport.clone(), session.clone());
        let vm = CattleViewModel::new(repo, session.clone(), TriggerPolicy::IgnoreWhileLoading);
        (transport, session, vm)
    }

    fn log_in(session: &SessionStore, location: &str) {
        session
            .save(&SessionFields {
                user_id: "farmer-7".to_string(),
                user_name: "Asha Patra".to_string(),
                phone_number: "9876543210".to_string(),
                location: location.to_string(),
            })
            .unwrap();
    }

    fn image_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        file.write_all(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
        file
    }

    #[tokio::test]
    async fn test_get_cattle_requires_login() {
        let (transport, _session, vm) = setup();
        let states = vm.subscribe_cattle();

        let published = vm.get_cattle().await;
        assert_eq!(published, Some(ResultState::Failed(NOT_LOGGED_IN.to_string())));
        assert!(states.has_changed().unwrap());
        assert_eq!(vm.cattle_state(), ResultState::Failed(NOT_LOGGED_IN.to_string()));
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_get_cattle_server_unavailable() {
        let (transport, session, vm) = setup();
        log_in(&session, "Odisha");
        let reply = transport.hold();
        let mut states = vm.subscribe_cattle();

        tokio::join!(vm.get_cattle(), async {
            states.changed().await.unwrap();
            assert!(states.borrow_and_update().is_loading());
            reply.send(Ok(RawResponse::new(503, "Service Unavailable", Vec::new()))).unwrap();
        });

        match vm.cattle_state() {
            ResultState::InternalServerError(msg) => assert!(msg.contains("503")),
            other => panic!("expected InternalServerError, got {}", other),
        }
    }

    #[tokio::test]
    async fn test_add_cattle_refreshes_list() {
        let (transport, session, vm) = setup();
        log_in(&session, "Odisha");
        transport.reply_body(json!({
            "user_id": "farmer-7",
            "tag_number": "T-9",
            "breed_id": {"$oid": "65f0c0ffee"},
            "breed_name": "Gir"
        }));
        transport.reply_body(json!([cattle_json("T-1"), cattle_json("T-9")]));

        let request =
            CattleRequest::new("farmer-7", "T-9", "Cattle", "Gir").with_entry_date_today();
        let added = vm.add_cattle(request).await.unwrap().into_success().unwrap();
        assert_eq!(added.tag_number.as_deref(), Some("T-9"));

        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].request.endpoint(), "push-cattle");
        assert!(matches!(
            &sent[1].request,
            ApiRequest::GetCattle { user_id } if user_id == "farmer-7"
        ));
        assert_eq!(vm.cattle_state().success().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_add_cattle_failure_skips_refresh() {
        let (transport, session, vm) = setup();
        log_in(&session, "Odisha");
        transport.reply_status(400, "Bad Request");

        let published = vm
            .add_cattle(CattleRequest::new("farmer-7", "T-9", "Cattle", "Gir"))
            .await;
        assert_eq!(
            published,
            Some(ResultState::Failed("API Error: 400 - Bad Request".to_string()))
        );
        assert_eq!(transport.sent().len(), 1);
        assert!(vm.cattle_state().is_idle());
    }

    #[tokio::test]
    async fn test_add_cattle_invalid_request() {
        let (transport, _session, vm) = setup();
        let mut request = CattleRequest::new("farmer-7", "T-9", "Cattle", "Gir");
        request.dob = Some("01/02/2020".to_string());

        let published = vm.add_cattle(request).await;
        assert!(matches!(published, Some(ResultState::Failed(msg)) if msg.contains("dob")));
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_breed_lookup() {
        let (transport, _session, vm) = setup();
        transport.reply_body(json!({
            "BreedId": "b-gir",
            "BreedName": "Gir",
            "BreedingTract": "Gir forests of Gujarat",
            "Location": ["Gujarat"],
            "MainUses": "Milk",
            "PhysicalDesc": "Convex forehead, long pendulous ears",
            "Species": "Cattle"
        }));
        transport.reply_body(serde_json::Value::Null);

        let details = vm.get_breed_by_id("b-gir").await.unwrap().into_success().unwrap();
        assert_eq!(details.breed_name, "Gir");

        assert_eq!(vm.get_breed_by_id("b-unknown").await, Some(ResultState::NoDataFound));
        vm.reset_breed_state();
        assert!(vm.breed_state().is_idle());
    }

    #[tokio::test]
    async fn test_prediction_filtered_by_home_location() {
        let (transport, session, vm) = setup();
        log_in(&session, "Odisha");
        transport.reply(ok_envelope(json!({
            "predictions": [
                {"breed_id": "b-gir", "breed": "Gir", "accuracy": 0.91,
                 "location": ["Odisha"]},
                {"breed_id": "b-murrah", "breed": "Murrah", "accuracy": 0.42,
                 "location": ["Punjab"]}
            ]
        })));
        let image = image_file();

        let body = vm.upload_and_predict(image.path()).await.unwrap().into_success().unwrap();
        assert_eq!(body.predictions.len(), 2);

        let filtered = vm.filtered_predictions();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].breed.as_deref(), Some("Gir"));
        assert_eq!(vm.prediction_state().success().map(|b| b.predictions.len()), Some(2));

        match &transport.sent()[0].request {
            ApiRequest::UploadAndPredict(upload) => {
                assert_eq!(upload.content_type, "image/jpeg");
                assert_eq!(upload.bytes, [0xFF, 0xD8, 0xFF, 0xE0]);
            }
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_filtered_predictions_without_session() {
        let (transport, _session, vm) = setup();
        transport.reply_body(json!({
            "predictions": [
                {"breed_id": "b-gir", "breed": "Gir", "accuracy": 0.91, "location": ["Odisha"]}
            ]
        }));

        assert!(vm.filtered_predictions().is_empty());
        vm.upload_and_predict(image_file().path()).await;
        assert!(vm.prediction_state().success().is_some());
        assert!(vm.filtered_predictions().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_image_fails_without_upload() {
        let (transport, _session, vm) = setup();
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.jpg");
        std::fs::write(&empty, b"").unwrap();

        let missing = vm.upload_and_predict(&dir.path().join("missing.jpg")).await;
        assert!(matches!(
            missing,
            Some(ResultState::Failed(msg)) if msg.starts_with("Could not read image file")
        ));

        let published = vm.upload_and_predict(&empty).await;
        assert!(matches!(published, Some(ResultState::Failed(msg)) if msg.contains("empty")));
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn test_reset_while_listing_discards_response() {
        let (transport, session, vm) = setup();
        log_in(&session, "Odisha");
        let reply = transport.hold();
        let mut states = vm.subscribe_cattle();

        let (published, _) = tokio::join!(vm.get_cattle(), async {
            states.changed().await.unwrap();
            vm.reset_cattle_state();
            reply.send(ok_envelope(json!([cattle_json("T-1")]))).unwrap();
        });

        assert_eq!(published, None);
        assert!(vm.cattle_state().is_idle());
    }
}
