//! Scripted transport for exercising repositories and view models offline.

use async_trait::async_trait;
use cattle_api::{ApiRequest, RawResponse, Transport, TransportError, TransportErrorKind};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

pub type Outcome = Result<RawResponse, TransportError>;

enum Reply {
    Ready(Outcome),
    Held(oneshot::Receiver<Outcome>),
}

#[derive(Debug, Clone)]
pub struct SentRequest {
    pub request: ApiRequest,
    pub language: String,
}

/// Answers calls in order from a queue; held replies wait for the test to release them
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    sent: Mutex<Vec<SentRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, outcome: Outcome) {
        self.replies.lock().unwrap().push_back(Reply::Ready(outcome));
    }

    /// 200 with `{"statusCode":200,"message":"ok","body":<body>}`
    pub fn reply_body(&self, body: Value) {
        self.reply(ok_envelope(body));
    }

    pub fn reply_status(&self, status: u16, reason: &str) {
        self.reply(Ok(RawResponse::new(status, reason, Vec::new())));
    }

    pub fn fail(&self, kind: TransportErrorKind) {
        self.reply(Err(TransportError::new(kind, "scripted failure")));
    }

    /// Queues a reply that is only delivered once the returned sender fires
    pub fn hold(&self) -> oneshot::Sender<Outcome> {
        let (tx, rx) = oneshot::channel();
        self.replies.lock().unwrap().push_back(Reply::Held(rx));
        tx
    }

    pub fn sent(&self) -> Vec<SentRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(
        &self,
        request: &ApiRequest,
        language: &str,
    ) -> Result<RawResponse, TransportError> {
        self.sent.lock().unwrap().push(SentRequest {
            request: request.clone(),
            language: language.to_string(),
        });

        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(Reply::Ready(outcome)) => outcome,
            Some(Reply::Held(rx)) => rx.await.unwrap_or_else(|_| {
                Err(TransportError::new(TransportErrorKind::Io, "held reply dropped"))
            }),
            None => Err(TransportError::new(
                TransportErrorKind::Io,
                format!("no scripted reply for {}", request.endpoint()),
            )),
        }
    }
}

pub fn ok_envelope(body: Value) -> Outcome {
    let envelope = json!({"statusCode": 200, "message": "ok", "body": body});
    Ok(RawResponse::new(200, "OK", envelope.to_string().into_bytes()))
}

pub fn identity_json() -> Value {
    json!({
        "user_id": "farmer-7",
        "name": "Asha Patra",
        "phone_number": "9876543210",
        "location": "Odisha"
    })
}

pub fn cattle_json(tag_number: &str) -> Value {
    json!({
        "name": "Lakshmi",
        "tagNumber": tag_number,
        "dataEntryDate": "2024-03-01",
        "taggingDate": null,
        "species": "Cattle",
        "sex": "Female",
        "dob": null,
        "breedId": "b-gir",
        "breedName": "Gir"
    })
}
