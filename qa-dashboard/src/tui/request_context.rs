use qa_client::Client;
use tokio::{
    sync::mpsc::{error::TrySendError, Receiver, Sender},
    task::JoinHandle,
};
use tracing::instrument;

use crate::{
    api::{ApiRequest, ApiResponse},
    error::{Error, Result},
    tui::dashboard::Mode,
};

/// Owns the task that talks to the API on behalf of the UI loop.
#[derive(Debug)]
pub struct RequestContext {
    _handle: JoinHandle<()>,
    request_sender: Sender<ApiRequest>,
    pub response_receiver: Receiver<ApiResponse>,
}

impl RequestContext {
    pub fn spawn(client: Client) -> RequestContext {
        let (request_sender, mut request_receiver): (Sender<ApiRequest>, Receiver<ApiRequest>) =
            tokio::sync::mpsc::channel(5);
        let (response_sender, response_receiver) = tokio::sync::mpsc::channel(20);

        let worker = RequestWorker {
            client,
            response_sender,
        };

        let handle = tokio::spawn(async move {
            while let Some(request) = request_receiver.recv().await {
                let response = worker.handle(request).await;
                if let Err(error) = worker.response_sender.send(response).await {
                    tracing::error!(%error, "unable to send response");
                    break;
                }
            }

            tracing::info!("request receiver task closed");
        });

        RequestContext {
            _handle: handle,
            request_sender,
            response_receiver,
        }
    }

    /// Never waits on the worker. A full queue hands the request back.
    pub fn submit(&self, request: ApiRequest) -> Result<()> {
        self.request_sender
            .try_send(request)
            .map_err(|error| match error {
                TrySendError::Full(request) => Error::WorkerBusy(request),
                TrySendError::Closed(_) => Error::WorkerClosed,
            })
    }
}

#[derive(Debug)]
struct RequestWorker {
    client: Client,
    response_sender: Sender<ApiResponse>,
}

impl RequestWorker {
    /// Exactly one response per request.
    #[instrument(skip(self))]
    async fn handle(&self, request: ApiRequest) -> ApiResponse {
        match request {
            ApiRequest::Generate(request) => match self.client.generate(&request).await {
                Ok(response) => ApiResponse::Generated(response),
                Err(_) => ApiResponse::Failed(Mode::Generation),
            },
            ApiRequest::Classify(request) => match self.client.classify(&request).await {
                Ok(response) => ApiResponse::Classified(response),
                Err(_) => ApiResponse::Failed(Mode::Classification),
            },
            ApiRequest::Health => match self.client.health().await {
                Ok(status) => ApiResponse::Health(status),
                Err(error) => ApiResponse::Unreachable(error.to_string().into()),
            },
        }
    }
}
