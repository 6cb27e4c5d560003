use super::request::parse_request;
use super::response::write_api_response;
use crate::api::{Api, ApiRequest, ApiResponse, INTERNAL_ERROR_MESSAGE};
use may_minihttp::{HttpService, Request, Response};
use std::io;
use std::sync::Arc;
use tracing::{debug, error};

/// `may_minihttp` service answering every request through [`Api::handle`].
///
/// Endpoint futures run on a tokio runtime; the connection coroutine parks
/// on a `may` channel until the reply arrives, so no OS thread blocks.
#[derive(Clone)]
pub struct ApiService {
    api: Arc<Api>,
    runtime: tokio::runtime::Handle,
}

impl ApiService {
    pub fn new(api: Arc<Api>, runtime: tokio::runtime::Handle) -> Self {
        Self { api, runtime }
    }

    /// Run one request on the tokio runtime and wait for its response.
    pub fn dispatch(&self, request: ApiRequest) -> ApiResponse {
        let (reply_tx, reply_rx) = may::sync::mpsc::channel();
        let api = Arc::clone(&self.api);
        self.runtime.spawn(async move {
            let response = api.handle(request).await;
            if reply_tx.send(response).is_err() {
                debug!("Connection closed before the response was ready");
            }
        });
        reply_rx.recv().unwrap_or_else(|_| {
            error!("Endpoint task ended without a response");
            ApiResponse::failure(500, INTERNAL_ERROR_MESSAGE)
        })
    }
}

impl HttpService for ApiService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let response = match parse_request(req) {
            Some(request) => self.dispatch(request),
            None => ApiResponse::failure(400, "Bad Request"),
        };
        write_api_response(res, &response);
        Ok(())
    }
}
