use super::request::parse_request;
use super::response::{write_json_error, write_response};
use crate::dispatcher::Dispatcher;
use crate::request::ApiRequest;
use crate::router::ApiRouter;
use http::Method;
use may_minihttp::{HttpService, Request, Response};
use serde_json::json;
use std::io;
use std::sync::Arc;

/// HTTP service binding the router and the controller registry together.
///
/// Per request: parse, resolve the route triple, dispatch, render. The
/// dispatcher is shared read-only across worker coroutines.
#[derive(Clone)]
pub struct AppService {
    pub router: ApiRouter,
    pub dispatcher: Arc<Dispatcher>,
}

impl AppService {
    #[must_use]
    pub fn new(router: ApiRouter, dispatcher: Arc<Dispatcher>) -> Self {
        AppService { router, dispatcher }
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let parsed = parse_request(req);

        let method = match Method::from_bytes(parsed.method.as_bytes()) {
            Ok(method) => method,
            Err(_) => {
                write_json_error(
                    res,
                    400,
                    json!({ "status": format!("Unsupported method {}", parsed.method) }),
                );
                return Ok(());
            }
        };

        let route = match self.router.route(&parsed.path) {
            Some(route) => route,
            None => {
                write_json_error(
                    res,
                    404,
                    json!({
                        "status": "Not Found",
                        "method": parsed.method,
                        "path": parsed.path,
                    }),
                );
                return Ok(());
            }
        };

        let mut params = parsed.query_params;
        if let Some(id) = &route.id {
            params.push((Arc::from("id"), id.clone()));
        }

        let api_req = ApiRequest {
            method,
            action: Some(route.action.clone()),
            params,
            body: parsed.body,
        };

        match self
            .dispatcher
            .dispatch(&route.module, &route.controller, &api_req)
        {
            Some(response) => write_response(res, response),
            None => {
                write_json_error(
                    res,
                    404,
                    json!({
                        "status": "Not Found",
                        "controller": format!("{}/{}", route.module, route.controller),
                    }),
                );
            }
        }
        Ok(())
    }
}
