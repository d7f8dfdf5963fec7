//! The negotiating handler wrapper.
//!
//! A [`Negotiator`] captures a template name and a [`TemplateEngine`] when a
//! route is registered. [`Negotiator::wrap`] and [`Negotiator::wrap_sync`]
//! turn a plain `Request -> result` function into an axum handler that picks
//! the HTML or JSON rendering per request. Finalized responses skip
//! negotiation entirely.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::extract::Request;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};

use crate::accept::{AcceptPreference, Representation};
use crate::error::NegotiationError;
use crate::result::{HandlerResult, IntoHandlerResult};
use crate::templates::TemplateEngine;

/// Future returned by a wrapped handler.
pub type NegotiatedFuture =
    Pin<Box<dyn Future<Output = Result<Response, NegotiationError>> + Send + 'static>>;

/// Renders handler mappings as HTML (via a named template) or JSON.
///
/// Cloning is cheap: the engine and the template name are shared.
#[derive(Clone)]
pub struct Negotiator {
    engine: Arc<dyn TemplateEngine>,
    template: Arc<str>,
}

impl fmt::Debug for Negotiator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Negotiator")
            .field("template", &self.template)
            .finish_non_exhaustive()
    }
}

impl Negotiator {
    /// Creates a negotiator rendering `template` from `engine` on the HTML path.
    pub fn new(engine: Arc<dyn TemplateEngine>, template: impl Into<Arc<str>>) -> Self {
        Negotiator {
            engine,
            template: template.into(),
        }
    }

    /// Name of the template used on the HTML path.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Turns a handler result into a response for the given preference.
    ///
    /// Finalized responses are returned unchanged. Mappings become a 200 with
    /// either a JSON body or the rendered template.
    pub fn respond(
        &self,
        preference: &AcceptPreference,
        result: impl IntoHandlerResult,
    ) -> Result<Response, NegotiationError> {
        let mapping = match result.into_handler_result()? {
            HandlerResult::Response(response) => return Ok(response),
            HandlerResult::Mapping(mapping) => mapping,
        };

        let representation = preference.representation();
        let body = match representation {
            Representation::Json => serde_json::to_vec(&mapping)?,
            Representation::Html => self
                .engine
                .render(&self.template, &mapping)
                .map_err(|source| NegotiationError::TemplateResolution {
                    name: self.template.to_string(),
                    source,
                })?
                .into_bytes(),
        };

        Ok(([(CONTENT_TYPE, representation.content_type())], body).into_response())
    }

    /// Wraps an asynchronous handler.
    ///
    /// The returned closure registers with axum like any `async fn(Request)`.
    pub fn wrap<H, Fut, R>(
        self,
        handler: H,
    ) -> impl Fn(Request) -> NegotiatedFuture + Clone + Send + Sync + 'static
    where
        H: Fn(Request) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoHandlerResult + Send + 'static,
    {
        move |request: Request| -> NegotiatedFuture {
            let preference = AcceptPreference::from_headers(request.headers());
            let pending = handler(request);
            let negotiator = self.clone();
            Box::pin(async move { negotiator.respond(&preference, pending.await) })
        }
    }

    /// Wraps a synchronous handler. The handler runs on the request task.
    pub fn wrap_sync<H, R>(
        self,
        handler: H,
    ) -> impl Fn(Request) -> NegotiatedFuture + Clone + Send + Sync + 'static
    where
        H: Fn(Request) -> R + Clone + Send + Sync + 'static,
        R: IntoHandlerResult,
    {
        move |request: Request| -> NegotiatedFuture {
            let preference = AcceptPreference::from_headers(request.headers());
            let outcome = self.respond(&preference, handler(request));
            Box::pin(std::future::ready(outcome))
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::StatusCode;
    use proptest::prelude::*;
    use serde_json::{json, Map, Value};

    use super::*;
    use crate::templates::Templates;

    const PAGE: &str = "<html><body><h1>{{head}}</h1>{{text}}</body></html>";

    fn negotiator() -> Negotiator {
        Templates::from_sources([("example.template", PAGE)])
            .unwrap()
            .negotiate("example.template")
    }

    fn request(accept: Option<&str>) -> Request {
        let mut builder = Request::builder().uri("/");
        if let Some(accept) = accept {
            builder = builder.header("accept", accept);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn read(response: Response) -> (StatusCode, Option<String>, Vec<u8>) {
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();
        (status, content_type, body)
    }

    fn page() -> Value {
        json!({"head": "HEAD", "text": "text"})
    }

    #[tokio::test]
    async fn async_handler_renders_html_by_default() {
        let handler = negotiator().wrap(|_req: Request| async { page() });
        let (status, content_type, body) = read(handler(request(None)).await.unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("text/html; charset=utf-8"));
        assert_eq!(body, b"<html><body><h1>HEAD</h1>text</body></html>");
    }

    #[tokio::test]
    async fn async_handler_renders_json_when_asked() {
        let handler = negotiator().wrap(|_req: Request| async { page() });
        let response = handler(request(Some("application/json"))).await.unwrap();
        let (status, content_type, body) = read(response).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(body, br#"{"head":"HEAD","text":"text"}"#);
    }

    #[tokio::test]
    async fn sync_and_async_handlers_are_byte_identical() {
        let sync = negotiator().wrap_sync(|_req: Request| page());
        let asynchronous = negotiator().wrap(|_req: Request| async { page() });
        for accept in [None, Some("text/html"), Some("application/json")] {
            let a = read(sync(request(accept)).await.unwrap()).await;
            let b = read(asynchronous(request(accept)).await.unwrap()).await;
            assert_eq!(a, b, "accept = {:?}", accept);
        }
    }

    #[tokio::test]
    async fn finalized_responses_pass_through() {
        let handler = negotiator().wrap_sync(|_req: Request| {
            (StatusCode::ACCEPTED, [("x-custom", "1")], "Hello, world!").into_response()
        });
        for accept in [None, Some("text/html"), Some("application/json")] {
            let response = handler(request(accept)).await.unwrap();
            assert_eq!(response.headers()["x-custom"], "1");
            let (status, content_type, body) = read(response).await;
            assert_eq!(status, StatusCode::ACCEPTED);
            assert_eq!(content_type.as_deref(), Some("text/plain; charset=utf-8"));
            assert_eq!(body, b"Hello, world!");
        }
    }

    #[tokio::test]
    async fn handler_sees_the_original_request() {
        let handler = negotiator().wrap(|req: Request| async move {
            json!({"head": req.uri().path(), "text": ""})
        });
        let req = Request::builder()
            .uri("/seen")
            .header("accept", "application/json")
            .body(Body::empty())
            .unwrap();
        let (_, _, body) = read(handler(req).await.unwrap()).await;
        let decoded: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(decoded["head"], "/seen");
    }

    #[tokio::test]
    async fn unknown_template_is_surfaced() {
        let negotiator = Templates::from_sources([("other", "x")])
            .unwrap()
            .negotiate("missing.template");
        let handler = negotiator.wrap_sync(|_req: Request| page());

        let err = handler(request(None)).await.unwrap_err();
        match err {
            NegotiationError::TemplateResolution { name, .. } => {
                assert_eq!(name, "missing.template")
            }
            other => panic!("unexpected error: {other}"),
        }

        // The JSON path never touches the engine.
        let ok = handler(request(Some("application/json"))).await;
        assert!(ok.is_ok());
    }

    #[tokio::test]
    async fn non_mapping_results_are_contract_violations() {
        let handler = negotiator().wrap_sync(|_req: Request| json!(["not", "a", "mapping"]));
        let err = handler(request(Some("application/json"))).await.unwrap_err();
        assert!(matches!(err, NegotiationError::ContractViolation(_)));
    }

    #[test]
    fn debug_shows_template_name() {
        let rendered = format!("{:?}", negotiator());
        assert!(rendered.contains("example.template"));
    }

    fn leaf() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            any::<i64>().prop_map(Value::from),
            "[a-zA-Z0-9 <>&]{0,12}".prop_map(Value::from),
        ]
    }

    fn mapping() -> impl Strategy<Value = Map<String, Value>> {
        let value = leaf().prop_recursive(2, 16, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        });
        prop::collection::btree_map("[a-z]{1,8}", value, 0..6)
            .prop_map(|m| m.into_iter().collect())
    }

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
    }

    proptest! {
        #[test]
        fn json_path_round_trips_any_mapping(map in mapping()) {
            let negotiator = negotiator();
            let preference = AcceptPreference::parse("application/json");
            let response = negotiator.respond(&preference, map.clone()).unwrap();
            let (status, _, body) = runtime().block_on(read(response));
            prop_assert_eq!(status, StatusCode::OK);
            let decoded: Map<String, Value> = serde_json::from_slice(&body).unwrap();
            prop_assert_eq!(decoded, map);
        }

        #[test]
        fn html_path_matches_engine_render(map in mapping(), html_header in proptest::bool::ANY) {
            let templates = Templates::from_sources([("example.template", PAGE)]).unwrap();
            let expected = templates.render("example.template", &map).unwrap();
            let preference = if html_header {
                AcceptPreference::parse("text/html")
            } else {
                AcceptPreference::default()
            };
            let response = templates
                .negotiate("example.template")
                .respond(&preference, map)
                .unwrap();
            let (status, _, body) = runtime().block_on(read(response));
            prop_assert_eq!(status, StatusCode::OK);
            prop_assert_eq!(body, expected.into_bytes());
        }
    }
}
