//! Tests for verb+action dispatch, parameter binding, and outcome mapping.
//!
//! Controllers are built the way applications build them: an explicit
//! handler registry per controller with ordered parameter descriptors.
//! Diagnostics are captured with a recording sink so severity and
//! message expectations can be asserted per dispatch.

use actiondispatch::diag::{DiagnosticSink, Severity};
use actiondispatch::dispatcher::{ActionResult, Controller, Dispatcher, HandlerError, ParamSpec};
use actiondispatch::request::body::AutoMappingBody;
use actiondispatch::request::ApiRequest;
use actiondispatch::response::Response;
use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Mutex;

#[derive(Default)]
struct RecordingSink {
    entries: Mutex<Vec<(Severity, String)>>,
}

impl DiagnosticSink for RecordingSink {
    fn log(&self, severity: Severity, message: &str, _context: &Value) {
        self.entries
            .lock()
            .unwrap()
            .push((severity, message.to_string()));
    }
}

impl RecordingSink {
    fn entries(&self) -> Vec<(Severity, String)> {
        self.entries.lock().unwrap().clone()
    }

    fn severities(&self) -> Vec<Severity> {
        self.entries().into_iter().map(|(s, _)| s).collect()
    }
}

fn assert_renders(response: Response, status: u16, body: &str) {
    let rendered = response.rendered();
    assert_eq!(rendered.status, status);
    let actual = rendered
        .body
        .map(|b| String::from_utf8(b).unwrap())
        .unwrap_or_default();
    assert_eq!(actual, body);
}

fn plain_controller() -> Controller {
    Controller::new("test", "plain")
}

fn exception_controller() -> Controller {
    Controller::new("test", "exceptions")
        .handler(
            "getUnknownParameter",
            vec![ParamSpec::unsupported("mystery")],
            |mut args| {
                let _mystery = args.take_str()?;
                Ok(().into())
            },
        )
        .handler("getAuthenticationRequired", vec![], |_| {
            Err(HandlerError::unauthenticated(
                "You need to authenticate first",
            ))
        })
        .handler("getInsufficientAuthorization", vec![], |_| {
            Err(HandlerError::forbidden(
                "You do not have permissions for that",
            ))
        })
        .handler("getResourceNotFound", vec![], |_| {
            Err(HandlerError::not_found(
                "Resource with identifier uuu-iii-ddd was not found",
            ))
        })
        .handler("getDomainException", vec![], |_| {
            Err(HandlerError::domain("This makes absolutely no sense"))
        })
        .handler("getThrowable", vec![], |_| {
            Err(HandlerError::Unexpected(anyhow::anyhow!(
                "Something went completely sideways"
            )))
        })
}

//region Generic

#[test]
fn test_options_always_no_content() {
    let sink = RecordingSink::default();
    let req = ApiRequest::new(Method::OPTIONS, "randomMethodThatDontEvenExists");

    let response = plain_controller().dispatch(&req, &sink);

    assert_eq!(response, Response::NoContent);
    assert!(sink.entries().is_empty());
}

#[test]
fn test_missing_action_parameter() {
    let sink = RecordingSink::default();
    let req = ApiRequest::without_action(Method::GET);

    let response = plain_controller().dispatch(&req, &sink);

    assert_eq!(sink.severities(), vec![Severity::Critical]);
    assert_renders(
        response,
        500,
        r#"{"status":"Endpoint is unable to route your request"}"#,
    );
}

#[test]
fn test_empty_action_is_missing() {
    let sink = RecordingSink::default();
    let req = ApiRequest::new(Method::GET, "");

    let response = plain_controller().dispatch(&req, &sink);

    assert_eq!(sink.severities(), vec![Severity::Critical]);
    assert_eq!(response.status(), 500);
}

#[test]
fn test_unknown_action_is_method_not_allowed() {
    let sink = RecordingSink::default();
    let req = ApiRequest::new(Method::DELETE, "randomMethodThatDontEvenExists");

    let response = plain_controller().dispatch(&req, &sink);

    assert!(sink.entries().is_empty());
    assert_renders(
        response,
        405,
        r#"{"status":"Endpoint does not support DELETE method"}"#,
    );
}

//endregion

//region Exception handling

#[test]
fn test_unknown_parameter_fails_at_invocation() {
    let sink = RecordingSink::default();
    let req = ApiRequest::new(Method::GET, "unknownParameter");

    let response = exception_controller().dispatch(&req, &sink);

    assert_eq!(sink.severities(), vec![Severity::Critical]);
    assert_renders(
        response,
        500,
        r#"{"status":"Endpoint is unable to handle your request"}"#,
    );
}

#[test]
fn test_authentication_required() {
    let sink = RecordingSink::default();
    let req = ApiRequest::new(Method::GET, "authenticationRequired");

    let response = exception_controller().dispatch(&req, &sink);

    assert!(sink.entries().is_empty());
    assert_renders(
        response,
        401,
        r#"{"status":"You need to authenticate first"}"#,
    );
}

#[test]
fn test_insufficient_authorization() {
    let sink = RecordingSink::default();
    let req = ApiRequest::new(Method::GET, "insufficientAuthorization");

    let response = exception_controller().dispatch(&req, &sink);

    assert!(sink.entries().is_empty());
    assert_renders(
        response,
        403,
        r#"{"status":"You do not have permissions for that"}"#,
    );
}

#[test]
fn test_resource_not_found() {
    let sink = RecordingSink::default();
    let req = ApiRequest::new(Method::GET, "resourceNotFound");

    let response = exception_controller().dispatch(&req, &sink);

    assert!(sink.entries().is_empty());
    assert_renders(
        response,
        404,
        r#"{"status":"Resource with identifier uuu-iii-ddd was not found"}"#,
    );
}

#[test]
fn test_domain_failure_is_logged_and_surfaced() {
    let sink = RecordingSink::default();
    let req = ApiRequest::new(Method::GET, "domainException");

    let response = exception_controller().dispatch(&req, &sink);

    assert_eq!(
        sink.entries(),
        vec![(
            Severity::Error,
            "This makes absolutely no sense".to_string()
        )]
    );
    assert_renders(
        response,
        500,
        r#"{"status":"This makes absolutely no sense"}"#,
    );
}

#[test]
fn test_unexpected_failure_is_logged_with_generic_message() {
    let sink = RecordingSink::default();
    let req = ApiRequest::new(Method::GET, "throwable");

    let response = exception_controller().dispatch(&req, &sink);

    assert_eq!(sink.severities(), vec![Severity::Error]);
    // The internal failure text never leaks to the client.
    assert_renders(
        response,
        500,
        r#"{"status":"An unexpected error occurred"}"#,
    );
}

#[test]
fn test_panicking_handler_is_contained() {
    let sink = RecordingSink::default();
    let controller = Controller::new("test", "panics").handler("getBoom", vec![], |_| {
        panic!("boom");
    });
    let req = ApiRequest::new(Method::GET, "boom");

    let response = controller.dispatch(&req, &sink);

    assert_eq!(sink.severities(), vec![Severity::Error]);
    assert_renders(
        response,
        500,
        r#"{"status":"An unexpected error occurred"}"#,
    );
}

//endregion

//region Responses

#[derive(Serialize)]
struct ObjectPayload {
    fofo: String,
}

fn response_controller() -> Controller {
    Controller::new("test", "responses")
        .handler("getCustomResponse", vec![], |_| {
            Ok(Response::created("made").into())
        })
        .handler("getStringResponse", vec![], |_| {
            Ok("Just string response".into())
        })
        .handler("getIntResponse", vec![], |_| Ok(42i64.into()))
        .handler("getArrayResponse", vec![], |_| {
            Ok(json!({ "foo": "bar" }).into())
        })
        .handler("getObjectResponse", vec![], |_| {
            ActionResult::json(&ObjectPayload {
                fofo: "barbar".to_string(),
            })
        })
        .handler("getNoResponse", vec![], |_| Ok(().into()))
}

#[test]
fn test_custom_response_passes_through() {
    let sink = RecordingSink::default();
    let req = ApiRequest::new(Method::GET, "customResponse");

    let response = response_controller().dispatch(&req, &sink);

    assert_renders(response, 201, r#"{"status":"made"}"#);
}

#[test]
fn test_string_renders_as_text() {
    let sink = RecordingSink::default();
    let req = ApiRequest::new(Method::GET, "stringResponse");

    let response = response_controller().dispatch(&req, &sink);

    assert_eq!(response, Response::Text("Just string response".to_string()));
}

#[test]
fn test_int_renders_as_text() {
    let sink = RecordingSink::default();
    let req = ApiRequest::new(Method::GET, "intResponse");

    let response = response_controller().dispatch(&req, &sink);

    assert_renders(response, 200, "42");
}

#[test]
fn test_array_renders_as_json() {
    let sink = RecordingSink::default();
    let req = ApiRequest::new(Method::GET, "arrayResponse");

    let response = response_controller().dispatch(&req, &sink);

    assert_renders(response, 200, r#"{"foo":"bar"}"#);
}

#[test]
fn test_object_renders_as_json() {
    let sink = RecordingSink::default();
    let req = ApiRequest::new(Method::GET, "objectResponse");

    let response = response_controller().dispatch(&req, &sink);

    assert_renders(response, 200, r#"{"fofo":"barbar"}"#);
}

#[test]
fn test_unit_renders_no_content() {
    let sink = RecordingSink::default();
    let req = ApiRequest::new(Method::GET, "noResponse");

    let response = response_controller().dispatch(&req, &sink);

    assert_eq!(response, Response::NoContent);
}

//endregion

//region Request body

#[derive(Debug, Serialize, Deserialize)]
struct PersonBody {
    name: String,
    surname: String,
}

impl AutoMappingBody for PersonBody {}

fn bond_intro(person: &PersonBody) -> String {
    format!(
        "I am {}, {} {}",
        person.surname, person.name, person.surname
    )
}

fn body_controller() -> Controller {
    Controller::new("test", "people")
        .handler(
            "postIndex",
            vec![ParamSpec::body::<PersonBody>("person")],
            |mut args| {
                let person: PersonBody = args.take_body()?;
                Ok(bond_intro(&person).into())
            },
        )
        .handler(
            "postOptional",
            vec![ParamSpec::body::<PersonBody>("person").nullable()],
            |mut args| {
                Ok(match args.take_opt_body::<PersonBody>()? {
                    Some(person) => bond_intro(&person).into(),
                    None => "no data, but that is fine".into(),
                })
            },
        )
}

#[test]
fn test_body_mapping_success() {
    let sink = RecordingSink::default();
    let req = ApiRequest::new(Method::POST, "index")
        .with_body(r#"{"name":"James","surname":"Bond"}"#.as_bytes().to_vec());

    let response = body_controller().dispatch(&req, &sink);

    assert_eq!(
        response,
        Response::Text("I am Bond, James Bond".to_string())
    );
}

#[test]
fn test_body_mapping_invalid() {
    let sink = RecordingSink::default();
    let req =
        ApiRequest::new(Method::POST, "index").with_body(r#"{"name":42}"#.as_bytes().to_vec());

    let response = body_controller().dispatch(&req, &sink);

    assert!(sink.entries().is_empty());
    assert_eq!(response.status(), 400);
}

#[test]
fn test_required_body_missing() {
    let sink = RecordingSink::default();
    let req = ApiRequest::new(Method::POST, "index");

    let response = body_controller().dispatch(&req, &sink);

    assert_renders(response, 400, r#"{"status":"Missing request body"}"#);
}

#[test]
fn test_optional_body_missing() {
    let sink = RecordingSink::default();
    let controller = body_controller();

    let with_data = controller.dispatch(
        &ApiRequest::new(Method::POST, "optional")
            .with_body(r#"{"name":"James","surname":"Bond"}"#.as_bytes().to_vec()),
        &sink,
    );
    let without_data = controller.dispatch(&ApiRequest::new(Method::POST, "optional"), &sink);

    assert_eq!(
        with_data,
        Response::Text("I am Bond, James Bond".to_string())
    );
    assert_eq!(
        without_data,
        Response::Text("no data, but that is fine".to_string())
    );
}

#[test]
fn test_body_malformed() {
    let sink = RecordingSink::default();
    let req =
        ApiRequest::new(Method::POST, "index").with_body(r#"{"-_f[ads][]"#.as_bytes().to_vec());

    let response = body_controller().dispatch(&req, &sink);

    assert_renders(response, 400, r#"{"status":"Malformed request body"}"#);
}

//endregion

//region Route parameters

fn param_controller() -> Controller {
    Controller::new("test", "params").handler(
        "getIndex",
        vec![
            ParamSpec::string("name"),
            ParamSpec::string("surname").with_default("Doe"),
            ParamSpec::string("degree").with_default("Mr"),
        ],
        |mut args| {
            let name = args.take_str()?;
            let surname = args.take_str()?;
            let degree = args.take_str()?;
            Ok(format!("I am {surname}, {degree}. {name} {surname}").into())
        },
    )
}

#[test]
fn test_route_parameters_success() {
    let sink = RecordingSink::default();
    let req = ApiRequest::new(Method::GET, "index")
        .with_param("name", "James")
        .with_param("surname", "Bond")
        .with_param("degree", "Ing");

    let response = param_controller().dispatch(&req, &sink);

    assert_renders(response, 200, "I am Bond, Ing. James Bond");
}

#[test]
fn test_route_parameters_missing_required() {
    let sink = RecordingSink::default();
    let req = ApiRequest::new(Method::GET, "index");

    let response = param_controller().dispatch(&req, &sink);

    assert_renders(
        response,
        400,
        r#"{"status":"Missing required parameter name"}"#,
    );
}

#[test]
fn test_route_parameters_defaults_applied() {
    let sink = RecordingSink::default();
    let req = ApiRequest::new(Method::GET, "index").with_param("name", "James");

    let response = param_controller().dispatch(&req, &sink);

    assert_renders(response, 200, "I am Doe, Mr. James Doe");
}

#[test]
fn test_route_parameter_nullable_binds_null() {
    let sink = RecordingSink::default();
    let controller = Controller::new("test", "nullable").handler(
        "getIndex",
        vec![ParamSpec::string("nickname").nullable()],
        |mut args| {
            Ok(match args.take_opt_str()? {
                Some(nickname) => nickname.into(),
                None => "anonymous".into(),
            })
        },
    );

    let response = controller.dispatch(&ApiRequest::new(Method::GET, "index"), &sink);
    assert_renders(response, 200, "anonymous");

    let named = controller.dispatch(
        &ApiRequest::new(Method::GET, "index").with_param("nickname", "Q"),
        &sink,
    );
    assert_renders(named, 200, "Q");
}

#[test]
fn test_route_parameters_casting() {
    let sink = RecordingSink::default();
    let controller = Controller::new("test", "casting").handler(
        "getIndex",
        vec![
            ParamSpec::string("string"),
            ParamSpec::int("int"),
            ParamSpec::float("float"),
            ParamSpec::bool("bool1"),
            ParamSpec::bool("bool2"),
            ParamSpec::bool("bool3"),
        ],
        |mut args| {
            let string = args.take_str()?;
            let int = args.take_int()?;
            let float = args.take_float()?;
            let checks = [
                string == "string",
                int == 42,
                (float - 3.14).abs() < f64::EPSILON,
                args.take_bool()?,
                args.take_bool()?,
                !args.take_bool()?,
            ];
            Ok(if checks.iter().all(|c| *c) { "GOOD" } else { "BAD" }.into())
        },
    );

    let fail = controller.dispatch(
        &ApiRequest::new(Method::GET, "index")
            .with_param("string", "string")
            .with_param("int", "42")
            .with_param("float", "3.14")
            .with_param("bool1", "xx")
            .with_param("bool2", "xx")
            .with_param("bool3", "xx"),
        &sink,
    );
    assert_renders(fail, 200, "BAD");

    let success = controller.dispatch(
        &ApiRequest::new(Method::GET, "index")
            .with_param("string", "string")
            .with_param("int", "42")
            .with_param("float", "3.14")
            .with_param("bool1", "true")
            .with_param("bool2", "1")
            .with_param("bool3", "0"),
        &sink,
    );
    assert_renders(success, 200, "GOOD");
}

#[test]
fn test_malformed_numeric_parameter_is_rejected() {
    let sink = RecordingSink::default();
    let controller = Controller::new("test", "strict").handler(
        "getIndex",
        vec![ParamSpec::int("count")],
        |mut args| Ok(args.take_int()?.into()),
    );

    let response = controller.dispatch(
        &ApiRequest::new(Method::GET, "index").with_param("count", "42abc"),
        &sink,
    );

    assert_renders(
        response,
        400,
        r#"{"status":"Invalid value for parameter count"}"#,
    );
}

//endregion

//region Startup hook

#[test]
fn test_startup_hook_gates_all_actions() {
    let sink = RecordingSink::default();
    let controller = Controller::new("test", "guarded")
        .with_startup(|req| {
            if req.get_param("token") != Some("secret") {
                return Err(HandlerError::unauthenticated(
                    "You need to authenticate first",
                ));
            }
            Ok(())
        })
        .handler("getIndex", vec![], |_| Ok("in".into()));

    let denied = controller.dispatch(&ApiRequest::new(Method::GET, "index"), &sink);
    assert_renders(
        denied,
        401,
        r#"{"status":"You need to authenticate first"}"#,
    );

    let allowed = controller.dispatch(
        &ApiRequest::new(Method::GET, "index").with_param("token", "secret"),
        &sink,
    );
    assert_renders(allowed, 200, "in");

    // Preflight never reaches the hook.
    let preflight = controller.dispatch(&ApiRequest::new(Method::OPTIONS, "index"), &sink);
    assert_eq!(preflight, Response::NoContent);
}

//endregion

#[test]
fn test_dispatcher_unknown_controller() {
    let mut dispatcher = Dispatcher::new();
    dispatcher.register(plain_controller());

    let req = ApiRequest::new(Method::GET, "index");
    assert!(dispatcher.dispatch("test", "missing", &req).is_none());
    assert!(dispatcher.dispatch("test", "plain", &req).is_some());
}
