//! A dispatcher wired from configuration through the prelude.

use phont::prelude::*;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Greeting {
    message: String,
}

struct GreetController;

impl RestController for GreetController {
    type Request = HttpRequest<String>;
    type Failure = DomainError;
    type Success = Greeting;

    async fn perform_operation(
        &self,
        request: &HttpRequest<String>,
        _context: &LoggingContext,
    ) -> anyhow::Result<ControllerOutcome<DomainError, Greeting>> {
        Ok(success(HttpResponseSuccess::ok(Greeting {
            message: format!("hello {}", request.body),
        })))
    }
}

fn configured(config: &PhontConfig) -> ControllerDispatcher<GreetController> {
    let response_builder = config
        .response
        .build_response_builder(Arc::new(HttpStatusMapper::new()));
    let header = config
        .dispatch
        .request_id_header_name()
        .expect("validated header");

    ControllerDispatcher::builder(GreetController, Arc::new(TracingLogger::new()))
        .response_builder(Arc::new(response_builder))
        .sanitizer(Arc::new(config.sanitizer.build_sanitizer()))
        .request_id_header(header)
        .build()
}

#[tokio::test]
async fn test_configured_dispatcher() {
    let config = ConfigLoader::new()
        .with_string(
            r#"
            [dispatch]
            request_id_header = "x-correlation-id"

            [response]
            preset = "minimal"

            [response.default_headers]
            X-Service = "greeter"
            "#,
            "toml",
        )
        .expect("valid toml")
        .load()
        .expect("valid config");

    let dispatcher = configured(&config);
    let request = HttpRequest::new("Ada".to_string());

    let response = dispatcher.handle(request).await;

    let body = serde_json::to_value(&response.data).expect("serializable");
    assert_eq!(body["success"]["message"], "hello Ada");
    assert_eq!(body["status"], "OK");
    assert!(body.get("timestamp").is_none());
    assert!(response.headers.contains_key("X-Service"));
    assert!(!response.headers.contains_key("X-Powered-By"));
}
