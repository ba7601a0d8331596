//! Tests for the configuration depot handler.

use salvo::prelude::*;
use salvo::test::{ResponseExt, TestClient};

use super::*;

fn test_settings() -> Settings {
    Settings {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5800,
            serve_origin: None,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
        schedule: ScheduleConfig {
            timezone: "America/Mexico_City".to_string(),
            skip_invalid_rules: false,
            preview_limit: 4,
        },
        events: EventsConfig { seed_path: None },
    }
}

#[handler]
async fn echo_timezone(depot: &mut Depot) -> String {
    match get_config_from_depot(depot) {
        Ok(settings) => settings.schedule.timezone.clone(),
        Err(_) => "missing".to_string(),
    }
}

#[test_log::test(tokio::test)]
async fn test_config_handler_injects_settings() {
    let router = Router::new()
        .hoop(ConfigHandler::new(test_settings()))
        .push(Router::with_path("tz").get(echo_timezone));

    let body = TestClient::get("http://127.0.0.1:5800/tz")
        .send(router)
        .await
        .take_string()
        .await
        .unwrap();

    assert_eq!(body, "America/Mexico_City");
}

#[tokio::test]
async fn test_missing_config_is_invariant_violation() {
    let router = Router::new().push(Router::with_path("tz").get(echo_timezone));

    let body = TestClient::get("http://127.0.0.1:5800/tz")
        .send(router)
        .await
        .take_string()
        .await
        .unwrap();

    assert_eq!(body, "missing");
}
