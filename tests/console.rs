use actix_web::{
    dev::ServiceResponse,
    http::{header, StatusCode},
    test, web, App,
};
use httpmock::prelude::*;
use serde_json::json;

use rental_console::{api::Clients, routes};

/// The console app wired to a mock API server.
macro_rules! console {
    ($server:expr) => {
        test::init_service(
            App::new()
                .configure(routes::configure(Clients::new(
                    reqwest::Client::new(),
                    &$server.base_url(),
                )))
                .default_service(web::to(routes::default_handler)),
        )
        .await
    };
}

async fn body_text(resp: ServiceResponse) -> String {
    String::from_utf8(test::read_body(resp).await.to_vec()).unwrap()
}

fn location(resp: &ServiceResponse) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

fn fleet() -> serde_json::Value {
    json!([
        {"id": 1, "brand": "Fiat", "model": "Panda", "plate": "AA111", "price": 30},
        {"id": 2, "brand": "Ford", "model": "Focus", "plate": "BB222", "price": 45},
        {"id": 3, "brand": "Toyota", "model": "Yaris", "plate": "CC333", "price": 25}
    ])
}

async fn mock_fleet(server: &MockServer) -> httpmock::Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(GET).path("/cars");
            then.status(200).json_body(fleet());
        })
        .await
}

#[actix_web::test]
async fn home_links_every_resource() {
    let server = MockServer::start_async().await;
    let app = console!(server);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    for path in ["/cars", "/rentals", "/users"] {
        assert!(body.contains(&format!("href=\"{path}\"")), "missing link to {path}");
    }
}

#[actix_web::test]
async fn list_filters_by_selected_field() {
    let server = MockServer::start_async().await;
    mock_fleet(&server).await;
    let app = console!(server);

    let req = test::TestRequest::get().uri("/cars?field=brand&q=fi").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body_text(resp).await;
    assert!(body.contains("Panda"));
    assert!(!body.contains("Focus"));
    assert!(!body.contains("Yaris"));
    assert!(body.contains("1 of 3 shown"));
}

#[actix_web::test]
async fn unknown_filter_field_falls_back_to_default() {
    let server = MockServer::start_async().await;
    mock_fleet(&server).await;
    let app = console!(server);

    let req = test::TestRequest::get().uri("/cars?field=colour&q=toy").to_request();
    let body = body_text(test::call_service(&app, req).await).await;
    assert!(body.contains("Yaris"));
    assert!(body.contains("1 of 3 shown"));
}

#[actix_web::test]
async fn empty_list_still_offers_add() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/users");
            then.status(200).json_body(json!([]));
        })
        .await;
    let app = console!(server);

    let req = test::TestRequest::get().uri("/users").to_request();
    let body = body_text(test::call_service(&app, req).await).await;
    assert!(body.contains("href=\"/users/new\""));
    assert!(body.contains("No users to show."));
}

#[actix_web::test]
async fn unreachable_api_renders_empty_list() {
    let clients = Clients::new(reqwest::Client::new(), "http://127.0.0.1:9");
    let app = test::init_service(App::new().configure(routes::configure(clients))).await;

    let req = test::TestRequest::get().uri("/rentals").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("No rentals to show."));
}

#[actix_web::test]
async fn add_form_shows_next_id_hint() {
    let server = MockServer::start_async().await;
    mock_fleet(&server).await;
    let app = console!(server);

    let req = test::TestRequest::get().uri("/cars/new").to_request();
    let body = body_text(test::call_service(&app, req).await).await;
    assert!(body.contains("Suggested id: 4"));
    assert!(body.contains("action=\"/cars\""));
}

#[actix_web::test]
async fn create_redirects_back_to_filtered_list() {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/cars").json_body(json!({
                "brand": "Toyota", "model": "Yaris", "plate": "BB222", "price": 25.0
            }));
            then.status(201).json_body(json!({
                "id": 4, "brand": "Toyota", "model": "Yaris", "plate": "BB222", "price": 25
            }));
        })
        .await;
    let app = console!(server);

    let req = test::TestRequest::post()
        .uri("/cars")
        .set_form([
            ("brand", "Toyota"),
            ("model", "Yaris"),
            ("plate", "BB222"),
            ("price", "25"),
            ("image", ""),
            ("field", "brand"),
            ("q", "to"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;

    create.assert_async().await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/cars?field=brand&q=to");
}

#[actix_web::test]
async fn invalid_create_keeps_the_form_open() {
    let server = MockServer::start_async().await;
    mock_fleet(&server).await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/cars");
            then.status(201);
        })
        .await;
    let app = console!(server);

    let req = test::TestRequest::post()
        .uri("/cars")
        .set_form([("brand", ""), ("model", "Yaris"), ("plate", "BB222"), ("price", "25")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    create.assert_calls_async(0).await;
    let body = body_text(resp).await;
    assert!(body.contains("data-error=\"brand\""));
    assert!(body.contains("Brand is required"));
    assert!(body.contains("value=\"Yaris\""));
}

#[actix_web::test]
async fn rejected_create_reports_failure_inline() {
    let server = MockServer::start_async().await;
    mock_fleet(&server).await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/cars");
            then.status(500);
        })
        .await;
    let app = console!(server);

    let req = test::TestRequest::post()
        .uri("/cars")
        .set_form([("brand", "Kia"), ("model", "Rio"), ("plate", "DD444"), ("price", "20")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body = body_text(resp).await;
    assert!(body.contains("Could not save"));
    assert!(body.contains("value=\"Rio\""));
}

#[actix_web::test]
async fn edit_form_is_seeded_and_update_puts_full_entity() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/users");
            then.status(200).json_body(json!([
                {"id": 2, "name": "Ada", "surname": "Lovelace", "email": "ada@example.com"}
            ]));
        })
        .await;
    let update = server
        .mock_async(|when, then| {
            when.method(PUT).path("/users/2").json_body(json!({
                "id": 2, "name": "Ada", "surname": "King", "email": "ada@example.com"
            }));
            then.status(200).json_body(json!({
                "id": 2, "name": "Ada", "surname": "King", "email": "ada@example.com"
            }));
        })
        .await;
    let app = console!(server);

    let req = test::TestRequest::get().uri("/users/2/edit").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("action=\"/users/2\""));
    assert!(body.contains("value=\"Lovelace\""));

    let req = test::TestRequest::post()
        .uri("/users/2")
        .set_form([("name", "Ada"), ("surname", "King"), ("email", "ada@example.com")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    update.assert_async().await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/users");
}

#[actix_web::test]
async fn missing_detail_is_not_found() {
    let server = MockServer::start_async().await;
    let lookup = server
        .mock_async(|when, then| {
            when.method(GET).path("/cars/999");
            then.status(404);
        })
        .await;
    let app = console!(server);

    let req = test::TestRequest::get().uri("/cars/999").to_request();
    let resp = test::call_service(&app, req).await;
    lookup.assert_async().await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_text(resp).await.contains("Car not found."));
}

#[actix_web::test]
async fn non_numeric_detail_id_makes_no_call() {
    let server = MockServer::start_async().await;
    let lookup = server
        .mock_async(|when, then| {
            when.method(GET).path("/cars/abc");
            then.status(200);
        })
        .await;
    let app = console!(server);

    let req = test::TestRequest::get().uri("/cars/abc").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    lookup.assert_calls_async(0).await;
}

#[actix_web::test]
async fn failing_detail_is_unavailable() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/rentals/5");
            then.status(500);
        })
        .await;
    let app = console!(server);

    let req = test::TestRequest::get().uri("/rentals/5").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = body_text(resp).await;
    assert!(body.contains("could not be loaded"));
    assert!(body.contains("fetch rentals: server answered 500 Internal Server Error"));
}

#[actix_web::test]
async fn rental_detail_links_car_and_user() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/rentals/5");
            then.status(200).json_body(json!({
                "id": 5, "carId": 1, "userId": 2,
                "startDate": "2024-05-01", "endDate": "2024-05-04", "totalPrice": 90
            }));
        })
        .await;
    let app = console!(server);

    let req = test::TestRequest::get().uri("/rentals/5").to_request();
    let body = body_text(test::call_service(&app, req).await).await;
    assert!(body.contains("href=\"/cars/1\""));
    assert!(body.contains("href=\"/users/2\""));
    assert!(body.contains("01-05-2024"));
}

#[actix_web::test]
async fn rent_action_prefills_rental_form() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/rentals");
            then.status(200).json_body(json!([]));
        })
        .await;
    let app = console!(server);

    let req = test::TestRequest::get()
        .uri("/rentals/new?car_id=3&total_price=25")
        .to_request();
    let body = body_text(test::call_service(&app, req).await).await;
    assert!(body.contains("name=\"car_id\" value=\"3\""));
    assert!(body.contains("name=\"total_price\" value=\"25\""));
    assert!(body.contains("name=\"user_id\" value=\"\""));
}

#[actix_web::test]
async fn delete_asks_for_confirmation() {
    let server = MockServer::start_async().await;
    mock_fleet(&server).await;
    let app = console!(server);

    let req = test::TestRequest::get().uri("/cars/2/delete").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_text(resp).await;
    assert!(body.contains("Delete car #2?"));
    assert!(body.contains("action=\"/cars/2/delete\""));
}

#[actix_web::test]
async fn declined_delete_makes_no_call() {
    let server = MockServer::start_async().await;
    let list = mock_fleet(&server).await;
    let delete = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/cars/1");
            then.status(200);
        })
        .await;
    let app = console!(server);

    let req = test::TestRequest::post()
        .uri("/cars/1/delete")
        .set_form([("confirm", "no")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/cars");
    delete.assert_calls_async(0).await;
    list.assert_calls_async(0).await;
}

#[actix_web::test]
async fn confirmed_delete_calls_api_and_redirects() {
    let server = MockServer::start_async().await;
    mock_fleet(&server).await;
    let delete = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/cars/1");
            then.status(200);
        })
        .await;
    let app = console!(server);

    let req = test::TestRequest::post()
        .uri("/cars/1/delete")
        .set_form([("confirm", "yes"), ("field", "model"), ("q", "a")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    delete.assert_async().await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/cars?field=model&q=a");
}

#[actix_web::test]
async fn unknown_path_is_404() {
    let server = MockServer::start_async().await;
    let app = console!(server);

    let req = test::TestRequest::get().uri("/garages").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn unknown_path_with_other_method_is_405() {
    let server = MockServer::start_async().await;
    let app = console!(server);

    let req = test::TestRequest::delete().uri("/garages").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[actix_web::test]
async fn redirect_keeps_a_chosen_field_without_query() {
    let server = MockServer::start_async().await;
    let app = console!(server);

    let req = test::TestRequest::post()
        .uri("/cars/1/delete")
        .set_form([("confirm", "no"), ("field", "plate"), ("q", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/cars?field=plate");
}
