use actix_files::NamedFile;
use actix_web::{
    get,
    http::{Method, StatusCode},
    web::{self, Data},
    Either, HttpResponse, Responder,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tera::Context;

use crate::{
    api::{Clients, Lookup, ResourceClient},
    errors::AppError,
    forms::EntityForm,
    resource::{FilterField, Resource},
    structs::{Car, Rental, User},
    utils::{filter_query, list_location},
    view::{DetailView, ListView, Outcome},
    TEMPLATES,
};

/// Filter selection carried in list URLs and hidden form fields.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default)]
pub struct ListQuery {
    pub field: Option<String>,
    pub q: Option<String>,
}

impl ListQuery {
    fn from_params(params: &HashMap<String, String>) -> Self {
        Self {
            field: params.get("field").cloned(),
            q: params.get("q").cloned(),
        }
    }

    fn view<R: Resource>(&self) -> ListView<R> {
        ListView::new(
            R::Field::parse_or_default(self.field.as_deref()),
            self.q.clone().unwrap_or_default(),
        )
    }

    fn location<R: Resource>(&self) -> String {
        let field = R::Field::parse_or_default(self.field.as_deref());
        list_location(R::PATH, field, self.q.as_deref().unwrap_or_default())
    }
}

#[derive(Serialize)]
struct FieldOption {
    name: &'static str,
    label: &'static str,
    selected: bool,
}

fn render(template: &str, context: &Context, status: StatusCode) -> Result<HttpResponse, AppError> {
    let rendered = TEMPLATES.render(template, context).map_err(|e| {
        log::error!("Failed to render template {}: {}", template, e);
        AppError::TemplateError(e)
    })?;

    Ok(HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(rendered))
}

fn page_context(title: &str) -> Context {
    let mut context = Context::new();
    context.insert("title", title);
    context.insert("version", env!("CARGO_PKG_VERSION"));
    context
}

fn see_other(location: String) -> HttpResponse {
    HttpResponse::SeeOther()
        .append_header(("Location", location))
        .finish()
}

fn render_list<R: Resource>(view: &ListView<R>, status: StatusCode) -> Result<HttpResponse, AppError> {
    let field = view.field();
    let fields: Vec<FieldOption> = R::Field::ALL
        .iter()
        .map(|f| FieldOption {
            name: f.name(),
            label: f.label(),
            selected: *f == field,
        })
        .collect();

    let mut context = page_context(R::PLURAL);
    context.insert("resource", R::PATH);
    context.insert("singular", R::SINGULAR);
    context.insert("rows", &view.visible());
    context.insert("total", &view.items().len());
    context.insert("fields", &fields);
    context.insert("field", field.name());
    context.insert("field_label", field.label());
    context.insert("query", view.query());
    context.insert("filter_qs", &filter_query(field, view.query()));
    context.insert("modal", view.modal());
    context.insert("notice", &view.notice());
    context.insert("candidate_id", &view.candidate_id());

    render(&format!("{}/list.html", R::PATH), &context, status)
}

/// Not-found page; a `reason` switches it to the could-not-load wording.
fn render_missing<R: Resource>(reason: Option<&str>, status: StatusCode) -> Result<HttpResponse, AppError> {
    let mut context = page_context(R::SINGULAR);
    context.insert("resource", R::PATH);
    context.insert("singular", R::SINGULAR);
    context.insert("unavailable", &reason.is_some());
    context.insert("reason", &reason);
    render("missing.html", &context, status)
}

fn render_detail<R: Resource>(view: DetailView<R>) -> Result<HttpResponse, AppError> {
    match view.lookup {
        Lookup::Found(item) => {
            let mut context = page_context(&format!("{} #{}", R::SINGULAR, item.id()));
            context.insert("resource", R::PATH);
            context.insert("item", &item);
            render(&format!("{}/detail.html", R::PATH), &context, StatusCode::OK)
        }
        Lookup::NotFound => render_missing::<R>(None, StatusCode::NOT_FOUND),
        Lookup::Unavailable(reason) => {
            render_missing::<R>(Some(reason.as_str()), StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

fn failure_status(outcome: Outcome) -> StatusCode {
    match outcome {
        Outcome::Invalid => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::BAD_GATEWAY,
    }
}

/// The row with `id` from the loaded list, or straight from the API.
async fn locate<R: Resource>(view: &ListView<R>, client: &ResourceClient<R>, id: i64) -> Option<R> {
    match view.find(id) {
        Some(item) => Some(item.clone()),
        None => client.get_by_id(id).await.found(),
    }
}

async fn list_handler<R: Resource>(
    client: Data<ResourceClient<R>>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let mut view = query.view::<R>();
    view.load(&client).await;
    render_list(&view, StatusCode::OK)
}

/// Add modal; query parameters named like form fields pre-fill it.
async fn new_handler<R: Resource>(
    client: Data<ResourceClient<R>>,
    params: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let mut view = ListQuery::from_params(&params).view::<R>();
    view.load(&client).await;
    view.open_add(R::Form::default().prefill(&params));
    render_list(&view, StatusCode::OK)
}

async fn create_handler<R: Resource>(
    client: Data<ResourceClient<R>>,
    web::Form(params): web::Form<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let query = ListQuery::from_params(&params);
    let mut view = query.view::<R>();
    match view.submit_add(&client, R::Form::from_params(&params)).await {
        Outcome::Done => Ok(see_other(query.location::<R>())),
        outcome => {
            view.load(&client).await;
            render_list(&view, failure_status(outcome))
        }
    }
}

async fn detail_handler<R: Resource>(
    client: Data<ResourceClient<R>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let view = DetailView::resolve(&client, &path).await;
    render_detail(view)
}

async fn edit_handler<R: Resource>(
    client: Data<ResourceClient<R>>,
    path: web::Path<String>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let Ok(id) = path.parse::<i64>() else {
        return render_missing::<R>(None, StatusCode::NOT_FOUND);
    };
    let mut view = query.view::<R>();
    view.load(&client).await;
    match locate(&view, &client, id).await {
        Some(target) => {
            view.open_edit(&target);
            render_list(&view, StatusCode::OK)
        }
        None => render_missing::<R>(None, StatusCode::NOT_FOUND),
    }
}

async fn update_handler<R: Resource>(
    client: Data<ResourceClient<R>>,
    path: web::Path<String>,
    web::Form(params): web::Form<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let Ok(id) = path.parse::<i64>() else {
        return render_missing::<R>(None, StatusCode::NOT_FOUND);
    };
    let query = ListQuery::from_params(&params);
    let mut view = query.view::<R>();
    match view.submit_edit(&client, id, R::Form::from_params(&params)).await {
        Outcome::Done => Ok(see_other(query.location::<R>())),
        outcome => {
            view.load(&client).await;
            render_list(&view, failure_status(outcome))
        }
    }
}

async fn confirm_delete_handler<R: Resource>(
    client: Data<ResourceClient<R>>,
    path: web::Path<String>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let Ok(id) = path.parse::<i64>() else {
        return render_missing::<R>(None, StatusCode::NOT_FOUND);
    };
    let mut view = query.view::<R>();
    view.load(&client).await;
    match locate(&view, &client, id).await {
        Some(target) => {
            view.request_delete(target);
            render_list(&view, StatusCode::OK)
        }
        None => render_missing::<R>(None, StatusCode::NOT_FOUND),
    }
}

/// `confirm=yes` deletes; any other answer leaves everything as it was.
async fn delete_handler<R: Resource>(
    client: Data<ResourceClient<R>>,
    path: web::Path<String>,
    web::Form(params): web::Form<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let query = ListQuery::from_params(&params);
    let Ok(id) = path.parse::<i64>() else {
        return Ok(see_other(query.location::<R>()));
    };
    let confirmed = params.get("confirm").is_some_and(|answer| answer == "yes");

    let mut view = query.view::<R>();
    if confirmed {
        view.load(&client).await;
    }
    match view.resolve_delete(&client, id, confirmed).await {
        Outcome::Done | Outcome::Declined => Ok(see_other(query.location::<R>())),
        outcome => render_list(&view, failure_status(outcome)),
    }
}

fn resource_scope<R: Resource>() -> actix_web::Scope {
    web::scope(&format!("/{}", R::PATH))
        .service(
            web::resource("")
                .route(web::get().to(list_handler::<R>))
                .route(web::post().to(create_handler::<R>)),
        )
        .service(web::resource("/new").route(web::get().to(new_handler::<R>)))
        .service(
            web::resource("/{id}")
                .route(web::get().to(detail_handler::<R>))
                .route(web::post().to(update_handler::<R>)),
        )
        .service(web::resource("/{id}/edit").route(web::get().to(edit_handler::<R>)))
        .service(
            web::resource("/{id}/delete")
                .route(web::get().to(confirm_delete_handler::<R>))
                .route(web::post().to(delete_handler::<R>)),
        )
}

/// Registers the API clients, the home page and the three resource scopes.
pub fn configure(clients: Clients) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(Data::new(clients.cars))
            .app_data(Data::new(clients.rentals))
            .app_data(Data::new(clients.users))
            .service(index_handler)
            .service(resource_scope::<Car>())
            .service(resource_scope::<Rental>())
            .service(resource_scope::<User>());
    }
}

#[get("/")]
pub async fn index_handler() -> Result<impl Responder, AppError> {
    let mut context = page_context("Home");
    context.insert("resources", &[Car::PATH, Rental::PATH, User::PATH]);
    render("home.html", &context, StatusCode::OK)
}

pub async fn default_handler(req_method: Method) -> Result<impl Responder, AppError> {
    match req_method {
        Method::GET => {
            let file = NamedFile::open("static/404.html")?
                .customize()
                .with_status(StatusCode::NOT_FOUND);
            Ok(Either::Left(file))
        }
        _ => Ok(Either::Right(HttpResponse::MethodNotAllowed().finish())),
    }
}
