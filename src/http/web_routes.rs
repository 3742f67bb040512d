//! Server-rendered web portal.
//!
//! Two pages (schema index, collection view) plus form endpoints under
//! `/web`. Pages are rendered as plain HTML strings; errors show inline on
//! the page that triggered them. The portal always operates on the default
//! schema from the config unless a form names another.

use std::sync::Arc;

use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use crate::codec::Record;

use super::server::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateForm {
    pub collection_name: String,
    #[serde(default)]
    pub data: String,
}

#[derive(Debug, Deserialize)]
pub struct InsertForm {
    pub collection_name: String,
    pub schema_name: String,
    pub data: String,
}

#[derive(Debug, Deserialize)]
pub struct EditForm {
    pub collection_name: String,
    pub schema_name: String,
    pub id: String,
    pub data: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    pub collection_name: String,
    pub schema_name: String,
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct DropForm {
    pub collection_name: String,
    pub schema_name: String,
}

type Page = (StatusCode, Html<String>);

/// Portal routes, merged at the router root.
pub fn web_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/collections/{schema}/{collection}", get(collection_page))
        .route("/web/create", post(web_create))
        .route("/web/insert", post(web_insert))
        .route("/web/edit", post(web_edit))
        .route("/web/delete", post(web_delete))
        .route("/web/drop", post(web_drop))
        .with_state(state)
}

async fn index_page(State(state): State<Arc<AppState>>) -> Page {
    render_index(&state, None)
}

async fn collection_page(
    State(state): State<Arc<AppState>>,
    Path((schema, collection)): Path<(String, String)>,
) -> Page {
    render_collection(&state, &schema, &collection, None)
}

async fn web_create(State(state): State<Arc<AppState>>, Form(form): Form<CreateForm>) -> Page {
    let schema = state.config.schema_name.clone();

    if form.collection_name.is_empty() {
        return render_index(&state, Some(Err("Collection name is required".to_string())));
    }

    let initial = if form.data.is_empty() {
        None
    } else {
        Some(form.data.as_str())
    };
    match state.store.create(&schema, &form.collection_name, initial) {
        Ok(()) => render_index(
            &state,
            Some(Ok(format!("Collection {} created", form.collection_name))),
        ),
        Err(e) => render_index(&state, Some(Err(e.to_string()))),
    }
}

async fn web_insert(State(state): State<Arc<AppState>>, Form(form): Form<InsertForm>) -> Page {
    match state
        .store
        .insert(&form.schema_name, &form.collection_name, &form.data)
    {
        Ok(()) => render_collection(
            &state,
            &form.schema_name,
            &form.collection_name,
            Some(Ok("Record inserted".to_string())),
        ),
        Err(e) => render_collection(
            &state,
            &form.schema_name,
            &form.collection_name,
            Some(Err(e.to_string())),
        ),
    }
}

async fn web_edit(State(state): State<Arc<AppState>>, Form(form): Form<EditForm>) -> Page {
    match state
        .store
        .update(&form.schema_name, &form.collection_name, &form.id, &form.data)
    {
        Ok(()) => render_collection(
            &state,
            &form.schema_name,
            &form.collection_name,
            Some(Ok(format!("Record {} updated", form.id))),
        ),
        Err(e) => render_collection(
            &state,
            &form.schema_name,
            &form.collection_name,
            Some(Err(e.to_string())),
        ),
    }
}

async fn web_delete(State(state): State<Arc<AppState>>, Form(form): Form<DeleteForm>) -> Page {
    match state
        .store
        .delete(&form.schema_name, &form.collection_name, &form.id)
    {
        Ok(()) => render_collection(
            &state,
            &form.schema_name,
            &form.collection_name,
            Some(Ok(format!("Record {} deleted", form.id))),
        ),
        Err(e) => render_collection(
            &state,
            &form.schema_name,
            &form.collection_name,
            Some(Err(e.to_string())),
        ),
    }
}

async fn web_drop(State(state): State<Arc<AppState>>, Form(form): Form<DropForm>) -> Page {
    match state
        .store
        .drop_collection(&form.schema_name, &form.collection_name)
    {
        Ok(()) => render_index(
            &state,
            Some(Ok(format!("Collection {} dropped", form.collection_name))),
        ),
        Err(e) => render_index(&state, Some(Err(e.to_string()))),
    }
}

// --- rendering ---

fn render_index(state: &AppState, notice: Option<Result<String, String>>) -> Page {
    let schema = &state.config.schema_name;
    let mut body = String::new();

    body.push_str(&format!("<h1>veildb / schema {}</h1>", escape(schema)));
    push_notice(&mut body, &notice);

    match state.store.list(schema) {
        Ok(collections) => {
            body.push_str("<ul>");
            for name in collections {
                body.push_str(&format!(
                    r#"<li><a href="/collections/{}/{}">{}</a></li>"#,
                    escape(schema),
                    escape(&name),
                    escape(&name)
                ));
            }
            body.push_str("</ul>");
        }
        Err(e) => push_notice(&mut body, &Some(Err(e.to_string()))),
    }

    body.push_str(
        r#"<h2>Create collection</h2>
<form method="post" action="/web/create">
  <input name="collection_name" placeholder="name">
  <input name="data" placeholder='{"field":"value"} (optional)'>
  <button type="submit">Create</button>
</form>"#,
    );

    let status = if matches!(notice, Some(Err(_))) {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    };
    (status, Html(page("veildb", &body)))
}

fn render_collection(
    state: &AppState,
    schema: &str,
    collection: &str,
    notice: Option<Result<String, String>>,
) -> Page {
    let mut body = String::new();
    body.push_str(&format!(
        "<h1>{} / {}</h1><p><a href=\"/\">back</a></p>",
        escape(schema),
        escape(collection)
    ));
    push_notice(&mut body, &notice);

    match state.store.load(schema, collection) {
        Ok(records) => {
            for record in &records {
                body.push_str(&record_block(schema, collection, record));
            }
            if records.is_empty() {
                body.push_str("<p>No records.</p>");
            }
        }
        Err(e) => push_notice(&mut body, &Some(Err(e.to_string()))),
    }

    body.push_str(&format!(
        r#"<h2>Insert record</h2>
<form method="post" action="/web/insert">
  <input type="hidden" name="collection_name" value="{coll}">
  <input type="hidden" name="schema_name" value="{schema}">
  <input name="data" placeholder='{{"field":"value"}}'>
  <button type="submit">Insert</button>
</form>
<form method="post" action="/web/drop">
  <input type="hidden" name="collection_name" value="{coll}">
  <input type="hidden" name="schema_name" value="{schema}">
  <button type="submit">Drop collection</button>
</form>"#,
        coll = escape(collection),
        schema = escape(schema),
    ));

    let status = if matches!(notice, Some(Err(_))) {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    };
    (status, Html(page(collection, &body)))
}

fn record_block(schema: &str, collection: &str, record: &Record) -> String {
    let id = record.id().unwrap_or("");
    let pretty = serde_json::to_string_pretty(record.fields()).unwrap_or_default();
    format!(
        r#"<div class="record">
<pre>{json}</pre>
<form method="post" action="/web/edit">
  <input type="hidden" name="collection_name" value="{coll}">
  <input type="hidden" name="schema_name" value="{schema}">
  <input type="hidden" name="id" value="{id}">
  <input name="data" placeholder='{{"field":"value"}}'>
  <button type="submit">Edit</button>
</form>
<form method="post" action="/web/delete">
  <input type="hidden" name="collection_name" value="{coll}">
  <input type="hidden" name="schema_name" value="{schema}">
  <input type="hidden" name="id" value="{id}">
  <button type="submit">Delete</button>
</form>
</div>"#,
        json = escape(&pretty),
        coll = escape(collection),
        schema = escape(schema),
        id = escape(id),
    )
}

fn push_notice(body: &mut String, notice: &Option<Result<String, String>>) {
    match notice {
        Some(Ok(message)) => body.push_str(&format!("<p class=\"ok\">{}</p>", escape(message))),
        Some(Err(error)) => body.push_str(&format!("<p class=\"error\">{}</p>", escape(error))),
        None => {}
    }
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>{}</title></head><body>{}</body></html>",
        escape(title),
        body
    )
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_neutralizes_markup() {
        assert_eq!(
            escape(r#"<script>"x"&</script>"#),
            "&lt;script&gt;&quot;x&quot;&amp;&lt;/script&gt;"
        );
    }

    #[test]
    fn test_page_wraps_body() {
        let html = page("users", "<h1>hi</h1>");
        assert!(html.starts_with("<!doctype html>"));
        assert!(html.contains("<title>users</title>"));
        assert!(html.contains("<h1>hi</h1>"));
    }
}
