//! Shared helpers for driving the router in-process.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use budget::{
    build_router,
    project::{database::connect_in_memory, NewProject, Project, ProjectStorage},
};
use rust_decimal::Decimal;
use tower::ServiceExt;

/// Router plus direct storage access over the same in-memory database
pub struct TestApp {
    pub router: Router,
    pub storage: ProjectStorage,
}

pub async fn test_app() -> TestApp {
    let pool = connect_in_memory().await.unwrap();
    TestApp {
        router: build_router(pool.clone(), "static"),
        storage: ProjectStorage::new(pool),
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|value| value.to_str().unwrap().to_string());
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        TestResponse {
            status,
            location,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&self, uri: &str, form: &str) -> TestResponse {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn delete_json(&self, uri: &str, json: serde_json::Value) -> TestResponse {
        let request = Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// DELETE with a raw body and an optional content type
    pub async fn delete_raw(&self, uri: &str, content_type: Option<&str>, body: &str) -> TestResponse {
        let mut builder = Request::builder().method(Method::DELETE).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap()).await
    }

    /// Insert a project straight into storage, bypassing the form
    pub async fn create_project(&self, name: &str, budget: i64, categories: &[&str]) -> Project {
        self.storage
            .create_project(&NewProject {
                name: name.to_string(),
                slug: budget::project::slug::slugify(name),
                budget: Decimal::from(budget),
                categories: categories.iter().map(|c| c.to_string()).collect(),
            })
            .await
            .unwrap()
    }
}

/// href of the first anchor in the page
pub fn first_link(body: &str) -> Option<String> {
    let anchor = body.find("<a ")?;
    href_after(body, anchor)
}

/// href of the anchor whose text is exactly `text`
pub fn link_with_text(body: &str, text: &str) -> Option<String> {
    let text_at = body.find(&format!(">{text}</a>"))?;
    let anchor = body[..text_at].rfind("<a ")?;
    href_after(body, anchor)
}

/// Inner text of the first `<tag ...>` element
pub fn first_element_text(body: &str, tag: &str) -> Option<String> {
    let open = body.find(&format!("<{tag}"))?;
    let content_start = open + body[open..].find('>')? + 1;
    let content_end = content_start + body[content_start..].find(&format!("</{tag}>"))?;
    Some(body[content_start..content_end].trim().to_string())
}

/// src of the first script tag in the page
pub fn first_script_src(body: &str) -> Option<String> {
    let tag = body.find("<script ")?;
    let start = tag + body[tag..].find("src=\"")? + "src=\"".len();
    let end = start + body[start..].find('"')?;
    Some(body[start..end].to_string())
}

fn href_after(body: &str, anchor: usize) -> Option<String> {
    let tag_end = anchor + body[anchor..].find('>')?;
    let tag = &body[anchor..tag_end];
    let start = tag.find("href=\"")? + "href=\"".len();
    let end = start + tag[start..].find('"')?;
    Some(tag[start..end].to_string())
}
