use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse};

use crate::state::AppState;

const CHAT_PAGE: &str = include_str!("../../../templates/chat.html");
const UPLOAD_PAGE: &str = include_str!("../../../templates/upload.html");
const DOCUMENTS_PAGE: &str = include_str!("../../../templates/documents.html");
const SCRIPT: &str = include_str!("../../../static/script.js");

pub const EMPTY_CATALOG_MESSAGE: &str = "No documents uploaded yet.";

pub async fn chat_page() -> Html<&'static str> {
    Html(CHAT_PAGE)
}

pub async fn upload_page() -> Html<&'static str> {
    Html(UPLOAD_PAGE)
}

pub async fn documents_page(State(state): State<Arc<AppState>>) -> Html<String> {
    let documents = state.rag.list_documents().await;
    Html(DOCUMENTS_PAGE.replace("{{documents}}", &render_document_list(&documents)))
}

pub async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        SCRIPT,
    )
}

fn render_document_list(documents: &[String]) -> String {
    if documents.is_empty() {
        return format!("    <p class=\"text-muted\">{}</p>", EMPTY_CATALOG_MESSAGE);
    }

    let items: String = documents
        .iter()
        .map(|name| {
            format!(
                "        <li class=\"list-group-item\">{}</li>\n",
                html_escape::encode_text(name)
            )
        })
        .collect();
    format!("    <ul class=\"list-group\">\n{}    </ul>", items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_catalog_shows_placeholder() {
        assert!(render_document_list(&[]).contains(EMPTY_CATALOG_MESSAGE));
    }

    #[test]
    fn names_are_escaped() {
        let html = render_document_list(&["a<b>&c.pdf".to_string(), "doc.pdf".to_string()]);
        assert!(html.contains("a&lt;b&gt;&amp;c.pdf"));
        assert!(html.contains("<li class=\"list-group-item\">doc.pdf</li>"));
        assert!(!html.contains(EMPTY_CATALOG_MESSAGE));
    }
}
