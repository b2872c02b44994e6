use std::collections::BTreeMap;

use askama::Template;
use axum::{Router, http::StatusCode, response::Html, routing::get};

use crate::routes::route_list::{RouteInfo, routes};

type HtmlError = (StatusCode, Html<String>);

struct RouteGroup {
    source: &'static str,
    routes: Vec<RouteInfo>,
}

#[derive(Template)]
#[template(path = "docs.html")]
struct DocsTemplate {
    route_groups: Vec<RouteGroup>,
    route_count: usize,
}

pub fn router() -> Router {
    Router::new().route("/docs", get(docs_view))
}

async fn docs_view() -> Result<Html<String>, HtmlError> {
    let route_groups = build_route_groups(routes());
    let route_count = routes().len();
    let rendered = DocsTemplate {
        route_groups,
        route_count,
    }
    .render()
    .map_err(|err| {
        tracing::error!(error = %err, "failed to render docs");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html("failed to render docs".to_string()),
        )
    })?;
    Ok(Html(rendered))
}

/// Groups by resource, then keeps the catalog order inside each group.
fn build_route_groups(routes: &[RouteInfo]) -> Vec<RouteGroup> {
    let mut grouped: BTreeMap<&'static str, Vec<RouteInfo>> = BTreeMap::new();
    for route in routes {
        grouped.entry(route.source).or_default().push(*route);
    }
    grouped
        .into_iter()
        .map(|(source, routes)| RouteGroup { source, routes })
        .collect()
}
