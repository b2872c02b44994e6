/// One documented API endpoint, as listed on the `/docs` page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub source: &'static str,
    pub request: &'static str,
    pub response: &'static str,
}

const ROUTES: &[RouteInfo] = &[
    RouteInfo {
        method: "GET",
        path: "/api/tickets",
        source: "tickets",
        request: "query: status?, assignedUserId?",
        response: "200 Ticket[], newest update first",
    },
    RouteInfo {
        method: "POST",
        path: "/api/tickets",
        source: "tickets",
        request: "{ title, description?, status?, assignedUserId? }",
        response: "201 Ticket with Location; 400",
    },
    RouteInfo {
        method: "GET",
        path: "/api/tickets/{id}",
        source: "tickets",
        request: "",
        response: "200 Ticket; 404",
    },
    RouteInfo {
        method: "PUT",
        path: "/api/tickets/{id}",
        source: "tickets",
        request: "{ id, title, description?, status?, assignedUserId? }",
        response: "200 Ticket; 400; 404",
    },
    RouteInfo {
        method: "DELETE",
        path: "/api/tickets/{id}",
        source: "tickets",
        request: "",
        response: "204; 404",
    },
    RouteInfo {
        method: "POST",
        path: "/api/tickets/{id}/assign",
        source: "tickets",
        request: "{ assignedUserId? }",
        response: "200 Ticket; 400; 404",
    },
    RouteInfo {
        method: "GET",
        path: "/api/users",
        source: "users",
        request: "",
        response: "200 User[] by name",
    },
    RouteInfo {
        method: "GET",
        path: "/api/users/{id}",
        source: "users",
        request: "",
        response: "200 User; 404",
    },
];

pub fn routes() -> &'static [RouteInfo] {
    ROUTES
}
