mod route_guards;

pub use route_guards::{issue_token, protect_admin_route, protect_route, Claims};
