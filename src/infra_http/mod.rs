mod resolver_client_http;

pub use resolver_client_http::*;
