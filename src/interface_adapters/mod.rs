pub mod clients;
pub mod credentials;
pub mod handlers;
pub mod middleware;
pub mod protocol;
pub mod routes;
pub mod state;
