//! Router module for handling all API routes

pub mod gateway;
pub mod public;

use actix_web::web;

/// Configure all routes mounted under the API router prefix
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope(gateway::ROUTER_PREFIX).configure(gateway::configure_routes));
}

/// Configure public root routes (mounted outside the router prefix).
pub fn configure_public_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(public::configure_public_routes);
}
