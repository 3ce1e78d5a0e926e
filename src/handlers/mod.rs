pub mod home;
pub mod stock;
pub mod health;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.configure(home::config)
        .configure(health::config)
        .configure(stock::config);
}
