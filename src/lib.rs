#[macro_use]
extern crate lazy_static;

use tera::Tera;

pub mod api;
pub mod config;
pub mod errors;
pub mod filter;
pub mod forms;
pub mod resource;
pub mod routes;
pub mod structs;
pub mod utils;
pub mod view;

lazy_static! {
    pub static ref TEMPLATES: Tera = {
        let mut tera = match Tera::new("templates/**/*") {
            Ok(t) => t,
            Err(e) => {
                log::error!("Parsing error(s): {}", e);
                ::std::process::exit(1);
            }
        };
        tera.autoescape_on(vec![".html"]);
        tera.register_filter("day", utils::day_filter);
        tera
    };
}
