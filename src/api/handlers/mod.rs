mod admin;
mod equations;
mod images;
mod terms;

pub use admin::health;
pub use equations::{create_equation, delete_equation, list_equations, update_equation};
pub use images::{delete_image, list_images, serve_image, upload_image};
pub use terms::{create_term, delete_term, list_terms, update_term};
