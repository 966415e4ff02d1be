pub mod app_config;
pub mod auth_view;
pub mod book_details_view;
pub mod catalog_view;
pub mod dashboard_view;
pub mod forms;
pub mod landing;
pub mod manage_books_view;
pub mod navbar_search;
pub mod notice;
pub mod profile_view;
pub mod request_generation;
