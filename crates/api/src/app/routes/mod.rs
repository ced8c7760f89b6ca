use axum::{
    Router,
    routing::{get, post},
};

pub mod auth;
pub mod posts;
pub mod system;

/// Router for every endpoint; the identity binder is layered on top.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/posts", post(posts::create_post))
        .route(
            "/posts/:id",
            get(posts::get_post)
                .patch(posts::update_post)
                .delete(posts::delete_post),
        )
        .route("/users/:id/posts", get(posts::list_user_posts))
}
