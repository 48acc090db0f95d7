use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post, put};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{auth, comments, likes, messenger, middleware, photos, posts, users};

/// The full route table. Everything except the two auth entry points sits
/// behind the authentication layer; the guards at each endpoint decide what
/// an anonymous or foreign caller may do.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .with_state(state.clone());

    let protected = Router::new()
        .route(
            "/users/{owner_id}",
            get(users::get).put(users::update).delete(users::remove),
        )
        .route("/users/username/{username}", put(users::update_by_username))
        .route("/users/email/{email}", put(users::update_by_email))
        .route(
            "/users/{owner_id}/posts",
            post(posts::create).get(posts::list),
        )
        .route(
            "/users/{owner_id}/posts/{post_id}",
            get(posts::get).put(posts::update).delete(posts::remove),
        )
        .route(
            "/users/{owner_id}/posts/{post_id}/comments",
            post(comments::create).get(comments::list),
        )
        .route(
            "/users/{owner_id}/posts/{post_id}/comments/{comment_id}",
            get(comments::get)
                .put(comments::update)
                .delete(comments::remove),
        )
        .route(
            "/users/{owner_id}/posts/{post_id}/likes",
            post(likes::create).get(likes::list),
        )
        .route(
            "/users/{owner_id}/posts/{post_id}/likes/{like_id}",
            get(likes::get).delete(likes::remove),
        )
        .route(
            "/users/{owner_id}/posts/{post_id}/photos",
            post(photos::create).get(photos::list),
        )
        .route(
            "/users/{owner_id}/posts/{post_id}/photos/{photo_id}",
            get(photos::get).delete(photos::remove),
        )
        .route(
            "/users/{owner_id}/messengers",
            post(messenger::start).get(messenger::list),
        )
        .route(
            "/users/{owner_id}/messengers/{messenger_id}",
            delete(messenger::remove),
        )
        .route(
            "/users/{owner_id}/messengers/{messenger_id}/messages",
            post(messenger::send).get(messenger::messages),
        )
        .route(
            "/users/{owner_id}/messengers/{messenger_id}/messages/last",
            get(messenger::last),
        )
        .route(
            "/users/{owner_id}/messengers/{messenger_id}/messages/{message_id}",
            get(messenger::message),
        )
        .layer(from_fn_with_state(state.clone(), middleware::authenticate))
        .with_state(state);

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
