//! Fanhall Content API
//!
//! Community-content REST service: accounts, fandoms, blogs, posts,
//! comments and votes, fronted by the token gate and the cascading
//! permission engine.

mod config;
mod error;
mod extractors;
mod handlers;
mod locator;
mod response;
mod state;

use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use fanhall_auth_core::TokenService;
use fanhall_db::Repositories;

use crate::config::Config;
use crate::handlers::{auth, blogs, comments, fandoms, posts, users};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Fanhall content API");

    let config = Config::from_env()?;
    let http_port = config.http_port;

    let pool = fanhall_db::create_pool(&config.database_url).await?;
    let repos = Repositories::new(pool);
    let tokens = TokenService::new(config.auth.clone(), Arc::new(repos.credentials.clone()))?;
    let state = AppState::new(tokens, repos, config);

    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], http_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// The full route table. Entity selectors come in two spellings: a bare
/// segment (numeric id, or `current` for users) and a `u/<slug>`
/// variant captured as `<name>_slug`.
fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/invalidate", post(auth::invalidate))
        .route("/auth/change", post(auth::change))
        // Users
        .route("/users", get(users::list))
        .route("/users/:user", get(users::get).patch(users::update))
        .route("/users/u/:user_slug", get(users::get).patch(users::update))
        .route("/users/:user/history", get(users::history))
        .route("/users/u/:user_slug/history", get(users::history))
        .route("/users/:user/blogs", get(users::blogs))
        .route("/users/u/:user_slug/blogs", get(users::blogs))
        .route("/users/:user/posts", get(users::posts))
        .route("/users/u/:user_slug/posts", get(users::posts))
        .route("/users/:user/comments", get(users::comments))
        .route("/users/u/:user_slug/comments", get(users::comments))
        // Fandoms
        .route("/fandoms", get(fandoms::list).post(fandoms::create))
        .route(
            "/fandoms/:fandom",
            get(fandoms::get).patch(fandoms::update),
        )
        .route(
            "/fandoms/u/:fandom_slug",
            get(fandoms::get).patch(fandoms::update),
        )
        .route("/fandoms/:fandom/history", get(fandoms::history))
        .route("/fandoms/u/:fandom_slug/history", get(fandoms::history))
        .route(
            "/fandoms/:fandom/moders",
            get(fandoms::moders_list).post(fandoms::moders_create),
        )
        .route(
            "/fandoms/u/:fandom_slug/moders",
            get(fandoms::moders_list).post(fandoms::moders_create),
        )
        .route(
            "/fandoms/:fandom/moders/:moder",
            get(fandoms::moders_get)
                .patch(fandoms::moders_update)
                .delete(fandoms::moders_delete),
        )
        .route(
            "/fandoms/u/:fandom_slug/moders/:moder",
            get(fandoms::moders_get)
                .patch(fandoms::moders_update)
                .delete(fandoms::moders_delete),
        )
        .route(
            "/fandoms/:fandom/bans",
            get(fandoms::bans_list).post(fandoms::bans_create),
        )
        .route(
            "/fandoms/u/:fandom_slug/bans",
            get(fandoms::bans_list).post(fandoms::bans_create),
        )
        .route(
            "/fandoms/:fandom/bans/:banned",
            get(fandoms::bans_get).delete(fandoms::bans_delete),
        )
        .route(
            "/fandoms/u/:fandom_slug/bans/:banned",
            get(fandoms::bans_get).delete(fandoms::bans_delete),
        )
        .route(
            "/fandoms/:fandom/blogs",
            get(fandoms::blogs_list).post(fandoms::blogs_create),
        )
        .route(
            "/fandoms/u/:fandom_slug/blogs",
            get(fandoms::blogs_list).post(fandoms::blogs_create),
        )
        .route("/fandoms/:fandom/blogs/:blog", get(fandoms::blogs_get))
        .route(
            "/fandoms/:fandom/blogs/u/:blog_slug",
            get(fandoms::blogs_get),
        )
        .route(
            "/fandoms/u/:fandom_slug/blogs/:blog",
            get(fandoms::blogs_get),
        )
        .route(
            "/fandoms/u/:fandom_slug/blogs/u/:blog_slug",
            get(fandoms::blogs_get),
        )
        .route("/fandoms/:fandom/posts", get(fandoms::posts_list))
        .route("/fandoms/u/:fandom_slug/posts", get(fandoms::posts_list))
        .route("/fandoms/:fandom/comments", get(fandoms::comments_list))
        .route(
            "/fandoms/u/:fandom_slug/comments",
            get(fandoms::comments_list),
        )
        // Blogs
        .route("/blogs", get(blogs::list))
        .route("/blogs/:blog", get(blogs::get).patch(blogs::update))
        .route("/blogs/:blog/history", get(blogs::history))
        .route(
            "/blogs/:blog/moders",
            get(blogs::moders_list).post(blogs::moders_create),
        )
        .route(
            "/blogs/:blog/moders/:moder",
            get(blogs::moders_get)
                .patch(blogs::moders_update)
                .delete(blogs::moders_delete),
        )
        .route(
            "/blogs/:blog/bans",
            get(blogs::bans_list).post(blogs::bans_create),
        )
        .route(
            "/blogs/:blog/bans/:banned",
            get(blogs::bans_get).delete(blogs::bans_delete),
        )
        .route(
            "/blogs/:blog/posts",
            get(blogs::posts_list).post(blogs::posts_create),
        )
        .route("/blogs/:blog/comments", get(blogs::comments_list))
        // Posts
        .route("/posts", get(posts::list))
        .route("/posts/:post", get(posts::get).patch(posts::update))
        .route("/posts/:post/history", get(posts::history))
        .route(
            "/posts/:post/votes",
            get(posts::votes_list).put(posts::votes_put),
        )
        .route(
            "/posts/:post/comments",
            get(posts::comments_list).post(posts::comments_create),
        )
        // Comments
        .route("/comments", get(comments::list))
        .route(
            "/comments/:comment",
            get(comments::get).patch(comments::update),
        )
        .route("/comments/:comment/history", get(comments::history))
        .route(
            "/comments/:comment/answers",
            get(comments::answers_list).post(comments::answers_create),
        )
        .route(
            "/comments/:comment/votes",
            get(comments::votes_list).put(comments::votes_put),
        )
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}
