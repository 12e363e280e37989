pub mod auth;
pub mod catalog;
pub mod generation;
pub mod health;
pub mod images;
pub mod profile;
pub mod tokens;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /generate                                   text-to-image (public)
/// /generate-image-to-image                    image + styles (public, multipart)
/// /image-to-image                             image + prompt (public, multipart)
/// /transform-furniture                        room + style (public, multipart)
/// /enhance-prompt                             prompt enhancement (public)
///
/// /styles                                     style catalog
/// /models                                     text-to-image models
///
/// /auth/signup                                create account (public)
/// /auth/login                                 login (public)
/// /auth/refresh                               refresh (public)
/// /auth/logout                                logout (requires auth)
/// /auth/me                                    current session (requires auth)
///
/// /profiles/{user_id}                         public profile
/// /profile                                    get, update own profile
/// /profile/avatar                             upload avatar (multipart)
/// /profile/likes                              ids of liked images
///
/// /images                                     gallery, record creation
/// /images/latest                              newest with owner (?limit=)
/// /images/{id}                                get
/// /images/{id}/like                           like status, like
/// /images/{id}/comments                       list, add
/// /users/{user_id}/images                     a user's creations
///
/// /tokens                                     balance
/// /tokens/packages                            packages
/// /tokens/purchase                            buy a package
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(generation::router())
        .merge(catalog::router())
        .nest("/auth", auth::router())
        .merge(profile::router())
        .merge(images::router())
        .nest("/tokens", tokens::router())
}
