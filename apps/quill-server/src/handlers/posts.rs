//! Post handlers: list, show, create, edit, update, delete.

use std::collections::HashMap;

use actix_web::{HttpResponse, http::header, web};
use uuid::Uuid;

use quill_core::OwnershipPolicy;
use quill_core::domain::{Post, PostInput};
use quill_shared::ApiResponse;
use quill_shared::dto::{ListQuery, PostForm, PostListResponse, PostResponse, PostSummary, excerpt};

use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// A malformed id names no post, so it is NotFound like any unknown id.
fn parse_post_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("Post not found".to_string()))
}

fn validated(form: PostForm) -> AppResult<PostInput> {
    let valid = form.validate().map_err(AppError::Validation)?;
    Ok(PostInput::new(valid.title, valid.content))
}

fn post_response(post: Post, author_name: Option<String>, viewer: Option<Uuid>) -> PostResponse {
    let can_modify = viewer.is_some_and(|id| OwnershipPolicy::permits(&post, id));

    PostResponse {
        id: post.id,
        user_id: post.user_id,
        title: post.title,
        content: post.content,
        author_name,
        created_at: post.created_at,
        updated_at: post.updated_at,
        can_modify,
    }
}

fn summary(post: Post, names: &HashMap<Uuid, String>) -> PostSummary {
    PostSummary {
        id: post.id,
        excerpt: excerpt(&post.content),
        author_name: names.get(&post.user_id).cloned(),
        title: post.title,
        created_at: post.created_at,
    }
}

/// Render a single post with its owner's name resolved.
async fn detail(state: &AppState, post: Post, viewer: Option<Uuid>) -> AppResult<PostResponse> {
    let mut names = state.posts.author_names(std::slice::from_ref(&post)).await?;
    let author_name = names.remove(&post.user_id);

    Ok(post_response(post, author_name, viewer))
}

/// GET /api/posts?page=N
pub async fn index(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    let page = state
        .posts
        .list(query.page.unwrap_or(1), state.posts_per_page)
        .await?;
    let names = state.posts.author_names(&page.items).await?;

    let last_page = page.last_page();
    let response = PostListResponse {
        page: page.page,
        per_page: page.per_page,
        total: page.total,
        last_page,
        posts: page.items.into_iter().map(|p| summary(p, &names)).collect(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::ok(response)))
}

/// GET /api/posts/{id}
pub async fn show(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post_id = parse_post_id(&path)?;
    let post = state.posts.get(post_id).await?;

    let response = detail(&state, post, viewer.user_id()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(response)))
}

/// POST /api/posts
pub async fn store(
    state: web::Data<AppState>,
    identity: Identity,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let input = validated(form.into_inner())?;
    let post = state.posts.create(identity.user_id, input).await?;

    let location = format!("/api/posts/{}", post.id);
    let response = detail(&state, post, Some(identity.user_id)).await?;

    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, location))
        .json(ApiResponse::ok(response)))
}

/// GET /api/posts/{id}/edit - current values for the owner's edit form
pub async fn edit(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post_id = parse_post_id(&path)?;
    let post = state.posts.edit(post_id, identity.user_id).await?;

    let response = detail(&state, post, Some(identity.user_id)).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(response)))
}

/// PUT /api/posts/{id} (or POST from a plain form)
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let post_id = parse_post_id(&path)?;
    let input = validated(form.into_inner())?;

    let post = state.posts.update(post_id, identity.user_id, input).await?;

    let response = detail(&state, post, Some(identity.user_id)).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(response, "Successfully saved")))
}

/// DELETE /api/posts/{id} (or POST /api/posts/{id}/delete from a plain form)
pub async fn destroy(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post_id = parse_post_id(&path)?;
    state.posts.delete(post_id, identity.user_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::done("Successfully deleted post")))
}
