//! Author management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        author::{Author, AuthorQuery, CreateAuthor, UpdateAuthor},
        book::Book,
        book_author::BookAuthor,
        page::{PageParams, PaginatedResponse},
    },
    AppState,
};

use super::page_request;

/// List authors with filters and pagination
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    params(AuthorQuery),
    responses(
        (status = 200, description = "List of authors", body = PaginatedResponse<Author>)
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    Query(query): Query<AuthorQuery>,
) -> AppResult<Json<PaginatedResponse<Author>>> {
    let page = page_request(&state, query.page, query.per_page);
    let (authors, total) = state.services.authors.search(&query, page).await?;
    Ok(Json(PaginatedResponse::new(authors, total, page)))
}

/// Get author by ID
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author details", body = Author),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Json<Author>> {
    let author = state.services.authors.get_by_id(id).await?;
    Ok(Json(author))
}

/// Create a new author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    Json(author): Json<CreateAuthor>,
) -> AppResult<(StatusCode, Json<Author>)> {
    let created = state.services.authors.create(&author).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing author
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    request_body = UpdateAuthor,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(author): Json<UpdateAuthor>,
) -> AppResult<Json<Author>> {
    let updated = state.services.authors.update(id, &author).await?;
    Ok(Json(updated))
}

/// Delete an author and its book links
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    params(
        ("id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn delete_author(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    state.services.authors.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Books written by an author
#[utoipa::path(
    get,
    path = "/authors/{id}/books",
    tag = "authors",
    params(
        ("id" = i32, Path, description = "Author ID"),
        PageParams
    ),
    responses(
        (status = 200, description = "Author's books", body = PaginatedResponse<Book>),
        (status = 404, description = "Author not found")
    )
)]
pub async fn list_author_books(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<PaginatedResponse<Book>>> {
    let page = page_request(&state, params.page, params.per_page);
    let (books, total) = state.services.authors.books(id, page).await?;
    Ok(Json(PaginatedResponse::new(books, total, page)))
}

/// Link a book to an author
#[utoipa::path(
    post,
    path = "/authors/{id}/books/{book_id}",
    tag = "authors",
    params(
        ("id" = i32, Path, description = "Author ID"),
        ("book_id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 201, description = "Link created", body = BookAuthor),
        (status = 404, description = "Author or book not found"),
        (status = 409, description = "Already linked")
    )
)]
pub async fn link_book(
    State(state): State<AppState>,
    Path((id, book_id)): Path<(i32, i32)>,
) -> AppResult<(StatusCode, Json<BookAuthor>)> {
    let link = state.services.books.link_author(book_id, id).await?;
    Ok((StatusCode::CREATED, Json(link)))
}

/// Remove the link between a book and an author
#[utoipa::path(
    delete,
    path = "/authors/{id}/books/{book_id}",
    tag = "authors",
    params(
        ("id" = i32, Path, description = "Author ID"),
        ("book_id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Link removed"),
        (status = 404, description = "Author, book or link not found")
    )
)]
pub async fn unlink_book(
    State(state): State<AppState>,
    Path((id, book_id)): Path<(i32, i32)>,
) -> AppResult<StatusCode> {
    state.services.books.unlink_author(book_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
