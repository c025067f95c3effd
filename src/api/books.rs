//! Book catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        author::Author,
        book::{Book, BookLoanStats, BookQuery, BookSearchQuery, CreateBook, RankingQuery, UpdateBook},
        book_author::BookAuthor,
        loan::LoanDetails,
        page::{PageParams, PaginatedResponse},
    },
    AppState,
};

use super::page_request;

/// List books with filters and pagination
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "List of books", body = PaginatedResponse<Book>)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<PaginatedResponse<Book>>> {
    let page = page_request(&state, query.page, query.per_page);
    let (books, total) = state.services.books.search(&query, page).await?;
    Ok(Json(PaginatedResponse::new(books, total, page)))
}

/// Free-text search over title, category and author names
#[utoipa::path(
    get,
    path = "/books/search",
    tag = "books",
    params(BookSearchQuery),
    responses(
        (status = 200, description = "Matching books", body = PaginatedResponse<Book>),
        (status = 400, description = "Missing search term")
    )
)]
pub async fn search_books(
    State(state): State<AppState>,
    Query(query): Query<BookSearchQuery>,
) -> AppResult<Json<PaginatedResponse<Book>>> {
    let page = page_request(&state, query.page, query.per_page);
    let (books, total) = state.services.books.search_text(&query, page).await?;
    Ok(Json(PaginatedResponse::new(books, total, page)))
}

/// Books ranked by number of loans
#[utoipa::path(
    get,
    path = "/books/most-borrowed",
    tag = "books",
    params(RankingQuery),
    responses(
        (status = 200, description = "Most borrowed books", body = Vec<BookLoanStats>),
        (status = 400, description = "Limit out of range")
    )
)]
pub async fn most_borrowed_books(
    State(state): State<AppState>,
    Query(query): Query<RankingQuery>,
) -> AppResult<Json<Vec<BookLoanStats>>> {
    let ranking = state.services.books.most_borrowed(&query).await?;
    Ok(Json(ranking))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Json<Book>> {
    let book = state.services.books.get_by_id(id).await?;
    Ok(Json(book))
}

/// Add a book to the catalog
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "ISBN already in use")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    Json(book): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let created = state.services.books.create(&book).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "ISBN already in use")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(book): Json<UpdateBook>,
) -> AppResult<Json<Book>> {
    let updated = state.services.books.update(id, &book).await?;
    Ok(Json(updated))
}

/// Delete a book and its author links
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book still has loans")
    )
)]
pub async fn delete_book(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    state.services.books.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Authors of a book
#[utoipa::path(
    get,
    path = "/books/{id}/authors",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book's authors", body = Vec<Author>),
        (status = 404, description = "Book not found")
    )
)]
pub async fn list_book_authors(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Json<Vec<Author>>> {
    let authors = state.services.books.authors(id).await?;
    Ok(Json(authors))
}

/// Link an author to a book
#[utoipa::path(
    post,
    path = "/books/{id}/authors/{author_id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID"),
        ("author_id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 201, description = "Link created", body = BookAuthor),
        (status = 404, description = "Book or author not found"),
        (status = 409, description = "Already linked")
    )
)]
pub async fn link_author(
    State(state): State<AppState>,
    Path((id, author_id)): Path<(i32, i32)>,
) -> AppResult<(StatusCode, Json<BookAuthor>)> {
    let link = state.services.books.link_author(id, author_id).await?;
    Ok((StatusCode::CREATED, Json(link)))
}

/// Remove the link between a book and an author
#[utoipa::path(
    delete,
    path = "/books/{id}/authors/{author_id}",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID"),
        ("author_id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 204, description = "Link removed"),
        (status = 404, description = "Book, author or link not found")
    )
)]
pub async fn unlink_author(
    State(state): State<AppState>,
    Path((id, author_id)): Path<(i32, i32)>,
) -> AppResult<StatusCode> {
    state.services.books.unlink_author(id, author_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Loans of a book, active and returned
#[utoipa::path(
    get,
    path = "/books/{id}/loans",
    tag = "books",
    params(
        ("id" = i32, Path, description = "Book ID"),
        PageParams
    ),
    responses(
        (status = 200, description = "Book's loans", body = PaginatedResponse<LoanDetails>),
        (status = 404, description = "Book not found")
    )
)]
pub async fn list_book_loans(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<PaginatedResponse<LoanDetails>>> {
    let page = page_request(&state, params.page, params.per_page);
    let (loans, total) = state.services.loans.book_loans(id, page).await?;
    Ok(Json(PaginatedResponse::new(loans, total, page)))
}
