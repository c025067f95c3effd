//! Student management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        loan::LoanDetails,
        page::{PageParams, PaginatedResponse},
        student::{CreateStudent, Student, StudentQuery, UpdateStudent},
    },
    AppState,
};

use super::page_request;

/// List students with filters and pagination
#[utoipa::path(
    get,
    path = "/students",
    tag = "students",
    params(StudentQuery),
    responses(
        (status = 200, description = "List of students", body = PaginatedResponse<Student>)
    )
)]
pub async fn list_students(
    State(state): State<AppState>,
    Query(query): Query<StudentQuery>,
) -> AppResult<Json<PaginatedResponse<Student>>> {
    let page = page_request(&state, query.page, query.per_page);
    let (students, total) = state.services.students.search(&query, page).await?;
    Ok(Json(PaginatedResponse::new(students, total, page)))
}

/// Get student by ID
#[utoipa::path(
    get,
    path = "/students/{id}",
    tag = "students",
    params(
        ("id" = i32, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student details", body = Student),
        (status = 404, description = "Student not found")
    )
)]
pub async fn get_student(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<Json<Student>> {
    let student = state.services.students.get_by_id(id).await?;
    Ok(Json(student))
}

/// Register a new student
#[utoipa::path(
    post,
    path = "/students",
    tag = "students",
    request_body = CreateStudent,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Registration or email already in use")
    )
)]
pub async fn create_student(
    State(state): State<AppState>,
    Json(student): Json<CreateStudent>,
) -> AppResult<(StatusCode, Json<Student>)> {
    let created = state.services.students.create(&student).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing student
#[utoipa::path(
    put,
    path = "/students/{id}",
    tag = "students",
    params(
        ("id" = i32, Path, description = "Student ID")
    ),
    request_body = UpdateStudent,
    responses(
        (status = 200, description = "Student updated", body = Student),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Student not found"),
        (status = 409, description = "Registration or email already in use")
    )
)]
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(student): Json<UpdateStudent>,
) -> AppResult<Json<Student>> {
    let updated = state.services.students.update(id, &student).await?;
    Ok(Json(updated))
}

/// Delete a student
#[utoipa::path(
    delete,
    path = "/students/{id}",
    tag = "students",
    params(
        ("id" = i32, Path, description = "Student ID")
    ),
    responses(
        (status = 204, description = "Student deleted"),
        (status = 404, description = "Student not found"),
        (status = 409, description = "Student still has loans")
    )
)]
pub async fn delete_student(State(state): State<AppState>, Path(id): Path<i32>) -> AppResult<StatusCode> {
    state.services.students.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Loans of a student, active and returned
#[utoipa::path(
    get,
    path = "/students/{id}/loans",
    tag = "students",
    params(
        ("id" = i32, Path, description = "Student ID"),
        PageParams
    ),
    responses(
        (status = 200, description = "Student's loans", body = PaginatedResponse<LoanDetails>),
        (status = 404, description = "Student not found")
    )
)]
pub async fn list_student_loans(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<PaginatedResponse<LoanDetails>>> {
    let page = page_request(&state, params.page, params.per_page);
    let (loans, total) = state.services.loans.student_loans(id, page).await?;
    Ok(Json(PaginatedResponse::new(loans, total, page)))
}
