//! HTTP handlers for catalog record views.
//! Loads records from the registry, wraps them in their registered
//! overlay, and returns the derived display fields as JSON.

use crate::{
    errors::AppError,
    models::{
        edition::{Edition, IdentifierEdit, Link},
        identifiers::IdentifierSet,
        record::Typed,
        subject::{Publisher, RelatedSubject, Subject, SubjectAuthor, SubjectKind},
        units::{Dimensions, Weight},
        user::CreationInfo,
    },
    services::{
        Catalog,
        coverstore::{CoverstoreClient, Image, ImageSize},
        registry::Version,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A cover or photo in a view: the raw ID plus rendered URLs.
#[derive(Serialize)]
pub struct ImageView {
    pub id: i64,
    pub small: String,
    pub medium: String,
    pub large: String,
}

impl ImageView {
    fn new(coverstore: &CoverstoreClient, image: &Image) -> Self {
        Self {
            id: image.id,
            small: coverstore.image_url(image, ImageSize::Small),
            medium: coverstore.image_url(image, ImageSize::Medium),
            large: coverstore.image_url(image, ImageSize::Large),
        }
    }
}

#[derive(Serialize)]
pub struct EditionView {
    pub key: String,
    pub olid: String,
    pub title: String,
    pub covers: Vec<ImageView>,
    pub identifiers: IdentifierSet,
    pub classifications: IdentifierSet,
    pub weight: Option<Weight>,
    pub physical_dimensions: Option<Dimensions>,
    pub table_of_contents: String,
    pub links: Vec<Link>,
}

/// Fields accepted by an edition edit. Absent fields are left unchanged.
#[derive(Deserialize)]
pub struct EditionEdit {
    pub identifiers: Option<Vec<IdentifierEdit>>,
    pub weight: Option<Weight>,
    pub physical_dimensions: Option<Dimensions>,
    pub table_of_contents: Option<String>,
}

/// GET `/editions/{olid}` — derived edition view.
pub async fn get_edition(
    State(catalog): State<Catalog>,
    Path(olid): Path<String>,
) -> Result<Json<EditionView>, AppError> {
    let edition = load_edition(&catalog, &olid).await?;
    Ok(Json(edition_view(&catalog, &edition).await?))
}

/// PUT `/editions/{olid}` — apply an edit and submit the record back to
/// the registry.
pub async fn update_edition(
    State(catalog): State<Catalog>,
    Path(olid): Path<String>,
    Json(edit): Json<EditionEdit>,
) -> Result<Json<EditionView>, AppError> {
    let mut edition = load_edition(&catalog, &olid).await?;

    if let Some(identifiers) = &edit.identifiers {
        edition.set_identifiers(identifiers);
    }
    if let Some(weight) = &edit.weight {
        edition.set_weight(Some(weight));
    }
    if let Some(dimensions) = &edit.physical_dimensions {
        edition.set_physical_dimensions(Some(dimensions));
    }
    if let Some(toc) = &edit.table_of_contents {
        edition.set_toc_text(toc);
    }

    catalog.registry.save_record(edition.record()).await?;
    Ok(Json(edition_view(&catalog, &edition).await?))
}

async fn load_edition(catalog: &Catalog, olid: &str) -> Result<Edition, AppError> {
    let record = catalog
        .registry
        .get_record(&format!("/books/{}", olid))
        .await?;
    match catalog.types.wrap(record) {
        Typed::Edition(edition) => Ok(edition),
        _ => Err(AppError::not_found(format!(
            "record /books/{} is not an edition",
            olid
        ))),
    }
}

async fn edition_view(catalog: &Catalog, edition: &Edition) -> Result<EditionView, AppError> {
    let covers = edition
        .covers(&catalog.coverstore)
        .await?
        .iter()
        .map(|image| ImageView::new(&catalog.coverstore, image))
        .collect();

    Ok(EditionView {
        key: edition.record().key.clone(),
        olid: edition.olid().to_string(),
        title: edition.title(),
        covers,
        identifiers: edition.identifiers(),
        classifications: edition.classifications(),
        weight: edition.weight(),
        physical_dimensions: edition.physical_dimensions(),
        table_of_contents: edition.toc_text(),
        links: edition.links(),
    })
}

#[derive(Serialize)]
pub struct AuthorView {
    pub key: String,
    pub olid: String,
    pub name: String,
    pub photos: Vec<ImageView>,
}

/// GET `/authors/{olid}` — derived author view.
pub async fn get_author(
    State(catalog): State<Catalog>,
    Path(olid): Path<String>,
) -> Result<Json<AuthorView>, AppError> {
    let record = catalog
        .registry
        .get_record(&format!("/authors/{}", olid))
        .await?;
    let Typed::Author(author) = catalog.types.wrap(record) else {
        return Err(AppError::not_found(format!(
            "record /authors/{} is not an author",
            olid
        )));
    };

    let photos = author
        .photos(&catalog.coverstore)
        .await?
        .iter()
        .map(|image| ImageView::new(&catalog.coverstore, image))
        .collect();

    Ok(Json(AuthorView {
        key: author.record().key.clone(),
        olid: author.olid().to_string(),
        name: author.name().to_string(),
        photos,
    }))
}

#[derive(Serialize)]
pub struct WorkView {
    pub key: String,
    pub olid: String,
    pub title: String,
    pub subjects: Vec<String>,
}

/// GET `/works/{olid}` — derived work view.
pub async fn get_work(
    State(catalog): State<Catalog>,
    Path(olid): Path<String>,
) -> Result<Json<WorkView>, AppError> {
    let record = catalog
        .registry
        .get_record(&format!("/works/{}", olid))
        .await?;
    let Typed::Work(work) = catalog.types.wrap(record) else {
        return Err(AppError::not_found(format!(
            "record /works/{} is not a work",
            olid
        )));
    };

    Ok(Json(WorkView {
        key: work.record().key.clone(),
        olid: work.olid().to_string(),
        title: work.title().to_string(),
        subjects: work.subjects(),
    }))
}

/// Window over a subject's editions.
#[derive(Debug, Deserialize)]
pub struct SubjectQueryParams {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct SubjectPageView {
    pub name: String,
    pub edition_count: u64,
    pub author_count: u64,
    /// Edition documents for the window, each with a `cover_id` when the
    /// coverstore has one.
    pub editions: Vec<Map<String, Value>>,
    pub authors: Vec<SubjectAuthor>,
    pub publishers: Vec<Publisher>,
    pub related_subjects: Vec<RelatedSubject>,
}

/// GET `/subjects/{name}` — search-backed subject page.
pub async fn get_subject(
    State(catalog): State<Catalog>,
    Path(name): Path<String>,
    Query(params): Query<SubjectQueryParams>,
) -> Result<Json<SubjectPageView>, AppError> {
    let offset = params.offset.unwrap_or(0);
    let limit = params.limit.unwrap_or(20).clamp(1, 100);
    let subject = Subject::new(name.clone(), SubjectKind::Subject);

    let edition_count = subject.edition_count(&catalog.search).await?;
    let editions = subject
        .covers(&catalog.search, &catalog.coverstore, offset, limit)
        .await?;
    let author_count = subject.author_count(&catalog.search).await?;
    let authors = subject.authors(&catalog.search).await?;
    let publishers = subject.publishers(&catalog.search).await?;

    Ok(Json(SubjectPageView {
        name,
        edition_count,
        author_count,
        editions,
        authors,
        publishers,
        related_subjects: subject.related_subjects(),
    }))
}

/// Query flags for user views. `admin` stands in for the host
/// framework's admin-session check.
#[derive(Debug, Deserialize)]
pub struct UserQueryParams {
    pub admin: Option<bool>,
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct UserView {
    pub key: String,
    pub username: String,
    pub edit_history: Vec<Version>,
    pub edit_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_info: Option<CreationInfo>,
}

/// GET `/users/{username}` — edit history plus admin-only account fields.
pub async fn get_user(
    State(catalog): State<Catalog>,
    Path(username): Path<String>,
    Query(params): Query<UserQueryParams>,
) -> Result<Json<UserView>, AppError> {
    let admin = params.admin.unwrap_or(false);
    let offset = params.offset.unwrap_or(0);
    let limit = params.limit.unwrap_or(10).clamp(1, 100);

    let record = catalog
        .registry
        .get_record(&format!("/people/{}", username))
        .await?;
    let Typed::User(user) = catalog.types.wrap(record) else {
        return Err(AppError::new(
            StatusCode::NOT_FOUND,
            format!("record /people/{} is not a user", username),
        ));
    };

    let edit_history = user.edit_history(&catalog.registry, limit, offset).await?;
    let edit_count = user.edit_count(&catalog.registry, admin).await?;
    let creation_info = user.creation_info(&catalog.registry, admin).await?;

    Ok(Json(UserView {
        key: user.key().to_string(),
        username: user.username().to_string(),
        email: user.email(admin).map(str::to_string),
        edit_history,
        edit_count,
        creation_info,
    }))
}
