/// Property CRUD endpoints
///
/// # Endpoints
///
/// - `GET    /v1/properties` - List visible properties
/// - `POST   /v1/properties` - Add a property (multipart, optional image)
/// - `GET    /v1/properties/:id` - View a property
/// - `PUT    /v1/properties/:id` - Edit a property (multipart, optional image)
/// - `DELETE /v1/properties/:id` - Delete a property
///
/// Add/Edit accept a multipart body with text fields plus one optional file
/// part named `image`. Numeric fields are parsed from the submitted text;
/// any parse failure fails the whole operation before a row is written.
/// An attachment whose extension is not on the allow-list is ignored, as if
/// no file had been sent.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Multipart, Path, State},
    Extension, Json,
};
use rentora_shared::{
    auth::{
        authorization::{require_access, ResourceRef},
        middleware::AuthContext,
    },
    models::property::{AvailabilityStatus, CreateProperty, Property, UpdateProperty},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Delete response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeletePropertyResponse {
    /// Whether the property was deleted
    pub deleted: bool,
}

/// Raw multipart form content before parsing
#[derive(Debug, Default)]
struct PropertyForm {
    property_type: Option<String>,
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    rent_amount: Option<String>,
    availability_status: Option<String>,
    description: Option<String>,
    bedrooms: Option<String>,
    bathrooms: Option<String>,
    area_sqft: Option<String>,

    /// (submitted filename, content)
    image: Option<(String, Vec<u8>)>,
}

impl PropertyForm {
    /// Drains a multipart body into named fields
    async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = PropertyForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            if name == "image" {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field.bytes().await?;
                if !filename.is_empty() && !data.is_empty() {
                    form.image = Some((filename, data.to_vec()));
                }
                continue;
            }

            let text = field.text().await?;
            let value = if text.is_empty() { None } else { Some(text) };

            match name.as_str() {
                "property_type" => form.property_type = value,
                "address" => form.address = value,
                "city" => form.city = value,
                "state" => form.state = value,
                "rent_amount" => form.rent_amount = value,
                "availability_status" => form.availability_status = value,
                "description" => form.description = value,
                "bedrooms" => form.bedrooms = value,
                "bathrooms" => form.bathrooms = value,
                "area_sqft" => form.area_sqft = value,
                // Unknown fields are ignored
                _ => {}
            }
        }

        Ok(form)
    }

    fn require(&self, field: &'static str, value: &Option<String>) -> Result<String, ApiError> {
        value
            .clone()
            .ok_or_else(|| ApiError::validation(field, "This field is required"))
    }

    fn parsed(&self) -> Result<ParsedPropertyForm, ApiError> {
        Ok(ParsedPropertyForm {
            property_type: self.require("property_type", &self.property_type)?,
            address: self.require("address", &self.address)?,
            city: self.require("city", &self.city)?,
            state: self.require("state", &self.state)?,
            rent_amount: parse_decimal("rent_amount", &self.require("rent_amount", &self.rent_amount)?)?,
            availability_status: parse_availability(self.availability_status.as_deref())?,
            description: self.description.clone(),
            bedrooms: parse_opt_int("bedrooms", self.bedrooms.as_deref())?,
            bathrooms: parse_opt_int("bathrooms", self.bathrooms.as_deref())?,
            area_sqft: parse_opt_decimal("area_sqft", self.area_sqft.as_deref())?,
        })
    }
}

/// Form content after numeric/enum parsing
struct ParsedPropertyForm {
    property_type: String,
    address: String,
    city: String,
    state: String,
    rent_amount: Decimal,
    availability_status: AvailabilityStatus,
    description: Option<String>,
    bedrooms: Option<i32>,
    bathrooms: Option<i32>,
    area_sqft: Option<Decimal>,
}

fn parse_decimal(field: &'static str, value: &str) -> Result<Decimal, ApiError> {
    value
        .parse::<Decimal>()
        .map_err(|_| ApiError::validation(field, "Must be a number"))
}

fn parse_opt_decimal(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<Decimal>, ApiError> {
    value.map(|v| parse_decimal(field, v)).transpose()
}

fn parse_opt_int(field: &'static str, value: Option<&str>) -> Result<Option<i32>, ApiError> {
    value
        .map(|v| {
            v.parse::<i32>()
                .map_err(|_| ApiError::validation(field, "Must be a whole number"))
        })
        .transpose()
}

fn parse_availability(value: Option<&str>) -> Result<AvailabilityStatus, ApiError> {
    match value {
        None | Some("available") => Ok(AvailabilityStatus::Available),
        Some("occupied") => Ok(AvailabilityStatus::Occupied),
        Some("maintenance") => Ok(AvailabilityStatus::Maintenance),
        Some(other) => Err(ApiError::validation(
            "availability_status",
            format!("Unknown availability status: {}", other),
        )),
    }
}

/// List visible properties
///
/// Admin sees everything; everyone else sees their own.
pub async fn list_properties(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Property>>> {
    let properties = if auth.is_admin() {
        Property::list_all(&state.db).await?
    } else {
        Property::list_by_owner(&state.db, auth.user_id).await?
    };

    Ok(Json(properties))
}

/// Add a new property owned by the acting user
///
/// The image, when present and of an accepted type, is stored before the
/// row is written; a database failure can therefore leave an orphaned file
/// but never a row pointing at a missing file.
pub async fn add_property(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    multipart: Multipart,
) -> ApiResult<Json<Property>> {
    let form = PropertyForm::read(multipart).await?;
    let parsed = form.parsed()?;

    let image_path = match &form.image {
        Some((filename, data)) if state.uploads.is_allowed(filename) => {
            Some(state.uploads.store(filename, data).await?)
        }
        _ => None,
    };

    let property = Property::create(
        &state.db,
        CreateProperty {
            owner_id: auth.user_id,
            property_type: parsed.property_type,
            address: parsed.address,
            city: parsed.city,
            state: parsed.state,
            rent_amount: parsed.rent_amount,
            availability_status: parsed.availability_status,
            description: parsed.description,
            bedrooms: parsed.bedrooms,
            bathrooms: parsed.bathrooms,
            area_sqft: parsed.area_sqft,
            image_path,
        },
    )
    .await?;

    tracing::info!(property_id = %property.id, owner_id = %auth.user_id, "Property added");

    Ok(Json(property))
}

/// View a property
pub async fn view_property(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Property>> {
    require_access(&state.db, &auth, ResourceRef::Property(id)).await?;

    let property = Property::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Property not found".to_string()))?;

    Ok(Json(property))
}

/// Edit a property
///
/// With a new accepted image, the previous file is deleted only after the
/// new one has been saved.
pub async fn edit_property(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> ApiResult<Json<Property>> {
    require_access(&state.db, &auth, ResourceRef::Property(id)).await?;

    let existing = Property::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Property not found".to_string()))?;

    let form = PropertyForm::read(multipart).await?;
    let parsed = form.parsed()?;

    let new_image = match &form.image {
        Some((filename, data)) if state.uploads.is_allowed(filename) => {
            Some(state.uploads.store(filename, data).await?)
        }
        _ => None,
    };

    let mut tx = state.db.begin().await?;

    let property = Property::update(
        &mut *tx,
        id,
        UpdateProperty {
            property_type: parsed.property_type,
            address: parsed.address,
            city: parsed.city,
            state: parsed.state,
            rent_amount: parsed.rent_amount,
            availability_status: parsed.availability_status,
            description: parsed.description,
            bedrooms: parsed.bedrooms,
            bathrooms: parsed.bathrooms,
            area_sqft: parsed.area_sqft,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Property not found".to_string()))?;

    if let Some(ref stored) = new_image {
        Property::set_image_path(&mut *tx, id, Some(stored.as_str())).await?;
    }

    tx.commit().await?;

    // Old file goes only after the new one is saved and recorded
    if new_image.is_some() {
        if let Some(old) = existing.image_path {
            state.uploads.delete(&old).await?;
        }
    }

    let property = if new_image.is_some() {
        Property::find_by_id(&state.db, id)
            .await?
            .unwrap_or(property)
    } else {
        property
    };

    tracing::info!(property_id = %id, "Property updated");

    Ok(Json(property))
}

/// Delete a property
///
/// Removes the stored image first, then the row; leases and their payments
/// go with it via the database cascade.
pub async fn delete_property(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeletePropertyResponse>> {
    require_access(&state.db, &auth, ResourceRef::Property(id)).await?;

    let property = Property::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Property not found".to_string()))?;

    if let Some(ref image) = property.image_path {
        state.uploads.delete(image).await?;
    }

    let deleted = Property::delete(&state.db, id).await?;

    tracing::info!(property_id = %id, "Property deleted");

    Ok(Json(DeletePropertyResponse { deleted }))
}
