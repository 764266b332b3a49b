//! OpenAPI document for the property endpoints.

use crate::handlers::property;
use crate::model::{Location, LocationPatch, NewProperty, Property, PropertyPatch, PropertyStatus};
use crate::response::{Pagination, ResponseStatus};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(property::create, property::list, property::read, property::update, property::delete),
    components(schemas(
        Property,
        Location,
        PropertyStatus,
        NewProperty,
        PropertyPatch,
        LocationPatch,
        Pagination,
        ResponseStatus
    )),
    tags((name = "properties", description = "Property listing CRUD"))
)]
pub struct ApiDoc;
