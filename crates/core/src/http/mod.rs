//! Pure HTTP-facing logic: route resolution, body decoding, status mapping
//! and response assembly. Nothing in here performs I/O.

mod body;
mod error;
mod response;
mod routing;

pub use body::{decode_draft, decode_patch};
pub use error::{api_error_to_status_code, ApiError};
pub use response::{
    location_path, ApiResponse, CorsPolicy, ResponseEnvelope, ALLOWED_METHODS,
    HEADER_ALLOW_HEADERS, HEADER_ALLOW_METHODS, HEADER_ALLOW_ORIGIN, HEADER_CONTENT_TYPE,
    HEADER_LOCATION, HEADER_MAX_AGE, PREFLIGHT_MAX_AGE,
};
pub use routing::{resolve_route, RequestDescriptor, RequestMethod, Route};
