//! Use cases.

mod extract_data;
mod login;

pub use extract_data::{
    AccountPositions, DatasetOutcome, ExtractDataUseCase, ExtractError, ExtractionReport,
    PositionsReport,
};
pub use login::{
    APPLICATION_NAME, CORRELATION_ID_MARKER, ID_TOKEN_MARKER, LoginError, LoginStage,
    LoginUseCase, REDIRECT_URL, resolve_identity,
};
