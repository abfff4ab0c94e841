use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body that must deserialize and pass its `validator` rules.
///
/// Both failure modes answer 400 with itemized
/// `"[Request validation] <field> <message>"` entries.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct StockChange {
///     #[validate(range(min = 1, message = "must be positive and integer."))]
///     amount: i32,
/// }
///
/// async fn buy(ValidatedJson(input): ValidatedJson<StockChange>) { /* ... */ }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::from(rejection).into_response())?;

        data.validate()
            .map_err(|errors| AppError::from(errors).into_response())?;

        Ok(ValidatedJson(data))
    }
}
