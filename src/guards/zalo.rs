use rocket::State;
use rocket::request::{self, FromRequest, Outcome, Request};

use crate::fairing::ZaloOtpState;
use crate::services::ZaloClient;

/// Hands each request its own client, built from the state managed by
/// [`fairing::init`](crate::fairing::init). Fails with 500 when the fairing is
/// not attached.
#[rocket::async_trait]
impl<'r> FromRequest<'r> for ZaloClient {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        match req.guard::<&State<ZaloOtpState>>().await {
            Outcome::Success(state) => Outcome::Success(state.client()),
            Outcome::Error(e) => Outcome::Error(e),
            Outcome::Forward(f) => Outcome::Forward(f),
        }
    }
}
