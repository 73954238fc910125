use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use serde::de::DeserializeOwned;

/// Extracts `T` from a JSON body or an urlencoded form, depending on the
/// request's content type. Deserialization failures reject with 400.
pub struct JsonOrForm<T>(pub T);

impl<T> JsonOrForm<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> FromRequest for JsonOrForm<T>
where
    T: DeserializeOwned + 'static,
{
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;
    type Config = ();

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        if req.content_type() == "application/json" {
            let json = web::Json::<T>::from_request(req, payload);
            Box::pin(async move { Ok(JsonOrForm(json.await?.into_inner())) })
        } else {
            let form = web::Form::<T>::from_request(req, payload);
            Box::pin(async move { Ok(JsonOrForm(form.await?.into_inner())) })
        }
    }
}
