pub mod claims;
pub mod forgot_password;
pub mod login;
pub mod logout;
pub mod reset_password;
pub mod session;
pub mod signup;

pub use login::handle_login;
pub use login::handle_me;
pub use logout::handle_logout;
pub use signup::handle_signup;

use axum::http::{header, HeaderMap, HeaderValue};
use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

use crate::models::user::{PublicUser, User};
use crate::utils::jwt::create_jwt;

use claims::Claims;

/// Sessions last one day; matches the token expiry baked into the JWT.
const SESSION_TTL: Duration = Duration::days(1);

/// Builds the `Set-Cookie` header carrying a fresh session JWT for the
/// given user, along with the public view of the account.
pub(crate) fn issue_session_cookie(
    user: &User,
) -> Result<(HeaderMap, PublicUser), jsonwebtoken::errors::Error> {
    let claims = Claims {
        id: user.id.to_string(),
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role,
        exp: (time::OffsetDateTime::now_utc() + SESSION_TTL).unix_timestamp() as usize,
    };
    let token = create_jwt(&claims)?;

    let cookie = Cookie::build(("auth_token", token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(SESSION_TTL)
        .build();

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie.to_string())
            .expect("cookie string contains no invalid header bytes"),
    );

    Ok((headers, PublicUser::from(user)))
}
