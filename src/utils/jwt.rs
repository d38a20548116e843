use std::env;

use jsonwebtoken::{
    decode, encode,
    errors::{Error, ErrorKind},
    Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation,
};

use crate::routes::auth::claims::Claims;

fn secret() -> Result<Vec<u8>, Error> {
    env::var("JWT_SECRET")
        .map(String::into_bytes)
        .map_err(|_| Error::from(ErrorKind::InvalidKeyFormat))
}

pub fn create_jwt(claims: &Claims) -> Result<String, Error> {
    let secret = secret()?;
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(&secret),
    )
}

pub fn decode_jwt(token: &str) -> Result<TokenData<Claims>, Error> {
    let secret = secret()?;
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(token, &DecodingKey::from_secret(&secret), &validation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn claims(exp_offset: i64) -> Claims {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;
        Claims {
            id: "user-123".into(),
            name: "Test User".into(),
            email: "user@example.com".into(),
            role: UserRole::Candidate,
            exp: (now + exp_offset) as usize,
        }
    }

    #[test]
    fn round_trips_valid_claims() {
        std::env::set_var("JWT_SECRET", "0123456789abcdef0123456789abcdef");
        let token = create_jwt(&claims(3600)).unwrap();
        let decoded = decode_jwt(&token).unwrap();
        assert_eq!(decoded.claims.email, "user@example.com");
        assert_eq!(decoded.claims.role, UserRole::Candidate);
    }

    #[test]
    fn rejects_expired_token() {
        std::env::set_var("JWT_SECRET", "0123456789abcdef0123456789abcdef");
        let token = create_jwt(&claims(-3600)).unwrap();
        assert!(decode_jwt(&token).is_err());
    }

    #[test]
    fn rejects_tampered_token() {
        std::env::set_var("JWT_SECRET", "0123456789abcdef0123456789abcdef");
        let mut token = create_jwt(&claims(3600)).unwrap();
        token.push('x');
        assert!(decode_jwt(&token).is_err());
    }
}
