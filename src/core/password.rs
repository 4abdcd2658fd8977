// password hashing - bcrypt, stored in the usual $2b$ modular format

use tracing::warn;

use crate::Error;

// same work factor as the hashes the old demo data shipped with
const COST: u32 = 10;

pub fn hash(password: &str) -> Result<String, Error> {
    Ok(bcrypt::hash(password, COST)?)
}

pub fn verify(password: &str, stored: &str) -> bool {
    match bcrypt::verify(password, stored) {
        Ok(matched) => matched,
        Err(e) => {
            warn!(error = %e, "stored password hash is unreadable");
            false
        }
    }
}
