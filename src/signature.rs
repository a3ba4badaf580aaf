use hmac::{Mac as _, NewMac as _};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("header isn't found")]
    HeaderNotFound,
    #[error("header has invalid length")]
    InvalidLength,
    #[error("header must start with `sha256=`")]
    InvalidPrefix,
    #[error("signature must be 64 hex digits")]
    NotHex,
}

/// HMAC-SHA256 signature sent as `sha256=<hex>` in a request header.
#[derive(Debug, Clone)]
pub struct Signature(pub [u8; 32]);

impl Signature {
    pub fn from_headers(
        headers: &actix_web::http::HeaderMap,
        header: &'static str,
    ) -> Result<Self, Error> {
        let sig_b = headers
            .get(header)
            .ok_or(Error::HeaderNotFound)?
            .as_ref();

        let prefix = b"sha256=";
        let prefix_len = prefix.len();
        if sig_b.len() != 64 + prefix_len {
            return Err(Error::InvalidLength);
        }
        let (sig_prefix, sig_b) = sig_b.split_at(prefix_len);
        if sig_prefix != prefix {
            return Err(Error::InvalidPrefix);
        }

        hex::FromHex::from_hex(sig_b)
            .map(Self)
            .map_err(|_| Error::NotHex)
    }

    /// Checks the signature against `body` in constant time.
    pub fn matches(
        &self,
        key: &[u8],
        body: &[u8],
    ) -> Result<bool, hmac::crypto_mac::InvalidKeyLength> {
        let mut mac = hmac::Hmac::<sha2::Sha256>::new_varkey(key)?;
        mac.update(body);
        let expected = hmac::crypto_mac::Output::new(self.0.into());
        Ok(expected == mac.finalize())
    }
}
