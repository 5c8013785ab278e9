//! Compact signed-token codec
//!
//! Tokens are three dot-joined segments:
//!
//! ```text
//! <layout> . base64url(packed fields) . base64url(HMAC-SHA1 over the first two segments)
//! ```
//!
//! The layout is a compact descriptor of the packed fields: `I` is an
//! unsigned 32-bit big-endian integer, `<n>s` is a fixed n-byte string
//! (so `II4s` is expiry + account id + a 4-byte fingerprint). It travels
//! in the clear but is covered by the MAC, so tampering with it
//! invalidates the signature.
//!
//! The timed wrappers prepend an expiry field ahead of the caller's own
//! fields; expiry is checked strictly after signature verification, so
//! holders of forged tokens cannot distinguish "bad signature" from
//! "expired".

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use std::time::Duration;

use crate::crypto::HmacKey;
use crate::error::AuthError;

/// Longest fixed byte-string field a layout may declare
const MAX_BYTES_FIELD: usize = 64;

/// One field kind in a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    /// Unsigned 32-bit big-endian integer (`I`)
    U32,
    /// Fixed-length byte string (`<n>s`)
    Bytes(usize),
}

/// A decoded or to-be-encoded field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    U32(u32),
    Bytes(Vec<u8>),
}

impl Field {
    /// The integer value, if this is an integer field
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::U32(v) => Some(*v),
            Self::Bytes(_) => None,
        }
    }

    /// The byte-string value, if this is a byte-string field
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::U32(_) => None,
            Self::Bytes(b) => Some(b),
        }
    }
}

/// Parsed field layout of a token body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    spec: String,
    fields: Vec<FieldKind>,
}

impl Layout {
    /// Parse a layout descriptor such as `"II4s"` or `"I16s"`.
    ///
    /// Rejects empty descriptors, zero-length byte fields and byte
    /// fields longer than 64 bytes.
    pub fn parse(spec: &str) -> Result<Self, AuthError> {
        let mut fields = Vec::new();
        let mut chars = spec.chars().peekable();

        while let Some(&c) = chars.peek() {
            match c {
                'I' => {
                    chars.next();
                    fields.push(FieldKind::U32);
                }
                '0'..='9' => {
                    let mut len: usize = 0;
                    while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
                        chars.next();
                        len = len
                            .checked_mul(10)
                            .and_then(|l| l.checked_add(d as usize))
                            .ok_or(AuthError::InvalidToken)?;
                    }
                    if chars.next() != Some('s') || len == 0 || len > MAX_BYTES_FIELD {
                        return Err(AuthError::InvalidToken);
                    }
                    fields.push(FieldKind::Bytes(len));
                }
                _ => return Err(AuthError::InvalidToken),
            }
        }

        if fields.is_empty() {
            return Err(AuthError::InvalidToken);
        }

        Ok(Self {
            spec: spec.to_string(),
            fields,
        })
    }

    /// The descriptor string this layout was parsed from
    pub fn as_str(&self) -> &str {
        &self.spec
    }

    /// Packed size of a body in this layout
    fn packed_len(&self) -> usize {
        self.fields
            .iter()
            .map(|f| match f {
                FieldKind::U32 => 4,
                FieldKind::Bytes(n) => *n,
            })
            .sum()
    }

    /// Pack values per the layout. Value count, kind or byte length
    /// mismatches are rejected.
    fn pack(&self, values: &[Field]) -> Result<Vec<u8>, AuthError> {
        if values.len() != self.fields.len() {
            return Err(AuthError::InvalidToken);
        }

        let mut out = Vec::with_capacity(self.packed_len());
        for (kind, value) in self.fields.iter().zip(values) {
            match (kind, value) {
                (FieldKind::U32, Field::U32(v)) => out.extend_from_slice(&v.to_be_bytes()),
                (FieldKind::Bytes(n), Field::Bytes(b)) if b.len() == *n => {
                    out.extend_from_slice(b)
                }
                _ => return Err(AuthError::InvalidToken),
            }
        }
        Ok(out)
    }

    /// Unpack a packed body per the layout
    fn unpack(&self, mut bytes: &[u8]) -> Result<Vec<Field>, AuthError> {
        if bytes.len() != self.packed_len() {
            return Err(AuthError::InvalidToken);
        }

        let mut values = Vec::with_capacity(self.fields.len());
        for kind in &self.fields {
            match kind {
                FieldKind::U32 => {
                    let (head, rest) = bytes.split_at(4);
                    let mut buf = [0u8; 4];
                    buf.copy_from_slice(head);
                    values.push(Field::U32(u32::from_be_bytes(buf)));
                    bytes = rest;
                }
                FieldKind::Bytes(n) => {
                    let (head, rest) = bytes.split_at(*n);
                    values.push(Field::Bytes(head.to_vec()));
                    bytes = rest;
                }
            }
        }
        Ok(values)
    }
}

/// Encode and sign a token: `layout.body.signature`
pub fn encode(layout: &Layout, values: &[Field], key: &HmacKey) -> Result<String, AuthError> {
    let body = URL_SAFE_NO_PAD.encode(layout.pack(values)?);
    let signed = format!("{}.{}", layout.as_str(), body);
    let signature = URL_SAFE_NO_PAD.encode(key.sign(signed.as_bytes()));

    Ok(format!("{signed}.{signature}"))
}

/// Verify and decode a token.
///
/// Exactly three segments; the MAC is recomputed over the first two and
/// compared constant-time before anything inside the token is trusted.
pub fn decode(token: &str, key: &HmacKey) -> Result<Vec<Field>, AuthError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(AuthError::InvalidToken);
    }
    let (layout, body, signature) = (segments[0], segments[1], segments[2]);

    let signature = URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|_| AuthError::InvalidToken)?;

    let signed_len = layout.len() + 1 + body.len();
    if !key.verify(token[..signed_len].as_bytes(), &signature) {
        return Err(AuthError::InvalidToken);
    }

    let layout = Layout::parse(layout)?;
    let body = URL_SAFE_NO_PAD
        .decode(body)
        .map_err(|_| AuthError::InvalidToken)?;

    layout.unpack(&body)
}

/// Current time as Unix seconds
fn unix_now() -> u32 {
    Utc::now().timestamp() as u32
}

/// Encode a token with an expiry field prepended ahead of the caller's
/// fields
pub fn encode_timed(
    layout: &Layout,
    values: &[Field],
    key: &HmacKey,
    ttl: Duration,
) -> Result<String, AuthError> {
    let timed_layout = Layout::parse(&format!("I{}", layout.as_str()))?;
    let expires_at = unix_now().saturating_add(ttl.as_secs() as u32);

    let mut timed_values = Vec::with_capacity(values.len() + 1);
    timed_values.push(Field::U32(expires_at));
    timed_values.extend_from_slice(values);

    encode(&timed_layout, &timed_values, key)
}

/// Decode a timed token, enforce freshness, and strip the expiry field.
///
/// Expiry is checked only after the signature verified.
pub fn decode_timed(token: &str, key: &HmacKey) -> Result<Vec<Field>, AuthError> {
    let mut values = decode(token, key)?;

    match values.first().and_then(Field::as_u32) {
        Some(expires_at) if expires_at >= unix_now() => {
            values.remove(0);
            Ok(values)
        }
        Some(_) => Err(AuthError::ExpiredToken),
        None => Err(AuthError::InvalidToken),
    }
}
