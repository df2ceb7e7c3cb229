//! Types dealing with chunk identity.

/// The conventional length in bytes of a chunk key digest.
///
/// Keys of other lengths are accepted, nothing in this crate validates
/// key length.
pub const KEY_LEN: usize = 32;

/// How many leading key bytes [ChunkKey::log] renders.
const LOG_LEN: usize = 8;

/// Base data identity type meant for newtyping.
/// You probably want [ChunkKey].
///
/// These bytes should ONLY be the actual digest bytes,
/// without prefix or suffix.
#[derive(
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Id(#[serde(with = "crate::serde_bytes_base64")] pub bytes::Bytes);

impl std::ops::Deref for Id {
    type Target = bytes::Bytes;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<bytes::Bytes> for Id {
    fn from(b: bytes::Bytes) -> Self {
        Id(b)
    }
}

/// Keys display as base64.
/// This makes debugging so much easier than rust's default of decimal array.
fn display_base64(
    b: &bytes::Bytes,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    use base64::prelude::*;
    f.write_str(&BASE64_URL_SAFE_NO_PAD.encode(b))
}

/// The content digest naming a chunk.
///
/// Two equal keys always denote the same logical chunk.
#[derive(
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct ChunkKey(pub Id);

impl std::ops::Deref for ChunkKey {
    type Target = Id;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<bytes::Bytes> for ChunkKey {
    fn from(b: bytes::Bytes) -> Self {
        ChunkKey(Id(b))
    }
}

impl From<Id> for ChunkKey {
    fn from(b: Id) -> Self {
        ChunkKey(b)
    }
}

impl std::fmt::Display for ChunkKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        display_base64(&self.0 .0, f)
    }
}

impl std::fmt::Debug for ChunkKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        display_base64(&self.0 .0, f)
    }
}

impl ChunkKey {
    /// A short rendering of the key for log lines.
    ///
    /// Only the leading bytes of the digest are shown.
    pub fn log(&self) -> ChunkKeyLog<'_> {
        ChunkKeyLog(self)
    }
}

/// Display adapter returned by [ChunkKey::log].
pub struct ChunkKeyLog<'a>(&'a ChunkKey);

impl std::fmt::Display for ChunkKeyLog<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let b = &self.0 .0 .0;
        let short = b.slice(..LOG_LEN.min(b.len()));
        display_base64(&short, f)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn key_serde_fixtures() {
        const F: &[(&[u8], &str)] = &[
            (b"test-hash-1", "\"dGVzdC1oYXNoLTE\""),
            (b"s", "\"cw\""),
            (&[255, 255, 255, 255, 255, 255, 255], "\"_________w\""),
        ];

        for (d, e) in F.iter() {
            let r = serde_json::to_string(&ChunkKey::from(
                bytes::Bytes::from_static(d),
            ))
            .unwrap();
            assert_eq!(e, &r);
            let r: ChunkKey = serde_json::from_str(e).unwrap();
            assert_eq!(d, &r.0 .0);
        }
    }

    #[test]
    fn display_and_debug_are_base64() {
        let key = ChunkKey::from(bytes::Bytes::from_static(b"test-hash-1"));
        assert_eq!("dGVzdC1oYXNoLTE", key.to_string());
        assert_eq!("dGVzdC1oYXNoLTE", format!("{key:?}"));
    }

    #[test]
    fn log_shows_leading_bytes_only() {
        let key = ChunkKey::from(bytes::Bytes::from_static(
            b"0123456789abcdef0123456789abcdef",
        ));
        assert_eq!("MDEyMzQ1Njc", key.log().to_string());

        let short = ChunkKey::from(bytes::Bytes::from_static(b"s"));
        assert_eq!("cw", short.log().to_string());
    }
}
