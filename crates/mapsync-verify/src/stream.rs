use bytes::{Bytes, BytesMut};
use futures_util::{Stream, TryStreamExt};

use crate::{Digest, Hasher, Sha256Hasher};

/// Drain a byte stream into one buffer while hashing it.
///
/// Each chunk is touched once for both purposes, so a download can be checked
/// against its expected digest without a second pass. Stream errors are
/// returned unchanged.
pub async fn hash_and_buffer<S, E>(mut stream: S) -> Result<(Bytes, Digest), E>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
{
    let mut hasher = Sha256Hasher::new();
    let mut buffer = BytesMut::new();
    while let Some(chunk) = stream.try_next().await? {
        hasher.update(&chunk);
        buffer.extend_from_slice(&chunk);
    }
    Ok((buffer.freeze(), hasher.finish()))
}
