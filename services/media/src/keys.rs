//! Random object keys and file names
//!
//! Every key carries 32 bytes from the OS random source, so collisions within
//! a process lifetime are not a practical concern.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use mime::Mime;
use rand::RngCore;
use rand::rngs::OsRng;

use crate::error::{MediaError, MediaResult};
use crate::inspector::AspectRatio;

const KEY_BYTES: usize = 32;

fn random_bytes() -> MediaResult<[u8; KEY_BYTES]> {
    let mut buf = [0u8; KEY_BYTES];
    OsRng.try_fill_bytes(&mut buf).map_err(MediaError::Random)?;
    Ok(buf)
}

/// `<aspect>/<64 hex chars>.mp4`
pub fn video_object_key(aspect: AspectRatio) -> MediaResult<String> {
    let bytes = random_bytes()?;
    Ok(format!("{}/{}.mp4", aspect.prefix(), hex::encode(bytes)))
}

/// First extension registered for `media_type`, without the leading dot
pub fn extension_for(media_type: &Mime) -> MediaResult<&'static str> {
    mime_guess::get_mime_extensions(media_type)
        .and_then(|extensions| extensions.first().copied())
        .ok_or_else(|| MediaError::UnknownExtension(media_type.essence_str().to_string()))
}

/// `<base64url>.<ext>` for a thumbnail of type `media_type`
pub fn thumbnail_file_name(media_type: &Mime) -> MediaResult<String> {
    let extension = extension_for(media_type)?;
    let bytes = random_bytes()?;
    Ok(format!("{}.{}", URL_SAFE_NO_PAD.encode(bytes), extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_video_key_shape() {
        let key = video_object_key(AspectRatio::Portrait).unwrap();
        let (prefix, rest) = key.split_once('/').unwrap();
        assert_eq!(prefix, "portrait");

        let hex_part = rest.strip_suffix(".mp4").unwrap();
        assert_eq!(hex_part.len(), 64);
        assert!(hex_part.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_keys_do_not_repeat() {
        let keys: HashSet<String> = (0..100)
            .map(|_| video_object_key(AspectRatio::Other).unwrap())
            .collect();
        assert_eq!(keys.len(), 100);
    }

    #[test]
    fn test_thumbnail_name_uses_registered_extension() {
        let name = thumbnail_file_name(&mime::IMAGE_PNG).unwrap();
        let (stem, ext) = name.rsplit_once('.').unwrap();
        assert_eq!(ext, "png");
        // 32 bytes in unpadded base64
        assert_eq!(stem.len(), 43);
        assert!(!stem.contains('/') && !stem.contains('+') && !stem.contains('='));
    }

    #[test]
    fn test_unknown_media_type_has_no_extension() {
        let unknown: Mime = "image/x-tubely-unknown".parse().unwrap();
        assert!(matches!(
            thumbnail_file_name(&unknown),
            Err(MediaError::UnknownExtension(t)) if t == "image/x-tubely-unknown"
        ));
    }
}
