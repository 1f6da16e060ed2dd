use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetKeyError {
    #[error("asset key must not be empty")]
    Empty,
    #[error("asset key must be relative, found leading '/'")]
    LeadingSlash,
    #[error("asset key must not end with '/'")]
    TrailingSlash,
    #[error("asset key has an empty path segment at position {index}")]
    EmptySegment { index: usize },
    #[error("asset key must use '/' as separator, found '\\\\'")]
    Backslash,
    #[error("asset key must not climb out of the asset root with '..'")]
    ParentTraversal,
    #[error("asset key segment '{segment}' contains invalid character '{character}'")]
    InvalidCharacter { segment: String, character: char },
}

/// Keys are relative, slash-separated and lowercase, e.g. `farms/pumpkins/pum_2`.
/// Each segment uses only `a-z`, `0-9`, `_` and `-`.
pub fn validate_asset_key(key: &str) -> Result<(), AssetKeyError> {
    if key.is_empty() {
        return Err(AssetKeyError::Empty);
    }
    if key.contains('\\') {
        return Err(AssetKeyError::Backslash);
    }
    let segments: Vec<&str> = key.split('/').collect();
    let last = segments.len() - 1;
    for (index, segment) in segments.iter().enumerate() {
        match *segment {
            "" if index == 0 => return Err(AssetKeyError::LeadingSlash),
            "" if index == last => return Err(AssetKeyError::TrailingSlash),
            "" => return Err(AssetKeyError::EmptySegment { index }),
            ".." => return Err(AssetKeyError::ParentTraversal),
            _ => check_segment(segment)?,
        }
    }
    Ok(())
}

fn check_segment(segment: &str) -> Result<(), AssetKeyError> {
    match segment
        .chars()
        .find(|&ch| !(ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '_' | '-')))
    {
        Some(character) => Err(AssetKeyError::InvalidCharacter {
            segment: segment.to_string(),
            character,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_nested_lowercase_keys() {
        for key in ["base", "gui", "farms/pumpkins/pum_2", "a-b/c_d"] {
            assert_eq!(validate_asset_key(key), Ok(()), "key={key}");
        }
    }

    #[test]
    fn classifies_malformed_keys() {
        let cases = [
            ("", AssetKeyError::Empty),
            ("/a", AssetKeyError::LeadingSlash),
            ("a/", AssetKeyError::TrailingSlash),
            ("farms//pum_1", AssetKeyError::EmptySegment { index: 1 }),
            (r"a\b", AssetKeyError::Backslash),
            ("..", AssetKeyError::ParentTraversal),
            ("a/../b", AssetKeyError::ParentTraversal),
        ];
        for (key, expected) in cases {
            assert_eq!(validate_asset_key(key), Err(expected), "key={key}");
        }
    }

    #[test]
    fn reports_offending_segment_and_character() {
        assert_eq!(
            validate_asset_key("farms/gui.png"),
            Err(AssetKeyError::InvalidCharacter {
                segment: "gui.png".to_string(),
                character: '.'
            })
        );
        assert!(matches!(
            validate_asset_key("Base"),
            Err(AssetKeyError::InvalidCharacter { character: 'B', .. })
        ));
    }
}
