use crate::fb2::BinaryResource;
use std::borrow::Cow;
use std::collections::HashMap;

/// Directory, relative to the package document, holding extracted images.
pub const IMAGES_DIR: &str = "images";

/// Manifest ids taken by the fixed package entries.
pub const RESERVED_IDS: [&str; 4] = ["ncx", "nav", "cover", "content"];

/// Prefix given to a binary's manifest id when its own id is reserved.
const RENAMED_ID_PREFIX: &str = "img-";

/// File extension for an image content type. Unknown types fall back to `.jpg`.
pub fn image_extension(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" | "image/jpg" => ".jpg",
        "image/png" => ".png",
        "image/gif" => ".gif",
        "image/webp" => ".webp",
        "image/svg+xml" => ".svg",
        _ => ".jpg",
    }
}

/// Binary resources keyed by id, in document order.
///
/// A later resource with an already-seen id replaces the earlier payload
/// but keeps its position. Resources without an id, or whose id contains a
/// path separator, are dropped.
#[derive(Debug, Default)]
pub struct ResourceMap<'a> {
    entries: Vec<&'a BinaryResource>,
    index: HashMap<&'a str, usize>,
}

impl<'a> ResourceMap<'a> {
    pub fn new(binaries: &'a [BinaryResource]) -> Self {
        let mut map = ResourceMap::default();
        for binary in binaries {
            if binary.id.is_empty() {
                tracing::warn!(
                    content_type = %binary.content_type,
                    "dropping binary without an id"
                );
                continue;
            }
            if binary.id.contains(['/', '\\']) {
                tracing::warn!(id = %binary.id, "dropping binary whose id contains a path separator");
                continue;
            }
            if RESERVED_IDS.contains(&binary.id.as_str()) {
                tracing::warn!(
                    id = %binary.id,
                    manifest_id = %format!("{RENAMED_ID_PREFIX}{}", binary.id),
                    "binary id collides with a package entry, renaming its manifest item"
                );
            }
            match map.index.get(binary.id.as_str()) {
                Some(&pos) => {
                    tracing::warn!(id = %binary.id, "duplicate binary id, keeping the later payload");
                    map.entries[pos] = binary;
                }
                None => {
                    map.index.insert(binary.id.as_str(), map.entries.len());
                    map.entries.push(binary);
                }
            }
        }
        map
    }

    pub fn get(&self, id: &str) -> Option<&'a BinaryResource> {
        self.index.get(id).map(|&pos| self.entries[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a BinaryResource> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Manifest item id of a resource: its own id, or `img-<id>` when that
    /// is one of [`RESERVED_IDS`].
    pub fn manifest_id(resource: &BinaryResource) -> Cow<'_, str> {
        if RESERVED_IDS.contains(&resource.id.as_str()) {
            Cow::Owned(format!("{RENAMED_ID_PREFIX}{}", resource.id))
        } else {
            Cow::Borrowed(resource.id.as_str())
        }
    }

    /// Package-relative href of a known resource: `images/<id><ext>`.
    pub fn href_of(resource: &BinaryResource) -> String {
        format!(
            "{IMAGES_DIR}/{}{}",
            resource.id,
            image_extension(&resource.content_type)
        )
    }

    /// Href for an image reference; unknown ids get a `.jpg` guess.
    pub fn image_href(&self, id: &str) -> String {
        match self.get(id) {
            Some(resource) => Self::href_of(resource),
            None => {
                tracing::warn!(id = %id, "image references unknown binary, guessing .jpg");
                format!("{IMAGES_DIR}/{id}.jpg")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary(id: &str, content_type: &str, data: &[u8]) -> BinaryResource {
        BinaryResource {
            id: id.to_string(),
            content_type: content_type.to_string(),
            data: data.to_vec(),
        }
    }

    #[test]
    fn extension_table() {
        assert_eq!(image_extension("image/jpeg"), ".jpg");
        assert_eq!(image_extension("image/jpg"), ".jpg");
        assert_eq!(image_extension("image/png"), ".png");
        assert_eq!(image_extension("image/gif"), ".gif");
        assert_eq!(image_extension("image/webp"), ".webp");
        assert_eq!(image_extension("image/svg+xml"), ".svg");
        assert_eq!(image_extension("application/octet-stream"), ".jpg");
        assert_eq!(image_extension(""), ".jpg");
    }

    #[test]
    fn known_and_unknown_hrefs() {
        let binaries = vec![binary("pic", "image/png", b"x")];
        let map = ResourceMap::new(&binaries);
        assert_eq!(map.image_href("pic"), "images/pic.png");
        assert_eq!(map.image_href("missing"), "images/missing.jpg");
    }

    #[test]
    fn duplicates_keep_first_position_and_last_payload() {
        let binaries = vec![
            binary("a", "image/png", b"first"),
            binary("b", "image/gif", b"b"),
            binary("a", "image/jpeg", b"second"),
        ];
        let map = ResourceMap::new(&binaries);
        assert_eq!(map.len(), 2);
        let ids: Vec<&str> = map.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(map.get("a").unwrap().data, b"second");
    }

    #[test]
    fn drops_binaries_without_id() {
        let binaries = vec![binary("", "image/png", b"x")];
        let map = ResourceMap::new(&binaries);
        assert!(map.is_empty());
    }

    #[test]
    fn path_like_ids_are_dropped() {
        let binaries = vec![
            binary("../../escape", "image/png", b"x"),
            binary("dir\\pic", "image/png", b"x"),
            binary("ok", "image/png", b"x"),
        ];
        let map = ResourceMap::new(&binaries);
        let ids: Vec<&str> = map.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["ok"]);
        assert!(map.get("../../escape").is_none());
    }

    #[test]
    fn reserved_ids_get_distinct_manifest_ids() {
        let binaries = vec![
            binary("cover", "image/jpeg", b"x"),
            binary("map", "image/png", b"x"),
        ];
        let map = ResourceMap::new(&binaries);
        assert_eq!(map.len(), 2);
        let cover = map.get("cover").unwrap();
        assert_eq!(ResourceMap::manifest_id(cover), "img-cover");
        assert_eq!(ResourceMap::href_of(cover), "images/cover.jpg");
        assert_eq!(ResourceMap::manifest_id(map.get("map").unwrap()), "map");
    }
}
