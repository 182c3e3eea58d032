use crate::model::document::TagMap;
use crate::model::tag::Tag;

/// Encode an ordered tag forest into the nested-mapping persisted shape.
///
/// Sibling order becomes mapping insertion order, which [`TagMap`] preserves.
/// Two siblings sharing a name collapse to a single key carrying the last
/// sibling's subtree — the persisted shape cannot represent both, and this
/// codec does not try to paper over that.
pub fn encode_tags(tags: &[Tag]) -> TagMap {
    let mut map = TagMap::default();
    for tag in tags {
        map.0.insert(tag.name.clone(), encode_tags(&tag.children));
    }
    map
}

/// Decode the persisted shape back into a tag forest, one tag per key in
/// the mapping's iteration order.
pub fn decode_tags(map: &TagMap) -> Vec<Tag> {
    map.0
        .iter()
        .map(|(name, children)| Tag::with_children(name.clone(), decode_tags(children)))
        .collect()
}
